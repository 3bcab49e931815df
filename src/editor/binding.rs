//! Style controls.
//!
//! Every setter records the value as the tool default for the next created object. The active
//! object is only touched when it is a text node; any other selection (or none) leaves the scene
//! unchanged and the setter returns `false`.

use crate::foundation::core::Rgba8;
use crate::scene::object::{FontWeight, ShapeKind, TextStyle};

use super::session::Editor;

impl Editor {
    fn apply_to_selected_text(&mut self, f: impl FnOnce(&mut TextStyle)) -> bool {
        let Some(id) = self.scene.selection() else {
            return false;
        };
        let Some(text) = self.scene.get_mut(id).and_then(|o| o.as_text_mut()) else {
            return false;
        };
        f(&mut text.style);
        self.scene.touch();
        tracing::debug!(?id, "text style updated");
        true
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) -> bool {
        let family = family.into();
        self.defaults.font_family = family.clone();
        self.apply_to_selected_text(|s| s.font_family = family)
    }

    /// Non-finite or non-positive sizes are ignored entirely.
    pub fn set_font_size(&mut self, size_px: f32) -> bool {
        if !size_px.is_finite() || size_px <= 0.0 {
            return false;
        }
        self.defaults.font_size = size_px;
        self.apply_to_selected_text(|s| s.font_size = size_px)
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) -> bool {
        self.defaults.font_weight = weight;
        self.apply_to_selected_text(|s| s.font_weight = weight)
    }

    /// Text fill color.
    pub fn set_fill_color(&mut self, color: Rgba8) -> bool {
        self.defaults.text_color = color;
        self.apply_to_selected_text(|s| s.fill = color)
    }

    /// Fill color for shapes created from now on. Existing shapes keep theirs.
    pub fn set_shape_color(&mut self, color: Rgba8) {
        self.defaults.shape_color = color;
    }

    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.defaults.shape_kind = kind;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/binding.rs"]
mod tests;
