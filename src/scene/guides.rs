//! Fixed print-template markings.
//!
//! Guides are drawn beneath every object and are not scene objects: they have no [`NodeId`],
//! cannot be hit, selected or reordered, and are rebuilt from the config whenever the scene is
//! cleared.
//!
//! [`NodeId`]: crate::NodeId

use kurbo::Shape as _;

use crate::foundation::config::EditorConfig;
use crate::foundation::core::{Affine, Point, Rect, Rgba8};
use crate::render::plan::{DrawOp, dashed};
use crate::scene::object::{FontWeight, TextStyle};

pub const BLEED_STROKE_COLOR: Rgba8 = Rgba8::opaque(0xef, 0x44, 0x44);
pub const BLEED_STROKE_WIDTH: f64 = 1.0;
pub const SAFE_STROKE_COLOR: Rgba8 = Rgba8::opaque(0x3b, 0x82, 0xf6);
pub const SAFE_STROKE_WIDTH: f64 = 1.0;
pub const SAFE_DASH: [f64; 2] = [5.0, 5.0];
pub const LABEL_COLOR: Rgba8 = Rgba8::opaque(0x6b, 0x72, 0x80);
pub const LABEL_FONT_SIZE: f32 = 12.0;
/// Generic family; resolves to the font library's fallback face unless registered explicitly.
pub const LABEL_FONT_FAMILY: &str = "sans-serif";
/// Gap between the bleed outline and the label baseline box.
const LABEL_GAP: f64 = 6.0;

/// The immutable guide set for one template.
#[derive(Clone, Debug, PartialEq)]
pub struct Guides {
    /// Outer solid rectangle.
    pub bleed: Rect,
    /// Inner dashed rounded rectangle.
    pub print_safe: Rect,
    pub print_safe_radius: f64,
    pub label: String,
    /// Top-left of the label box.
    pub label_origin: Point,
}

impl Guides {
    pub fn for_config(cfg: &EditorConfig) -> Self {
        let bleed = cfg.bleed_rect();
        Self {
            bleed,
            print_safe: cfg.print_safe_rect(),
            print_safe_radius: cfg.print_safe_corner_radius,
            label: cfg.guide_label.clone(),
            label_origin: Point::new(bleed.x0, bleed.y1 + LABEL_GAP),
        }
    }

    /// Draw ops in canvas coordinates: bleed, then print-safe, then label.
    pub(crate) fn draw_ops(&self) -> Vec<DrawOp> {
        let safe = kurbo::RoundedRect::from_rect(self.print_safe, self.print_safe_radius);
        let mut ops = vec![
            DrawOp::StrokePath {
                path: self.bleed.to_path(0.1),
                transform: Affine::IDENTITY,
                color: BLEED_STROKE_COLOR,
                width: BLEED_STROKE_WIDTH,
            },
            DrawOp::StrokePath {
                path: dashed(&safe.to_path(0.1), &SAFE_DASH),
                transform: Affine::IDENTITY,
                color: SAFE_STROKE_COLOR,
                width: SAFE_STROKE_WIDTH,
            },
        ];

        if !self.label.is_empty() {
            ops.push(DrawOp::Text {
                text: self.label.clone(),
                style: TextStyle {
                    font_family: LABEL_FONT_FAMILY.to_owned(),
                    font_size: LABEL_FONT_SIZE,
                    font_weight: FontWeight::Normal,
                    fill: LABEL_COLOR,
                },
                transform: Affine::translate(self.label_origin.to_vec2()),
                decorative: true,
            });
        }
        ops
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/guides.rs"]
mod tests;
