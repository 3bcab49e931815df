use crate::assets::bitmap::Bitmap;
use crate::foundation::config::EditorConfig;
use crate::foundation::core::{Point, Rgba8, Size, Vec2};
use crate::scene::object::{
    FontWeight, ImageObject, ObjectPayload, SHAPE_DEFAULT_SIZE, SceneObject, ShapeKind,
    ShapeObject, TextObject, TextStyle,
};

pub const DEFAULT_TEXT_CONTENT: &str = "Double click to edit";
pub const DEFAULT_TEXT_POSITION: Point = Point::new(100.0, 100.0);
/// Offset of new shapes from the print-safe top-left corner.
pub const SHAPE_OFFSET: Vec2 = Vec2::new(50.0, 50.0);

/// Tool values the UI controls write and the factory reads at creation time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub text_color: Rgba8,
    pub shape_kind: ShapeKind,
    pub shape_color: Rgba8,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_owned(),
            font_size: 16.0,
            font_weight: FontWeight::Normal,
            text_color: Rgba8::BLACK,
            shape_kind: ShapeKind::Rectangle,
            shape_color: Rgba8::opaque(0x3b, 0x82, 0xf6),
        }
    }
}

impl ToolDefaults {
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            font_weight: self.font_weight,
            fill: self.text_color,
        }
    }
}

/// Builds objects with placement rules derived from the template.
#[derive(Clone, Copy, Debug)]
pub struct ObjectFactory<'a> {
    config: &'a EditorConfig,
    defaults: &'a ToolDefaults,
}

impl<'a> ObjectFactory<'a> {
    pub fn new(config: &'a EditorConfig, defaults: &'a ToolDefaults) -> Self {
        Self { config, defaults }
    }

    /// Scale the bitmap to fit the print-safe area (aspect preserved) and center it there.
    pub fn create_image(&self, bitmap: Bitmap, source_url: impl Into<String>) -> SceneObject {
        let safe = self.config.print_safe_rect();
        let (w, h) = (f64::from(bitmap.width()), f64::from(bitmap.height()));
        let scale = (safe.width() / w).min(safe.height() / h);
        let scaled = Size::new(w * scale, h * scale);
        let position = Point::new(
            safe.center().x - scaled.width / 2.0,
            safe.center().y - scaled.height / 2.0,
        );

        SceneObject::new(
            position,
            scale,
            ObjectPayload::Image(ImageObject {
                bitmap,
                source_url: source_url.into(),
            }),
        )
    }

    pub fn create_text(&self) -> SceneObject {
        SceneObject::new(
            DEFAULT_TEXT_POSITION,
            1.0,
            ObjectPayload::Text(TextObject {
                content: DEFAULT_TEXT_CONTENT.to_owned(),
                style: self.defaults.text_style(),
                editable: true,
            }),
        )
    }

    pub fn create_shape(&self, kind: ShapeKind) -> SceneObject {
        let origin = self.config.print_safe_rect().origin();
        SceneObject::new(
            origin + SHAPE_OFFSET,
            1.0,
            ObjectPayload::Shape(ShapeObject {
                kind,
                fill: self.defaults.shape_color,
                size: Size::new(SHAPE_DEFAULT_SIZE, SHAPE_DEFAULT_SIZE),
            }),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/factory.rs"]
mod tests;
