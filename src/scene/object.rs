use crate::assets::bitmap::Bitmap;
use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Size};

slotmap::new_key_type! {
    /// Identifier for objects owned by a [`Scene`](crate::Scene).
    pub struct NodeId;
}

/// Line height multiplier used for text bounds.
pub const TEXT_LINE_HEIGHT: f64 = 1.16;
/// Average glyph advance as a fraction of the font size, used for text bounds.
pub const TEXT_AVG_ADVANCE: f64 = 0.6;

/// Stroke drawn around every shape.
pub const SHAPE_STROKE_COLOR: Rgba8 = Rgba8::BLACK;
pub const SHAPE_STROKE_WIDTH: f64 = 1.0;
/// Side of the default rectangle/triangle box (and diameter of the default circle).
pub const SHAPE_DEFAULT_SIZE: f64 = 100.0;

/// Object discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Image,
    Text,
    Shape,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
}

/// Visual style of a text object.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub fill: Rgba8,
}

#[derive(Clone, Debug)]
pub struct ImageObject {
    pub bitmap: Bitmap,
    /// Public URL the bitmap was loaded from.
    pub source_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextObject {
    pub content: String,
    pub style: TextStyle,
    pub editable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeObject {
    pub kind: ShapeKind,
    pub fill: Rgba8,
    /// Unscaled box size. Circles use `width / 2` as radius.
    pub size: Size,
}

/// Type-specific part of a [`SceneObject`].
#[derive(Clone, Debug)]
pub enum ObjectPayload {
    Image(ImageObject),
    Text(TextObject),
    Shape(ShapeObject),
}

/// One addressable visual element of the scene.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub(crate) id: NodeId,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    /// Uniform scale factor applied around `position`.
    pub scale: f64,
    pub payload: ObjectPayload,
}

impl SceneObject {
    /// Build an object that is not yet part of a scene (its id is null until inserted).
    pub fn new(position: Point, scale: f64, payload: ObjectPayload) -> Self {
        Self {
            id: NodeId::default(),
            position,
            scale,
            payload,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        match self.payload {
            ObjectPayload::Image(_) => ObjectKind::Image,
            ObjectPayload::Text(_) => ObjectKind::Text,
            ObjectPayload::Shape(_) => ObjectKind::Shape,
        }
    }

    pub fn as_text(&self) -> Option<&TextObject> {
        match &self.payload {
            ObjectPayload::Text(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn as_text_mut(&mut self) -> Option<&mut TextObject> {
        match &mut self.payload {
            ObjectPayload::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageObject> {
        match &self.payload {
            ObjectPayload::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeObject> {
        match &self.payload {
            ObjectPayload::Shape(s) => Some(s),
            _ => None,
        }
    }

    /// Size before `scale` is applied.
    pub fn local_size(&self) -> Size {
        match &self.payload {
            ObjectPayload::Image(i) => {
                Size::new(f64::from(i.bitmap.width()), f64::from(i.bitmap.height()))
            }
            ObjectPayload::Text(t) => estimate_text_size(&t.content, t.style.font_size),
            ObjectPayload::Shape(s) => s.size,
        }
    }

    /// Axis-aligned bounds in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        let size = self.local_size();
        Rect::from_origin_size(
            self.position,
            Size::new(size.width * self.scale, size.height * self.scale),
        )
    }

    /// Local-to-canvas transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2()) * Affine::scale(self.scale)
    }
}

/// Outline of a shape in its local box, origin at top-left.
pub fn shape_path(shape: &ShapeObject) -> BezPath {
    use kurbo::Shape as _;

    let Size { width, height } = shape.size;
    match shape.kind {
        ShapeKind::Rectangle => Rect::new(0.0, 0.0, width, height).to_path(0.1),
        ShapeKind::Circle => {
            let r = width / 2.0;
            kurbo::Circle::new(Point::new(r, r), r).to_path(0.1)
        }
        ShapeKind::Triangle => {
            let mut path = BezPath::new();
            path.move_to(Point::new(width / 2.0, 0.0));
            path.line_to(Point::new(width, height));
            path.line_to(Point::new(0.0, height));
            path.close_path();
            path
        }
    }
}

fn estimate_text_size(content: &str, font_size: f32) -> Size {
    let size = f64::from(font_size);
    let lines = content.split('\n').count().max(1);
    // At least one glyph cell wide so emptied text stays clickable.
    let widest = content
        .split('\n')
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    Size::new(
        widest as f64 * size * TEXT_AVG_ADVANCE,
        lines as f64 * size * TEXT_LINE_HEIGHT,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/object.rs"]
mod tests;
