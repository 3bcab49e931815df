use crate::assets::bitmap::Bitmap;
use crate::foundation::core::{Affine, BezPath, Canvas, Rgba8};
use crate::scene::object::TextStyle;

/// Backend-agnostic draw list for one flattening of the scene.
///
/// Ops are in paint order: the first op is at the bottom. Every op carries its full transform,
/// including the resolution multiplier, so a backend never needs scene knowledge.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    /// Output pixel size (logical canvas × multiplier).
    pub target: Canvas,
    /// Background the target is cleared to before any op runs.
    pub background: Rgba8,
    pub ops: Vec<DrawOp>,
}

/// A single draw operation.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Fill a closed path.
    FillPath {
        path: BezPath,
        transform: Affine,
        color: Rgba8,
    },
    /// Stroke a path. Dashes are already baked into `path`.
    StrokePath {
        path: BezPath,
        transform: Affine,
        color: Rgba8,
        width: f64,
    },
    /// Draw a bitmap with its top-left at the transformed origin.
    Image { bitmap: Bitmap, transform: Affine },
    /// Lay out and draw plain text with its top-left at the transformed origin.
    Text {
        text: String,
        style: TextStyle,
        transform: Affine,
        /// Guide text: skipped, not an error, when no font can draw it.
        decorative: bool,
    },
}

impl DrawOp {
    /// Same op with `outer` applied after its own transform.
    pub(crate) fn pre_transformed(self, outer: Affine) -> Self {
        match self {
            DrawOp::FillPath {
                path,
                transform,
                color,
            } => DrawOp::FillPath {
                path,
                transform: outer * transform,
                color,
            },
            DrawOp::StrokePath {
                path,
                transform,
                color,
                width,
            } => DrawOp::StrokePath {
                path,
                transform: outer * transform,
                color,
                width,
            },
            DrawOp::Image { bitmap, transform } => DrawOp::Image {
                bitmap,
                transform: outer * transform,
            },
            DrawOp::Text {
                text,
                style,
                transform,
                decorative,
            } => DrawOp::Text {
                text,
                style,
                transform: outer * transform,
                decorative,
            },
        }
    }
}

/// Expand a dash pattern into explicit segments so backends only see solid strokes.
pub(crate) fn dashed(path: &BezPath, dashes: &[f64]) -> BezPath {
    if dashes.is_empty() {
        return path.clone();
    }
    kurbo::dash(path.iter(), 0.0, dashes).collect()
}
