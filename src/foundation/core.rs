use crate::foundation::error::{InkplateError, InkplateResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Geometric center in canvas coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Square of side `side` centered on the canvas.
    pub fn centered_square(self, side: f64) -> Rect {
        Rect::from_center_size(self.center(), Size::new(side, side))
    }

    /// Pixel dimensions after applying an integer resolution multiplier.
    pub fn scaled(self, multiplier: u32) -> InkplateResult<Canvas> {
        let width = self
            .width
            .checked_mul(multiplier)
            .ok_or_else(|| InkplateError::render("scaled canvas width overflows"))?;
        let height = self
            .height
            .checked_mul(multiplier)
            .ok_or_else(|| InkplateError::render("scaled canvas height overflows"))?;
        Ok(Canvas { width, height })
    }
}

/// Straight-alpha RGBA8 color.
///
/// Serialized as a `#RRGGBB` / `#RRGGBBAA` hex string, the form UI color pickers hand over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
