//! Decoded bitmaps, font bytes, and color parsing.

pub mod bitmap;
pub mod color;
pub mod fonts;
