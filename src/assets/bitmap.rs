use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{InkplateError, InkplateResult};

static NEXT_BITMAP_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a decoded bitmap, used as the backend's paint cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitmapId(pub u64);

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Cloning is cheap: pixel data is shared.
#[derive(Clone)]
pub struct Bitmap {
    id: BitmapId,
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> InkplateResult<Self> {
        if width == 0 || height == 0 {
            return Err(InkplateError::decode("bitmap has zero width or height"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(InkplateError::decode("bitmap exceeds 65535 pixels on a side"));
        }
        if rgba8.len() != width as usize * height as usize * 4 {
            return Err(InkplateError::decode("bitmap byte length mismatch"));
        }
        premultiply_rgba8_in_place(&mut rgba8);
        Ok(Self {
            id: BitmapId(NEXT_BITMAP_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            rgba8_premul: Arc::new(rgba8),
        })
    }

    /// Solid-color bitmap, handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> InkplateResult<Self> {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::from_rgba8(width, height, data)
    }

    pub fn id(&self) -> BitmapId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes in row-major premultiplied RGBA8.
    pub fn rgba8_premul(&self) -> &[u8] {
        self.rgba8_premul.as_slice()
    }
}

/// Decode encoded image bytes (PNG, JPEG, GIF, WebP) into a [`Bitmap`].
pub fn decode_bitmap(bytes: &[u8]) -> InkplateResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| InkplateError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_rgba8(width, height, rgba.into_raw())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Undo premultiplication for encoders that expect straight alpha (PNG).
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bitmap.rs"]
mod tests;
