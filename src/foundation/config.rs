use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::foundation::error::{InkplateError, InkplateResult};

/// Default upload limit: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Editor-wide settings for one print template.
///
/// Every field has a default matching the standard 500×500 template, so a JSON config only needs
/// to list what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Logical canvas size in pixels.
    pub canvas: Canvas,
    /// Canvas background color.
    pub background: Rgba8,
    /// Side of the square print-safe area, centered on the canvas.
    pub print_safe_size: f64,
    /// Corner radius of the print-safe outline.
    pub print_safe_corner_radius: f64,
    /// Side of the square bleed area, centered on the canvas.
    pub bleed_size: f64,
    /// Static dimension label drawn with the guides.
    pub guide_label: String,
    /// Resolution multiplier applied on export.
    pub export_multiplier: u32,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: u64,
    /// Accepted file extensions, lowercase, without the dot.
    pub allowed_extensions: Vec<String>,
    /// Storage bucket uploads and exports are written to.
    pub storage_bucket: String,
    /// Select freshly created objects.
    pub select_on_create: bool,
    /// Resolve text families the font library lacks from installed system fonts.
    pub system_fonts: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 500,
                height: 500,
            },
            background: Rgba8::opaque(0xf8, 0xf8, 0xf8),
            print_safe_size: 340.0,
            print_safe_corner_radius: 10.0,
            bleed_size: 350.0,
            guide_label: "Print area 340 × 340 px".to_owned(),
            export_multiplier: 2,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: ["jpg", "jpeg", "png", "gif", "webp"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            storage_bucket: "designs".to_owned(),
            select_on_create: false,
            system_fonts: true,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; missing fields fall back to defaults.
    pub fn from_json_str(s: &str) -> InkplateResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a JSON config file, apply `INKPLATE_*` environment overrides, validate.
    pub fn load(path: &Path) -> InkplateResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read editor config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        let cfg = cfg.with_env_overrides(|k| std::env::var(k).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `INKPLATE_MAX_UPLOAD_BYTES` and `INKPLATE_STORAGE_BUCKET` from `lookup`.
    ///
    /// Unparseable or empty values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(max) = lookup("INKPLATE_MAX_UPLOAD_BYTES")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.max_upload_bytes = max;
        }
        if let Some(bucket) = lookup("INKPLATE_STORAGE_BUCKET")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
        {
            self.storage_bucket = bucket;
        }
        self
    }

    pub fn validate(&self) -> InkplateResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(InkplateError::config("canvas must be non-empty"));
        }
        if self.export_multiplier == 0 {
            return Err(InkplateError::config("export_multiplier must be >= 1"));
        }
        let export = self.canvas.scaled(self.export_multiplier)?;
        if export.width > u32::from(u16::MAX) || export.height > u32::from(u16::MAX) {
            return Err(InkplateError::config("export size exceeds u16 pixels"));
        }
        let short_side = f64::from(self.canvas.width.min(self.canvas.height));
        if !(self.print_safe_size > 0.0 && self.print_safe_size <= self.bleed_size) {
            return Err(InkplateError::config(
                "print_safe_size must be > 0 and <= bleed_size",
            ));
        }
        if self.bleed_size > short_side {
            return Err(InkplateError::config("bleed_size must fit inside the canvas"));
        }
        if !self.print_safe_corner_radius.is_finite() || self.print_safe_corner_radius < 0.0 {
            return Err(InkplateError::config(
                "print_safe_corner_radius must be finite and >= 0",
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(InkplateError::config("max_upload_bytes must be > 0"));
        }
        if self.allowed_extensions.is_empty() {
            return Err(InkplateError::config("allowed_extensions must not be empty"));
        }
        if self.storage_bucket.trim().is_empty() {
            return Err(InkplateError::config("storage_bucket must be set"));
        }
        Ok(())
    }

    /// Print-safe rectangle in canvas coordinates.
    pub fn print_safe_rect(&self) -> Rect {
        self.canvas.centered_square(self.print_safe_size)
    }

    /// Bleed rectangle in canvas coordinates.
    pub fn bleed_rect(&self) -> Rect {
        self.canvas.centered_square(self.bleed_size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
