use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{InkplateError, InkplateResult};
use crate::scene::object::FontWeight;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FontKey {
    family: String,
    weight: FontWeight,
}

impl FontKey {
    fn new(family: &str, weight: FontWeight) -> Self {
        Self {
            family: family.trim().to_lowercase(),
            weight,
        }
    }
}

/// A registered font face ready for layout and glyph drawing.
#[derive(Clone, Debug)]
pub struct FontFace {
    pub(crate) key: FontKey,
    /// Raw font file bytes (TTF/OTF).
    pub bytes: Arc<Vec<u8>>,
}

/// Font faces available to the renderer, keyed by family name and weight.
///
/// Family lookup is case-insensitive. A bold request falls back to the family's normal face.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    faces: HashMap<FontKey, FontFace>,
    fallback: Option<FontKey>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes for `family` at `weight`. The first face registered becomes the
    /// fallback for families the library does not know.
    pub fn register(&mut self, family: &str, weight: FontWeight, bytes: Vec<u8>) {
        let key = FontKey::new(family, weight);
        if self.fallback.is_none() {
            self.fallback = Some(key.clone());
        }
        self.faces.insert(
            key.clone(),
            FontFace {
                key,
                bytes: Arc::new(bytes),
            },
        );
    }

    /// Read a font file from disk and register it.
    pub fn register_file(
        &mut self,
        family: &str,
        weight: FontWeight,
        path: &Path,
    ) -> InkplateResult<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.register(family, weight, bytes);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn resolve(&self, family: &str, weight: FontWeight) -> Option<&FontFace> {
        self.faces
            .get(&FontKey::new(family, weight))
            .or_else(|| self.faces.get(&FontKey::new(family, FontWeight::Normal)))
    }

    /// Face used when no particular family is requested.
    pub fn fallback(&self) -> Option<&FontFace> {
        self.fallback.as_ref().and_then(|k| self.faces.get(k))
    }
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Stateful helper for building Parley text layouts.
///
/// Registered faces are handed to Parley's collection once and their resolved family names are
/// memoized. With system fonts enabled, families not in the library resolve through fontique.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<FontKey, String>,
    system_fonts: bool,
}

impl TextLayoutEngine {
    pub(crate) fn new(system_fonts: bool) -> Self {
        let collection = parley::fontique::Collection::new(parley::fontique::CollectionOptions {
            system_fonts,
            ..Default::default()
        });
        Self {
            font_ctx: parley::FontContext {
                collection,
                source_cache: parley::fontique::SourceCache::default(),
            },
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
            system_fonts,
        }
    }

    pub(crate) fn system_fonts(&self) -> bool {
        self.system_fonts
    }

    fn family_name_for(&mut self, face: &FontFace) -> InkplateResult<String> {
        if let Some(name) = self.registered.get(&face.key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| InkplateError::render("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| InkplateError::render("registered font family has no name"))?
            .to_string();

        self.registered.insert(face.key.clone(), family_name.clone());
        Ok(family_name)
    }

    /// CSS-style family list: registered `faces` in order, then `family` and `sans-serif` from
    /// the system collection when enabled.
    fn font_stack(&mut self, family: &str, faces: &[FontFace]) -> InkplateResult<String> {
        let mut names = Vec::with_capacity(faces.len() + 2);
        for face in faces {
            names.push(quoted(&self.family_name_for(face)?));
        }
        if self.system_fonts {
            if !family.trim().is_empty() {
                names.push(quoted(family.trim()));
            }
            names.push("sans-serif".to_owned());
        }
        Ok(names.join(", "))
    }

    /// Shape and lay out plain text. Explicit newlines start new lines; no wrapping.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        family: &str,
        faces: &[FontFace],
        size_px: f32,
        weight: FontWeight,
        brush: TextBrushRgba8,
    ) -> InkplateResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(InkplateError::render("text size_px must be finite and > 0"));
        }

        let stack = self.font_stack(family, faces)?;
        let parley_weight = match weight {
            FontWeight::Normal => parley::style::FontWeight::NORMAL,
            FontWeight::Bold => parley::style::FontWeight::BOLD,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(stack)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(parley_weight));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn quoted(name: &str) -> String {
    format!("\"{}\"", name.replace('"', ""))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
