//! JSON design scripts: a replayable list of editor actions.
//!
//! ```json
//! { "steps": [
//!     { "op": "add_shape", "kind": "circle" },
//!     { "op": "add_image", "path": "photo.png" },
//!     { "op": "select", "index": 0 },
//!     { "op": "layer", "action": "bring_to_front" }
//! ] }
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::bitmap::decode_bitmap;
use crate::editor::session::Editor;
use crate::foundation::core::{Point, Rgba8, Vec2};
use crate::foundation::error::{InkplateError, InkplateResult};
use crate::io::collab::AssetFetcher;
use crate::io::gateway::{UploadFile, UploadGateway};
use crate::io::ingest::upload_image_into;
use crate::scene::layers::LayerOp;
use crate::scene::object::{FontWeight, ShapeKind};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignScript {
    pub steps: Vec<ScriptStep>,
}

impl DesignScript {
    pub fn from_json_str(s: &str) -> InkplateResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> InkplateResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read design script '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

/// One editor action.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum ScriptStep {
    AddText,
    /// Shape of `kind`, or of the current tool shape kind.
    AddShape {
        #[serde(default)]
        kind: Option<ShapeKind>,
    },
    /// Image file, relative to the script's directory.
    AddImage {
        path: PathBuf,
    },
    /// Select by z-order index (0 = bottom); `null` deselects.
    Select {
        index: Option<usize>,
    },
    Click {
        x: f64,
        y: f64,
    },
    Layer {
        action: LayerOp,
    },
    Translate {
        dx: f64,
        dy: f64,
    },
    Scale {
        value: f64,
    },
    /// Replace the selected text's content through an edit/commit cycle.
    EditText {
        content: String,
    },
    FontFamily {
        value: String,
    },
    FontSize {
        value: f32,
    },
    FontWeight {
        value: FontWeight,
    },
    FillColor {
        value: Rgba8,
    },
    ShapeColor {
        value: Rgba8,
    },
    ShapeKind {
        value: ShapeKind,
    },
    Delete,
    Clear,
}

/// How `add_image` steps obtain their bitmap.
#[derive(Clone, Copy)]
pub enum ImageSource<'a> {
    /// Decode straight from disk.
    Local,
    /// Upload through the gateway and load back from storage.
    Gateway {
        gateway: &'a UploadGateway,
        fetcher: &'a dyn AssetFetcher,
    },
}

/// Outcome counts of a replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Steps that changed the editor.
    pub applied: usize,
    /// Steps that were no-ops (e.g. layer ops without a selection).
    pub skipped: usize,
}

/// Replay `script` against `editor`. The first failing step aborts the replay.
#[tracing::instrument(skip_all, fields(steps = script.steps.len()))]
pub async fn run_script(
    editor: &RefCell<Editor>,
    script: &DesignScript,
    base_dir: &Path,
    images: ImageSource<'_>,
) -> InkplateResult<ScriptReport> {
    let mut report = ScriptReport::default();
    for (i, step) in script.steps.iter().enumerate() {
        let changed = match step {
            ScriptStep::AddImage { path } => {
                add_image(editor, &base_dir.join(path), images).await?;
                true
            }
            other => apply_step(&mut editor.borrow_mut(), other)?,
        };
        if changed {
            report.applied += 1;
        } else {
            tracing::debug!(step = i, ?step, "step had no effect");
            report.skipped += 1;
        }
    }
    Ok(report)
}

fn apply_step(ed: &mut Editor, step: &ScriptStep) -> InkplateResult<bool> {
    let changed = match step {
        ScriptStep::AddText => {
            ed.add_text();
            true
        }
        ScriptStep::AddShape { kind } => {
            match kind {
                Some(kind) => ed.add_shape(*kind),
                None => ed.add_default_shape(),
            };
            true
        }
        ScriptStep::AddImage { .. } => {
            return Err(InkplateError::input("add_image needs an image source"));
        }
        ScriptStep::Select { index } => {
            let id = match index {
                Some(i) => Some(ed.scene().order().get(*i).copied().ok_or_else(|| {
                    InkplateError::input(format!(
                        "select index {i} out of range ({} objects)",
                        ed.scene().len()
                    ))
                })?),
                None => None,
            };
            ed.select(id)
        }
        ScriptStep::Click { x, y } => {
            let before = ed.selection();
            ed.click(Point::new(*x, *y)) != before
        }
        ScriptStep::Layer { action } => ed.apply_layer_op(*action),
        ScriptStep::Translate { dx, dy } => ed.translate_selected(Vec2::new(*dx, *dy)),
        ScriptStep::Scale { value } => ed.set_selected_scale(*value),
        ScriptStep::EditText { content } => match ed.selection() {
            Some(id) if ed.begin_text_edit(id) => {
                ed.update_text(content.clone());
                ed.commit_text_edit()
            }
            _ => false,
        },
        ScriptStep::FontFamily { value } => ed.set_font_family(value.clone()),
        ScriptStep::FontSize { value } => ed.set_font_size(*value),
        ScriptStep::FontWeight { value } => ed.set_font_weight(*value),
        ScriptStep::FillColor { value } => ed.set_fill_color(*value),
        ScriptStep::ShapeColor { value } => {
            ed.set_shape_color(*value);
            true
        }
        ScriptStep::ShapeKind { value } => {
            ed.set_shape_kind(*value);
            true
        }
        ScriptStep::Delete => ed.delete_selected(),
        ScriptStep::Clear => {
            ed.clear();
            true
        }
    };
    Ok(changed)
}

async fn add_image(
    editor: &RefCell<Editor>,
    path: &Path,
    images: ImageSource<'_>,
) -> InkplateResult<()> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    match images {
        ImageSource::Local => {
            let bitmap = decode_bitmap(&bytes)?;
            editor
                .borrow_mut()
                .add_image(bitmap, format!("file://{}", path.display()));
        }
        ImageSource::Gateway { gateway, fetcher } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mime = image::ImageFormat::from_path(path)
                .map(|f| f.to_mime_type())
                .unwrap_or("application/octet-stream");
            let file = UploadFile::new(name, mime, bytes);
            upload_image_into(editor, gateway, fetcher, &file).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
