use std::cell::RefCell;

use crate::editor::session::Editor;
use crate::foundation::error::{InkplateError, InkplateResult};
use crate::io::collab::{CartSink, CustomLineItem};
use crate::io::gateway::UploadGateway;

/// Scene flattened to an encoded PNG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlattenedDesign {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// A persisted export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub width: u32,
    pub height: u32,
    pub path: String,
    pub url: String,
}

/// Rasterize guides and objects at the export multiplier and encode as PNG.
///
/// The full canvas is kept, guide markings included.
pub fn flatten(editor: &mut Editor) -> InkplateResult<FlattenedDesign> {
    let frame = editor.rasterize_export()?;
    let png = frame.encode_png()?;
    Ok(FlattenedDesign {
        width: frame.width,
        height: frame.height,
        png,
    })
}

/// Flatten the scene and persist it for the signed-in user.
#[tracing::instrument(skip_all)]
pub async fn export(
    editor: &RefCell<Editor>,
    gateway: &UploadGateway,
) -> InkplateResult<ExportArtifact> {
    let busy = editor.borrow().busy().clone();
    let _busy = busy.enter();

    let session = gateway.require_session().await?;
    let flat = flatten(&mut editor.borrow_mut())?;
    let asset = gateway.persist_export(&session, &flat.png).await?;
    tracing::info!(url = %asset.url, w = flat.width, h = flat.height, "design exported");
    Ok(ExportArtifact {
        width: flat.width,
        height: flat.height,
        path: asset.path,
        url: asset.url,
    })
}

/// Export the design and hand it to the cart as a custom line item.
///
/// Failures are queued as notices and returned; success queues an informational notice.
#[tracing::instrument(skip_all, fields(product_id = %product_id))]
pub async fn save_design(
    editor: &RefCell<Editor>,
    gateway: &UploadGateway,
    cart: &dyn CartSink,
    product_id: &str,
) -> InkplateResult<CustomLineItem> {
    let result = async {
        let artifact = export(editor, gateway).await?;
        let item = CustomLineItem {
            product_id: product_id.to_owned(),
            artifact_url: artifact.url,
        };
        cart.add_custom_item(item.clone()).await?;
        Ok::<_, InkplateError>(item)
    }
    .await;

    let mut ed = editor.borrow_mut();
    match &result {
        Ok(_) => ed.notify_info("Design saved to cart"),
        Err(err) => ed.notify(err),
    }
    result
}

#[cfg(test)]
#[path = "../../tests/unit/io/export.rs"]
mod tests;
