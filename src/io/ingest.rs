use std::cell::RefCell;

use crate::assets::bitmap::{Bitmap, decode_bitmap};
use crate::editor::session::{BusyFlag, Editor};
use crate::foundation::error::{InkplateError, InkplateResult};
use crate::io::collab::AssetFetcher;
use crate::io::gateway::{UploadFile, UploadGateway, UploadedAsset};
use crate::scene::object::NodeId;

/// An uploaded image, loaded back and decoded.
#[derive(Clone, Debug)]
pub struct IngestedImage {
    pub asset: UploadedAsset,
    pub bitmap: Bitmap,
}

/// Upload `file`, fetch it back from its public URL, and decode it.
///
/// `busy` stays raised for the whole operation. A fetch or decode failure after a successful
/// upload is reported as [`InkplateError::Decode`].
#[tracing::instrument(skip_all, fields(file = %file.name))]
pub async fn ingest_image(
    gateway: &UploadGateway,
    fetcher: &dyn AssetFetcher,
    busy: &BusyFlag,
    file: &UploadFile,
) -> InkplateResult<IngestedImage> {
    let _busy = busy.enter();
    let asset = gateway.upload_image(file).await?;
    let bytes = fetcher.fetch(&asset.url).await.map_err(|e| {
        InkplateError::decode(format!("load uploaded image '{}': {e}", asset.url))
    })?;
    let bitmap = decode_bitmap(&bytes)?;
    tracing::debug!(url = %asset.url, w = bitmap.width(), h = bitmap.height(), "image ingested");
    Ok(IngestedImage { asset, bitmap })
}

/// Ingest `file` and add it to the editor's scene.
///
/// The editor is only borrowed after the I/O completes, so several uploads may run at once; each
/// image lands on top in completion order. Failures are queued as notices and returned.
pub async fn upload_image_into(
    editor: &RefCell<Editor>,
    gateway: &UploadGateway,
    fetcher: &dyn AssetFetcher,
    file: &UploadFile,
) -> InkplateResult<NodeId> {
    let busy = editor.borrow().busy().clone();
    match ingest_image(gateway, fetcher, &busy, file).await {
        Ok(img) => Ok(editor.borrow_mut().add_image(img.bitmap, img.asset.url)),
        Err(err) => {
            editor.borrow_mut().notify(&err);
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/ingest.rs"]
mod tests;
