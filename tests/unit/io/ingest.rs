use std::rc::Rc;

use super::*;
use crate::foundation::config::EditorConfig;
use crate::foundation::core::Point;
use crate::io::memory::{MemoryStorage, StaticAuth};
use futures::executor::block_on;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 10, 10, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn setup(auth: StaticAuth) -> (Rc<MemoryStorage>, UploadGateway, RefCell<Editor>) {
    let cfg = EditorConfig::default();
    let storage = Rc::new(MemoryStorage::new("designs"));
    let gateway = UploadGateway::new(&cfg, storage.clone(), Rc::new(auth));
    let editor = RefCell::new(Editor::new(cfg).unwrap());
    (storage, gateway, editor)
}

#[test]
fn ingest_decodes_uploaded_image() {
    let (storage, gateway, _) = setup(StaticAuth::signed_in("u1"));
    let busy = BusyFlag::default();
    let file = UploadFile::new("pic.png", "image/png", png_bytes(20, 10));

    let img = block_on(ingest_image(&gateway, &*storage, &busy, &file)).unwrap();
    assert_eq!((img.bitmap.width(), img.bitmap.height()), (20, 10));
    assert!(img.asset.path.starts_with("u1/"));
    assert!(!busy.is_busy());
}

#[test]
fn undecodable_upload_is_a_decode_error() {
    let (storage, gateway, editor) = setup(StaticAuth::signed_in("u1"));
    let file = UploadFile::new("fake.png", "image/png", b"not a png".to_vec());

    let err = block_on(upload_image_into(&editor, &gateway, &*storage, &file)).unwrap_err();
    assert!(matches!(err, InkplateError::Decode(_)));
    // The bytes did reach storage; the scene stays untouched.
    assert_eq!(storage.upload_calls(), 1);
    let mut ed = editor.borrow_mut();
    assert!(ed.scene().is_empty());
    let notices = ed.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "The image was uploaded but could not be loaded");
}

#[test]
fn upload_into_editor_adds_fitted_image() {
    let (storage, gateway, editor) = setup(StaticAuth::signed_in("u1"));
    let file = UploadFile::new("wide.png", "image/png", png_bytes(68, 34));

    let id = block_on(upload_image_into(&editor, &gateway, &*storage, &file)).unwrap();
    let ed = editor.borrow();
    let obj = ed.scene().get(id).unwrap();
    assert_eq!(obj.scale, 5.0);
    assert_eq!(obj.position, Point::new(80.0, 165.0));
    assert!(obj.as_image().unwrap().source_url.starts_with("memory://designs/u1/"));
    assert!(ed.can_start_io());
}

#[test]
fn validation_failure_is_notified_without_storage_calls() {
    let (storage, gateway, editor) = setup(StaticAuth::signed_in("u1"));
    let file = UploadFile::new("notes.png", "text/plain", vec![1, 2, 3]);

    assert!(block_on(upload_image_into(&editor, &gateway, &*storage, &file)).is_err());
    assert_eq!(storage.upload_calls(), 0);
    let notices = editor.borrow_mut().drain_notices();
    assert_eq!(notices[0].message, "Please upload an image file");
}
