use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100u8, 50u8, 200u8, 128u8]);

    let bitmap = decode_bitmap(&buf).unwrap();
    assert_eq!(bitmap.width(), 1);
    assert_eq!(bitmap.height(), 1);
    assert_eq!(
        bitmap.rgba8_premul(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_bitmap(b"definitely not a png").unwrap_err();
    assert!(matches!(err, InkplateError::Decode(_)));
}

#[test]
fn each_bitmap_gets_a_fresh_id() {
    let a = Bitmap::solid(2, 2, [255, 0, 0, 255]).unwrap();
    let b = Bitmap::solid(2, 2, [255, 0, 0, 255]).unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.clone().id(), a.id());
    assert_eq!(a.rgba8_premul().len(), 16);
}

#[test]
fn rejects_empty_and_mismatched_buffers() {
    assert!(Bitmap::from_rgba8(0, 4, vec![]).is_err());
    assert!(Bitmap::from_rgba8(2, 2, vec![0; 15]).is_err());
}

#[test]
fn unpremultiply_restores_straight_alpha() {
    let mut px = vec![50u8, 25, 100, 128, 7, 7, 7, 0, 9, 8, 7, 255];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[100, 50, 199, 128]);
    assert_eq!(&px[4..8], &[7, 7, 7, 0]);
    assert_eq!(&px[8..12], &[9, 8, 7, 255]);
}
