use super::*;

#[test]
fn lookup_is_case_insensitive_and_bold_falls_back_to_normal() {
    let mut fonts = FontLibrary::new();
    assert!(fonts.is_empty());
    assert!(fonts.fallback().is_none());

    fonts.register("Arial", FontWeight::Normal, vec![1, 2, 3]);
    fonts.register("Georgia", FontWeight::Bold, vec![4, 5]);

    let arial_bold = fonts.resolve("  arial ", FontWeight::Bold).unwrap();
    assert_eq!(arial_bold.bytes.as_slice(), &[1, 2, 3]);

    let georgia = fonts.resolve("GEORGIA", FontWeight::Bold).unwrap();
    assert_eq!(georgia.bytes.as_slice(), &[4, 5]);
    assert!(fonts.resolve("Georgia", FontWeight::Normal).is_none());
    assert!(fonts.resolve("Comic Sans", FontWeight::Normal).is_none());

    assert_eq!(fonts.fallback().unwrap().bytes.as_slice(), &[1, 2, 3]);
}

fn fixture_bytes() -> Vec<u8> {
    std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/fonts/DejaVuSans.ttf"
    ))
    .unwrap()
}

#[test]
fn layout_rejects_nonpositive_size() {
    let mut fonts = FontLibrary::new();
    fonts.register("Arial", FontWeight::Normal, vec![0; 4]);
    let face = fonts.resolve("Arial", FontWeight::Normal).unwrap().clone();

    let mut engine = TextLayoutEngine::new(false);
    let err = engine
        .layout_plain(
            "hi",
            "Arial",
            &[face],
            0.0,
            FontWeight::Normal,
            TextBrushRgba8::default(),
        )
        .err()
        .unwrap();
    assert!(matches!(err, InkplateError::Render(_)));
}

#[test]
fn registered_face_lays_out_explicit_lines() {
    let mut fonts = FontLibrary::new();
    fonts.register("DejaVu Sans", FontWeight::Normal, fixture_bytes());
    let face = fonts.resolve("dejavu sans", FontWeight::Bold).unwrap().clone();

    let mut engine = TextLayoutEngine::new(false);
    let layout = engine
        .layout_plain(
            "Double click\nto edit",
            "DejaVu Sans",
            &[face],
            16.0,
            FontWeight::Bold,
            TextBrushRgba8::from(Rgba8::BLACK),
        )
        .unwrap();
    assert_eq!(layout.lines().count(), 2);
    assert!(layout.width() > 0.0);
}

#[test]
fn font_stack_lists_registered_faces_before_system_families() {
    let mut fonts = FontLibrary::new();
    fonts.register("DejaVu Sans", FontWeight::Normal, fixture_bytes());
    let face = fonts.fallback().unwrap().clone();

    let mut local = TextLayoutEngine::new(false);
    assert_eq!(local.font_stack("Georgia", &[]).unwrap(), "");
    let stack = local.font_stack("Georgia", &[face.clone()]).unwrap();
    assert!(stack.starts_with('"') && !stack.contains("Georgia"));

    let mut system = TextLayoutEngine::new(true);
    let stack = system.font_stack("Georgia", &[face]).unwrap();
    assert!(stack.ends_with(r#", "Georgia", sans-serif"#), "{stack}");
}
