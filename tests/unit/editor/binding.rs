use super::*;
use crate::foundation::config::EditorConfig;

fn editor() -> Editor {
    Editor::new(EditorConfig::default()).unwrap()
}

#[test]
fn unselected_text_keeps_its_font() {
    let mut ed = editor();
    let id = ed.add_text();
    assert!(!ed.set_font_family("Georgia"));

    let style = &ed.scene().get(id).unwrap().as_text().unwrap().style;
    assert_eq!(style.font_family, "Arial");
    assert_eq!(style.font_size, 16.0);
    assert_eq!(style.font_weight, FontWeight::Normal);
    assert_eq!(style.fill, Rgba8::BLACK);
    assert_eq!(ed.defaults().font_family, "Georgia");
}

#[test]
fn defaults_flow_into_next_text() {
    let mut ed = editor();
    ed.set_font_family("Georgia");
    ed.set_font_size(24.0);
    ed.set_font_weight(FontWeight::Bold);
    ed.set_fill_color(Rgba8::opaque(255, 0, 0));
    let id = ed.add_text();

    let style = &ed.scene().get(id).unwrap().as_text().unwrap().style;
    assert_eq!(style.font_family, "Georgia");
    assert_eq!(style.font_size, 24.0);
    assert_eq!(style.font_weight, FontWeight::Bold);
    assert_eq!(style.fill, Rgba8::opaque(255, 0, 0));
}

#[test]
fn selected_text_is_updated() {
    let mut ed = editor();
    let id = ed.add_text();
    ed.select(Some(id));
    let before = ed.scene().revision();

    assert!(ed.set_font_family("Georgia"));
    assert!(ed.set_font_weight(FontWeight::Bold));
    assert!(ed.set_fill_color(Rgba8::WHITE));
    assert!(ed.set_font_size(32.0));
    assert!(ed.scene().revision() > before);

    let style = &ed.scene().get(id).unwrap().as_text().unwrap().style;
    assert_eq!(style.font_family, "Georgia");
    assert_eq!(style.font_weight, FontWeight::Bold);
    assert_eq!(style.fill, Rgba8::WHITE);
    assert_eq!(style.font_size, 32.0);
}

#[test]
fn selected_shape_is_not_touched() {
    let mut ed = editor();
    let id = ed.add_default_shape();
    ed.select(Some(id));
    let before = ed.scene().revision();

    assert!(!ed.set_fill_color(Rgba8::WHITE));
    assert_eq!(ed.scene().revision(), before);
    assert_eq!(
        ed.scene().get(id).unwrap().as_shape().unwrap().fill,
        Rgba8::opaque(0x3b, 0x82, 0xf6)
    );
}

#[test]
fn invalid_size_is_ignored() {
    let mut ed = editor();
    assert!(!ed.set_font_size(-1.0));
    assert!(!ed.set_font_size(f32::INFINITY));
    assert_eq!(ed.defaults().font_size, 16.0);
}

#[test]
fn shape_defaults_apply_to_new_shapes() {
    let mut ed = editor();
    let old = ed.add_default_shape();
    ed.set_shape_color(Rgba8::WHITE);
    ed.set_shape_kind(ShapeKind::Triangle);
    let new = ed.add_default_shape();

    let old = ed.scene().get(old).unwrap().as_shape().unwrap();
    assert_eq!(old.kind, ShapeKind::Rectangle);
    assert_eq!(old.fill, Rgba8::opaque(0x3b, 0x82, 0xf6));
    let new = ed.scene().get(new).unwrap().as_shape().unwrap();
    assert_eq!(new.kind, ShapeKind::Triangle);
    assert_eq!(new.fill, Rgba8::WHITE);
}
