use std::rc::Rc;

use super::*;
use crate::foundation::config::EditorConfig;
use crate::io::memory::{MemoryStorage, StaticAuth};
use crate::scene::object::ObjectKind;
use futures::executor::block_on;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "inkplate_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, w: u32, h: u32) {
    image::RgbaImage::from_pixel(w, h, image::Rgba([0, 128, 0, 255]))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

fn editor() -> RefCell<Editor> {
    RefCell::new(Editor::new(EditorConfig::default()).unwrap())
}

#[test]
fn parses_tagged_steps() {
    let script = DesignScript::from_json_str(
        r##"{ "steps": [
            { "op": "add_text" },
            { "op": "add_shape", "kind": "circle" },
            { "op": "add_shape" },
            { "op": "select", "index": null },
            { "op": "layer", "action": "move_back" },
            { "op": "fill_color", "value": "#ff0000" },
            { "op": "font_weight", "value": "bold" },
            { "op": "delete" }
        ] }"##,
    )
    .unwrap();
    assert_eq!(script.steps.len(), 8);
    assert_eq!(
        script.steps[1],
        ScriptStep::AddShape {
            kind: Some(ShapeKind::Circle)
        }
    );
    assert_eq!(
        script.steps[5],
        ScriptStep::FillColor {
            value: Rgba8::opaque(255, 0, 0)
        }
    );
}

#[test]
fn rejects_unknown_ops() {
    assert!(DesignScript::from_json_str(r#"{ "steps": [ { "op": "rotate" } ] }"#).is_err());
}

#[test]
fn replay_counts_applied_and_skipped() {
    let ed = editor();
    let script = DesignScript {
        steps: vec![
            ScriptStep::AddText,
            ScriptStep::Layer {
                action: LayerOp::BringToFront,
            },
            ScriptStep::Select { index: Some(0) },
            ScriptStep::EditText {
                content: "Hi there".to_owned(),
            },
            ScriptStep::FontFamily {
                value: "Georgia".to_owned(),
            },
        ],
    };
    let report = block_on(run_script(&ed, &script, Path::new("."), ImageSource::Local)).unwrap();
    assert_eq!(report, ScriptReport { applied: 4, skipped: 1 });

    let ed = ed.borrow();
    let text = ed.scene().objects().next().unwrap().as_text().unwrap();
    assert_eq!(text.content, "Hi there");
    assert_eq!(text.style.font_family, "Georgia");
}

#[test]
fn select_out_of_range_is_an_input_error() {
    let ed = editor();
    let script = DesignScript {
        steps: vec![ScriptStep::Select { index: Some(3) }],
    };
    let err = block_on(run_script(&ed, &script, Path::new("."), ImageSource::Local)).unwrap_err();
    assert!(matches!(err, InkplateError::Input(_)));
}

#[test]
fn local_images_are_read_relative_to_base_dir() {
    let dir = temp_dir("script_local");
    write_png(&dir.join("a.png"), 10, 10);
    let ed = editor();
    let script = DesignScript {
        steps: vec![ScriptStep::AddImage {
            path: PathBuf::from("a.png"),
        }],
    };
    block_on(run_script(&ed, &script, &dir, ImageSource::Local)).unwrap();
    assert_eq!(
        ed.borrow().scene().objects().next().map(|o| o.kind()),
        Some(ObjectKind::Image)
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn gateway_images_go_through_storage() {
    let dir = temp_dir("script_gateway");
    write_png(&dir.join("b.png"), 8, 4);
    let cfg = EditorConfig::default();
    let storage = Rc::new(MemoryStorage::new("designs"));
    let gateway = UploadGateway::new(&cfg, storage.clone(), Rc::new(StaticAuth::signed_in("u1")));
    let ed = editor();
    let script = DesignScript {
        steps: vec![ScriptStep::AddImage {
            path: PathBuf::from("b.png"),
        }],
    };
    let images = ImageSource::Gateway {
        gateway: &gateway,
        fetcher: &*storage,
    };
    block_on(run_script(&ed, &script, &dir, images)).unwrap();
    assert_eq!(storage.upload_calls(), 1);
    assert_eq!(ed.borrow().scene().len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}
