use super::*;
use crate::foundation::config::EditorConfig;
use crate::scene::factory::{ObjectFactory, ToolDefaults};
use crate::scene::object::{NodeId, ShapeKind};

fn scene_with(n: usize) -> (Scene, Vec<NodeId>) {
    let cfg = EditorConfig::default();
    let defaults = ToolDefaults::default();
    let factory = ObjectFactory::new(&cfg, &defaults);
    let mut scene = Scene::new(&cfg);
    let ids = (0..n)
        .map(|_| scene.add_node(factory.create_shape(ShapeKind::Circle)))
        .collect();
    (scene, ids)
}

#[test]
fn no_selection_is_a_silent_noop() {
    let (mut scene, ids) = scene_with(3);
    let rev = scene.revision();
    for op in [
        LayerOp::BringToFront,
        LayerOp::SendToBack,
        LayerOp::MoveForward,
        LayerOp::MoveBack,
    ] {
        assert!(!scene.apply_layer_op(op));
    }
    assert_eq!(scene.order(), ids.as_slice());
    assert_eq!(scene.revision(), rev);
}

#[test]
fn bring_to_front_is_idempotent() {
    let (mut scene, ids) = scene_with(4);
    scene.set_selection(Some(ids[1]));

    assert!(scene.bring_to_front());
    let after_first = scene.index_of(ids[1]);
    assert!(!scene.bring_to_front());
    assert_eq!(scene.index_of(ids[1]), after_first);
    assert_eq!(scene.order(), &[ids[0], ids[2], ids[3], ids[1]]);
}

#[test]
fn send_to_back_preserves_relative_order_and_is_noop_at_bottom() {
    let (mut scene, ids) = scene_with(4);
    scene.set_selection(Some(ids[2]));
    assert!(scene.send_to_back());
    assert_eq!(scene.order(), &[ids[2], ids[0], ids[1], ids[3]]);

    let before = scene.order().to_vec();
    assert!(!scene.send_to_back());
    assert_eq!(scene.order(), before.as_slice());
}

#[test]
fn step_moves_stop_at_boundaries() {
    let (mut scene, ids) = scene_with(3);
    scene.set_selection(Some(ids[0]));
    assert!(!scene.move_back());
    assert!(scene.move_forward());
    assert!(scene.move_forward());
    assert!(!scene.move_forward());
    assert_eq!(scene.order(), &[ids[1], ids[2], ids[0]]);
}

#[test]
fn selection_survives_reordering() {
    let (mut scene, ids) = scene_with(3);
    scene.set_selection(Some(ids[2]));
    scene.send_to_back();
    scene.move_forward();
    assert_eq!(scene.selection(), Some(ids[2]));
    assert_eq!(scene.selected().unwrap().id(), ids[2]);
}

#[test]
fn single_object_never_moves() {
    let (mut scene, ids) = scene_with(1);
    scene.set_selection(Some(ids[0]));
    assert!(!scene.bring_to_front());
    assert!(!scene.send_to_back());
    assert!(!scene.move_forward());
    assert!(!scene.move_back());
}
