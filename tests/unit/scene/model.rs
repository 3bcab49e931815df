use super::*;
use crate::scene::factory::{ObjectFactory, ToolDefaults};
use crate::scene::object::{ObjectKind, ShapeKind};

fn scene_with_shapes(n: usize) -> (Scene, Vec<NodeId>) {
    let cfg = EditorConfig::default();
    let defaults = ToolDefaults::default();
    let factory = ObjectFactory::new(&cfg, &defaults);
    let mut scene = Scene::new(&cfg);
    let ids = (0..n)
        .map(|_| scene.add_node(factory.create_shape(ShapeKind::Rectangle)))
        .collect();
    (scene, ids)
}

#[test]
fn add_appends_on_top_and_assigns_ids() {
    let (scene, ids) = scene_with_shapes(3);
    assert_eq!(scene.len(), 3);
    assert_eq!(scene.order(), ids.as_slice());
    for id in &ids {
        assert_eq!(scene.get(*id).unwrap().id(), *id);
    }
    assert_eq!(scene.index_of(ids[2]), Some(2));
}

#[test]
fn remove_selected_clears_selection() {
    let (mut scene, ids) = scene_with_shapes(2);
    assert!(scene.set_selection(Some(ids[1])));
    assert!(scene.remove_node(ids[1]).is_some());
    assert_eq!(scene.selection(), None);
    assert!(!scene.contains(ids[1]));
    assert!(scene.remove_node(ids[1]).is_none());
    assert_eq!(scene.order(), &[ids[0]]);
}

#[test]
fn removing_other_node_keeps_selection() {
    let (mut scene, ids) = scene_with_shapes(2);
    scene.set_selection(Some(ids[0]));
    scene.remove_node(ids[1]);
    assert_eq!(scene.selection(), Some(ids[0]));
}

#[test]
fn set_selection_ignores_unknown_ids() {
    let (mut scene, ids) = scene_with_shapes(1);
    scene.set_selection(Some(ids[0]));
    scene.remove_node(ids[0]);

    let stale = ids[0];
    assert!(!scene.set_selection(Some(stale)));
    assert_eq!(scene.selection(), None);
    assert!(!scene.set_selection(None));
}

#[test]
fn clear_empties_objects_but_keeps_guides() {
    let (mut scene, _) = scene_with_shapes(4);
    let guides = scene.guides().clone();
    scene.clear();
    assert_eq!(scene.len(), 0);
    assert!(scene.is_empty());
    assert_eq!(scene.selection(), None);
    assert_eq!(scene.guides(), &guides);

    let plan = scene.render_plan(1).unwrap();
    assert_eq!(plan.ops.len(), guides.draw_ops().len());
}

#[test]
fn revision_moves_on_every_mutation() {
    let (mut scene, ids) = scene_with_shapes(1);
    let r0 = scene.revision();
    scene.set_selection(Some(ids[0]));
    let r1 = scene.revision();
    assert!(r1 > r0);
    assert!(!scene.set_selection(Some(ids[0])));
    assert_eq!(scene.revision(), r1);
    scene.clear();
    assert!(scene.revision() > r1);
}

#[test]
fn hit_test_prefers_topmost_and_misses_guides() {
    let (scene, ids) = scene_with_shapes(2);
    // Both default shapes overlap at (130,130)-(230,230).
    assert_eq!(scene.hit_test(Point::new(150.0, 150.0)), Some(ids[1]));
    // On the bleed outline, outside every object.
    assert_eq!(scene.hit_test(Point::new(75.0, 250.0)), None);
}

#[test]
fn render_plan_paints_guides_first_and_scales() {
    let (scene, _) = scene_with_shapes(1);
    let plan = scene.render_plan(2).unwrap();
    assert_eq!(plan.target, scene.canvas().scaled(2).unwrap());
    assert_eq!(plan.target.width, 1000);
    assert_eq!(plan.background, scene.background());

    let guide_ops = scene.guides().draw_ops().len();
    // shape = fill + stroke
    assert_eq!(plan.ops.len(), guide_ops + 2);
    let DrawOp::FillPath { transform, .. } = &plan.ops[guide_ops] else {
        panic!("first object op must be the shape fill");
    };
    let p = *transform * Point::ZERO;
    assert_eq!(p, Point::new(260.0, 260.0));
    assert_eq!(scene.objects().next().unwrap().kind(), ObjectKind::Shape);
}
