use slotmap::SlotMap;

use crate::foundation::config::EditorConfig;
use crate::foundation::core::{Affine, Canvas, Point, Rgba8};
use crate::foundation::error::InkplateResult;
use crate::render::plan::{DrawOp, RenderPlan};
use crate::scene::guides::Guides;
use crate::scene::object::{
    NodeId, ObjectPayload, SHAPE_STROKE_COLOR, SHAPE_STROKE_WIDTH, SceneObject, shape_path,
};

/// The in-memory design: guides plus z-ordered objects.
///
/// Objects live in an arena keyed by [`NodeId`]; paint order is an explicit id list where index 0
/// is the bottom layer. The selection is a non-owning id that is cleared whenever its target
/// leaves the scene.
#[derive(Clone, Debug)]
pub struct Scene {
    config: EditorConfig,
    guides: Guides,
    nodes: SlotMap<NodeId, SceneObject>,
    order: Vec<NodeId>,
    selection: Option<NodeId>,
    revision: u64,
}

impl Scene {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            config: config.clone(),
            guides: Guides::for_config(config),
            nodes: SlotMap::with_key(),
            order: Vec::new(),
            selection: None,
            revision: 0,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.config.canvas
    }

    pub fn background(&self) -> Rgba8 {
        self.config.background
    }

    pub fn guides(&self) -> &Guides {
        &self.guides
    }

    /// Bumped on every mutation; renderers compare it to skip redundant redraws.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Number of objects (guides excluded).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Object ids bottom to top.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Objects bottom to top.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(*id))
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneObject> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneObject> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Paint position of `id` (0 = bottom).
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|x| *x == id)
    }

    /// Append `obj` as the new topmost layer and return its id.
    pub fn add_node(&mut self, obj: SceneObject) -> NodeId {
        let id = self.nodes.insert_with_key(|id| SceneObject { id, ..obj });
        self.order.push(id);
        self.touch();
        tracing::debug!(?id, layers = self.order.len(), "scene add");
        id
    }

    /// Remove `id`, clearing the selection if it pointed there.
    pub fn remove_node(&mut self, id: NodeId) -> Option<SceneObject> {
        let obj = self.nodes.remove(id)?;
        self.order.retain(|x| *x != id);
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.touch();
        tracing::debug!(?id, layers = self.order.len(), "scene remove");
        Some(obj)
    }

    /// Drop every object and rebuild the guides.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.selection = None;
        self.guides = Guides::for_config(&self.config);
        self.touch();
        tracing::debug!("scene cleared");
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn selected(&self) -> Option<&SceneObject> {
        self.selection.and_then(|id| self.nodes.get(id))
    }

    pub(crate) fn selected_mut(&mut self) -> Option<&mut SceneObject> {
        self.selection.and_then(|id| self.nodes.get_mut(id))
    }

    /// Set or clear the active object. Unknown ids leave the selection untouched.
    ///
    /// Returns `true` when the selection changed.
    pub fn set_selection(&mut self, id: Option<NodeId>) -> bool {
        if let Some(id) = id
            && !self.nodes.contains_key(id)
        {
            return false;
        }
        if self.selection == id {
            return false;
        }
        self.selection = id;
        self.touch();
        true
    }

    /// Topmost object whose bounds contain `p`. Guides never hit.
    pub fn hit_test(&self, p: Point) -> Option<NodeId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.nodes.get(*id).is_some_and(|o| o.bounds().contains(p)))
    }

    /// Flatten guides and objects into a draw list at `multiplier`× resolution.
    pub fn render_plan(&self, multiplier: u32) -> InkplateResult<RenderPlan> {
        let target = self.config.canvas.scaled(multiplier)?;
        let outer = Affine::scale(f64::from(multiplier));

        let mut ops = self.guides.draw_ops();
        for obj in self.objects() {
            push_object_ops(&mut ops, obj);
        }

        Ok(RenderPlan {
            target,
            background: self.config.background,
            ops: ops
                .into_iter()
                .map(|op| op.pre_transformed(outer))
                .collect(),
        })
    }

    pub(crate) fn move_in_order(&mut self, from: usize, to: usize) {
        let id = self.order.remove(from);
        self.order.insert(to, id);
    }

    pub(crate) fn swap_in_order(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
    }
}

fn push_object_ops(ops: &mut Vec<DrawOp>, obj: &SceneObject) {
    let transform = obj.transform();
    match &obj.payload {
        ObjectPayload::Image(img) => ops.push(DrawOp::Image {
            bitmap: img.bitmap.clone(),
            transform,
        }),
        ObjectPayload::Text(text) => ops.push(DrawOp::Text {
            text: text.content.clone(),
            style: text.style.clone(),
            transform,
            decorative: false,
        }),
        ObjectPayload::Shape(shape) => {
            let path = shape_path(shape);
            ops.push(DrawOp::FillPath {
                path: path.clone(),
                transform,
                color: shape.fill,
            });
            ops.push(DrawOp::StrokePath {
                path,
                transform,
                color: SHAPE_STROKE_COLOR,
                width: SHAPE_STROKE_WIDTH,
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
