use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::assets::bitmap::Bitmap;
use crate::assets::fonts::FontLibrary;
use crate::foundation::config::EditorConfig;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{InkplateError, InkplateResult};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuBackend;
use crate::render::plan::RenderPlan;
use crate::scene::factory::{ObjectFactory, ToolDefaults};
use crate::scene::layers::LayerOp;
use crate::scene::model::Scene;
use crate::scene::object::{NodeId, SceneObject, ShapeKind};

/// Interaction state of the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    /// Nothing selected.
    Idle,
    /// One object is active.
    Selected(NodeId),
    /// The active text object is being edited in place.
    EditingText(NodeId),
}

/// Shared in-flight I/O counter.
///
/// Clones observe the same counter. The flag is raised while any [`BusyGuard`] is alive.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Rc<Cell<usize>>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.get() > 0
    }

    /// Number of uploads/exports currently in flight.
    pub fn in_flight(&self) -> usize {
        self.0.get()
    }

    /// Mark one operation as in flight until the guard drops.
    pub fn enter(&self) -> BusyGuard {
        self.0.set(self.0.get() + 1);
        BusyGuard(self.0.clone())
    }
}

/// RAII token returned by [`BusyFlag::enter`].
#[derive(Debug)]
pub struct BusyGuard(Rc<Cell<usize>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

/// Transient user notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// Whether the notice reports a failure.
    pub is_error: bool,
}

/// One editing session: scene, tool state, interaction mode, and the live viewport.
pub struct Editor {
    pub(crate) config: EditorConfig,
    pub(crate) scene: Scene,
    pub(crate) defaults: ToolDefaults,
    editing: Option<NodeId>,
    busy: BusyFlag,
    notices: VecDeque<Notice>,
    backend: CpuBackend,
    frame: Option<FrameRGBA>,
    rendered_revision: Option<u64>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> InkplateResult<Self> {
        Self::with_fonts(config, FontLibrary::new())
    }

    pub fn with_fonts(config: EditorConfig, fonts: FontLibrary) -> InkplateResult<Self> {
        config.validate()?;
        let backend = CpuBackend::with_system_fonts(fonts, config.system_fonts);
        Ok(Self {
            scene: Scene::new(&config),
            config,
            defaults: ToolDefaults::default(),
            editing: None,
            busy: BusyFlag::default(),
            notices: VecDeque::new(),
            backend,
            frame: None,
            rendered_revision: None,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn defaults(&self) -> &ToolDefaults {
        &self.defaults
    }

    pub fn fonts(&self) -> &FontLibrary {
        self.backend.fonts()
    }

    pub fn set_fonts(&mut self, fonts: FontLibrary) {
        self.backend.set_fonts(fonts);
        self.rendered_revision = None;
    }

    pub fn mode(&self) -> EditorMode {
        match (self.editing, self.scene.selection()) {
            (Some(id), _) => EditorMode::EditingText(id),
            (None, Some(id)) => EditorMode::Selected(id),
            (None, None) => EditorMode::Idle,
        }
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.scene.selection()
    }

    pub fn selected(&self) -> Option<&SceneObject> {
        self.scene.selected()
    }

    pub fn busy(&self) -> &BusyFlag {
        &self.busy
    }

    /// Upload/export buttons are enabled only while nothing is in flight.
    pub fn can_start_io(&self) -> bool {
        !self.busy.is_busy()
    }

    // ---- creation -------------------------------------------------------------------------------

    fn insert(&mut self, obj: SceneObject) -> NodeId {
        let id = self.scene.add_node(obj);
        if self.config.select_on_create {
            self.select(Some(id));
        }
        id
    }

    /// Add a decoded image fitted to the print-safe area.
    pub fn add_image(&mut self, bitmap: Bitmap, source_url: impl Into<String>) -> NodeId {
        let obj = ObjectFactory::new(&self.config, &self.defaults).create_image(bitmap, source_url);
        self.insert(obj)
    }

    /// Add a text object using the current tool defaults.
    pub fn add_text(&mut self) -> NodeId {
        let obj = ObjectFactory::new(&self.config, &self.defaults).create_text();
        self.insert(obj)
    }

    /// Add a shape of `kind` filled with the current shape color.
    pub fn add_shape(&mut self, kind: ShapeKind) -> NodeId {
        let obj = ObjectFactory::new(&self.config, &self.defaults).create_shape(kind);
        self.insert(obj)
    }

    /// Add a shape of the tool's current shape kind.
    pub fn add_default_shape(&mut self) -> NodeId {
        self.add_shape(self.defaults.shape_kind)
    }

    // ---- removal --------------------------------------------------------------------------------

    pub fn remove(&mut self, id: NodeId) -> bool {
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.scene.remove_node(id).is_some()
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.scene.selection() {
            Some(id) => self.remove(id),
            None => false,
        }
    }

    /// Remove every object; guides are regenerated.
    pub fn clear(&mut self) {
        self.editing = None;
        self.scene.clear();
    }

    // ---- selection & pointer --------------------------------------------------------------------

    /// Change the active object. An in-progress text edit is committed first.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        if id.is_some_and(|id| !self.scene.contains(id)) {
            return false;
        }
        if self.editing.is_some() && self.editing != id {
            self.commit_text_edit();
        }
        self.scene.set_selection(id)
    }

    /// Single click: select the topmost object under `p`, or clear the selection.
    pub fn click(&mut self, p: Point) -> Option<NodeId> {
        let hit = self.scene.hit_test(p);
        self.select(hit);
        hit
    }

    /// Double click: select the hit object and, if it is editable text, enter text editing.
    pub fn double_click(&mut self, p: Point) -> bool {
        match self.click(p) {
            Some(id) => self.begin_text_edit(id),
            None => false,
        }
    }

    // ---- in-place text editing ------------------------------------------------------------------

    /// Enter text editing on `id`. Only editable text objects qualify.
    pub fn begin_text_edit(&mut self, id: NodeId) -> bool {
        let editable = self
            .scene
            .get(id)
            .and_then(SceneObject::as_text)
            .is_some_and(|t| t.editable);
        if !editable {
            return false;
        }
        self.select(Some(id));
        self.editing = Some(id);
        self.scene.touch();
        true
    }

    /// Replace the content of the text being edited.
    pub fn update_text(&mut self, content: impl Into<String>) -> bool {
        let Some(id) = self.editing else {
            return false;
        };
        let Some(text) = self.scene.get_mut(id).and_then(SceneObject::as_text_mut) else {
            return false;
        };
        text.content = content.into();
        self.scene.touch();
        true
    }

    /// Leave text editing, keeping the object selected. There is no cancel path.
    pub fn commit_text_edit(&mut self) -> bool {
        if self.editing.take().is_none() {
            return false;
        }
        self.scene.touch();
        true
    }

    // ---- layers & transforms --------------------------------------------------------------------

    pub fn apply_layer_op(&mut self, op: LayerOp) -> bool {
        self.scene.apply_layer_op(op)
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.apply_layer_op(LayerOp::BringToFront)
    }

    pub fn send_to_back(&mut self) -> bool {
        self.apply_layer_op(LayerOp::SendToBack)
    }

    pub fn move_forward(&mut self) -> bool {
        self.apply_layer_op(LayerOp::MoveForward)
    }

    pub fn move_back(&mut self) -> bool {
        self.apply_layer_op(LayerOp::MoveBack)
    }

    /// Drag the active object by `delta`.
    pub fn translate_selected(&mut self, delta: Vec2) -> bool {
        let Some(obj) = self.scene.selected_mut() else {
            return false;
        };
        obj.position += delta;
        self.scene.touch();
        true
    }

    /// Set the active object's uniform scale. Non-finite or non-positive values are ignored.
    pub fn set_selected_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        let Some(obj) = self.scene.selected_mut() else {
            return false;
        };
        obj.scale = scale;
        self.scene.touch();
        true
    }

    // ---- rendering ------------------------------------------------------------------------------

    /// Draw list of the current scene at `multiplier`× resolution.
    pub fn render_plan(&self, multiplier: u32) -> InkplateResult<RenderPlan> {
        self.scene.render_plan(multiplier)
    }

    /// Viewport frame at 1×. The whole scene is redrawn whenever it changed since the last call.
    pub fn render(&mut self) -> InkplateResult<&FrameRGBA> {
        let revision = self.scene.revision();
        if self.rendered_revision != Some(revision) || self.frame.is_none() {
            let plan = self.scene.render_plan(1)?;
            self.frame = Some(self.backend.render(&plan)?);
            self.rendered_revision = Some(revision);
        }
        self.frame
            .as_ref()
            .ok_or_else(|| InkplateError::render("viewport frame missing after render"))
    }

    /// Flatten at the configured export multiplier.
    pub fn rasterize_export(&mut self) -> InkplateResult<FrameRGBA> {
        let plan = self.scene.render_plan(self.config.export_multiplier)?;
        self.backend.render(&plan)
    }

    // ---- notifications --------------------------------------------------------------------------

    /// Queue a failure as a transient notification. The session keeps going.
    pub fn notify(&mut self, err: &InkplateError) {
        tracing::warn!(error = %err, "editor notice");
        self.notices.push_back(Notice {
            message: err.user_message(),
            is_error: true,
        });
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notices.push_back(Notice {
            message: message.into(),
            is_error: false,
        });
    }

    /// Turn a failed result into a notice, passing successes through.
    pub fn report<T>(&mut self, result: InkplateResult<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(err) => {
                self.notify(&err);
                None
            }
        }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
