use crate::scene::model::Scene;

/// Z-order operation on the active selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerOp {
    /// Move to the top of the stack.
    BringToFront,
    /// Move to the bottom, keeping everything else in relative order.
    SendToBack,
    /// Swap with the layer directly above.
    MoveForward,
    /// Swap with the layer directly below.
    MoveBack,
}

impl Scene {
    /// Reorder the selected object. Without a selection, or when the object is already at the
    /// relevant boundary, nothing changes and `false` is returned.
    pub fn apply_layer_op(&mut self, op: LayerOp) -> bool {
        let Some(id) = self.selection() else {
            return false;
        };
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let last = self.len() - 1;

        let changed = match op {
            LayerOp::BringToFront if idx < last => {
                self.move_in_order(idx, last);
                true
            }
            LayerOp::SendToBack if idx > 0 => {
                self.move_in_order(idx, 0);
                true
            }
            LayerOp::MoveForward if idx < last => {
                self.swap_in_order(idx, idx + 1);
                true
            }
            LayerOp::MoveBack if idx > 0 => {
                self.swap_in_order(idx, idx - 1);
                true
            }
            _ => false,
        };

        if changed {
            self.touch();
            tracing::debug!(?id, ?op, from = idx, "layer reorder");
        }
        changed
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
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layers.rs"]
mod tests;
