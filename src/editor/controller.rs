use std::rc::Rc;

use super::gesture::{apply_pointer_move, begin_gesture, GestureKind, GestureState};
use super::layers::{Layer, LayerId};
use crate::geometry::{CanvasPoint, ContainerRect, SnapMode};

/// Document-level move/up listener registration owned by the host.
///
/// Listeners are attached for the lifetime of a gesture, not of the layer
/// element, so a pointer that outruns a small layer keeps driving it.
pub trait PointerListenerHost {
    fn attach(&self, layer: LayerId);
    fn detach(&self, layer: LayerId);
}

/// Host for environments that deliver every pointer event unconditionally.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedListenerHost;

impl PointerListenerHost for DetachedListenerHost {
    fn attach(&self, _layer: LayerId) {}

    fn detach(&self, _layer: LayerId) {}
}

/// Attached listeners for one gesture; detached when dropped.
pub struct ListenerLease {
    host: Rc<dyn PointerListenerHost>,
    layer: LayerId,
}

impl ListenerLease {
    pub fn acquire(host: Rc<dyn PointerListenerHost>, layer: LayerId) -> Self {
        host.attach(layer);
        Self { host, layer }
    }
}

impl Drop for ListenerLease {
    fn drop(&mut self) {
        self.host.detach(self.layer);
    }
}

impl std::fmt::Debug for ListenerLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerLease")
            .field("layer", &self.layer)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEnd {
    pub layer: LayerId,
    pub kind: GestureKind,
    /// Whether any move was applied; untouched gestures are not committed.
    pub changed: bool,
}

/// Interaction state machine for a single layer.
#[derive(Debug)]
pub struct ManipulationController {
    layer: LayerId,
    state: GestureState,
    changed: bool,
    lease: Option<ListenerLease>,
}

impl ManipulationController {
    pub fn new(layer: LayerId) -> Self {
        Self {
            layer,
            state: GestureState::Idle,
            changed: false,
            lease: None,
        }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    pub fn holds_listeners(&self) -> bool {
        self.lease.is_some()
    }

    /// Starts a gesture of `kind`. Returns `false` when the press is ignored:
    /// a gesture is already running, the layer refuses pointer transforms, or
    /// rotation is disabled for it.
    pub fn press(
        &mut self,
        kind: GestureKind,
        layer: &Layer,
        pointer: CanvasPoint,
        container: Option<&ContainerRect>,
        host: &Rc<dyn PointerListenerHost>,
    ) -> bool {
        debug_assert_eq!(layer.id, self.layer);
        if self.is_active() {
            tracing::debug!(
                layer = %self.layer,
                state = ?self.state,
                "press ignored; gesture already active"
            );
            return false;
        }
        if !layer.accepts_pointer_transform() {
            tracing::debug!(
                layer = %self.layer,
                locked = layer.locked,
                "press ignored; layer does not accept pointer transforms"
            );
            return false;
        }
        if kind == GestureKind::Rotate && !layer.rotatable {
            tracing::debug!(layer = %self.layer, "press ignored; rotation disabled");
            return false;
        }
        let Some(state) = begin_gesture(kind, &layer.transform, pointer, container) else {
            tracing::debug!(layer = %self.layer, ?kind, "press ignored; container not ready");
            return false;
        };

        self.state = state;
        self.changed = false;
        self.lease = Some(ListenerLease::acquire(Rc::clone(host), self.layer));
        tracing::debug!(layer = %self.layer, ?kind, "gesture started");
        true
    }

    /// Applies a move to the live transform. Returns whether it changed.
    pub fn pointer_move(
        &mut self,
        layer: &mut Layer,
        pointer: CanvasPoint,
        container: Option<&ContainerRect>,
        snap_mode: SnapMode,
    ) -> bool {
        if self.state.is_idle() {
            return false;
        }
        if !layer.accepts_pointer_transform() {
            return false;
        }
        match apply_pointer_move(&self.state, &layer.transform, pointer, container, snap_mode) {
            Some(next) => {
                layer.transform = next;
                self.changed = true;
                true
            }
            None => {
                tracing::debug!(layer = %self.layer, "container not ready; move skipped");
                false
            }
        }
    }

    /// Ends any running gesture and releases its listeners.
    pub fn release(&mut self) -> Option<GestureEnd> {
        let kind = self.state.kind()?;
        self.state = GestureState::Idle;
        self.lease = None;
        let end = GestureEnd {
            layer: self.layer,
            kind,
            changed: std::mem::take(&mut self.changed),
        };
        tracing::debug!(
            layer = %end.layer,
            kind = ?end.kind,
            changed = end.changed,
            "gesture ended"
        );
        Some(end)
    }
}
