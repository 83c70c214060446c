//! Gesture modes and their pure transition functions.

use super::layers::LayerId;
use crate::geometry::{
    clamp_size, constrain_position, rotation_from_vector, CanvasPoint, ContainerRect, Size,
    SnapMode, Transform,
};

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Background,
    Body(LayerId),
    ResizeHandle(LayerId),
    RotateHandle(LayerId),
}

impl PointerTarget {
    pub const fn layer(self) -> Option<LayerId> {
        match self {
            Self::Background => None,
            Self::Body(id) | Self::ResizeHandle(id) | Self::RotateHandle(id) => Some(id),
        }
    }

    pub const fn gesture_kind(self) -> Option<GestureKind> {
        match self {
            Self::Background => None,
            Self::Body(_) => Some(GestureKind::Drag),
            Self::ResizeHandle(_) => Some(GestureKind::Resize),
            Self::RotateHandle(_) => Some(GestureKind::Rotate),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
    Rotate,
}

/// At most one manipulation mode can be active; `Idle` gates new gestures.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        offset: CanvasPoint,
    },
    Resizing {
        start_size: Size,
        start_pointer: CanvasPoint,
    },
    /// `grab_angle` is the pointer's angle at press minus the layer's
    /// rotation, so the handle turns from wherever it was grabbed.
    Rotating {
        center: CanvasPoint,
        grab_angle: f64,
    },
}

impl GestureState {
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::Idle => None,
            Self::Dragging { .. } => Some(GestureKind::Drag),
            Self::Resizing { .. } => Some(GestureKind::Resize),
            Self::Rotating { .. } => Some(GestureKind::Rotate),
        }
    }
}

/// Screen-space center of a layer's bounding box.
pub fn layer_center(transform: &Transform, container: &ContainerRect) -> CanvasPoint {
    let top_left = container.percent_to_px(transform.position);
    CanvasPoint::new(
        top_left.x + f64::from(transform.size.width) / 2.0,
        top_left.y + f64::from(transform.size.height) / 2.0,
    )
}

/// Leaves `Idle` for `kind`. Drag and rotate need a usable container to anchor
/// against; without one the press is dropped and the state stays idle.
pub fn begin_gesture(
    kind: GestureKind,
    transform: &Transform,
    pointer: CanvasPoint,
    container: Option<&ContainerRect>,
) -> Option<GestureState> {
    match kind {
        GestureKind::Drag => {
            let container = container.filter(|rect| rect.is_usable())?;
            let top_left = container.percent_to_px(transform.position);
            Some(GestureState::Dragging {
                offset: pointer.offset_from(top_left),
            })
        }
        GestureKind::Resize => Some(GestureState::Resizing {
            start_size: transform.size,
            start_pointer: pointer,
        }),
        GestureKind::Rotate => {
            let container = container.filter(|rect| rect.is_usable())?;
            let center = layer_center(transform, container);
            Some(GestureState::Rotating {
                center,
                grab_angle: rotation_from_vector(center, pointer) - transform.rotation,
            })
        }
    }
}

/// Transform produced by a pointer move in `state`, or `None` when the move
/// cannot be applied this frame.
pub fn apply_pointer_move(
    state: &GestureState,
    transform: &Transform,
    pointer: CanvasPoint,
    container: Option<&ContainerRect>,
    snap_mode: SnapMode,
) -> Option<Transform> {
    match *state {
        GestureState::Idle => None,
        GestureState::Dragging { offset } => {
            let container = container?;
            let top_left = pointer.offset_from(offset);
            let raw = container.px_to_percent(top_left)?;
            Some(Transform {
                position: constrain_position(raw, snap_mode),
                ..*transform
            })
        }
        GestureState::Resizing {
            start_size,
            start_pointer,
        } => {
            let delta = pointer.offset_from(start_pointer);
            Some(Transform {
                size: clamp_size(
                    f64::from(start_size.width) + delta.x,
                    f64::from(start_size.height) + delta.y,
                ),
                ..*transform
            })
        }
        GestureState::Rotating { center, grab_angle } => Some(Transform {
            rotation: rotation_from_vector(center, pointer) - grab_angle,
            ..*transform
        }),
    }
}
