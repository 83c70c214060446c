use crate::editor::{Layer, LayerContent, LayerId, LayerRegistry, PointerTarget, PreviewMode};
use crate::geometry::{CanvasPoint, Color, ContainerRect, Transform, MIN_GRID_STEP};

/// Pointer slop around a handle center, in canvas pixels.
pub const HANDLE_HIT_RADIUS: f64 = 10.0;
/// Distance of the rotate handle above the layer's top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 24.0;

/// Rectangle in container percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    pub fn inset(margin: f64) -> Self {
        Self {
            left: margin,
            top: margin,
            width: 100.0 - margin * 2.0,
            height: 100.0 - margin * 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl LayerBox {
    pub fn new(transform: &Transform, container: &ContainerRect) -> Self {
        let top_left = container.percent_to_px(transform.position);
        Self {
            left: top_left.x,
            top: top_left.y,
            width: f64::from(transform.size.width),
            height: f64::from(transform.size.height),
            rotation: transform.rotation,
        }
    }

    pub fn center(&self) -> CanvasPoint {
        CanvasPoint::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Bottom-right corner, rotated with the box.
    pub fn resize_handle(&self) -> CanvasPoint {
        CanvasPoint::new(self.left + self.width, self.top + self.height)
            .rotated_around(self.center(), self.rotation)
    }

    /// Above the top edge's midpoint, rotated with the box.
    pub fn rotate_handle(&self) -> CanvasPoint {
        CanvasPoint::new(self.left + self.width / 2.0, self.top - ROTATE_HANDLE_OFFSET)
            .rotated_around(self.center(), self.rotation)
    }

    pub fn contains(&self, point: CanvasPoint) -> bool {
        let local = point.rotated_around(self.center(), -self.rotation);
        local.x >= self.left
            && local.x <= self.left + self.width
            && local.y >= self.top
            && local.y <= self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandleSet {
    pub resize: bool,
    pub rotate: bool,
}

impl HandleSet {
    pub fn for_layer(layer: &Layer, selected: bool) -> Self {
        if !selected || !layer.accepts_pointer_transform() {
            return Self::default();
        }
        Self {
            resize: true,
            rotate: layer.rotatable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLayer {
    pub id: LayerId,
    pub transform: Transform,
    /// Pixel geometry in untransformed container space; `None` until the
    /// container has been laid out.
    pub bounds: Option<LayerBox>,
    pub opacity: f64,
    pub selected: bool,
    pub locked: bool,
    pub handles: HandleSet,
    pub content: LayerContent,
}

/// Everything the host needs to draw one frame of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasFrame {
    pub mockup_url: Option<String>,
    /// Outer scale applied around the container center.
    pub scale: f64,
    pub container: Option<ContainerRect>,
    pub backdrop: Color,
    pub preview_mode: PreviewMode,
    pub front_back_toggle: bool,
    pub color_picker: bool,
    pub size_picker: bool,
    /// Grid line offsets in percent, shared by both axes.
    pub grid_lines: Vec<f64>,
    pub safe_area: Option<PercentRect>,
    pub layers: Vec<RenderedLayer>,
    pub can_undo: bool,
    pub can_redo: bool,
}

pub fn grid_lines(step: f64) -> Vec<f64> {
    if !step.is_finite() || step <= 0.0 {
        return Vec::new();
    }
    let step = step.max(MIN_GRID_STEP);
    let count = (100.0 / step).ceil() as usize;
    (1..count)
        .map(|index| index as f64 * step)
        .filter(|offset| *offset < 100.0)
        .collect()
}

/// Content-bearing layers in render order. Hidden layers stay in the plan
/// with zero opacity.
pub fn rendered_layers(
    registry: &LayerRegistry,
    container: Option<&ContainerRect>,
) -> Vec<RenderedLayer> {
    registry
        .layers()
        .iter()
        .filter(|layer| layer.has_content())
        .map(|layer| {
            let selected = registry.is_selected(layer.id);
            RenderedLayer {
                id: layer.id,
                transform: layer.transform,
                bounds: container
                    .filter(|rect| rect.is_usable())
                    .map(|rect| LayerBox::new(&layer.transform, rect)),
                opacity: layer.effective_opacity(),
                selected,
                locked: layer.locked,
                handles: HandleSet::for_layer(layer, selected),
                content: layer.content.clone(),
            }
        })
        .collect()
}

fn near(point: CanvasPoint, handle: CanvasPoint) -> bool {
    let delta = point.offset_from(handle);
    delta.x.hypot(delta.y) <= HANDLE_HIT_RADIUS
}

/// Resolves what lies under `point` (canvas space, zoom already removed).
/// Top-most layer wins; handles are only live on the selected layer.
pub fn hit_test(
    registry: &LayerRegistry,
    container: Option<&ContainerRect>,
    point: CanvasPoint,
) -> PointerTarget {
    let Some(container) = container.filter(|rect| rect.is_usable()) else {
        return PointerTarget::Background;
    };

    for layer in registry.layers().iter().rev() {
        if !layer.has_content() || !layer.visible {
            continue;
        }
        let bounds = LayerBox::new(&layer.transform, container);
        let handles = HandleSet::for_layer(layer, registry.is_selected(layer.id));
        if handles.resize && near(point, bounds.resize_handle()) {
            return PointerTarget::ResizeHandle(layer.id);
        }
        if handles.rotate && near(point, bounds.rotate_handle()) {
            return PointerTarget::RotateHandle(layer.id);
        }
        if bounds.contains(point) {
            return PointerTarget::Body(layer.id);
        }
    }
    PointerTarget::Background
}
