//! Canvas composer: owns the layer stack, per-layer controllers, history and
//! view state for one mounted product.

mod actions;
mod render;
mod submission;

use std::rc::Rc;

pub use actions::{NudgeDirection, StudioAction};
pub use render::{
    grid_lines, hit_test, CanvasFrame, HandleSet, LayerBox, PercentRect, RenderedLayer,
    HANDLE_HIT_RADIUS, ROTATE_HANDLE_OFFSET,
};
pub use submission::{DesignSubmission, SubmittedLayer};

use crate::config::StudioConfig;
use crate::editor::{
    DesignSnapshot, DetachedListenerHost, GestureEnd, GestureKind, HistoryStack, Layer, LayerId,
    LayerRegistry, ManipulationController, PointerListenerHost, PointerTarget, PreviewMode,
    TextStyle, ViewState,
};
use crate::error::StudioResult;
use crate::geometry::{
    constrain_position, fit_aspect, CanvasPoint, Color, ContainerRect, Position, SnapMode,
    Transform,
};
use crate::product::ProductDescriptor;
use crate::state::{StepMachine, StudioEvent, StudioStep};

pub struct Studio {
    product: ProductDescriptor,
    config: StudioConfig,
    registry: LayerRegistry,
    controllers: [ManipulationController; 2],
    active: Option<LayerId>,
    history: HistoryStack,
    view: ViewState,
    container: Option<ContainerRect>,
    listener_host: Rc<dyn PointerListenerHost>,
    color: String,
    size: Option<String>,
    steps: StepMachine,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("product", &self.product.id)
            .field("registry", &self.registry)
            .field("active", &self.active)
            .field("history_len", &self.history.len())
            .field("view", &self.view)
            .field("container", &self.container)
            .field("color", &self.color)
            .field("size", &self.size)
            .field("step", &self.steps.step())
            .finish_non_exhaustive()
    }
}

impl Studio {
    pub fn mount(product: ProductDescriptor, config: StudioConfig) -> StudioResult<Self> {
        let product = product.validated()?;
        let defaults = product.default_snapshot();
        let color = product.first_color().map(str::to_owned).unwrap_or_default();
        let size = product.first_size().map(str::to_owned);
        let mut steps = StepMachine::new();
        steps.transition(StudioEvent::ProductChosen)?;
        tracing::info!(product = %product.id, %color, ?size, "studio mounted");

        Ok(Self {
            registry: LayerRegistry::new(&defaults),
            controllers: LayerId::ALL.map(ManipulationController::new),
            active: None,
            history: HistoryStack::new(defaults),
            view: config.initial_view(),
            container: None,
            listener_host: Rc::new(DetachedListenerHost),
            color,
            size,
            product,
            config,
            steps,
        })
    }

    pub fn with_listener_host(mut self, host: Rc<dyn PointerListenerHost>) -> Self {
        self.listener_host = host;
        self
    }

    pub fn product(&self) -> &ProductDescriptor {
        &self.product
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        self.registry.layer(id)
    }

    pub fn transform(&self, id: LayerId) -> Transform {
        self.registry.layer(id).transform
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.registry.selected()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn active_gesture(&self) -> Option<(LayerId, GestureKind)> {
        let id = self.active?;
        let kind = self.controllers[id.index()].state().kind()?;
        Some((id, kind))
    }

    pub fn gesture_active(&self) -> bool {
        self.active.is_some()
    }

    // Wizard

    pub fn step(&self) -> StudioStep {
        self.steps.step()
    }

    pub fn wizard(&self) -> &StepMachine {
        &self.steps
    }

    /// Moves the surrounding wizard. Leaving `Customize` ends any running
    /// gesture and clears the selection; `StartOver` also restores defaults.
    pub fn advance(&mut self, event: StudioEvent) -> StudioResult<StudioStep> {
        let step = self.steps.transition(event)?;
        if !step.canvas_editable() {
            if let Some(id) = self.active {
                self.settle_gesture_on(id);
            }
            self.registry.deselect();
        }
        if event == StudioEvent::StartOver {
            self.restore_defaults();
        }
        Ok(step)
    }

    fn editable(&self) -> bool {
        let step = self.steps.step();
        if !step.canvas_editable() {
            tracing::debug!(?step, "canvas is read-only in this step");
            return false;
        }
        true
    }

    // Layout

    pub fn container(&self) -> Option<ContainerRect> {
        self.container
    }

    /// Untransformed layout box of the container; `None` until laid out.
    pub fn set_container(&mut self, container: Option<ContainerRect>) {
        self.container = container.filter(|rect| rect.is_usable());
    }

    /// Fits the configured aspect ratio into the available area, centered,
    /// and uses the result as the container.
    pub fn fit_container(
        &mut self,
        available_width: f64,
        available_height: f64,
    ) -> Option<ContainerRect> {
        let aspect = self.config.container_aspect;
        let (width, height) = fit_aspect(
            available_width,
            available_height,
            aspect.width,
            aspect.height,
        );
        let rect = ContainerRect::new(
            (available_width - width) / 2.0,
            (available_height - height) / 2.0,
            width,
            height,
        );
        self.set_container(Some(rect));
        self.container
    }

    /// Removes the outer zoom from a screen point.
    fn to_canvas(&self, point: CanvasPoint) -> CanvasPoint {
        match &self.container {
            Some(container) => self.view.unzoom_point(point, container.center()),
            None => point,
        }
    }

    // Pointer

    pub fn hit_test(&self, point: CanvasPoint) -> PointerTarget {
        hit_test(&self.registry, self.container.as_ref(), self.to_canvas(point))
    }

    /// Routes a press on `target`. Returns whether a gesture started.
    pub fn pointer_down(&mut self, point: CanvasPoint, target: PointerTarget) -> bool {
        if let Some(active) = self.active {
            tracing::debug!(layer = %active, ?target, "press ignored; gesture already active");
            return false;
        }
        if !self.editable() {
            return false;
        }

        let (id, kind) = match target {
            PointerTarget::Background => {
                self.registry.deselect();
                return false;
            }
            PointerTarget::Body(id) => {
                if !self.registry.select(id) {
                    return false;
                }
                (id, GestureKind::Drag)
            }
            PointerTarget::ResizeHandle(id) | PointerTarget::RotateHandle(id) => {
                if !self.registry.is_selected(id) {
                    tracing::debug!(
                        layer = %id,
                        ?target,
                        "handle press ignored; layer not selected"
                    );
                    return false;
                }
                let Some(kind) = target.gesture_kind() else {
                    return false;
                };
                (id, kind)
            }
        };

        let pointer = self.to_canvas(point);
        let started = self.controllers[id.index()].press(
            kind,
            self.registry.layer(id),
            pointer,
            self.container.as_ref(),
            &self.listener_host,
        );
        if started {
            self.active = Some(id);
        }
        started
    }

    /// Hit-tests `point` and routes the press to whatever lies under it.
    pub fn pointer_down_at(&mut self, point: CanvasPoint) -> bool {
        let target = self.hit_test(point);
        self.pointer_down(point, target)
    }

    pub fn pointer_move(&mut self, point: CanvasPoint) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        let pointer = self.to_canvas(point);
        let snap_mode = self.view.snap_mode();
        self.controllers[id.index()].pointer_move(
            self.registry.layer_mut(id),
            pointer,
            self.container.as_ref(),
            snap_mode,
        )
    }

    /// Ends the running gesture wherever the pointer is. A gesture that moved
    /// the layer becomes exactly one history entry.
    pub fn pointer_up(&mut self) -> Option<GestureEnd> {
        let id = self.active.take()?;
        let end = self.controllers[id.index()].release()?;
        if end.changed {
            self.commit();
        }
        Some(end)
    }

    fn settle_gesture_on(&mut self, id: LayerId) {
        if self.active == Some(id) {
            self.pointer_up();
        }
    }

    fn commit(&mut self) {
        self.history.commit(self.registry.snapshot());
    }

    // Transforms

    /// Host-driven transform change (inspector fields, sliders). Clamped and
    /// committed as one entry; ignored while that layer is mid-gesture.
    pub fn set_transform(&mut self, id: LayerId, transform: Transform) -> bool {
        if !self.editable() {
            return false;
        }
        if self.active == Some(id) {
            tracing::debug!(layer = %id, "set_transform ignored during gesture");
            return false;
        }
        let next = transform.clamped();
        let layer = self.registry.layer_mut(id);
        if layer.transform == next {
            return false;
        }
        layer.transform = next;
        self.commit();
        true
    }

    pub fn set_opacity(&mut self, id: LayerId, opacity: f64) -> bool {
        let transform = Transform {
            opacity,
            ..self.transform(id)
        };
        self.set_transform(id, transform)
    }

    pub fn set_rotation(&mut self, id: LayerId, rotation: f64) -> bool {
        let transform = Transform {
            rotation,
            ..self.transform(id)
        };
        self.set_transform(id, transform)
    }

    /// Moves the selected layer by `dx`/`dy` percent. Locked or hidden layers
    /// stay put.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        if self.gesture_active() || !self.editable() {
            return false;
        }
        let Some(id) = self.registry.selected() else {
            return false;
        };
        let layer = self.registry.layer(id);
        if !layer.accepts_pointer_transform() {
            tracing::debug!(layer = %id, "nudge ignored; layer does not accept transforms");
            return false;
        }
        let current = layer.transform;
        let position = constrain_position(
            Position::new(current.position.x + dx, current.position.y + dy),
            SnapMode::Free,
        );
        self.set_transform(
            id,
            Transform {
                position,
                ..current
            },
        )
    }

    // Selection

    /// Selection stays with the manipulated layer until its gesture ends.
    fn selection_locked(&self) -> bool {
        match self.active {
            Some(id) => {
                tracing::debug!(layer = %id, "selection change ignored during gesture");
                true
            }
            None => !self.editable(),
        }
    }

    pub fn select(&mut self, id: LayerId) -> bool {
        if self.selection_locked() {
            return false;
        }
        self.registry.select(id)
    }

    pub fn deselect(&mut self) -> bool {
        if self.selection_locked() {
            return false;
        }
        let had_selection = self.registry.selected().is_some();
        self.registry.deselect();
        had_selection
    }

    /// Host-driven selection by layer name; `None` clears it.
    pub fn set_selected_element(&mut self, name: Option<&str>) -> bool {
        if self.selection_locked() {
            return false;
        }
        match name {
            Some(name) => self.registry.select_named(name),
            None => {
                self.registry.deselect();
                true
            }
        }
    }

    // History

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        if self.gesture_active() || !self.history.can_undo() || !self.editable() {
            return false;
        }
        let snapshot = self.history.undo().clone();
        self.registry.apply_snapshot(&snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.gesture_active() || !self.history.can_redo() || !self.editable() {
            return false;
        }
        let snapshot = self.history.redo().clone();
        self.registry.apply_snapshot(&snapshot);
        true
    }

    /// Restores every layer's default transform and clears history. Content,
    /// selection and view settings are kept.
    pub fn reset(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        self.restore_defaults();
        true
    }

    fn restore_defaults(&mut self) {
        if let Some(id) = self.active {
            self.settle_gesture_on(id);
        }
        let defaults: DesignSnapshot = self.product.default_snapshot();
        self.registry.apply_snapshot(&defaults);
        self.history.reset(defaults);
        tracing::info!(product = %self.product.id, "design reset to defaults");
    }

    // Content

    pub fn set_image(&mut self, url: impl Into<String>) {
        self.registry.set_image(url);
        if !self.registry.layer(LayerId::Image).has_content() {
            self.settle_gesture_on(LayerId::Image);
        }
    }

    pub fn clear_image(&mut self) {
        self.settle_gesture_on(LayerId::Image);
        self.registry.clear_content(LayerId::Image);
    }

    pub fn set_text(&mut self, text: impl Into<String>, style: TextStyle) {
        self.registry.set_text(text, style);
        if !self.registry.layer(LayerId::Text).has_content() {
            self.settle_gesture_on(LayerId::Text);
        }
    }

    pub fn clear_text(&mut self) {
        self.settle_gesture_on(LayerId::Text);
        self.registry.clear_content(LayerId::Text);
    }

    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) {
        self.registry.set_visible(id, visible);
    }

    pub fn toggle_layer_visible(&mut self, id: LayerId) -> bool {
        self.registry.toggle_visible(id)
    }

    pub fn set_layer_locked(&mut self, id: LayerId, locked: bool) {
        self.registry.set_locked(id, locked);
    }

    pub fn toggle_layer_locked(&mut self, id: LayerId) -> bool {
        self.registry.toggle_locked(id)
    }

    pub fn set_rotation_enabled(&mut self, id: LayerId, enabled: bool) {
        self.registry.set_rotatable(id, enabled);
    }

    // View

    pub fn set_zoom(&mut self, zoom: f64) {
        self.view.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.view.reset_zoom();
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.view.set_snap_enabled(enabled);
    }

    pub fn set_grid_step(&mut self, step: f64) {
        self.view.set_grid_step(step);
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.view.set_show_grid(show);
    }

    pub fn set_show_safe_area(&mut self, show: bool) {
        self.view.set_show_safe_area(show);
    }

    pub fn set_backdrop_color(&mut self, color: Color) {
        self.view.set_backdrop_color(color);
    }

    /// Ignored for products without distinct front and back imagery.
    pub fn set_preview_mode(&mut self, mode: PreviewMode) -> bool {
        if !self.product.front_back_toggle_available() {
            tracing::debug!(
                product = %self.product.id,
                ?mode,
                "preview mode ignored; product has no back side"
            );
            return false;
        }
        self.view.set_preview_mode(mode);
        true
    }

    pub fn toggle_preview_mode(&mut self) -> bool {
        self.set_preview_mode(self.view.preview_mode().toggled())
    }

    // Product options

    pub fn selected_color(&self) -> &str {
        &self.color
    }

    pub fn selected_size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn select_color(&mut self, color: &str) -> bool {
        if !self.product.has_color(color) {
            tracing::debug!(product = %self.product.id, color, "unknown color ignored");
            return false;
        }
        self.color = color.to_owned();
        true
    }

    pub fn select_size(&mut self, size: &str) -> bool {
        if !self.product.has_size_option(size) {
            tracing::debug!(product = %self.product.id, size, "unknown size ignored");
            return false;
        }
        self.size = Some(size.to_owned());
        true
    }

    pub fn mockup_url(&self) -> Option<&str> {
        self.product
            .effective_image(&self.color, self.view.preview_mode())
    }

    // Output

    pub fn frame(&self) -> CanvasFrame {
        CanvasFrame {
            mockup_url: self.mockup_url().map(str::to_owned),
            scale: self.view.zoom(),
            container: self.container,
            backdrop: self.view.backdrop_color(),
            preview_mode: self.view.preview_mode(),
            front_back_toggle: self.product.front_back_toggle_available(),
            color_picker: self.product.color_picker_available(),
            size_picker: self.product.size_picker_available(),
            grid_lines: if self.view.show_grid() {
                grid_lines(self.view.grid_step())
            } else {
                Vec::new()
            },
            safe_area: self
                .view
                .show_safe_area()
                .then(|| PercentRect::inset(self.config.safe_area_inset())),
            layers: render::rendered_layers(&self.registry, self.container.as_ref()),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    pub fn submission(&self) -> DesignSubmission {
        DesignSubmission {
            product_id: self.product.id.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            preview_mode: self.view.preview_mode(),
            mockup_url: self.mockup_url().map(str::to_owned),
            layers: submission::submitted_layers(&self.registry),
        }
    }

    /// Dispatches a toolbar button or resolved shortcut. Returns whether the
    /// action had an effect.
    pub fn apply_action(&mut self, action: StudioAction) -> bool {
        tracing::debug!(action = action.label(), "apply studio action");
        match action {
            StudioAction::Undo => self.undo(),
            StudioAction::Redo => self.redo(),
            StudioAction::Reset => self.reset(),
            StudioAction::Deselect => self.deselect(),
            StudioAction::Nudge { direction, large } => {
                let step = if large {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                let (x, y) = direction.unit();
                self.nudge_selected(x * step, y * step)
            }
            StudioAction::ZoomIn => {
                self.zoom_in();
                true
            }
            StudioAction::ZoomOut => {
                self.zoom_out();
                true
            }
            StudioAction::ResetZoom => {
                self.reset_zoom();
                true
            }
            StudioAction::ToggleSnap => {
                self.view.toggle_snap();
                true
            }
            StudioAction::ToggleGrid => {
                self.view.toggle_grid();
                true
            }
            StudioAction::ToggleSafeArea => {
                self.view.toggle_safe_area();
                true
            }
            StudioAction::TogglePreviewMode => self.toggle_preview_mode(),
            StudioAction::ToggleSelectedLock => match self.selected() {
                Some(id) => {
                    self.toggle_layer_locked(id);
                    true
                }
                None => false,
            },
            StudioAction::ToggleSelectedVisibility => match self.selected() {
                Some(id) => {
                    self.toggle_layer_visible(id);
                    true
                }
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::state::StateError;
    use std::cell::RefCell;

    const SIDED_PRODUCT: &str = r#"{
        "id": "tee-classic",
        "name": "Classic Tee",
        "colorVariants": {
            "black": {
                "front": "https://cdn.example/tee-black-front.png",
                "back": "https://cdn.example/tee-black-back.png"
            },
            "white": {
                "front": "https://cdn.example/tee-white-front.png",
                "back": "https://cdn.example/tee-white-back.png"
            }
        },
        "hasFrontBack": true,
        "hasColorOptions": true,
        "hasSize": true,
        "options": ["S", "M", "L"]
    }"#;

    const FLAT_PRODUCT: &str = r#"{
        "id": "mug",
        "colorVariants": { "white": "https://cdn.example/mug.png" }
    }"#;

    #[derive(Default)]
    struct RecordingHost {
        events: RefCell<Vec<(&'static str, LayerId)>>,
    }

    impl PointerListenerHost for RecordingHost {
        fn attach(&self, layer: LayerId) {
            self.events.borrow_mut().push(("attach", layer));
        }

        fn detach(&self, layer: LayerId) {
            self.events.borrow_mut().push(("detach", layer));
        }
    }

    fn studio_for(json: &str) -> Studio {
        let product = ProductDescriptor::from_json(json).expect("fixture product should parse");
        let mut studio =
            Studio::mount(product, StudioConfig::default()).expect("fixture product should mount");
        studio.set_container(Some(ContainerRect::new(0.0, 0.0, 400.0, 500.0)));
        studio.set_image("https://cdn.example/upload.png");
        studio.set_text("Team", TextStyle::default());
        studio
    }

    fn studio() -> Studio {
        studio_for(SIDED_PRODUCT)
    }

    /// Drags the image from inside its top-left corner so the layer's top-left
    /// lands on `to`.
    fn drag_image_to(studio: &mut Studio, to: CanvasPoint) {
        let container = studio.container().expect("container is laid out");
        let top_left = container.percent_to_px(studio.transform(LayerId::Image).position);
        let grab = CanvasPoint::new(top_left.x + 10.0, top_left.y + 10.0);
        assert!(studio.pointer_down(grab, PointerTarget::Body(LayerId::Image)));
        assert!(studio.pointer_move(CanvasPoint::new(to.x + 10.0, to.y + 10.0)));
        studio.pointer_up();
    }

    #[test]
    fn mount_picks_first_color_and_size() {
        let studio = studio();
        assert_eq!(studio.selected_color(), "black");
        assert_eq!(studio.selected_size(), Some("S"));
        assert_eq!(
            studio.mockup_url(),
            Some("https://cdn.example/tee-black-front.png")
        );
        assert!(!studio.can_undo());
        assert_eq!(
            studio.transform(LayerId::Image),
            LayerId::Image.default_transform()
        );
    }

    #[test]
    fn mount_rejects_product_without_variants() {
        let product = ProductDescriptor {
            id: "ghost".to_owned(),
            name: String::new(),
            color_variants: Default::default(),
            has_front_back: false,
            has_color_options: false,
            has_size: false,
            options: Vec::new(),
            default_transforms: Default::default(),
        };
        let err = Studio::mount(product, StudioConfig::default())
            .expect_err("product without variants should not mount");
        assert!(matches!(err, crate::error::StudioError::Product(_)));
    }

    #[test]
    fn gesture_moves_coalesce_into_one_history_entry() {
        let mut studio = studio();
        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        for x in [160.0, 170.0, 180.0, 190.0, 210.0] {
            assert!(studio.pointer_move(CanvasPoint::new(x, 135.0)));
        }
        let end = studio.pointer_up().expect("gesture should end");
        assert!(end.changed);
        assert_eq!(end.kind, GestureKind::Drag);
        assert_eq!(studio.history().len(), 2);
        assert_eq!(
            studio.transform(LayerId::Image).position,
            Position::new(50.0, 25.0)
        );

        assert!(studio.undo());
        assert_eq!(
            studio.transform(LayerId::Image),
            LayerId::Image.default_transform()
        );
    }

    #[test]
    fn press_and_release_without_moves_commits_nothing() {
        let mut studio = studio();
        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        let end = studio.pointer_up().expect("gesture should end");
        assert!(!end.changed);
        assert!(!studio.can_undo());
        assert_eq!(studio.selected(), Some(LayerId::Image));
    }

    #[test]
    fn locked_layer_ignores_pointer_and_nudges() {
        let mut studio = studio();
        studio.select(LayerId::Image);
        studio.set_layer_locked(LayerId::Image, true);
        let before = studio.transform(LayerId::Image);

        assert!(!studio.pointer_down(
            CanvasPoint::new(290.0, 275.0),
            PointerTarget::ResizeHandle(LayerId::Image)
        ));
        assert!(!studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        assert!(!studio.pointer_move(CanvasPoint::new(300.0, 300.0)));
        assert!(!studio.apply_action(StudioAction::Nudge {
            direction: NudgeDirection::Right,
            large: true,
        }));

        assert_eq!(studio.transform(LayerId::Image), before);
        assert!(!studio.can_undo());
        assert!(!studio.toggle_layer_visible(LayerId::Image));
    }

    #[test]
    fn flat_product_ignores_preview_mode_and_hides_toggle() {
        let mut studio = studio_for(FLAT_PRODUCT);
        assert!(!studio.set_preview_mode(PreviewMode::Back));
        assert!(!studio.apply_action(StudioAction::TogglePreviewMode));

        let frame = studio.frame();
        assert!(!frame.front_back_toggle);
        assert!(!frame.color_picker);
        assert!(!frame.size_picker);
        assert_eq!(frame.preview_mode, PreviewMode::Front);
        assert_eq!(
            frame.mockup_url.as_deref(),
            Some("https://cdn.example/mug.png")
        );
        assert_eq!(studio.selected_size(), None);
    }

    #[test]
    fn sided_product_switches_mockup_with_color_and_side() {
        let mut studio = studio();
        assert!(studio.select_color("white"));
        assert!(!studio.select_color("teal"));
        assert!(studio.set_preview_mode(PreviewMode::Back));
        assert_eq!(
            studio.mockup_url(),
            Some("https://cdn.example/tee-white-back.png")
        );
        assert!(studio.select_size("L"));
        assert!(!studio.select_size("XXL"));
        assert_eq!(studio.selected_size(), Some("L"));
    }

    #[test]
    fn reset_after_drags_and_undos_restores_defaults_and_clears_history() {
        let mut studio = studio();
        drag_image_to(&mut studio, CanvasPoint::new(40.0, 50.0));
        drag_image_to(&mut studio, CanvasPoint::new(80.0, 100.0));
        drag_image_to(&mut studio, CanvasPoint::new(200.0, 300.0));
        assert_eq!(studio.history().len(), 4);
        assert!(studio.undo());
        assert!(studio.undo());
        assert!(studio.can_redo());

        studio.reset();
        for id in LayerId::ALL {
            assert_eq!(studio.transform(id), id.default_transform());
        }
        assert!(!studio.can_undo());
        assert!(!studio.can_redo());
        assert_eq!(studio.history().len(), 1);
    }

    #[test]
    fn new_commit_after_undo_discards_redo_branch() {
        let mut studio = studio();
        drag_image_to(&mut studio, CanvasPoint::new(40.0, 50.0));
        drag_image_to(&mut studio, CanvasPoint::new(80.0, 100.0));
        assert!(studio.undo());
        assert!(studio.can_redo());

        drag_image_to(&mut studio, CanvasPoint::new(200.0, 300.0));
        assert!(!studio.can_redo());
        assert_eq!(studio.history().len(), 3);
        assert!(!studio.redo());
    }

    #[test]
    fn zoom_does_not_leak_into_stored_geometry() {
        let mut plain = studio();
        let mut zoomed = studio();
        zoomed.set_zoom(1.5);
        let center = zoomed.container().expect("container is laid out").center();

        let press = CanvasPoint::new(150.0, 135.0);
        let release = CanvasPoint::new(230.0, 215.0);
        assert!(plain.pointer_down(press, PointerTarget::Body(LayerId::Image)));
        plain.pointer_move(release);
        plain.pointer_up();

        let screen = |point: CanvasPoint| zoomed.view().zoom_point(point, center);
        let (zoomed_press, zoomed_release) = (screen(press), screen(release));
        assert!(zoomed.pointer_down(zoomed_press, PointerTarget::Body(LayerId::Image)));
        zoomed.pointer_move(zoomed_release);
        zoomed.pointer_up();

        assert_eq!(
            zoomed.transform(LayerId::Image).position,
            plain.transform(LayerId::Image).position
        );
        assert_eq!(
            zoomed.transform(LayerId::Image).size,
            LayerId::Image.default_transform().size
        );
    }

    #[test]
    fn resize_under_zoom_uses_unzoomed_delta() {
        let mut studio = studio();
        studio.set_zoom(2.0);
        studio.select(LayerId::Image);
        let center = studio.container().expect("container is laid out").center();
        let screen = |point: CanvasPoint| studio.view().zoom_point(point, center);
        let (press, release) = (
            screen(CanvasPoint::new(290.0, 275.0)),
            screen(CanvasPoint::new(320.0, 295.0)),
        );

        assert!(studio.pointer_down(press, PointerTarget::ResizeHandle(LayerId::Image)));
        studio.pointer_move(release);
        studio.pointer_up();
        assert_eq!(studio.transform(LayerId::Image).size, Size::new(180, 170));
    }

    #[test]
    fn pressing_another_layer_moves_the_single_selection() {
        let mut studio = studio();
        assert!(studio.set_selected_element(Some("image")));
        assert!(studio.pointer_down(
            CanvasPoint::new(130.0, 310.0),
            PointerTarget::Body(LayerId::Text)
        ));
        studio.pointer_up();
        assert_eq!(studio.selected(), Some(LayerId::Text));
        assert!(!studio.registry().is_selected(LayerId::Image));

        assert!(!studio.set_selected_element(Some("sticker")));
        assert_eq!(studio.selected(), Some(LayerId::Text));
        studio.set_selected_element(None);
        assert_eq!(studio.selected(), None);
    }

    #[test]
    fn background_press_deselects_and_handles_need_selection() {
        let mut studio = studio();
        assert!(!studio.pointer_down(
            CanvasPoint::new(290.0, 275.0),
            PointerTarget::ResizeHandle(LayerId::Image)
        ));
        studio.select(LayerId::Image);
        assert!(!studio.pointer_down_at(CanvasPoint::new(395.0, 5.0)));
        assert_eq!(studio.selected(), None);
    }

    #[test]
    fn pointer_down_at_routes_through_hit_test() {
        let mut studio = studio();
        assert!(studio.pointer_down_at(CanvasPoint::new(150.0, 135.0)));
        assert_eq!(
            studio.active_gesture(),
            Some((LayerId::Image, GestureKind::Drag))
        );
        studio.pointer_up();

        assert!(studio.pointer_down_at(CanvasPoint::new(215.0, 101.0)));
        assert_eq!(
            studio.active_gesture(),
            Some((LayerId::Image, GestureKind::Rotate))
        );
        studio.pointer_move(CanvasPoint::new(215.0, 400.0));
        studio.pointer_up();
        assert!((studio.transform(LayerId::Image).rotation - 180.0).abs() < 1e-9);
    }

    #[test]
    fn grabbing_rotate_handle_keeps_current_rotation() {
        let mut studio = studio();
        studio.select(LayerId::Image);
        assert!(studio.pointer_down_at(CanvasPoint::new(215.0, 101.0)));
        studio.pointer_move(CanvasPoint::new(215.5, 101.0));
        studio.pointer_up();
        assert!(studio.transform(LayerId::Image).rotation.abs() < 1.0);

        // a quarter turn clockwise moves the handle right of the center
        assert!(studio.set_rotation(LayerId::Image, 90.0));
        let center = CanvasPoint::new(215.0, 200.0);
        let handle = CanvasPoint::new(215.0, 101.0).rotated_around(center, 90.0);
        assert_eq!(
            studio.hit_test(handle),
            PointerTarget::RotateHandle(LayerId::Image)
        );
        assert!(studio.pointer_down(handle, PointerTarget::RotateHandle(LayerId::Image)));
        studio.pointer_move(CanvasPoint::new(handle.x, handle.y + 0.5));
        studio.pointer_up();
        assert!((studio.transform(LayerId::Image).rotation - 90.0).abs() < 1.0);
    }

    #[test]
    fn second_press_during_gesture_is_ignored_until_release() {
        let mut studio = studio();
        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        assert!(!studio.pointer_down(
            CanvasPoint::new(130.0, 310.0),
            PointerTarget::Body(LayerId::Text)
        ));
        assert_eq!(studio.selected(), Some(LayerId::Image));
        assert!(!studio.undo());
        studio.pointer_up();
        assert!(!studio.gesture_active());
    }

    #[test]
    fn moves_without_container_are_skipped() {
        let mut studio = studio();
        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        studio.set_container(None);
        assert!(!studio.pointer_move(CanvasPoint::new(300.0, 300.0)));
        let end = studio.pointer_up().expect("gesture should end");
        assert!(!end.changed);
        assert!(!studio.can_undo());
    }

    #[test]
    fn listeners_follow_gesture_and_studio_lifetime() {
        let host = Rc::new(RecordingHost::default());
        let mut studio = studio().with_listener_host(host.clone());

        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        studio.pointer_up();
        assert_eq!(
            *host.events.borrow(),
            vec![("attach", LayerId::Image), ("detach", LayerId::Image)]
        );

        assert!(studio.pointer_down(
            CanvasPoint::new(130.0, 310.0),
            PointerTarget::Body(LayerId::Text)
        ));
        drop(studio);
        assert_eq!(
            host.events.borrow().last(),
            Some(&("detach", LayerId::Text))
        );
    }

    #[test]
    fn set_transform_clamps_and_commits() {
        let mut studio = studio();
        let wild = Transform::new(Position::new(120.0, -4.0), Size::new(5, 400), 30.0, 2.0);
        assert!(studio.set_transform(LayerId::Text, wild));
        let stored = studio.transform(LayerId::Text);
        assert_eq!(stored.position, Position::new(95.0, 0.0));
        assert_eq!(stored.size, Size::new(20, 400));
        assert_eq!(stored.opacity, 1.0);
        assert!(studio.can_undo());

        assert!(!studio.set_transform(LayerId::Text, wild));
        assert_eq!(studio.history().len(), 2);

        assert!(studio.set_opacity(LayerId::Text, 0.25));
        assert_eq!(studio.transform(LayerId::Text).opacity, 0.25);
    }

    #[test]
    fn nudge_actions_use_configured_steps() {
        let mut studio = studio();
        studio.select(LayerId::Image);
        assert!(studio.apply_action(StudioAction::Nudge {
            direction: NudgeDirection::Right,
            large: false,
        }));
        assert!(studio.apply_action(StudioAction::Nudge {
            direction: NudgeDirection::Up,
            large: true,
        }));
        assert_eq!(
            studio.transform(LayerId::Image).position,
            Position::new(36.0, 20.0)
        );
        assert_eq!(studio.history().len(), 3);
    }

    #[test]
    fn clearing_content_mid_gesture_ends_it() {
        let host = Rc::new(RecordingHost::default());
        let mut studio = studio().with_listener_host(host.clone());
        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        studio.clear_image();
        assert!(!studio.gesture_active());
        assert_eq!(studio.selected(), None);
        assert_eq!(
            host.events.borrow().last(),
            Some(&("detach", LayerId::Image))
        );
    }

    #[test]
    fn frame_reflects_view_overlays() {
        let mut studio = studio();
        studio.select(LayerId::Image);
        studio.set_layer_visible(LayerId::Text, false);
        studio.apply_action(StudioAction::ToggleGrid);
        studio.apply_action(StudioAction::ZoomIn);

        let frame = studio.frame();
        assert_eq!(frame.scale, 1.1);
        assert_eq!(frame.grid_lines.first(), Some(&5.0));
        assert_eq!(frame.grid_lines.len(), 19);
        assert_eq!(frame.safe_area, Some(PercentRect::inset(10.0)));
        assert_eq!(frame.layers.len(), 2);
        assert!(frame.layers[0].selected);
        assert_eq!(
            frame.layers[0].handles,
            HandleSet {
                resize: true,
                rotate: true
            }
        );
        assert_eq!(frame.layers[1].opacity, 0.0);

        studio.apply_action(StudioAction::ToggleSafeArea);
        assert_eq!(studio.frame().safe_area, None);
    }

    #[test]
    fn submission_lists_visible_content_layers() {
        let mut studio = studio();
        studio.set_layer_visible(LayerId::Image, false);
        let submission = studio.submission();
        assert_eq!(submission.product_id, "tee-classic");
        assert_eq!(submission.color, "black");
        assert_eq!(submission.size.as_deref(), Some("S"));
        assert_eq!(submission.layers.len(), 1);
        assert_eq!(submission.layers[0].id, LayerId::Text);

        let json: serde_json::Value = serde_json::from_str(
            &submission.to_json().expect("submission should serialize"),
        )
        .expect("submission json should parse");
        assert_eq!(json["productId"], "tee-classic");
        assert_eq!(json["previewMode"], "front");
        assert_eq!(json["layers"][0]["id"], "text");
        assert_eq!(json["layers"][0]["content"]["kind"], "text");
    }

    #[test]
    fn fit_container_centers_configured_aspect() {
        let mut studio = studio();
        let rect = studio
            .fit_container(800.0, 500.0)
            .expect("area should fit a container");
        assert_eq!(rect, ContainerRect::new(200.0, 0.0, 400.0, 500.0));
        assert_eq!(studio.fit_container(0.0, 500.0), None);
    }

    #[test]
    fn descriptor_with_negative_size_mounts_clamped() {
        let studio = studio_for(
            r#"{
                "id": "cap",
                "colorVariants": { "navy": "cap.png" },
                "defaultTransforms": {
                    "text": {
                        "position": { "x": 20.0, "y": 60.0 },
                        "size": { "width": 120.7, "height": -40 },
                        "rotation": 0.0,
                        "opacity": 1.0
                    }
                }
            }"#,
        );
        assert_eq!(studio.transform(LayerId::Text).size, Size::new(121, 20));
    }

    #[test]
    fn host_selection_is_frozen_during_gesture() {
        let mut studio = studio();
        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        assert!(!studio.set_selected_element(Some("text")));
        assert!(!studio.select(LayerId::Text));
        assert!(!studio.set_selected_element(None));
        assert!(!studio.apply_action(StudioAction::Deselect));
        assert_eq!(studio.selected(), Some(LayerId::Image));

        assert!(studio.pointer_move(CanvasPoint::new(170.0, 135.0)));
        studio.pointer_up();
        assert_eq!(studio.selected(), Some(LayerId::Image));
        assert_eq!(studio.transform(LayerId::Image).position, Position::new(40.0, 25.0));
        assert_eq!(studio.transform(LayerId::Text), LayerId::Text.default_transform());

        assert!(studio.set_selected_element(Some("text")));
        assert_eq!(studio.selected(), Some(LayerId::Text));
        assert!(studio.deselect());
        assert!(!studio.deselect());
    }

    #[test]
    fn mounted_studio_starts_in_customize() {
        let studio = studio();
        assert_eq!(studio.step(), StudioStep::Customize);
        assert_eq!(studio.wizard().history().len(), 1);
    }

    #[test]
    fn review_step_freezes_the_canvas_until_back() {
        let mut studio = studio();
        drag_image_to(&mut studio, CanvasPoint::new(160.0, 125.0));
        assert!(studio.can_undo());

        assert_eq!(
            studio
                .advance(StudioEvent::Continue)
                .expect("customize -> review should transition"),
            StudioStep::Review
        );
        let before = studio.transform(LayerId::Image);
        assert!(!studio.pointer_down(
            CanvasPoint::new(170.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        assert!(!studio.select(LayerId::Image));
        assert!(!studio.nudge_selected(1.0, 0.0));
        assert!(!studio.set_rotation(LayerId::Image, 45.0));
        assert!(!studio.undo());
        assert!(!studio.reset());
        assert_eq!(studio.transform(LayerId::Image), before);
        assert!(studio.can_undo());

        studio
            .advance(StudioEvent::Back)
            .expect("review -> customize should transition");
        assert!(studio.pointer_down(
            CanvasPoint::new(170.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        studio.pointer_up();
        assert!(studio.nudge_selected(1.0, 0.0));
        assert!(studio.undo());
    }

    #[test]
    fn leaving_customize_mid_gesture_commits_and_releases_listeners() {
        let host = Rc::new(RecordingHost::default());
        let mut studio = studio().with_listener_host(host.clone());
        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
        assert!(studio.pointer_move(CanvasPoint::new(170.0, 135.0)));
        studio
            .advance(StudioEvent::Continue)
            .expect("customize -> review should transition");

        assert!(!studio.gesture_active());
        assert_eq!(studio.selected(), None);
        assert!(studio.can_undo());
        assert_eq!(
            host.events.borrow().last(),
            Some(&("detach", LayerId::Image))
        );
    }

    #[test]
    fn invalid_step_event_is_reported_and_keeps_step() {
        let mut studio = studio();
        let err = studio
            .advance(StudioEvent::Submit)
            .expect_err("submit is only valid from review");
        assert!(matches!(
            err,
            crate::error::StudioError::State(StateError::InvalidStepTransition {
                from: StudioStep::Customize,
                event: StudioEvent::Submit,
            })
        ));
        assert_eq!(studio.step(), StudioStep::Customize);
    }

    #[test]
    fn start_over_restores_defaults_after_submit() {
        let mut studio = studio();
        drag_image_to(&mut studio, CanvasPoint::new(160.0, 125.0));
        for event in [StudioEvent::Continue, StudioEvent::Submit] {
            studio.advance(event).expect("wizard should move forward");
        }
        assert_eq!(studio.step(), StudioStep::Submitted);
        assert_eq!(
            studio
                .advance(StudioEvent::StartOver)
                .expect("submitted -> choose product should transition"),
            StudioStep::ChooseProduct
        );
        assert_eq!(
            studio.transform(LayerId::Image),
            LayerId::Image.default_transform()
        );
        assert!(!studio.can_undo());

        studio
            .advance(StudioEvent::ProductChosen)
            .expect("choose product -> customize should transition");
        assert!(studio.pointer_down(
            CanvasPoint::new(150.0, 135.0),
            PointerTarget::Body(LayerId::Image)
        ));
    }
}
