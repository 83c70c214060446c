use serde::{Deserialize, Serialize};

use crate::geometry::{CanvasPoint, Color, SnapMode, DEFAULT_GRID_STEP, MIN_GRID_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    #[default]
    Front,
    Back,
}

impl PreviewMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

pub const ZOOM_MIN: f64 = 0.6;
pub const ZOOM_MAX: f64 = 1.8;
const ZOOM_LEVELS: &[f64] = &[0.6, 0.75, 0.9, 1.0, 1.1, 1.25, 1.5, 1.8];
const DEFAULT_BACKDROP: Color = Color::new(244, 244, 245);

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        1.0
    } else {
        zoom.clamp(ZOOM_MIN, ZOOM_MAX)
    }
}

fn next_zoom_in_level(current: f64) -> f64 {
    ZOOM_LEVELS
        .iter()
        .copied()
        .find(|level| *level > current + f64::EPSILON)
        .unwrap_or(ZOOM_MAX)
}

fn next_zoom_out_level(current: f64) -> f64 {
    ZOOM_LEVELS
        .iter()
        .rev()
        .copied()
        .find(|level| *level < current - f64::EPSILON)
        .unwrap_or(ZOOM_MIN)
}

/// Viewport-only state. None of it is undoable and none of it changes stored
/// layer geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    zoom: f64,
    snap_enabled: bool,
    grid_step: f64,
    show_grid: bool,
    show_safe_area: bool,
    backdrop_color: Color,
    preview_mode: PreviewMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            snap_enabled: true,
            grid_step: DEFAULT_GRID_STEP,
            show_grid: false,
            show_safe_area: true,
            backdrop_color: DEFAULT_BACKDROP,
            preview_mode: PreviewMode::Front,
        }
    }
}

impl ViewState {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = next_zoom_in_level(clamp_zoom(self.zoom));
    }

    pub fn zoom_out(&mut self) {
        self.zoom = next_zoom_out_level(clamp_zoom(self.zoom));
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.snap_enabled = !self.snap_enabled;
        self.snap_enabled
    }

    pub fn grid_step(&self) -> f64 {
        self.grid_step
    }

    pub fn set_grid_step(&mut self, step: f64) {
        if step.is_finite() && step > 0.0 {
            self.grid_step = step.max(MIN_GRID_STEP);
        }
    }

    /// Snap behavior handed explicitly to the geometry functions.
    pub fn snap_mode(&self) -> SnapMode {
        if self.snap_enabled {
            SnapMode::Grid(self.grid_step)
        } else {
            SnapMode::Free
        }
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    pub fn show_safe_area(&self) -> bool {
        self.show_safe_area
    }

    pub fn set_show_safe_area(&mut self, show: bool) {
        self.show_safe_area = show;
    }

    pub fn toggle_safe_area(&mut self) -> bool {
        self.show_safe_area = !self.show_safe_area;
        self.show_safe_area
    }

    pub fn backdrop_color(&self) -> Color {
        self.backdrop_color
    }

    pub fn set_backdrop_color(&mut self, color: Color) {
        self.backdrop_color = color;
    }

    pub fn preview_mode(&self) -> PreviewMode {
        self.preview_mode
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        self.preview_mode = mode;
    }

    pub fn toggle_preview_mode(&mut self) -> PreviewMode {
        self.preview_mode = self.preview_mode.toggled();
        self.preview_mode
    }

    /// Maps a point in the zoomed preview back to untransformed container
    /// space. The zoom is applied as an outer scale around `origin`.
    pub fn unzoom_point(&self, point: CanvasPoint, origin: CanvasPoint) -> CanvasPoint {
        CanvasPoint::new(
            origin.x + (point.x - origin.x) / self.zoom,
            origin.y + (point.y - origin.y) / self.zoom,
        )
    }

    pub fn zoom_point(&self, point: CanvasPoint, origin: CanvasPoint) -> CanvasPoint {
        CanvasPoint::new(
            origin.x + (point.x - origin.x) * self.zoom,
            origin.y + (point.y - origin.y) * self.zoom,
        )
    }
}
