#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    /// Unit offset in percent-space axes.
    pub const fn unit(self) -> (f64, f64) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
        }
    }
}

/// Toolbar buttons and keyboard shortcuts the host routes into the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioAction {
    Undo,
    Redo,
    Reset,
    Deselect,
    Nudge {
        direction: NudgeDirection,
        large: bool,
    },
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ToggleSnap,
    ToggleGrid,
    ToggleSafeArea,
    TogglePreviewMode,
    ToggleSelectedLock,
    ToggleSelectedVisibility,
}

impl StudioAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Reset => "Reset",
            Self::Deselect => "Deselect",
            Self::Nudge { .. } => "Nudge",
            Self::ZoomIn => "Zoom in",
            Self::ZoomOut => "Zoom out",
            Self::ResetZoom => "Actual size",
            Self::ToggleSnap => "Snap to grid",
            Self::ToggleGrid => "Grid",
            Self::ToggleSafeArea => "Safe area",
            Self::TogglePreviewMode => "Front/Back",
            Self::ToggleSelectedLock => "Lock layer",
            Self::ToggleSelectedVisibility => "Hide layer",
        }
    }
}
