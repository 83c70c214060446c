/// Step of the customization wizard hosting the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudioStep {
    #[default]
    ChooseProduct,
    Customize,
    Review,
    Submitted,
}

impl StudioStep {
    /// Whether the canvas accepts pointer gestures in this step.
    pub const fn canvas_editable(self) -> bool {
        matches!(self, Self::Customize)
    }
}
