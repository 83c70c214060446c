use super::model::StudioStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudioEvent {
    ProductChosen,
    Continue,
    Back,
    Submit,
    StartOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTransition {
    pub from: Option<StudioStep>,
    pub event: StudioEvent,
    pub to: StudioStep,
}

impl StepTransition {
    pub const fn new(from: Option<StudioStep>, event: StudioEvent, to: StudioStep) -> Self {
        Self { from, event, to }
    }
}
