use super::error::{StateError, StateResult};
use super::{event::StepTransition, StudioEvent, StudioStep};

#[derive(Debug)]
pub struct StepMachine {
    step: StudioStep,
    transition_history: Vec<StepTransition>,
}

impl StepMachine {
    pub fn new() -> Self {
        Self {
            step: StudioStep::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn step(&self) -> StudioStep {
        self.step
    }

    pub fn can_transition(&self, event: StudioEvent) -> bool {
        self.next_step(event).is_some()
    }

    pub fn next_step(&self, event: StudioEvent) -> Option<StudioStep> {
        use StudioEvent::*;
        match (self.step, event) {
            (StudioStep::ChooseProduct, ProductChosen) => Some(StudioStep::Customize),
            (StudioStep::Customize, ProductChosen) => Some(StudioStep::Customize),
            (StudioStep::Customize, Continue) => Some(StudioStep::Review),
            (StudioStep::Customize, Back) => Some(StudioStep::ChooseProduct),
            (StudioStep::Review, Back) => Some(StudioStep::Customize),
            (StudioStep::Review, Submit) => Some(StudioStep::Submitted),
            (StudioStep::Submitted, StartOver) => Some(StudioStep::ChooseProduct),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: StudioEvent) -> StateResult<StudioStep> {
        tracing::debug!(from = ?self.step, event = ?event, "request step transition");
        let next = self.next_step(event).ok_or_else(|| {
            let from = self.step;
            tracing::warn!(from = ?from, event = ?event, "invalid step transition requested");
            StateError::InvalidStepTransition { from, event }
        })?;

        let record = StepTransition::new(Some(self.step), event, next);
        self.step = next;
        self.transition_history.push(record);

        Ok(self.step)
    }

    pub fn history(&self) -> &[StepTransition] {
        &self.transition_history
    }
}

impl Default for StepMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StepMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StudioStep::{:?}", self.step)
    }
}
