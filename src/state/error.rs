use super::event::StudioEvent;
use super::model::StudioStep;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid studio step transition: from {from:?} using event {event:?}")]
    InvalidStepTransition { from: StudioStep, event: StudioEvent },
}
