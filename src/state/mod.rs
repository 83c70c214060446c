pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{StepTransition, StudioEvent};
pub use machine::StepMachine;
pub use model::StudioStep;
