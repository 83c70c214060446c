use crate::config::ConfigError;
use crate::product::ProductError;
use crate::state::StateError;
use thiserror::Error;

pub type StudioResult<T> = std::result::Result<T, StudioError>;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
