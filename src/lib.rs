pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod product;
pub mod state;
pub mod studio;
pub use error::{StudioError, StudioResult};

/// Entrypoint used by host integrations: parses the catalog descriptor and
/// mounts a studio with the user's config.
pub fn open_studio(product_json: &str) -> StudioResult<studio::Studio> {
    let product = product::ProductDescriptor::from_json(product_json)?;
    let config = config::load_studio_config();
    tracing::debug!(product = %product.id, ?config, "opening studio");
    studio::Studio::mount(product, config)
}
