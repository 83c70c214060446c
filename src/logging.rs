use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "studio_canvas=info";

/// Installs the fmt subscriber, honoring `RUST_LOG`. Safe to call repeatedly;
/// only the first call installs anything.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
