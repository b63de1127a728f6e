//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to the
/// configured log level.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(config: &GeneralConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Starting Docent v{}", env!("CARGO_PKG_VERSION"));
    }
    installed
}
