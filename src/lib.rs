pub mod api;
pub mod commands;
pub mod config;
pub mod core_state;
pub mod db;
pub mod engine;
pub mod models;
pub mod seed;
pub mod view_cache;

use tracing_subscriber::EnvFilter;

/// Initialise tracing. `RUST_LOG` overrides the default filter.
/// Logs go to stderr so JSON printed on stdout stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
