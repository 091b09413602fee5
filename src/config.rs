use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "ClinicRecords";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "clinic.db";

/// Env var overriding the database path.
pub const ENV_DB_PATH: &str = "CLINIC_DB_PATH";
/// Env var overriding the API bind address.
pub const ENV_BIND_ADDR: &str = "CLINIC_BIND_ADDR";

/// Default API bind address (localhost only).
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";

/// Upcoming-appointments window when none is given.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 30;
/// Daily-load look-back window when none is given.
pub const DEFAULT_DAILY_LOAD_WINDOW_DAYS: u32 = 10;

/// Get the application data directory
/// ~/ClinicRecords/, or ./ClinicRecords when no home directory is known
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default database file location
pub fn default_db_path() -> PathBuf {
    app_data_dir().join(DB_FILE_NAME)
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "clinic_records_lib=debug,clinic_records=debug,warn"
    } else {
        "clinic_records_lib=info,clinic_records=info,warn"
    }
}

// ═══════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════

/// Runtime settings resolved from the environment. CLI flags override these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Settings {
    /// Resolve settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`, falling back to defaults for
    /// unset or blank values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = non_blank(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let raw_addr = non_blank(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        Ok(Self { db_path, bind_addr })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address: {0}")]
    InvalidBindAddr(String),
}
