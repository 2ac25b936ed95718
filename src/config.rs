use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Dosetrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Classifier fallbacks when a medication carries no configured thresholds.
pub const DEFAULT_GRACE_MINUTES: i64 = 60;
pub const DEFAULT_CUTOFF_MINUTES: i64 = 180;
pub const DEFAULT_REMINDER_MINUTES: i64 = 30;

/// Default snooze deferral when the caller does not specify one.
pub const DEFAULT_SNOOZE_MINUTES: i64 = 10;

/// Default bind address for the HTTP API. Override with `DOSETRACK_ADDR`.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "dosetrack=info,tower=warn"
}

/// Get the application data directory
/// ~/Dosetrack/ on all platforms (user-visible, holds the database)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Dosetrack")
}

/// Path of the SQLite database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("dosetrack.db")
}
