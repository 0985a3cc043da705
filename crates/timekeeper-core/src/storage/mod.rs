mod config;
mod persistence;

pub use config::{NotificationsConfig, PomodoroConfig, Settings, CONFIG_FILE};
pub use persistence::PersistenceBridge;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/timekeeper[-dev]/` based on TIMEKEEPER_ENV.
///
/// Set TIMEKEEPER_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMEKEEPER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timekeeper-dev")
    } else {
        base_dir.join("timekeeper")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
