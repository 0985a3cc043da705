//! TOML-based settings.
//!
//! Stores the user-facing configuration only:
//! - Active mode
//! - Timer duration
//! - Pomodoro durations, goal and adaptive shaping
//! - Notification preferences
//!
//! Run state (running flag, remaining time, completed sessions) is never
//! persisted. Settings are stored at `~/.config/timekeeper/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::ConfigError;
use crate::notify::SoundOption;
use crate::timer::{limits, ClockDuration, Mode};

pub const CONFIG_FILE: &str = "config.toml";

/// Pomodoro configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// 0 disables long breaks.
    #[serde(default = "default_sessions_until_long_break")]
    pub sessions_until_long_break: u32,
    #[serde(default = "default_target_hours")]
    pub target_hours: f64,
    #[serde(default = "default_true")]
    pub adaptive: bool,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub sound: SoundOption,
}

/// Persisted settings.
///
/// Serialized to/from TOML at `~/.config/timekeeper/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub timer: ClockDuration,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_work_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_until_long_break() -> u32 {
    4
}
fn default_target_hours() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            sessions_until_long_break: default_sessions_until_long_break(),
            target_hours: default_target_hours(),
            adaptive: true,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: SoundOption::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Timer,
            timer: ClockDuration::default(),
            pomodoro: PomodoroConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .trim()
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let value = value.trim();
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf key".to_string()));
                    }
                    _ => serde_json::Value::String(value.trim().to_string()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location: `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from `path`, falling back to defaults when the file is missing,
    /// unreadable or malformed.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("cannot read settings at {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        match Self::parse(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring malformed settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse TOML and bring every field back within its limits.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings.normalized())
    }

    /// Persist to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a value as string by dot-separated key, e.g. `pomodoro.work_minutes`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. Numeric values are clamped to the
    /// same limits the timer applies; an unusable target is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Settings = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        if limits::target_hours(updated.pomodoro.target_hours).is_none() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "target hours must be a positive number".to_string(),
            });
        }
        *self = updated.normalized();
        Ok(())
    }

    pub fn normalized(mut self) -> Self {
        self.timer = self.timer.normalized();
        let p = &mut self.pomodoro;
        p.work_minutes = limits::work_minutes(p.work_minutes);
        p.break_minutes = limits::break_minutes(p.break_minutes);
        p.long_break_minutes = limits::long_break_minutes(p.long_break_minutes);
        p.sessions_until_long_break = limits::sessions_until_long_break(p.sessions_until_long_break);
        p.target_hours = limits::target_hours(p.target_hours).unwrap_or_else(default_target_hours);
        self
    }
}
