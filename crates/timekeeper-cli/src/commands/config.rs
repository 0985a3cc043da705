use std::path::Path;

use clap::Subcommand;
use timekeeper_core::Settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "mode", "pomodoro.work_minutes")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Reset config to defaults
    Reset,
    /// Print the settings file location
    Path,
}

pub fn run(action: ConfigAction, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let settings = Settings::load_from(path);
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load_from(path);
            settings.set(&key, &value)?;
            settings.save_to(path)?;
            // Values may have been clamped on the way in.
            if let Some(stored) = settings.get(&key) {
                println!("{key} = {stored}");
            }
        }
        ConfigAction::List { json } => {
            let settings = Settings::load_from(path);
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print!("{}", toml::to_string_pretty(&settings)?);
            }
        }
        ConfigAction::Reset => {
            Settings::default().save_to(path)?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_persists_and_reset_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        run(
            ConfigAction::Set {
                key: "pomodoro.work_minutes".to_string(),
                value: "50".to_string(),
            },
            &path,
        )
        .unwrap();
        assert_eq!(Settings::load_from(&path).pomodoro.work_minutes, 50);

        run(ConfigAction::Reset, &path).unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let err = run(
            ConfigAction::Get {
                key: "pomodoro.nope".to_string(),
            },
            &path,
        )
        .unwrap_err();
        assert!(err.to_string().contains("pomodoro.nope"));
        assert!(!path.exists());
    }

    #[test]
    fn invalid_target_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let result = run(
            ConfigAction::Set {
                key: "pomodoro.target_hours".to_string(),
                value: "-1".to_string(),
            },
            &path,
        );
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
