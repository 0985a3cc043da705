use std::path::Path;

use clap::Subcommand;
use timekeeper_core::{NotificationBridge, Settings, TimerEngine};

use crate::alerts::DesktopBackend;

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Play the configured sound and show a sample notification
    Test,
}

pub fn run(action: NotifyAction, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NotifyAction::Test => {
            let engine = TimerEngine::from_settings(&Settings::load_from(path));
            let state = engine.state();
            let mut bridge = NotificationBridge::new(DesktopBackend::new());
            bridge.test(state);
            if state.notifications_enabled {
                println!("sent test notification ({} sound)", state.selected_sound);
            } else {
                println!(
                    "played {} sound; notifications are off (config set notifications.enabled true)",
                    state.selected_sound
                );
            }
        }
    }
    Ok(())
}
