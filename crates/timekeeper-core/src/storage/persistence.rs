use std::path::PathBuf;
use tracing::{debug, warn};

use super::Settings;
use crate::events::Event;
use crate::observer::Subscriber;
use crate::timer::TimerState;

/// Subscriber that writes the settings subset whenever it changes.
///
/// Write failures are logged and otherwise ignored; the timer keeps running
/// on its in-memory settings.
pub struct PersistenceBridge {
    path: PathBuf,
    last_saved: Option<Settings>,
}

impl PersistenceBridge {
    /// `loaded` is what is already on disk, so an unchanged state is not rewritten.
    pub fn new(path: impl Into<PathBuf>, loaded: Option<Settings>) -> Self {
        Self {
            path: path.into(),
            last_saved: loaded,
        }
    }

    fn persist(&mut self, settings: Settings) {
        if self.last_saved.as_ref() == Some(&settings) {
            return;
        }
        match settings.save_to(&self.path) {
            Ok(()) => {
                debug!("settings saved to {}", self.path.display());
                self.last_saved = Some(settings);
            }
            Err(e) => warn!("{e}"),
        }
    }
}

impl Subscriber for PersistenceBridge {
    fn on_update(&mut self, events: &[Event], state: &TimerState) {
        if events.iter().any(Event::touches_settings) {
            self.persist(state.settings());
        }
    }
}
