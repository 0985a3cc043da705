//! Notification bridge.
//!
//! Turns completion events into a sound plus, when enabled and permitted, a
//! visible system notification. The actual audio/notification plumbing sits
//! behind [`AlertBackend`] so front ends can plug in their own.

mod sound;

pub use sound::{SoundOption, SoundProfile};

use tracing::{debug, warn};

use crate::error::NotifyError;
use crate::events::Event;
use crate::observer::Subscriber;
use crate::timer::{Phase, TimerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    TimerComplete,
    PhaseComplete(Phase),
    GoalComplete,
}

/// A ready-to-deliver notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub alert: Alert,
    pub title: String,
    pub body: String,
    pub sound: SoundOption,
}

impl Notice {
    pub fn new(alert: Alert, detail: Option<String>, sound: SoundOption) -> Self {
        let (title, default_body) = match alert {
            Alert::TimerComplete => ("Timer Complete!", "Your timer has finished!"),
            Alert::PhaseComplete(Phase::Work) => (
                "Work Session Complete!",
                "Time for a break. Great job on your focused work!",
            ),
            Alert::PhaseComplete(Phase::Break) => (
                "Break Time Over!",
                "Ready to get back to work? Your next session is waiting.",
            ),
            Alert::GoalComplete => (
                "All Sessions Complete!",
                "Congratulations! You've completed your productivity goal.",
            ),
        };
        Self {
            alert,
            title: title.to_string(),
            body: detail.unwrap_or_else(|| default_body.to_string()),
            sound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Not asked yet.
    Default,
    Granted,
    Denied,
    Unsupported,
}

pub trait AlertBackend: Send {
    fn play_sound(&mut self, sound: SoundOption) -> Result<(), NotifyError>;

    fn permission(&self) -> Permission;

    /// Ask for permission to show notifications. Must not block for long.
    fn request_permission(&mut self) -> Permission;

    fn show(&mut self, notice: &Notice) -> Result<(), NotifyError>;
}

/// Subscriber that delivers alerts for completion events.
pub struct NotificationBridge<B> {
    backend: B,
}

impl<B: AlertBackend> NotificationBridge<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Sound first, then the visible notification if enabled and granted.
    pub fn deliver(&mut self, notice: &Notice, notifications_enabled: bool) {
        if let Err(e) = self.backend.play_sound(notice.sound) {
            warn!("failed to play {} sound: {e}", notice.sound);
        }
        if !notifications_enabled {
            return;
        }
        match self.backend.permission() {
            Permission::Granted => {
                if let Err(e) = self.backend.show(notice) {
                    warn!("failed to show notification: {e}");
                }
            }
            other => debug!(?other, "skipping visible notification"),
        }
    }

    /// Fire a sample notification with the current preferences.
    pub fn test(&mut self, state: &TimerState) {
        let notice = Notice::new(
            Alert::TimerComplete,
            Some("This is a test notification".to_string()),
            state.selected_sound,
        );
        self.deliver(&notice, state.notifications_enabled);
    }

    fn notice_for(event: &Event, sound: SoundOption) -> Option<Notice> {
        match event {
            Event::TimerCompleted { .. } => Some(Notice::new(Alert::TimerComplete, None, sound)),
            Event::PhaseCompleted {
                finished,
                goal_reached: false,
                ..
            } => Some(Notice::new(Alert::PhaseComplete(*finished), None, sound)),
            Event::GoalCompleted { target_hours, .. } => Some(Notice::new(
                Alert::GoalComplete,
                Some(format!(
                    "You completed {target_hours} hours of focused work!"
                )),
                sound,
            )),
            _ => None,
        }
    }
}

impl<B: AlertBackend> Subscriber for NotificationBridge<B> {
    fn on_update(&mut self, events: &[Event], state: &TimerState) {
        for event in events {
            if let Event::NotificationsChanged { enabled, .. } = event {
                if *enabled && self.backend.permission() == Permission::Default {
                    let granted = self.backend.request_permission();
                    debug!(?granted, "notification permission requested");
                }
                continue;
            }
            if let Some(notice) = Self::notice_for(event, state.selected_sound) {
                self.deliver(&notice, state.notifications_enabled);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[derive(Default)]
    struct RecordingBackend {
        permission: Option<Permission>,
        requests: usize,
        sounds: Vec<SoundOption>,
        shown: Vec<Notice>,
    }

    impl AlertBackend for RecordingBackend {
        fn play_sound(&mut self, sound: SoundOption) -> Result<(), NotifyError> {
            self.sounds.push(sound);
            Ok(())
        }

        fn permission(&self) -> Permission {
            self.permission.unwrap_or(Permission::Default)
        }

        fn request_permission(&mut self) -> Permission {
            self.requests += 1;
            self.permission = Some(Permission::Granted);
            Permission::Granted
        }

        fn show(&mut self, notice: &Notice) -> Result<(), NotifyError> {
            self.shown.push(notice.clone());
            Ok(())
        }
    }

    fn granted() -> RecordingBackend {
        RecordingBackend {
            permission: Some(Permission::Granted),
            ..RecordingBackend::default()
        }
    }

    fn work_completed(goal_reached: bool) -> Event {
        Event::PhaseCompleted {
            finished: Phase::Work,
            next: Phase::Break,
            completed_sessions: 1,
            total_sessions: 3,
            goal_reached,
            at: Utc::now(),
        }
    }

    #[test]
    fn phase_completion_plays_sound_and_shows_notice() {
        let mut bridge = NotificationBridge::new(granted());
        let state = TimerState::default();
        bridge.on_update(&[work_completed(false)], &state);

        let backend = bridge.backend();
        assert_eq!(backend.sounds, vec![SoundOption::Chime]);
        assert_eq!(backend.shown.len(), 1);
        assert_eq!(backend.shown[0].title, "Work Session Complete!");
    }

    #[test]
    fn goal_replaces_the_phase_notice() {
        let mut bridge = NotificationBridge::new(granted());
        let state = TimerState::default();
        let events = [
            work_completed(true),
            Event::GoalCompleted {
                completed_sessions: 3,
                target_hours: 1.5,
                at: Utc::now(),
            },
        ];
        bridge.on_update(&events, &state);

        let backend = bridge.backend();
        assert_eq!(backend.sounds.len(), 1);
        assert_eq!(backend.shown[0].alert, Alert::GoalComplete);
        assert_eq!(
            backend.shown[0].body,
            "You completed 1.5 hours of focused work!"
        );
    }

    #[test]
    fn denied_permission_still_plays_sound() {
        let backend = RecordingBackend {
            permission: Some(Permission::Denied),
            ..RecordingBackend::default()
        };
        let mut bridge = NotificationBridge::new(backend);
        let event = Event::TimerCompleted {
            duration_secs: 60,
            at: Utc::now(),
        };
        bridge.on_update(&[event], &TimerState::default());

        assert_eq!(bridge.backend().sounds.len(), 1);
        assert!(bridge.backend().shown.is_empty());
    }

    #[test]
    fn disabled_notifications_skip_visible_notice() {
        let mut bridge = NotificationBridge::new(granted());
        let state = TimerState {
            notifications_enabled: false,
            selected_sound: SoundOption::Bell,
            ..TimerState::default()
        };
        bridge.on_update(&[work_completed(false)], &state);

        assert_eq!(bridge.backend().sounds, vec![SoundOption::Bell]);
        assert!(bridge.backend().shown.is_empty());
    }

    fn notifications_changed(enabled: bool) -> Event {
        Event::NotificationsChanged {
            enabled,
            at: Utc::now(),
        }
    }

    #[test]
    fn enabling_notifications_requests_permission_once() {
        let mut bridge = NotificationBridge::new(RecordingBackend::default());
        let state = TimerState::default();
        bridge.on_update(&[notifications_changed(true)], &state);
        bridge.on_update(&[notifications_changed(true)], &state);
        assert_eq!(bridge.backend().requests, 1);
    }

    #[test]
    fn unrelated_settings_edits_do_not_request_permission() {
        let mut bridge = NotificationBridge::new(RecordingBackend::default());
        let state = TimerState::default();
        assert!(state.notifications_enabled);
        bridge.on_update(&[Event::SettingsChanged { at: Utc::now() }], &state);
        bridge.on_update(&[notifications_changed(false)], &state);
        assert_eq!(bridge.backend().requests, 0);
        assert_eq!(bridge.backend().permission(), Permission::Default);
    }

    #[test]
    fn target_edit_through_the_engine_leaves_permission_alone() {
        let mut bridge = NotificationBridge::new(RecordingBackend::default());
        let mut engine = crate::timer::TimerEngine::new();

        let events = engine.set_target_hours(2.0);
        bridge.on_update(&events, engine.state());
        assert_eq!(bridge.backend().requests, 0);

        let events = engine.set_notifications(true, None);
        bridge.on_update(&events, engine.state());
        assert_eq!(bridge.backend().requests, 1);
    }

    #[test]
    fn test_notice_uses_selected_sound() {
        let mut bridge = NotificationBridge::new(granted());
        let state = TimerState {
            selected_sound: SoundOption::Gentle,
            ..TimerState::default()
        };
        bridge.test(&state);
        assert_eq!(bridge.backend().sounds, vec![SoundOption::Gentle]);
        assert_eq!(bridge.backend().shown[0].body, "This is a test notification");
    }
}
