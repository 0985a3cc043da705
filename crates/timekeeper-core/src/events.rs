use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Mode, Phase};

/// Every state change in the timer produces one or more Events.
/// Subscribers (title, notifications, persistence, rendering) react to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ModeChanged {
        from: Mode,
        to: Mode,
        at: DateTime<Utc>,
    },
    TimerStarted {
        mode: Mode,
        phase: Phase,
        current_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        current_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        current_secs: u64,
        at: DateTime<Utc>,
    },
    Ticked {
        current_secs: u64,
        at: DateTime<Utc>,
    },
    /// Timer mode countdown reached zero.
    TimerCompleted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A Pomodoro phase ran out and the next one has been armed (not started).
    PhaseCompleted {
        finished: Phase,
        next: Phase,
        completed_sessions: u32,
        total_sessions: u32,
        /// Set when this completion is also announced by `GoalCompleted`.
        goal_reached: bool,
        at: DateTime<Utc>,
    },
    GoalCompleted {
        completed_sessions: u32,
        target_hours: f64,
        at: DateTime<Utc>,
    },
    /// A persisted setting changed.
    SettingsChanged {
        at: DateTime<Utc>,
    },
    /// Notification preferences changed. Persisted like `SettingsChanged`.
    NotificationsChanged {
        enabled: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::ModeChanged { at, .. }
            | Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::Ticked { at, .. }
            | Event::TimerCompleted { at, .. }
            | Event::PhaseCompleted { at, .. }
            | Event::GoalCompleted { at, .. }
            | Event::SettingsChanged { at }
            | Event::NotificationsChanged { at, .. } => *at,
        }
    }

    /// Whether this event changes what must be written to durable storage.
    pub fn touches_settings(&self) -> bool {
        matches!(
            self,
            Event::SettingsChanged { .. }
                | Event::NotificationsChanged { .. }
                | Event::ModeChanged { .. }
        )
    }
}
