//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine. It does not own a clock - the
//! caller (see [`crate::clock`]) invokes `tick()` once per second while the
//! machine is running.
//!
//! ## Pomodoro transitions
//!
//! ```text
//! Work-Paused --start--> Work-Running --tick to 0--> Break-Paused
//! Break-Paused --start--> Break-Running --tick to 0--> Work-Paused
//! ```
//!
//! A phase never rolls straight into a running successor: each phase needs an
//! explicit `start()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.set_mode(Mode::Pomodoro);
//! engine.start();
//! // Once per second:
//! let events = engine.tick();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::adaptive::{self, SessionPlan};
use super::duration::ClockDuration;
use super::limits;
use crate::events::Event;
use crate::notify::SoundOption;
use crate::storage::{NotificationsConfig, PomodoroConfig, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Timer,
    Stopwatch,
    Pomodoro,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Timer => "timer",
            Mode::Stopwatch => "stopwatch",
            Mode::Pomodoro => "pomodoro",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timer" => Ok(Mode::Timer),
            "stopwatch" => Ok(Mode::Stopwatch),
            "pomodoro" => Ok(Mode::Pomodoro),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Work,
    Break,
}

impl Phase {
    pub fn other(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

/// The single timer record.
///
/// `current_time` is remaining seconds in Timer/Pomodoro mode and elapsed
/// seconds in Stopwatch mode. `initial_time` is what `reset()` restores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: Mode,
    pub is_running: bool,
    pub current_time: u64,
    pub initial_time: u64,
    pub duration: ClockDuration,
    pub phase: Phase,
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_until_long_break: u32,
    pub adaptive: bool,
    pub completed_sessions: u32,
    pub target_hours: f64,
    pub total_sessions: u32,
    pub notifications_enabled: bool,
    pub selected_sound: SoundOption,
}

impl Default for TimerState {
    fn default() -> Self {
        let mut state = Self {
            mode: Mode::Timer,
            is_running: false,
            current_time: 0,
            initial_time: 0,
            duration: ClockDuration::default(),
            phase: Phase::Work,
            work_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
            adaptive: true,
            completed_sessions: 0,
            target_hours: 1.0,
            total_sessions: 0,
            notifications_enabled: true,
            selected_sound: SoundOption::default(),
        };
        state.total_sessions = state.plan().total_sessions();
        state
    }
}

impl TimerState {
    pub fn plan(&self) -> SessionPlan {
        SessionPlan::new(self.target_hours, self.work_minutes, self.break_minutes)
    }

    pub fn goal_reached(&self) -> bool {
        self.total_sessions > 0 && self.completed_sessions >= self.total_sessions
    }

    /// "Work Session 2" / "Break 1".
    pub fn session_label(&self) -> String {
        match self.phase {
            Phase::Work => format!("Work Session {}", self.completed_sessions + 1),
            Phase::Break => format!("Break {}", self.completed_sessions.max(1)),
        }
    }

    /// "1/3 sessions".
    pub fn session_progress(&self) -> String {
        format!("{}/{} sessions", self.completed_sessions, self.total_sessions)
    }

    pub fn remaining_minutes(&self) -> u64 {
        self.plan().remaining_minutes(self.completed_sessions)
    }

    pub fn is_long_break(&self) -> bool {
        self.mode == Mode::Pomodoro
            && self.phase == Phase::Break
            && adaptive::long_break_due(self.completed_sessions, self.sessions_until_long_break)
    }

    /// Armed length of `phase` given the sessions completed so far.
    pub fn phase_secs(&self, phase: Phase) -> u64 {
        let completed = self.completed_sessions;
        let minutes = match phase {
            Phase::Work if self.adaptive => {
                adaptive::shaped_work_minutes(self.work_minutes, completed)
            }
            Phase::Work => self.work_minutes,
            Phase::Break => {
                let base = if self.adaptive {
                    adaptive::shaped_break_minutes(self.break_minutes, completed)
                } else {
                    self.break_minutes
                };
                if adaptive::long_break_due(completed, self.sessions_until_long_break) {
                    base.max(self.long_break_minutes)
                } else {
                    base
                }
            }
        };
        u64::from(minutes) * 60
    }

    /// Project the persisted subset. Transient fields are left out.
    pub fn settings(&self) -> Settings {
        Settings {
            mode: self.mode,
            timer: self.duration,
            pomodoro: PomodoroConfig {
                work_minutes: self.work_minutes,
                break_minutes: self.break_minutes,
                long_break_minutes: self.long_break_minutes,
                sessions_until_long_break: self.sessions_until_long_break,
                target_hours: self.target_hours,
                adaptive: self.adaptive,
            },
            notifications: NotificationsConfig {
                enabled: self.notifications_enabled,
                sound: self.selected_sound,
            },
        }
    }
}

/// Inputs to the transition function.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetMode { mode: Mode },
    SetDuration { hours: u32, minutes: u32, seconds: u32 },
    Start,
    Pause,
    Reset,
    Tick,
    SetPomodoroSettings { work_minutes: u32, break_minutes: u32 },
    SetLongBreak { minutes: u32, every: u32 },
    SetAdaptive { enabled: bool },
    SetTargetHours { hours: f64 },
    SetNotifications { enabled: bool, sound: Option<SoundOption> },
}

/// Core timer state machine. Exclusive owner of [`TimerState`].
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    /// Fresh engine in Timer mode with the default duration armed.
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    /// Build an engine from persisted settings, armed for the stored mode.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut engine = Self {
            state: TimerState::default(),
        };
        engine.apply_settings(settings);
        engine
    }

    /// Merge `settings` into the record, re-arming for the stored mode.
    ///
    /// Values go through the same limits as the individual setters.
    pub fn apply_settings(&mut self, settings: &Settings) {
        let s = &mut self.state;
        s.duration = settings.timer.normalized();
        s.work_minutes = limits::work_minutes(settings.pomodoro.work_minutes);
        s.break_minutes = limits::break_minutes(settings.pomodoro.break_minutes);
        s.long_break_minutes = limits::long_break_minutes(settings.pomodoro.long_break_minutes);
        s.sessions_until_long_break =
            limits::sessions_until_long_break(settings.pomodoro.sessions_until_long_break);
        if let Some(hours) = limits::target_hours(settings.pomodoro.target_hours) {
            s.target_hours = hours;
        }
        s.adaptive = settings.pomodoro.adaptive;
        s.notifications_enabled = settings.notifications.enabled;
        s.selected_sound = settings.notifications.sound;
        self.enter_mode(settings.mode);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// The transition function: apply one command, return what happened.
    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::SetMode { mode } => self.set_mode(mode),
            Command::SetDuration {
                hours,
                minutes,
                seconds,
            } => self.set_duration(ClockDuration::clamped(hours, minutes, seconds)),
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::Tick => self.tick(),
            Command::SetPomodoroSettings {
                work_minutes,
                break_minutes,
            } => self.set_pomodoro_settings(work_minutes, break_minutes),
            Command::SetLongBreak { minutes, every } => self.set_long_break(minutes, every),
            Command::SetAdaptive { enabled } => self.set_adaptive(enabled),
            Command::SetTargetHours { hours } => self.set_target_hours(hours),
            Command::SetNotifications { enabled, sound } => self.set_notifications(enabled, sound),
        }
    }

    pub fn set_mode(&mut self, mode: Mode) -> Vec<Event> {
        let from = self.state.mode;
        self.enter_mode(mode);
        vec![Event::ModeChanged {
            from,
            to: mode,
            at: Utc::now(),
        }]
    }

    /// Store the Timer-mode duration. Only an empty countdown is armed here;
    /// otherwise the new value is picked up by the next arm.
    pub fn set_duration(&mut self, duration: ClockDuration) -> Vec<Event> {
        let s = &mut self.state;
        s.duration = duration.normalized();
        if s.mode == Mode::Timer && !s.is_running && s.current_time == 0 {
            let secs = s.duration.total_secs();
            self.arm(secs);
        }
        settings_changed()
    }

    pub fn start(&mut self) -> Vec<Event> {
        if self.state.is_running {
            return Vec::new();
        }
        if self.state.current_time == 0 {
            match self.state.mode {
                Mode::Timer => self.arm(self.state.duration.total_secs()),
                Mode::Pomodoro => self.arm(self.state.phase_secs(self.state.phase)),
                Mode::Stopwatch => {}
            }
            if self.state.mode != Mode::Stopwatch && self.state.current_time == 0 {
                debug!("start ignored: nothing to count down");
                return Vec::new();
            }
        }
        self.state.is_running = true;
        vec![Event::TimerStarted {
            mode: self.state.mode,
            phase: self.state.phase,
            current_secs: self.state.current_time,
            at: Utc::now(),
        }]
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if !self.state.is_running {
            return Vec::new();
        }
        self.state.is_running = false;
        vec![Event::TimerPaused {
            current_secs: self.state.current_time,
            at: Utc::now(),
        }]
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let s = &mut self.state;
        s.is_running = false;
        s.current_time = match s.mode {
            Mode::Stopwatch => 0,
            Mode::Timer | Mode::Pomodoro => s.initial_time,
        };
        vec![Event::TimerReset {
            current_secs: s.current_time,
            at: Utc::now(),
        }]
    }

    /// Advance one second. No-op while stopped.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.state.is_running {
            return Vec::new();
        }
        let now = Utc::now();
        if self.state.mode == Mode::Stopwatch {
            self.state.current_time = self.state.current_time.saturating_add(1);
            return vec![Event::Ticked {
                current_secs: self.state.current_time,
                at: now,
            }];
        }

        self.state.current_time = self.state.current_time.saturating_sub(1);
        let mut events = vec![Event::Ticked {
            current_secs: self.state.current_time,
            at: now,
        }];
        if self.state.current_time > 0 {
            return events;
        }

        match self.state.mode {
            Mode::Timer => {
                self.state.is_running = false;
                events.push(Event::TimerCompleted {
                    duration_secs: self.state.initial_time,
                    at: now,
                });
            }
            Mode::Pomodoro => events.extend(self.complete_phase()),
            Mode::Stopwatch => {}
        }
        events
    }

    pub fn set_pomodoro_settings(&mut self, work_minutes: u32, break_minutes: u32) -> Vec<Event> {
        self.state.work_minutes = limits::work_minutes(work_minutes);
        self.state.break_minutes = limits::break_minutes(break_minutes);
        self.recompute_total_sessions();
        self.rearm_if_untouched();
        settings_changed()
    }

    pub fn set_long_break(&mut self, minutes: u32, every: u32) -> Vec<Event> {
        self.state.long_break_minutes = limits::long_break_minutes(minutes);
        self.state.sessions_until_long_break = limits::sessions_until_long_break(every);
        self.rearm_if_untouched();
        settings_changed()
    }

    pub fn set_adaptive(&mut self, enabled: bool) -> Vec<Event> {
        self.state.adaptive = enabled;
        self.rearm_if_untouched();
        settings_changed()
    }

    /// Invalid targets (non-finite, zero or negative) leave the state unchanged.
    pub fn set_target_hours(&mut self, hours: f64) -> Vec<Event> {
        let Some(hours) = limits::target_hours(hours) else {
            debug!(hours, "ignoring invalid target hours");
            return Vec::new();
        };
        self.state.target_hours = hours;
        self.recompute_total_sessions();
        settings_changed()
    }

    pub fn set_notifications(&mut self, enabled: bool, sound: Option<SoundOption>) -> Vec<Event> {
        self.state.notifications_enabled = enabled;
        if let Some(sound) = sound {
            self.state.selected_sound = sound;
        }
        vec![Event::NotificationsChanged {
            enabled,
            at: Utc::now(),
        }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_mode(&mut self, mode: Mode) {
        self.state.is_running = false;
        self.state.mode = mode;
        match mode {
            Mode::Timer => self.arm(self.state.duration.total_secs()),
            Mode::Stopwatch => self.arm(0),
            Mode::Pomodoro => {
                self.state.phase = Phase::Work;
                self.state.completed_sessions = 0;
                self.recompute_total_sessions();
                self.arm(self.state.phase_secs(Phase::Work));
            }
        }
    }

    fn arm(&mut self, secs: u64) {
        self.state.current_time = secs;
        self.state.initial_time = secs;
    }

    fn recompute_total_sessions(&mut self) {
        self.state.total_sessions = self.state.plan().total_sessions();
    }

    /// Re-arm the current Pomodoro phase if none of it has elapsed yet.
    fn rearm_if_untouched(&mut self) {
        let s = &self.state;
        if s.mode == Mode::Pomodoro && !s.is_running && s.current_time == s.initial_time {
            let secs = s.phase_secs(s.phase);
            self.arm(secs);
        }
    }

    /// Flip phase, update counters, arm the next phase and stop, in one step.
    fn complete_phase(&mut self) -> Vec<Event> {
        let finished = self.state.phase;
        if finished == Phase::Work {
            self.state.completed_sessions = self.state.completed_sessions.saturating_add(1);
        }
        let next = finished.other();
        self.state.phase = next;
        self.arm(self.state.phase_secs(next));
        self.state.is_running = false;

        let goal_reached = finished == Phase::Work && self.state.goal_reached();
        let now = Utc::now();
        let mut events = vec![Event::PhaseCompleted {
            finished,
            next,
            completed_sessions: self.state.completed_sessions,
            total_sessions: self.state.total_sessions,
            goal_reached,
            at: now,
        }];
        if goal_reached {
            events.push(Event::GoalCompleted {
                completed_sessions: self.state.completed_sessions,
                target_hours: self.state.target_hours,
                at: now,
            });
        }
        events
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn settings_changed() -> Vec<Event> {
    vec![Event::SettingsChanged { at: Utc::now() }]
}
