//! # TimeKeeper Core Library
//!
//! This library provides the core logic for the TimeKeeper timer: a plain
//! countdown timer, a stopwatch, and an adaptive Pomodoro mode that works
//! toward a target number of focused hours. Front ends (the CLI in this
//! workspace) are thin layers over the same core.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine; every operation is a
//!   transition that returns the [`Event`]s it produced
//! - **Adaptive Scheduler**: session counting and duration shaping toward a
//!   work-hour goal
//! - **Clock Driver**: a tokio task that owns the engine and ticks it once per
//!   second while running
//! - **Bridges**: [`Subscriber`]s for settings persistence and notifications
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerService`]: Single-writer clock driver
//! - [`Settings`]: Persisted configuration
//! - [`NotificationBridge`]: Completion alerts

pub mod clock;
pub mod display;
pub mod error;
pub mod events;
pub mod notify;
pub mod observer;
pub mod storage;
pub mod timer;

pub use clock::{TimerHandle, TimerService};
pub use display::{format_time, progress_percent, window_title};
pub use error::{ConfigError, CoreError, NotifyError};
pub use events::Event;
pub use notify::{Alert, AlertBackend, Notice, NotificationBridge, Permission, SoundOption};
pub use observer::{Subscriber, Subscribers};
pub use storage::{PersistenceBridge, Settings};
pub use timer::{ClockDuration, Command, Mode, Phase, SessionPlan, TimerEngine, TimerState};
