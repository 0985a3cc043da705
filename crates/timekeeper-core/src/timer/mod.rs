pub mod adaptive;
mod duration;
mod engine;
pub mod limits;

pub use adaptive::SessionPlan;
pub use duration::ClockDuration;
pub use engine::{Command, Mode, Phase, TimerEngine, TimerState};
