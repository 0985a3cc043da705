//! Adaptive Pomodoro scheduling.
//!
//! A *session* is one completed work phase. The number of sessions needed to
//! reach a goal is `ceil(target_hours * 60 / work_minutes)`, and the
//! completed-session counter advances on the Work -> Break boundary, so both
//! sides of "sessions remaining" use the same unit.
//!
//! Shaping nudges the armed durations as the day goes on: work shrinks by
//! [`WORK_STEP_MINUTES`] every [`WORK_STEP_EVERY`] sessions down to
//! [`WORK_FLOOR_MINUTES`], and breaks grow by one minute every
//! [`BREAK_STEP_EVERY`] sessions up to [`BREAK_CEILING_MINUTES`]. Shaping is
//! always derived from the configured durations, never written back into them.

use serde::{Deserialize, Serialize};

pub const WORK_FLOOR_MINUTES: u32 = 15;
pub const WORK_STEP_MINUTES: u32 = 2;
pub const WORK_STEP_EVERY: u32 = 4;
pub const BREAK_CEILING_MINUTES: u32 = 15;
pub const BREAK_STEP_MINUTES: u32 = 1;
pub const BREAK_STEP_EVERY: u32 = 6;

/// Goal-directed plan for a Pomodoro day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub target_hours: f64,
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl SessionPlan {
    pub fn new(target_hours: f64, work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            target_hours,
            work_minutes,
            break_minutes,
        }
    }

    /// Work sessions needed to reach `target_hours`.
    ///
    /// The target is resolved to whole seconds first so that values such as
    /// 1.1 hours do not pick up an extra session from float rounding.
    pub fn total_sessions(&self) -> u32 {
        if !self.target_hours.is_finite() || self.target_hours <= 0.0 {
            return 0;
        }
        let target_secs = (self.target_hours * 3600.0).round() as u64;
        let session_secs = u64::from(self.work_minutes.max(1)) * 60;
        // Any positive goal needs at least one session, even below a second.
        u32::try_from(target_secs.div_ceil(session_secs).max(1)).unwrap_or(u32::MAX)
    }

    pub fn remaining_sessions(&self, completed: u32) -> u32 {
        self.total_sessions().saturating_sub(completed)
    }

    /// Wall-clock minutes left, counting one break after every remaining session.
    pub fn remaining_minutes(&self, completed: u32) -> u64 {
        let cycle = u64::from(self.work_minutes) + u64::from(self.break_minutes);
        u64::from(self.remaining_sessions(completed)) * cycle
    }
}

/// Work duration to arm after `completed` sessions.
pub fn shaped_work_minutes(base: u32, completed: u32) -> u32 {
    let floor = base.min(WORK_FLOOR_MINUTES).max(1);
    let shrink = (completed / WORK_STEP_EVERY).saturating_mul(WORK_STEP_MINUTES);
    base.saturating_sub(shrink).max(floor)
}

/// Break duration to arm after `completed` sessions.
pub fn shaped_break_minutes(base: u32, completed: u32) -> u32 {
    let ceiling = base.max(BREAK_CEILING_MINUTES);
    let grow = (completed / BREAK_STEP_EVERY).saturating_mul(BREAK_STEP_MINUTES);
    base.saturating_add(grow).min(ceiling).max(1)
}

/// Whether the break following the `completed`-th session is a long one.
pub fn long_break_due(completed: u32, every: u32) -> bool {
    every > 0 && completed > 0 && completed % every == 0
}

/// "1h 5m remaining" / "40m remaining".
pub fn format_remaining(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m remaining")
    } else {
        format!("{mins}m remaining")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hour_of_twenty_five_minute_sessions_needs_three() {
        assert_eq!(SessionPlan::new(1.0, 25, 5).total_sessions(), 3);
    }

    #[test]
    fn exact_multiples_do_not_round_up() {
        assert_eq!(SessionPlan::new(2.0, 30, 5).total_sessions(), 4);
        assert_eq!(SessionPlan::new(1.1, 6, 5).total_sessions(), 11);
    }

    #[test]
    fn total_sessions_ignores_break_length() {
        let a = SessionPlan::new(4.0, 25, 5).total_sessions();
        let b = SessionPlan::new(4.0, 25, 15).total_sessions();
        assert_eq!(a, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn sub_second_target_still_needs_one_session() {
        assert_eq!(SessionPlan::new(0.0001, 25, 5).total_sessions(), 1);
        assert_eq!(SessionPlan::new(f64::MIN_POSITIVE, 180, 5).total_sessions(), 1);
    }

    #[test]
    fn invalid_targets_need_no_sessions() {
        assert_eq!(SessionPlan::new(0.0, 25, 5).total_sessions(), 0);
        assert_eq!(SessionPlan::new(f64::NAN, 25, 5).total_sessions(), 0);
    }

    #[test]
    fn remaining_minutes_count_work_and_break() {
        let plan = SessionPlan::new(1.0, 25, 5);
        assert_eq!(plan.remaining_minutes(0), 90);
        assert_eq!(plan.remaining_minutes(2), 30);
        assert_eq!(plan.remaining_minutes(7), 0);
    }

    #[test]
    fn work_shrinks_every_four_sessions_down_to_floor() {
        assert_eq!(shaped_work_minutes(25, 0), 25);
        assert_eq!(shaped_work_minutes(25, 3), 25);
        assert_eq!(shaped_work_minutes(25, 4), 23);
        assert_eq!(shaped_work_minutes(25, 8), 21);
        assert_eq!(shaped_work_minutes(25, 100), WORK_FLOOR_MINUTES);
    }

    #[test]
    fn short_work_sessions_are_never_stretched_to_the_floor() {
        assert_eq!(shaped_work_minutes(10, 0), 10);
        assert_eq!(shaped_work_minutes(10, 40), 10);
        assert_eq!(shaped_work_minutes(1, 40), 1);
    }

    #[test]
    fn breaks_grow_every_six_sessions_up_to_ceiling() {
        assert_eq!(shaped_break_minutes(5, 5), 5);
        assert_eq!(shaped_break_minutes(5, 6), 6);
        assert_eq!(shaped_break_minutes(5, 12), 7);
        assert_eq!(shaped_break_minutes(5, 600), BREAK_CEILING_MINUTES);
        assert_eq!(shaped_break_minutes(20, 600), 20);
    }

    #[test]
    fn long_break_every_fourth_session() {
        assert!(!long_break_due(0, 4));
        assert!(!long_break_due(3, 4));
        assert!(long_break_due(4, 4));
        assert!(long_break_due(8, 4));
        assert!(!long_break_due(4, 0));
    }

    #[test]
    fn remaining_formats() {
        assert_eq!(format_remaining(40), "40m remaining");
        assert_eq!(format_remaining(65), "1h 5m remaining");
        assert_eq!(format_remaining(0), "0m remaining");
    }
}
