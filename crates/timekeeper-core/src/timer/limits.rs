//! Input bounds applied before values reach the state machine.
//!
//! Out-of-range integers are clamped to the nearest bound. Target hours that
//! are not finite or not positive are rejected (`None` means "no change").

use std::ops::RangeInclusive;

pub const WORK_MINUTES: RangeInclusive<u32> = 1..=180;
pub const BREAK_MINUTES: RangeInclusive<u32> = 1..=60;
pub const LONG_BREAK_MINUTES: RangeInclusive<u32> = 1..=120;
/// 0 disables long breaks.
pub const SESSIONS_UNTIL_LONG_BREAK: RangeInclusive<u32> = 0..=10;
pub const MAX_TARGET_HOURS: f64 = 12.0;

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

pub fn work_minutes(value: u32) -> u32 {
    clamp_to(value, &WORK_MINUTES)
}

pub fn break_minutes(value: u32) -> u32 {
    clamp_to(value, &BREAK_MINUTES)
}

pub fn long_break_minutes(value: u32) -> u32 {
    clamp_to(value, &LONG_BREAK_MINUTES)
}

pub fn sessions_until_long_break(value: u32) -> u32 {
    clamp_to(value, &SESSIONS_UNTIL_LONG_BREAK)
}

pub fn target_hours(value: f64) -> Option<f64> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Some(value.min(MAX_TARGET_HOURS))
}
