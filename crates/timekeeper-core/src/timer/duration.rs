use serde::{Deserialize, Serialize};

pub const MAX_HOURS: u32 = 23;
pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;

/// Configured countdown length for Timer mode.
///
/// Each field is bounded independently; construct through [`ClockDuration::clamped`]
/// when the values come from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockDuration {
    #[serde(default)]
    pub hours: u32,
    #[serde(default = "default_minutes")]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

fn default_minutes() -> u32 {
    25
}

impl ClockDuration {
    pub fn clamped(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours: hours.min(MAX_HOURS),
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(MAX_SECONDS),
        }
    }

    /// Re-apply field bounds, e.g. after deserializing hand-edited settings.
    pub fn normalized(self) -> Self {
        Self::clamped(self.hours, self.minutes, self.seconds)
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

impl Default for ClockDuration {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: default_minutes(),
            seconds: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_each_field_independently() {
        let d = ClockDuration::clamped(99, 75, 60);
        assert_eq!(d, ClockDuration { hours: 23, minutes: 59, seconds: 59 });
        assert_eq!(d.total_secs(), 23 * 3600 + 59 * 60 + 59);
    }

    #[test]
    fn in_range_values_are_kept() {
        let d = ClockDuration::clamped(1, 2, 3);
        assert_eq!(d.total_secs(), 3723);
    }

    #[test]
    fn default_is_twenty_five_minutes() {
        assert_eq!(ClockDuration::default().total_secs(), 25 * 60);
    }
}
