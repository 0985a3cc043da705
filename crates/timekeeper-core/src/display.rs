//! Presentation helpers consumed by front ends.

use crate::timer::{Mode, Phase, TimerState};

pub const APP_NAME: &str = "TimeKeeper";

/// `MM:SS`, or `HH:MM:SS` once an hour or more is shown.
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Elapsed share of the armed countdown, 0.0 ..= 100.0.
///
/// Always 0 when nothing is armed, which includes Stopwatch mode.
pub fn progress_percent(state: &TimerState) -> f64 {
    if state.initial_time == 0 {
        return 0.0;
    }
    let initial = state.initial_time as f64;
    let elapsed = initial - state.current_time as f64;
    (elapsed / initial * 100.0).clamp(0.0, 100.0)
}

fn mode_label(state: &TimerState) -> String {
    match (state.mode, state.phase) {
        (Mode::Pomodoro, Phase::Work) => "work session".to_string(),
        (Mode::Pomodoro, Phase::Break) => "break session".to_string(),
        (mode, _) => mode.to_string(),
    }
}

/// Window/terminal title for the current state.
pub fn window_title(state: &TimerState) -> String {
    let time = format_time(state.current_time);
    let label = mode_label(state);
    if state.is_running {
        format!("{time} - {label} | {APP_NAME}")
    } else if state.current_time > 0 || state.mode == Mode::Stopwatch {
        format!("⏸ {time} - {label} | {APP_NAME}")
    } else {
        APP_NAME.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_short_and_long() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(3599), "59:59");
        assert_eq!(format_time(3600), "01:00:00");
        assert_eq!(format_time(3661), "01:01:01");
    }

    #[test]
    fn progress_is_zero_without_an_armed_countdown() {
        let state = TimerState {
            mode: Mode::Stopwatch,
            current_time: 120,
            initial_time: 0,
            ..TimerState::default()
        };
        assert_eq!(progress_percent(&state), 0.0);
    }

    #[test]
    fn progress_tracks_elapsed_share() {
        let state = TimerState {
            current_time: 75,
            initial_time: 100,
            ..TimerState::default()
        };
        assert_eq!(progress_percent(&state), 25.0);

        let overshoot = TimerState {
            current_time: 150,
            initial_time: 100,
            ..TimerState::default()
        };
        assert_eq!(progress_percent(&overshoot), 0.0);
    }

    #[test]
    fn title_reflects_run_state() {
        let mut state = TimerState {
            mode: Mode::Pomodoro,
            current_time: 1500,
            initial_time: 1500,
            is_running: true,
            ..TimerState::default()
        };
        assert_eq!(window_title(&state), "25:00 - work session | TimeKeeper");

        state.is_running = false;
        assert_eq!(window_title(&state), "⏸ 25:00 - work session | TimeKeeper");

        state.mode = Mode::Timer;
        state.current_time = 0;
        assert_eq!(window_title(&state), "TimeKeeper");

        state.mode = Mode::Stopwatch;
        assert_eq!(window_title(&state), "⏸ 00:00 - stopwatch | TimeKeeper");
    }
}
