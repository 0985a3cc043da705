//! Terminal output for `timekeeper run`: a status line redrawn every tick,
//! one line per notable event, and the terminal title.

use std::io::{self, Stdout, Write};

use chrono::Local;
use crossterm::cursor::MoveToColumn;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, SetTitle};
use crossterm::{execute, queue};
use timekeeper_core::timer::adaptive::format_remaining;
use timekeeper_core::{
    format_time, progress_percent, window_title, Event, Mode, Phase, Subscriber, TimerState,
};
use tracing::debug;

/// One-line summary of the current state.
pub fn status_line(state: &TimerState) -> String {
    let marker = if state.is_running { "▶" } else { "⏸" };
    let time = format_time(state.current_time);
    match state.mode {
        Mode::Stopwatch => format!("{marker} {time}  stopwatch"),
        Mode::Timer => format!(
            "{marker} {time}  timer  {:.0}%",
            progress_percent(state)
        ),
        Mode::Pomodoro => {
            let mut line = format!(
                "{marker} {time}  {}  {}",
                state.session_label(),
                state.session_progress()
            );
            if state.is_long_break() {
                line.push_str("  (long break)");
            }
            if state.goal_reached() {
                line.push_str("  goal reached");
            } else {
                line.push_str("  ");
                line.push_str(&format_remaining(state.remaining_minutes()));
            }
            line
        }
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Work => "work",
        Phase::Break => "break",
    }
}

/// Log line for an event, or `None` for events only the status line shows.
pub fn describe(event: &Event) -> Option<String> {
    let text = match event {
        Event::ModeChanged { from, to, .. } if from == to => return None,
        Event::ModeChanged { from, to, .. } => format!("mode {from} -> {to}"),
        Event::TimerStarted {
            mode,
            phase,
            current_secs,
            ..
        } => match mode {
            Mode::Pomodoro => format!(
                "{} started ({})",
                phase_name(*phase),
                format_time(*current_secs)
            ),
            _ => format!("{mode} started"),
        },
        Event::TimerPaused { current_secs, .. } => {
            format!("paused at {}", format_time(*current_secs))
        }
        Event::TimerReset { current_secs, .. } => {
            format!("reset to {}", format_time(*current_secs))
        }
        Event::Ticked { .. } => return None,
        Event::TimerCompleted { duration_secs, .. } => {
            format!("timer complete ({})", format_time(*duration_secs))
        }
        Event::PhaseCompleted {
            finished,
            next,
            completed_sessions,
            total_sessions,
            ..
        } => format!(
            "{} done, {} next ({completed_sessions}/{total_sessions}); type start to continue",
            phase_name(*finished),
            phase_name(*next)
        ),
        Event::GoalCompleted {
            completed_sessions,
            target_hours,
            ..
        } => format!("goal reached: {completed_sessions} sessions, {target_hours}h of focus"),
        Event::SettingsChanged { .. } => "settings updated".to_string(),
        Event::NotificationsChanged { enabled: true, .. } => "notifications on".to_string(),
        Event::NotificationsChanged { enabled: false, .. } => "notifications off".to_string(),
    };
    let at = event.at().with_timezone(&Local).format("%H:%M:%S");
    Some(format!("[{at}] {text}"))
}

/// Subscriber that keeps the terminal in sync with the timer.
pub struct Renderer {
    out: Stdout,
    title: String,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            title: String::new(),
        }
    }

    /// Print `text` above the status line.
    pub fn message(text: &str) {
        let mut out = io::stdout();
        let _ = execute!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(text),
            Print("\n")
        );
    }

    /// Redraw the status line outside of a timer update.
    pub fn prompt(state: &TimerState) {
        let mut out = io::stdout();
        let _ = execute!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(status_line(state))
        );
    }

    fn draw(&mut self, events: &[Event], state: &TimerState) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        for line in events.iter().filter_map(describe) {
            queue!(self.out, Print(line), Print("\n"))?;
        }
        queue!(self.out, Print(status_line(state)))?;

        let title = window_title(state);
        if title != self.title {
            queue!(self.out, SetTitle(&title))?;
            self.title = title;
        }
        self.out.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber for Renderer {
    fn on_update(&mut self, events: &[Event], state: &TimerState) {
        if let Err(e) = self.draw(events, state) {
            debug!("terminal write failed: {e}");
        }
    }
}
