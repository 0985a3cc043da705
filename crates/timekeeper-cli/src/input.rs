//! Line commands accepted on stdin during `timekeeper run`.

use timekeeper_core::{ClockDuration, Command, Mode, SoundOption};

pub const HELP: &str = "\
commands:
  start | pause | toggle | reset
  mode <timer|stopwatch|pomodoro>
  duration <hours> <minutes> <seconds>
  pomodoro <work minutes> <break minutes>
  long <minutes> <every n sessions>
  adaptive on|off
  target <hours>
  notify on|off [chime|bell|gentle]
  status [--json]
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Forwarded to the timer as-is.
    Command(Command),
    /// Start when stopped, pause when running.
    Toggle,
    /// New Timer-mode duration; re-arms an idle timer.
    Duration(ClockDuration),
    Status { json: bool },
    Help,
    Quit,
}

fn number<T: std::str::FromStr>(word: Option<&str>, what: &str) -> Result<T, String> {
    let word = word.ok_or_else(|| format!("missing {what}"))?;
    word.parse()
        .map_err(|_| format!("{what} must be a number, got '{word}'"))
}

fn switch(word: Option<&str>) -> Result<bool, String> {
    match word {
        Some("on") | Some("true") => Ok(true),
        Some("off") | Some("false") => Ok(false),
        Some(other) => Err(format!("expected on or off, got '{other}'")),
        None => Err("expected on or off".to_string()),
    }
}

fn no_more<'a>(mut words: impl Iterator<Item = &'a str>) -> Result<(), String> {
    match words.next() {
        Some(extra) => Err(format!("unexpected argument '{extra}'")),
        None => Ok(()),
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// Errors are user-facing messages; nothing is sent to the timer for them.
pub fn parse(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let input = match verb.to_ascii_lowercase().as_str() {
        "start" | "s" => Input::Command(Command::Start),
        "pause" | "p" => Input::Command(Command::Pause),
        "toggle" | "t" => Input::Toggle,
        "reset" | "r" => Input::Command(Command::Reset),
        "mode" | "m" => {
            let mode: Mode = words
                .next()
                .ok_or("missing mode")?
                .parse()?;
            Input::Command(Command::SetMode { mode })
        }
        "duration" | "d" => {
            let hours = number(words.next(), "hours")?;
            let minutes = number(words.next(), "minutes")?;
            let seconds = number(words.next(), "seconds")?;
            Input::Duration(ClockDuration::clamped(hours, minutes, seconds))
        }
        "pomodoro" => Input::Command(Command::SetPomodoroSettings {
            work_minutes: number(words.next(), "work minutes")?,
            break_minutes: number(words.next(), "break minutes")?,
        }),
        "long" => Input::Command(Command::SetLongBreak {
            minutes: number(words.next(), "long break minutes")?,
            every: number(words.next(), "sessions per long break")?,
        }),
        "adaptive" => Input::Command(Command::SetAdaptive {
            enabled: switch(words.next())?,
        }),
        "target" => {
            let hours: f64 = number(words.next(), "target hours")?;
            if !hours.is_finite() || hours <= 0.0 {
                return Err(format!("target hours must be positive, got {hours}"));
            }
            Input::Command(Command::SetTargetHours { hours })
        }
        "notify" => {
            let enabled = switch(words.next())?;
            let sound = words
                .next()
                .map(str::parse::<SoundOption>)
                .transpose()?;
            Input::Command(Command::SetNotifications { enabled, sound })
        }
        "status" => {
            let json = match words.next() {
                None => false,
                Some("--json") | Some("json") => true,
                Some(other) => return Err(format!("unexpected argument '{other}'")),
            };
            Input::Status { json }
        }
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    no_more(words)?;
    Ok(Some(input))
}
