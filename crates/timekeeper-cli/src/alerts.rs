//! Desktop alert backend: freedesktop sounds and `notify-rust` notifications.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use notify_rust::{Notification, Urgency};
use timekeeper_core::display::APP_NAME;
use timekeeper_core::{Alert, AlertBackend, Notice, NotifyError, Permission, SoundOption};
use tracing::debug;

const SOUND_DIR: &str = "/usr/share/sounds/freedesktop/stereo";

fn sound_file(sound: SoundOption) -> &'static str {
    match sound {
        SoundOption::Chime => "complete.oga",
        SoundOption::Bell => "bell.oga",
        SoundOption::Gentle => "message.oga",
    }
}

/// `paplay --volume` takes 0..=65536.
fn pulse_volume(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 65536.0).round() as u32
}

/// Spawn `command` with its output discarded and wait for it on a detached
/// thread so the finished process is reaped.
fn spawn_reaped(command: &mut Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

pub struct DesktopBackend {
    permission: Permission,
}

impl DesktopBackend {
    /// Desktop notification daemons don't gate access, so permission starts granted.
    pub fn new() -> Self {
        Self {
            permission: Permission::Granted,
        }
    }

    fn bell() -> Result<(), NotifyError> {
        let mut out = io::stdout();
        out.write_all(b"\x07")
            .and_then(|()| out.flush())
            .map_err(|e| NotifyError::Sound(e.to_string()))
    }
}

impl Default for DesktopBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertBackend for DesktopBackend {
    fn play_sound(&mut self, sound: SoundOption) -> Result<(), NotifyError> {
        let file = Path::new(SOUND_DIR).join(sound_file(sound));
        if !file.exists() {
            debug!("{} missing, falling back to terminal bell", file.display());
            return Self::bell();
        }
        let volume = format!("--volume={}", pulse_volume(sound.profile().volume));
        match spawn_reaped(Command::new("paplay").arg(volume).arg(&file)) {
            Ok(_) => Ok(()),
            Err(e) => {
                debug!("paplay unavailable ({e}), falling back to terminal bell");
                Self::bell()
            }
        }
    }

    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        self.permission
    }

    fn show(&mut self, notice: &Notice) -> Result<(), NotifyError> {
        let urgency = match notice.alert {
            Alert::GoalComplete => Urgency::Critical,
            Alert::TimerComplete | Alert::PhaseComplete(_) => Urgency::Normal,
        };
        Notification::new()
            .summary(&notice.title)
            .body(&notice.body)
            .appname(APP_NAME)
            .icon("alarm-clock")
            .urgency(urgency)
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Display(e.to_string()))
    }
}
