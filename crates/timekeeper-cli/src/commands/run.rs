use std::path::Path;

use clap::Args;
use timekeeper_core::{
    format_time, Command, CoreError, Mode, NotificationBridge, PersistenceBridge, Settings,
    Subscribers, TimerEngine, TimerHandle, TimerService,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::alerts::DesktopBackend;
use crate::input::{self, Input, HELP};
use crate::render::{status_line, Renderer};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Mode to run in (defaults to the saved mode)
    #[arg(long)]
    pub mode: Option<Mode>,
    /// Start counting immediately
    #[arg(long)]
    pub start: bool,
}

pub fn run(args: RunArgs, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(session(args, path))
}

async fn session(args: RunArgs, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = path.exists().then(|| Settings::load_from(path));
    let settings = loaded.clone().unwrap_or_default();
    let engine = TimerEngine::from_settings(&settings);
    info!(path = %path.display(), mode = %settings.mode, "starting session");

    let subscribers = Subscribers::new()
        .with(Renderer::new())
        .with(NotificationBridge::new(DesktopBackend::new()))
        .with(PersistenceBridge::new(path, loaded));
    let (handle, task) = TimerService::spawn(engine, subscribers);

    if let Some(mode) = args.mode {
        handle.send(Command::SetMode { mode }).await?;
    }
    if args.start {
        handle.send(Command::Start).await?;
    }
    Renderer::message("type 'help' for commands");
    Renderer::prompt(&handle.snapshot().await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match input::parse(&line) {
            Ok(None) => {}
            Ok(Some(Input::Quit)) => break,
            Ok(Some(input)) => dispatch(&handle, input).await?,
            Err(message) => Renderer::message(&message),
        }
        Renderer::prompt(&handle.snapshot().await?);
    }

    handle.shutdown().await?;
    let engine = task.await?;
    Renderer::message(&format!(
        "stopped at {} ({})",
        format_time(engine.state().current_time),
        engine.state().mode
    ));
    Ok(())
}

async fn dispatch(handle: &TimerHandle, input: Input) -> Result<(), CoreError> {
    match input {
        Input::Command(command) => {
            handle.send(command).await?;
        }
        Input::Toggle => {
            let state = handle.snapshot().await?;
            let command = if state.is_running {
                Command::Pause
            } else {
                Command::Start
            };
            handle.send(command).await?;
        }
        Input::Duration(duration) => {
            let after = handle
                .send(Command::SetDuration {
                    hours: duration.hours,
                    minutes: duration.minutes,
                    seconds: duration.seconds,
                })
                .await?;
            // Only an untouched countdown shows the new duration right away;
            // a paused one keeps its remaining time.
            if after.mode == Mode::Timer
                && !after.is_running
                && after.current_time == after.initial_time
            {
                handle.send(Command::SetMode { mode: Mode::Timer }).await?;
            }
        }
        Input::Status { json } => {
            let state = handle.snapshot().await?;
            if json {
                Renderer::message(&serde_json::to_string_pretty(&state)?);
            } else {
                Renderer::message(&format!(
                    "{}\n  target {}h, work {}m, break {}m, long break {}m every {}, adaptive {}\n  notifications {} ({} sound)",
                    status_line(&state),
                    state.target_hours,
                    state.work_minutes,
                    state.break_minutes,
                    state.long_break_minutes,
                    state.sessions_until_long_break,
                    on_off(state.adaptive),
                    on_off(state.notifications_enabled),
                    state.selected_sound
                ));
            }
        }
        Input::Help => Renderer::message(HELP),
        Input::Quit => {}
    }
    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
