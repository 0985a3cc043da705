use std::path::Path;

use clap::Args;
use serde::Serialize;
use timekeeper_core::timer::adaptive::{format_remaining, long_break_due};
use timekeeper_core::timer::limits;
use timekeeper_core::{format_time, Mode, Phase, Settings, TimerEngine, TimerState};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Target focused hours (defaults to the saved goal)
    #[arg(long)]
    pub target: Option<f64>,
    /// Work minutes per session
    #[arg(long)]
    pub work: Option<u32>,
    /// Break minutes per session
    #[arg(long = "break")]
    pub break_minutes: Option<u32>,
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PlannedSession {
    session: u32,
    work_secs: u64,
    break_secs: u64,
    long_break: bool,
}

#[derive(Debug, Serialize)]
struct Plan {
    target_hours: f64,
    work_minutes: u32,
    break_minutes: u32,
    total_sessions: u32,
    remaining_minutes: u64,
    adaptive: bool,
    sessions: Vec<PlannedSession>,
}

/// Walk the session sequence the way the timer will arm it.
fn planned_sessions(state: &TimerState) -> Vec<PlannedSession> {
    let mut probe = state.clone();
    (0..state.total_sessions)
        .map(|done| {
            probe.completed_sessions = done;
            let work_secs = probe.phase_secs(Phase::Work);
            probe.completed_sessions = done + 1;
            PlannedSession {
                session: done + 1,
                work_secs,
                break_secs: probe.phase_secs(Phase::Break),
                long_break: long_break_due(done + 1, probe.sessions_until_long_break),
            }
        })
        .collect()
}

fn build(args: &PlanArgs, mut settings: Settings) -> Result<Plan, Box<dyn std::error::Error>> {
    if let Some(target) = args.target {
        settings.pomodoro.target_hours = limits::target_hours(target)
            .ok_or_else(|| format!("target must be a positive number of hours, got {target}"))?;
    }
    if let Some(work) = args.work {
        settings.pomodoro.work_minutes = work;
    }
    if let Some(brk) = args.break_minutes {
        settings.pomodoro.break_minutes = brk;
    }
    settings.mode = Mode::Pomodoro;

    let engine = TimerEngine::from_settings(&settings);
    let state = engine.state();
    Ok(Plan {
        target_hours: state.target_hours,
        work_minutes: state.work_minutes,
        break_minutes: state.break_minutes,
        total_sessions: state.total_sessions,
        remaining_minutes: state.remaining_minutes(),
        adaptive: state.adaptive,
        sessions: planned_sessions(state),
    })
}

pub fn run(args: PlanArgs, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let plan = build(&args, Settings::load_from(path))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "Goal: {}h at {}m work / {}m break{}",
        plan.target_hours,
        plan.work_minutes,
        plan.break_minutes,
        if plan.adaptive { " (adaptive)" } else { "" }
    );
    println!(
        "{} sessions, {}",
        plan.total_sessions,
        format_remaining(plan.remaining_minutes)
    );
    println!();
    for s in &plan.sessions {
        let marker = if s.long_break { "  long break" } else { "" };
        println!(
            "  #{:<3} work {}  break {}{marker}",
            s.session,
            format_time(s.work_secs),
            format_time(s.break_secs)
        );
    }
    Ok(())
}
