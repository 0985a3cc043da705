use std::path::PathBuf;

use clap::{Parser, Subcommand};
use timekeeper_core::Settings;
use tracing_subscriber::EnvFilter;

mod alerts;
mod commands;
mod input;
mod render;

#[derive(Parser)]
#[command(
    name = "timekeeper",
    version,
    about = "Countdown timer, stopwatch and adaptive Pomodoro"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file to use instead of ~/.config/timekeeper/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a live timer session driven by stdin commands
    Run(commands::run::RunArgs),
    /// Show the Pomodoro session plan for a work-hour goal
    Plan(commands::plan::PlanArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Notification tools
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn settings_path(
    override_path: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match override_path {
        Some(path) => Ok(path),
        None => Ok(Settings::path()?),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => {
            settings_path(cli.config).and_then(|path| commands::run::run(args, &path))
        }
        Commands::Plan(args) => {
            settings_path(cli.config).and_then(|path| commands::plan::run(args, &path))
        }
        Commands::Config { action } => {
            settings_path(cli.config).and_then(|path| commands::config::run(action, &path))
        }
        Commands::Notify { action } => {
            settings_path(cli.config).and_then(|path| commands::notify::run(action, &path))
        }
        Commands::Completions(args) => commands::completions::run::<Cli>(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
