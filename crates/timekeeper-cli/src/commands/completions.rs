//! Shell completion generation.
//!
//! ```bash
//! timekeeper completions bash > ~/.local/share/bash-completion/completions/timekeeper
//! timekeeper completions zsh > ~/.zfunc/_timekeeper
//! timekeeper completions fish > ~/.config/fish/completions/timekeeper.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run<C: CommandFactory>(args: CompletionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = C::command();
    generate(args.shell, &mut cmd, "timekeeper", &mut io::stdout());
    Ok(())
}
