#![forbid(unsafe_code)]

mod commands;
mod logger;

use clap::{Parser, Subcommand};

use crate::commands::{
    completions::CompletionsCommand, get::GetCommand, post::PostCommand,
    save_session::SaveSessionCommand,
};

/// Build requests for the unofficial Nest API and print them instead of sending them.
#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn exec(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Get(cmd) => cmd.exec()?,
            Commands::Post(cmd) => cmd.exec()?,
            Commands::SaveSession(cmd) => cmd.exec()?,
            Commands::Completions(cmd) => cmd.exec::<Self>()?,
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a GET request
    Get(GetCommand),
    /// Build a POST request
    Post(PostCommand),
    /// Store a session for use by later invocations.
    ///
    /// Sessions in the environment take precedence over the stored session.
    SaveSession(SaveSessionCommand),
    /// Print a completion file for the given shell.
    ///
    /// Example: `nest-request completions zsh | source /dev/stdin`.
    Completions(CompletionsCommand),
}

fn main() -> anyhow::Result<()> {
    let mut guard = logger::init()?;
    Cli::parse().exec()?;
    guard.disarm();
    Ok(())
}
