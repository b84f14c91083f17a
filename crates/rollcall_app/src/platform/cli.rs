use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "rollcall",
    version,
    about = "Keeps one chat status message in sync with a game server's player list"
)]
pub struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Publish a report now and then every interval until Ctrl-C (default).
    Run,
    /// Print a fresh report without touching the published message.
    Check,
    /// Add a player to the watchlist.
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Remove a player by exact name, normalized name or name without tags.
    Remove {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Show the watchlist.
    List,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

/// Joins unquoted words, so `add [86] John Doe` works without quotes.
pub fn joined(words: &[String]) -> String {
    words.join(" ")
}
