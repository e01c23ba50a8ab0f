use clap::{Parser, Subcommand};

mod args;


pub use args::{FileArgs, InboxArgs, StrategyArg};

#[derive(Debug, Parser)]
#[command(name = "smitten")]
#[command(about = "Who is more into whom, scored from exported chats", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score a single exported conversation file.
    File(FileArgs),
    /// Score every conversation under an export root's inbox/ directory.
    Inbox(InboxArgs),
}
