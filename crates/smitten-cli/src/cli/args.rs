use std::path::PathBuf;

use clap::{Args, ValueEnum};
use smitten_core::Strategy;
use smitten_core::config::DEFAULT_MIN_MESSAGES;

#[derive(Debug, Args)]
pub struct FileArgs {
    /// Path to a conversation export (first page only).
    #[arg(default_value = "message_1.json")]
    pub file: PathBuf,
    /// Scoring policy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Gradient)]
    pub strategy: StrategyArg,
    /// Emit the full report as JSON instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct InboxArgs {
    /// Export root containing an inbox/ directory.
    pub root: PathBuf,
    /// Scoring policy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Gradient)]
    pub strategy: StrategyArg,
    /// Leave conversations with fewer messages out of the ranking.
    #[arg(long, default_value_t = DEFAULT_MIN_MESSAGES)]
    pub min_messages: usize,
    /// Emit the full report as JSON instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Fractional scoring with a percentage-quantified verdict.
    Gradient,
    /// One vote per signal and an unquantified winner.
    MajorityVote,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Gradient => Strategy::Gradient,
            StrategyArg::MajorityVote => Strategy::MajorityVote,
        }
    }
}

impl std::fmt::Display for StrategyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Strategy::from(*self).as_str())
    }
}
