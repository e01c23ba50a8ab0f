// Public fallible APIs in this crate share one concrete error contract (`SmittenError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod models;
pub mod score;
pub mod segment;
pub mod signals;

pub use analysis::ConversationAnalysis;
pub use batch::InboxAnalysis;
pub use config::AnalysisConfig;
pub use error::{Result, SmittenError};
pub use models::{ParticipantPair, Slot};
pub use score::Strategy;
