use crate::error::{Result, SmittenError};
use crate::score::Strategy;

/// Gap between two messages that closes a conversation segment: 4 hours.
pub const DEFAULT_SEGMENT_GAP_SECS: i64 = 14_400;

/// Conversations with fewer messages are left out of batch rankings.
pub const DEFAULT_MIN_MESSAGES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub segment_gap_secs: i64,
    pub strategy: Strategy,
    pub min_messages: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            segment_gap_secs: DEFAULT_SEGMENT_GAP_SECS,
            strategy: Strategy::default(),
            min_messages: DEFAULT_MIN_MESSAGES,
        }
    }
}

impl AnalysisConfig {
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.segment_gap_secs <= 0 {
            return Err(SmittenError::Validation(
                "segment gap must be a positive number of seconds".to_string(),
            ));
        }
        Ok(())
    }
}
