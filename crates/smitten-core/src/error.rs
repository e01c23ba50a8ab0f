use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SmittenError>;

#[derive(Debug, Error)]
pub enum SmittenError {
    #[error("input file does not exist: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("conversation must have exactly 2 participants, found {count}")]
    InvalidParticipantCount { count: usize },

    #[error("{sender} sent a message in a conversation between {first} and {second}")]
    UnknownSender {
        sender: String,
        first: String,
        second: String,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SmittenError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInputFile(_) => "MISSING_INPUT_FILE",
            Self::InvalidParticipantCount { .. } => "INVALID_PARTICIPANT_COUNT",
            Self::UnknownSender { .. } => "UNKNOWN_SENDER",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sender_names_both_declared_participants() {
        let err = SmittenError::UnknownSender {
            sender: "mallory".to_string(),
            first: "alice".to_string(),
            second: "bob".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("mallory"));
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("bob"));
        assert_eq!(err.code(), "UNKNOWN_SENDER");
    }

    #[test]
    fn participant_count_error_carries_observed_count() {
        let err = SmittenError::InvalidParticipantCount { count: 3 };
        assert!(err.to_string().contains("found 3"));
        assert_eq!(err.code(), "INVALID_PARTICIPANT_COUNT");
    }
}
