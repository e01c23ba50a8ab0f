use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmittenError};
use crate::score::Strategy;

/// One conversation export document, as found in `message_1.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationFile {
    pub participants: Vec<ParticipantRecord>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantRecord {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender_name: String,
    pub timestamp_ms: i64,
    /// Absent for non-text attachments; counted as zero-length content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ConversationFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SmittenError::MissingInputFile(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Message {
    #[must_use]
    pub fn content_len(&self) -> usize {
        self.content
            .as_deref()
            .map_or(0, |content| content.chars().count())
    }

    #[must_use]
    pub fn is_question(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|content| content.contains('?'))
    }
}

/// One of the two participant positions. Metrics and scores are addressed by
/// slot, never by display name, since names are not unique across exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::First, Slot::Second];

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// The two declared participants, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantPair {
    first: String,
    second: String,
}

impl ParticipantPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    #[must_use]
    pub fn name(&self, slot: Slot) -> &str {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    #[must_use]
    pub fn names(&self) -> [String; 2] {
        [self.first.clone(), self.second.clone()]
    }

    /// Maps a sender display name back to its slot. `None` for senders that
    /// are not part of the conversation.
    #[must_use]
    pub fn slot_of(&self, sender: &str) -> Option<Slot> {
        if sender == self.first {
            Some(Slot::First)
        } else if sender == self.second {
            Some(Slot::Second)
        } else {
            None
        }
    }
}

/// A two-valued metric or score, one value per slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairValues {
    pub first: f64,
    pub second: f64,
}

impl PairValues {
    pub const ZERO: Self = Self {
        first: 0.0,
        second: 0.0,
    };

    #[must_use]
    pub fn new(first: f64, second: f64) -> Self {
        Self { first, second }
    }

    #[must_use]
    pub fn get(self, slot: Slot) -> f64 {
        match slot {
            Slot::First => self.first,
            Slot::Second => self.second,
        }
    }

    pub fn set(&mut self, slot: Slot, value: f64) {
        match slot {
            Slot::First => self.first = value,
            Slot::Second => self.second = value,
        }
    }

    pub fn add(&mut self, slot: Slot, amount: f64) {
        match slot {
            Slot::First => self.first += amount,
            Slot::Second => self.second += amount,
        }
    }

    #[must_use]
    pub fn total(self) -> f64 {
        self.first + self.second
    }
}

/// Raw values for the five behavioral signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalReport {
    pub conversation_openers: PairValues,
    pub conversation_closers: PairValues,
    pub message_length_p75: PairValues,
    pub questions_asked: PairValues,
    pub response_time_percentile: PairValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Display name of the participant judged more into the other.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pursuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pursued: Option<String>,
    /// Only produced by the gradient strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u32>,
    pub text: String,
}

impl Verdict {
    #[must_use]
    pub fn even(first: &str, second: &str) -> Self {
        Self {
            pursuer: None,
            pursued: None,
            percentage: None,
            text: format!("{first} and {second} are equally into each other"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationReport {
    pub participants: [String; 2],
    pub strategy: Strategy,
    pub message_count: usize,
    pub segment_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<String>,
    pub signals: SignalReport,
    pub scores: PairValues,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedConversation {
    pub path: String,
    pub participants: [String; 2],
    pub message_count: usize,
    pub segment_count: usize,
    /// The current user's fraction of the gradient score total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_share: Option<f64>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user: Option<String>,
    pub conversations: Vec<RankedConversation>,
    pub most_active: Vec<RankedConversation>,
}
