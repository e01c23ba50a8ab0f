use std::path::Path;

use chrono::DateTime;

use crate::config::AnalysisConfig;
use crate::error::{Result, SmittenError};
use crate::models::{
    ConversationFile, ConversationReport, Message, PairValues, ParticipantPair, SignalReport,
    Slot, Verdict,
};
use crate::score::{self, Strategy};
use crate::segment::{Segment, split_into_segments};
use crate::signals;

/// A validated two-person conversation, ready for scoring.
///
/// Construction performs all validation, so an instance always satisfies the
/// invariants the accessors rely on: exactly two participants, every message
/// attributed to one of them, messages sorted ascending by timestamp.
#[derive(Debug, Clone)]
pub struct ConversationAnalysis {
    pair: ParticipantPair,
    messages: Vec<Message>,
    config: AnalysisConfig,
}

impl ConversationAnalysis {
    pub fn load(path: &Path, config: AnalysisConfig) -> Result<Self> {
        let file = ConversationFile::load(path)?;
        Self::new(file, config)
    }

    pub fn new(file: ConversationFile, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        if file.participants.len() != 2 {
            return Err(SmittenError::InvalidParticipantCount {
                count: file.participants.len(),
            });
        }
        let pair = ParticipantPair::new(
            file.participants[0].name.clone(),
            file.participants[1].name.clone(),
        );
        for message in &file.messages {
            if pair.slot_of(&message.sender_name).is_none() {
                return Err(SmittenError::UnknownSender {
                    sender: message.sender_name.clone(),
                    first: pair.name(Slot::First).to_string(),
                    second: pair.name(Slot::Second).to_string(),
                });
            }
        }

        let mut messages = file.messages;
        // Stable sort keyed on timestamp only: equal timestamps keep input
        // order, so repeated runs stay bit-identical.
        messages.sort_by_key(|m| m.timestamp_ms);

        Ok(Self {
            pair,
            messages,
            config,
        })
    }

    #[must_use]
    pub fn pair(&self) -> &ParticipantPair {
        &self.pair
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Messages in ascending timestamp order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Inactivity-gap segmentation of the sorted stream. Recomputed on each
    /// call; pure derivation of the immutable input.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        split_into_segments(&self.messages, self.config.segment_gap_secs)
    }

    #[must_use]
    pub fn signals(&self) -> SignalReport {
        self.signals_with(self.config.strategy.response_percentile())
    }

    fn signals_with(&self, response_pct: f64) -> SignalReport {
        let segments = self.segments();
        SignalReport {
            conversation_openers: signals::conversation_openers(&self.pair, &segments),
            conversation_closers: signals::conversation_closers(&self.pair, &segments),
            message_length_p75: signals::message_length_p75(&self.pair, &self.messages),
            questions_asked: signals::questions_asked(&self.pair, &self.messages),
            response_time_percentile: signals::response_time_percentile(
                &self.pair,
                &self.messages,
                response_pct,
            ),
        }
    }

    #[must_use]
    pub fn scores(&self) -> PairValues {
        score::accumulate(self.config.strategy, &self.signals())
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        score::verdict(self.config.strategy, &self.pair, self.scores())
    }

    /// The slot's fraction of the gradient score total, 0.5 when the total is
    /// zero. Batch ranking always uses gradient shares, whatever verdict
    /// strategy is selected; vote totals are too coarse to rank by.
    #[must_use]
    pub fn gradient_share(&self, slot: Slot) -> f64 {
        let signals = self.signals_with(Strategy::Gradient.response_percentile());
        let scores = score::accumulate(Strategy::Gradient, &signals);
        let total = scores.total();
        if total == 0.0 {
            return 0.5;
        }
        scores.get(slot) / total
    }

    #[must_use]
    pub fn report(&self) -> ConversationReport {
        let signals = self.signals();
        let scores = score::accumulate(self.config.strategy, &signals);
        let verdict = score::verdict(self.config.strategy, &self.pair, scores);
        ConversationReport {
            participants: self.pair.names(),
            strategy: self.config.strategy,
            message_count: self.messages.len(),
            segment_count: self.segments().len(),
            first_message_at: self.messages.first().and_then(|m| rfc3339(m.timestamp_ms)),
            last_message_at: self.messages.last().and_then(|m| rfc3339(m.timestamp_ms)),
            signals,
            scores,
            verdict,
        }
    }
}

fn rfc3339(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParticipantRecord;

    fn msg(sender: &str, timestamp_ms: i64, content: Option<&str>) -> Message {
        Message {
            sender_name: sender.to_string(),
            timestamp_ms,
            content: content.map(ToString::to_string),
        }
    }

    fn file(participants: &[&str], messages: Vec<Message>) -> ConversationFile {
        ConversationFile {
            participants: participants
                .iter()
                .map(|name| ParticipantRecord {
                    name: (*name).to_string(),
                })
                .collect(),
            messages,
        }
    }

    #[test]
    fn three_declared_participants_fail_validation() {
        let err = ConversationAnalysis::new(
            file(&["alice", "bob", "carol"], Vec::new()),
            AnalysisConfig::default(),
        )
        .expect_err("three participants");
        assert_eq!(err.code(), "INVALID_PARTICIPANT_COUNT");
    }

    #[test]
    fn message_from_undeclared_sender_fails_validation() {
        let messages = vec![
            msg("alice", 0, Some("hi")),
            msg("mallory", 1_000, Some("hello")),
        ];
        let err = ConversationAnalysis::new(file(&["alice", "bob"], messages), AnalysisConfig::default())
            .expect_err("stranger sender");
        assert_eq!(err.code(), "UNKNOWN_SENDER");
        assert!(err.to_string().contains("mallory"));
    }

    #[test]
    fn messages_are_sorted_ascending_regardless_of_input_order() {
        let messages = vec![
            msg("bob", 5_000, Some("later")),
            msg("alice", 1_000, Some("first")),
            msg("bob", 3_000, Some("middle")),
        ];
        let analysis =
            ConversationAnalysis::new(file(&["alice", "bob"], messages), AnalysisConfig::default())
                .expect("valid");
        let stamps: Vec<i64> = analysis.messages().iter().map(|m| m.timestamp_ms).collect();
        assert_eq!(stamps, vec![1_000, 3_000, 5_000]);
    }

    #[test]
    fn two_segment_scenario_produces_the_expected_report() {
        let messages = vec![
            msg("alice", 0, Some("hi")),
            msg("bob", 1_000, Some("hello?")),
            msg("alice", 20_000_000, Some("you there")),
        ];
        let analysis =
            ConversationAnalysis::new(file(&["alice", "bob"], messages), AnalysisConfig::default())
                .expect("valid");
        let report = analysis.report();

        assert_eq!(report.segment_count, 2);
        assert_eq!(report.message_count, 3);
        let openers = report.signals.conversation_openers;
        assert_eq!((openers.first, openers.second), (2.0, 0.0));
        let closers = report.signals.conversation_closers;
        assert_eq!((closers.first, closers.second), (1.0, 1.0));
        let questions = report.signals.questions_asked;
        assert_eq!((questions.first, questions.second), (0.0, 1.0));
        assert_eq!(report.first_message_at.as_deref(), Some("1970-01-01T00:00:00+00:00"));
    }

    #[test]
    fn silent_second_participant_never_faults() {
        let messages = vec![
            msg("alice", 0, Some("hello?")),
            msg("alice", 1_000, None),
            msg("alice", 90_000_000, Some("fine, bye")),
        ];
        let analysis =
            ConversationAnalysis::new(file(&["alice", "bob"], messages), AnalysisConfig::default())
                .expect("valid");
        let report = analysis.report();
        assert_eq!(report.signals.message_length_p75.second, 0.0);
        assert_eq!(report.signals.response_time_percentile.second, 0.0);
        assert!(report.scores.first.is_finite());
        assert!(report.scores.second.is_finite());
        assert!(!report.verdict.text.is_empty());
    }

    #[test]
    fn reports_are_bit_identical_across_runs() {
        let messages = vec![
            msg("alice", 0, Some("hi")),
            msg("bob", 1_000, Some("hello?")),
            msg("alice", 20_000_000, Some("you there")),
        ];
        let analysis =
            ConversationAnalysis::new(file(&["alice", "bob"], messages), AnalysisConfig::default())
                .expect("valid");
        let first = serde_json::to_value(analysis.report()).expect("encode");
        let second = serde_json::to_value(analysis.report()).expect("encode");
        assert_eq!(first, second);
    }

    #[test]
    fn gradient_share_defaults_to_half_on_zero_totals() {
        let analysis = ConversationAnalysis::new(
            file(&["alice", "bob"], Vec::new()),
            AnalysisConfig::default(),
        )
        .expect("valid");
        assert_eq!(analysis.gradient_share(Slot::First), 0.5);
        assert_eq!(analysis.gradient_share(Slot::Second), 0.5);
    }
}
