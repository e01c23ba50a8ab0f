use chrono::{DateTime, Utc};

use crate::models::Message;

/// A maximal run of messages with no inactivity gap at or above the
/// configured threshold. Segments are derived on demand and never empty.
#[derive(Debug, Clone)]
pub struct Segment {
    pub messages: Vec<Message>,
}

impl Segment {
    /// Sender of the segment's first message.
    #[must_use]
    pub fn opener(&self) -> Option<&str> {
        self.messages.first().map(|m| m.sender_name.as_str())
    }

    /// Sender of the segment's last message.
    #[must_use]
    pub fn closer(&self) -> Option<&str> {
        self.messages.last().map(|m| m.sender_name.as_str())
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.messages
            .first()
            .and_then(|m| DateTime::from_timestamp_millis(m.timestamp_ms))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Partitions a timestamp-ascending message list into segments. A gap of
/// `gap_secs` or more between consecutive messages starts a new segment; the
/// trailing open segment is always emitted.
#[must_use]
pub fn split_into_segments(sorted: &[Message], gap_secs: i64) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Vec<Message> = Vec::new();

    for message in sorted {
        if let Some(prev) = current.last() {
            let gap = (message.timestamp_ms - prev.timestamp_ms) / 1000;
            if gap >= gap_secs {
                segments.push(Segment {
                    messages: std::mem::take(&mut current),
                });
            }
        }
        current.push(message.clone());
    }
    if !current.is_empty() {
        segments.push(Segment { messages: current });
    }
    segments
}
