use crate::models::{Message, PairValues, ParticipantPair, Slot};
use crate::segment::Segment;

/// Percentile with linear interpolation between closest ranks. Empty input
/// yields 0.
#[must_use]
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (sorted.len() - 1) as f64 * pct / 100.0;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// How many segments each participant opened.
#[must_use]
pub fn conversation_openers(pair: &ParticipantPair, segments: &[Segment]) -> PairValues {
    let mut counts = PairValues::ZERO;
    for segment in segments {
        if let Some(slot) = segment.opener().and_then(|sender| pair.slot_of(sender)) {
            counts.add(slot, 1.0);
        }
    }
    counts
}

/// How many segments each participant closed.
#[must_use]
pub fn conversation_closers(pair: &ParticipantPair, segments: &[Segment]) -> PairValues {
    let mut counts = PairValues::ZERO;
    for segment in segments {
        if let Some(slot) = segment.closer().and_then(|sender| pair.slot_of(sender)) {
            counts.add(slot, 1.0);
        }
    }
    counts
}

/// 75th percentile of per-message content length for each participant.
#[must_use]
pub fn message_length_p75(pair: &ParticipantPair, sorted: &[Message]) -> PairValues {
    let mut result = PairValues::ZERO;
    for slot in Slot::BOTH {
        let lengths: Vec<f64> = sorted
            .iter()
            .filter(|m| pair.slot_of(&m.sender_name) == Some(slot))
            .map(|m| m.content_len() as f64)
            .collect();
        result.set(slot, percentile(&lengths, 75.0));
    }
    result
}

/// How many of each participant's messages contain a `?`.
#[must_use]
pub fn questions_asked(pair: &ParticipantPair, sorted: &[Message]) -> PairValues {
    let mut counts = PairValues::ZERO;
    for message in sorted {
        if !message.is_question() {
            continue;
        }
        if let Some(slot) = pair.slot_of(&message.sender_name) {
            counts.add(slot, 1.0);
        }
    }
    counts
}

/// Per-participant reply lag percentile, in milliseconds.
///
/// A sample for slot X is recorded for every adjacent pair in the full sorted
/// stream where the previous message came from the other slot and the current
/// one from X. Each side gets its own sample set; no samples yields 0.
#[must_use]
pub fn response_time_percentile(
    pair: &ParticipantPair,
    sorted: &[Message],
    pct: f64,
) -> PairValues {
    let mut samples_first: Vec<f64> = Vec::new();
    let mut samples_second: Vec<f64> = Vec::new();

    for window in sorted.windows(2) {
        let (prev, curr) = (&window[0], &window[1]);
        let (Some(prev_slot), Some(curr_slot)) = (
            pair.slot_of(&prev.sender_name),
            pair.slot_of(&curr.sender_name),
        ) else {
            continue;
        };
        if prev_slot == curr_slot {
            continue;
        }
        let lag = (curr.timestamp_ms - prev.timestamp_ms) as f64;
        match curr_slot {
            Slot::First => samples_first.push(lag),
            Slot::Second => samples_second.push(lag),
        }
    }

    PairValues::new(
        percentile(&samples_first, pct),
        percentile(&samples_second, pct),
    )
}
