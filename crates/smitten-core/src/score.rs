use serde::Serialize;

use crate::models::{PairValues, ParticipantPair, SignalReport, Slot, Verdict};

/// The two scoring policies. They share one polarity convention: a slot's
/// accumulated score measures evidence that the *other* slot is the pursuer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Fraction-of-total accumulation with a percentage-quantified verdict.
    #[default]
    Gradient,
    /// One raw-value vote per signal and an unquantified winner.
    MajorityVote,
}

impl Strategy {
    /// Reply-lag percentile used by this strategy.
    #[must_use]
    pub fn response_percentile(self) -> f64 {
        match self {
            Self::Gradient => 75.0,
            Self::MajorityVote => 90.0,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gradient => "gradient",
            Self::MajorityVote => "majority-vote",
        }
    }
}

/// Normalizes a two-valued signal into fractions of its total. A zero total
/// yields zero for both sides rather than a division fault.
#[must_use]
pub fn apply_gradient(values: PairValues) -> PairValues {
    let total = values.total();
    if total == 0.0 {
        return PairValues::ZERO;
    }
    PairValues::new(values.first / total, values.second / total)
}

/// Accumulates the five signals into per-slot scores under the given
/// strategy. Pure function of its input.
#[must_use]
pub fn accumulate(strategy: Strategy, signals: &SignalReport) -> PairValues {
    match strategy {
        Strategy::Gradient => gradient_scores(signals),
        Strategy::MajorityVote => majority_votes(signals),
    }
}

#[must_use]
pub fn verdict(strategy: Strategy, pair: &ParticipantPair, scores: PairValues) -> Verdict {
    match strategy {
        Strategy::Gradient => gradient_verdict(pair, scores),
        Strategy::MajorityVote => vote_verdict(pair, scores),
    }
}

fn inverted_signals(signals: &SignalReport) -> [PairValues; 4] {
    // Opening, closing, writing long messages and asking questions are things
    // the pursuer does, so they credit the other slot's score.
    [
        signals.conversation_openers,
        signals.conversation_closers,
        signals.message_length_p75,
        signals.questions_asked,
    ]
}

fn gradient_scores(signals: &SignalReport) -> PairValues {
    let mut scores = PairValues::ZERO;
    for signal in inverted_signals(signals) {
        let fractions = apply_gradient(signal);
        for slot in Slot::BOTH {
            scores.add(slot, fractions.get(slot.other()));
        }
    }
    // Reply lag credits its own slot: the fast replier is the pursuer.
    let fractions = apply_gradient(signals.response_time_percentile);
    for slot in Slot::BOTH {
        scores.add(slot, fractions.get(slot));
    }
    scores
}

fn majority_votes(signals: &SignalReport) -> PairValues {
    let mut votes = PairValues::ZERO;
    for signal in inverted_signals(signals) {
        if let Some(doer) = larger_slot(signal) {
            votes.add(doer.other(), 1.0);
        }
    }
    if let Some(slower) = larger_slot(signals.response_time_percentile) {
        votes.add(slower, 1.0);
    }
    votes
}

fn larger_slot(values: PairValues) -> Option<Slot> {
    if values.first > values.second {
        Some(Slot::First)
    } else if values.second > values.first {
        Some(Slot::Second)
    } else {
        None
    }
}

fn gradient_verdict(pair: &ParticipantPair, scores: PairValues) -> Verdict {
    let total = scores.total();
    if total == 0.0 {
        return Verdict::even(pair.name(Slot::First), pair.name(Slot::Second));
    }
    let midpoint = total / 2.0;
    let percentage = ((midpoint - scores.first).abs() / midpoint * 100.0).round() as u32;
    if percentage == 0 {
        return Verdict::even(pair.name(Slot::First), pair.name(Slot::Second));
    }

    let pursued = if scores.first > midpoint {
        Slot::First
    } else {
        Slot::Second
    };
    let pursuer = pursued.other();
    Verdict {
        pursuer: Some(pair.name(pursuer).to_string()),
        pursued: Some(pair.name(pursued).to_string()),
        percentage: Some(percentage),
        text: format!(
            "{} is {percentage}% more into {}",
            pair.name(pursuer),
            pair.name(pursued)
        ),
    }
}

fn vote_verdict(pair: &ParticipantPair, votes: PairValues) -> Verdict {
    let Some(pursued) = larger_slot(votes) else {
        return Verdict::even(pair.name(Slot::First), pair.name(Slot::Second));
    };
    let pursuer = pursued.other();
    Verdict {
        pursuer: Some(pair.name(pursuer).to_string()),
        pursued: Some(pair.name(pursued).to_string()),
        percentage: None,
        text: format!(
            "{} is more into {}",
            pair.name(pursuer),
            pair.name(pursued)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> ParticipantPair {
        ParticipantPair::new("alice", "bob")
    }

    fn report(
        openers: (f64, f64),
        closers: (f64, f64),
        lengths: (f64, f64),
        questions: (f64, f64),
        response: (f64, f64),
    ) -> SignalReport {
        SignalReport {
            conversation_openers: PairValues::new(openers.0, openers.1),
            conversation_closers: PairValues::new(closers.0, closers.1),
            message_length_p75: PairValues::new(lengths.0, lengths.1),
            questions_asked: PairValues::new(questions.0, questions.1),
            response_time_percentile: PairValues::new(response.0, response.1),
        }
    }

    #[test]
    fn gradient_of_zero_totals_is_zero_for_both() {
        let fractions = apply_gradient(PairValues::ZERO);
        assert_eq!((fractions.first, fractions.second), (0.0, 0.0));
    }

    #[test]
    fn gradient_splits_three_to_one_as_three_quarters() {
        let fractions = apply_gradient(PairValues::new(3.0, 1.0));
        assert_eq!((fractions.first, fractions.second), (0.75, 0.25));
    }

    #[test]
    fn gradient_verdict_quantifies_the_two_segment_scenario() {
        let signals = report(
            (2.0, 0.0),
            (1.0, 1.0),
            (7.25, 6.0),
            (0.0, 1.0),
            (19_999_000.0, 1_000.0),
        );
        let scores = accumulate(Strategy::Gradient, &signals);
        let verdict = verdict(Strategy::Gradient, &pair(), scores);
        assert_eq!(verdict.percentage, Some(18));
        assert_eq!(verdict.pursuer.as_deref(), Some("bob"));
        assert_eq!(verdict.text, "bob is 18% more into alice");
    }

    #[test]
    fn all_zero_signals_read_as_equally_into_each_other() {
        let signals = report((0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0));
        let scores = accumulate(Strategy::Gradient, &signals);
        assert_eq!(scores.total(), 0.0);
        let verdict = verdict(Strategy::Gradient, &pair(), scores);
        assert_eq!(verdict.text, "alice and bob are equally into each other");
        assert_eq!(verdict.percentage, None);
    }

    #[test]
    fn perfectly_symmetric_signals_round_to_an_even_verdict() {
        let signals = report((3.0, 3.0), (2.0, 2.0), (40.0, 40.0), (5.0, 5.0), (900.0, 900.0));
        let scores = accumulate(Strategy::Gradient, &signals);
        let verdict = verdict(Strategy::Gradient, &pair(), scores);
        assert_eq!(verdict.pursuer, None);
        assert!(verdict.text.contains("equally"));
    }

    #[test]
    fn majority_vote_names_a_winner_without_magnitude() {
        // Alice opens more, closes more and replies faster; bob out-writes
        // her on one signal and the question counts tie.
        let signals = report(
            (4.0, 1.0),
            (3.0, 1.0),
            (10.0, 25.0),
            (2.0, 2.0),
            (1_000.0, 60_000.0),
        );
        let votes = accumulate(Strategy::MajorityVote, &signals);
        assert_eq!((votes.first, votes.second), (1.0, 3.0));
        let verdict = verdict(Strategy::MajorityVote, &pair(), votes);
        assert_eq!(verdict.text, "alice is more into bob");
        assert_eq!(verdict.percentage, None);
    }

    #[test]
    fn tied_votes_award_no_winner() {
        let signals = report(
            (2.0, 0.0),
            (1.0, 1.0),
            (0.0, 3.0),
            (1.0, 1.0),
            (500.0, 500.0),
        );
        let votes = accumulate(Strategy::MajorityVote, &signals);
        assert_eq!((votes.first, votes.second), (1.0, 1.0));
        let verdict = verdict(Strategy::MajorityVote, &pair(), votes);
        assert!(verdict.text.contains("equally"));
    }

    #[test]
    fn response_percentile_follows_the_strategy_variant() {
        assert_eq!(Strategy::Gradient.response_percentile(), 75.0);
        assert_eq!(Strategy::MajorityVote.response_percentile(), 90.0);
        assert_eq!(Strategy::default().as_str(), "gradient");
        assert_eq!(Strategy::MajorityVote.as_str(), "majority-vote");
    }
}
