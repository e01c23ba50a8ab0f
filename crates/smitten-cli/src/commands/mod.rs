use std::io::{self, Write};

use anyhow::{Context, Result};
use smitten_core::models::{BatchReport, ConversationReport, PairValues, RankedConversation};
use smitten_core::{AnalysisConfig, ConversationAnalysis, InboxAnalysis};

use crate::cli::{Commands, FileArgs, InboxArgs};

pub(crate) fn run(command: Commands) -> Result<()> {
    match command {
        Commands::File(args) => run_file(&args),
        Commands::Inbox(args) => run_inbox(&args),
    }
}

fn run_file(args: &FileArgs) -> Result<()> {
    let config = AnalysisConfig::with_strategy(args.strategy.into());
    let analysis = ConversationAnalysis::load(&args.file, config)
        .with_context(|| format!("cannot analyze {}", args.file.display()))?;
    let report = analysis.report();
    if args.json {
        return print_json(&report);
    }
    render_conversation(&report);
    Ok(())
}

fn run_inbox(args: &InboxArgs) -> Result<()> {
    let config = AnalysisConfig {
        min_messages: args.min_messages,
        ..AnalysisConfig::with_strategy(args.strategy.into())
    };
    let batch = InboxAnalysis::open(&args.root, config)
        .with_context(|| format!("cannot analyze export at {}", args.root.display()))?;
    let report = batch.report();
    if args.json {
        return print_json(&report);
    }
    render_batch(&report);
    Ok(())
}

fn render_conversation(report: &ConversationReport) {
    let [first, second] = &report.participants;
    println!("{}", report.verdict.text);
    println!();
    println!(
        "{first} and {second}: {} messages across {} conversations{}",
        report.message_count,
        report.segment_count,
        date_span(
            report.first_message_at.as_deref(),
            report.last_message_at.as_deref()
        ),
    );
    let signals = &report.signals;
    println!(
        "Conversations opened: {}",
        pair_line(&report.participants, signals.conversation_openers)
    );
    println!(
        "Conversations closed: {}",
        pair_line(&report.participants, signals.conversation_closers)
    );
    println!(
        "75th percentile message length: {}",
        pair_line(&report.participants, signals.message_length_p75)
    );
    println!(
        "Questions asked: {}",
        pair_line(&report.participants, signals.questions_asked)
    );
    println!(
        "{:.0}th percentile response time (ms): {}",
        report.strategy.response_percentile(),
        pair_line(&report.participants, signals.response_time_percentile)
    );
}

fn render_batch(report: &BatchReport) {
    if let Some(user) = &report.current_user {
        println!("Current user: {user}");
        println!();
    }
    if report.conversations.is_empty() {
        println!("No conversations matched the minimum message count.");
        return;
    }
    for entry in &report.conversations {
        println!("{}", ranked_line(entry));
    }
    println!();
    println!("Your most active conversations:");
    for entry in &report.most_active {
        println!("{}", ranked_line(entry));
    }
}

fn ranked_line(entry: &RankedConversation) -> String {
    format!(
        "{} ({} messages, {} conversations)",
        entry.verdict.text, entry.message_count, entry.segment_count
    )
}

fn pair_line(participants: &[String; 2], values: PairValues) -> String {
    format!(
        "{}: {}, {}: {}",
        participants[0],
        format_value(values.first),
        participants[1],
        format_value(values.second)
    )
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn date_span(first: Option<&str>, last: Option<&str>) -> String {
    match (first, last) {
        (Some(first), Some(last)) => {
            let from = first.get(..10).unwrap_or(first);
            let to = last.get(..10).unwrap_or(last);
            format!(" ({from} to {to})")
        }
        _ => String::new(),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_values_render_without_decimals() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(7.25), "7.25");
        assert_eq!(format_value(11.5), "11.50");
    }

    #[test]
    fn date_span_clips_timestamps_to_dates() {
        let span = date_span(
            Some("2021-03-04T08:00:00+00:00"),
            Some("2022-01-09T23:59:59+00:00"),
        );
        assert_eq!(span, " (2021-03-04 to 2022-01-09)");
        assert_eq!(date_span(None, None), "");
    }
}
