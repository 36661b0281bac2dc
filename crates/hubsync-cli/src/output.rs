//! Human-readable rendering of outcomes and reports

use colored::Colorize;

use hubsync_core::{Outcome, OutcomeStatus, SkipReason, SyncReport};

/// Print one outcome as soon as its record finishes.
pub fn print_outcome(outcome: &Outcome) {
    println!("{}", format_outcome(outcome));
}

/// Print the closing summary of a bulk run.
pub fn print_summary(report: &SyncReport) {
    println!();
    println!("{}", format_summary(report));
}

/// `LABEL  Kind id name  versions` followed by indented detail lines.
pub fn format_outcome(outcome: &Outcome) -> String {
    let label = match &outcome.status {
        OutcomeStatus::Skipped { .. } => format!("{:<7}", "SKIPPED").cyan().bold(),
        OutcomeStatus::Updated if outcome.created => format!("{:<7}", "CREATED").green().bold(),
        OutcomeStatus::Updated => format!("{:<7}", "UPDATED").green().bold(),
        OutcomeStatus::Failed { .. } => format!("{:<7}", "FAILED").red().bold(),
    };

    let mut headline = format!("{} {}", label, outcome.kind);
    let name = outcome.display_name();
    if !name.is_empty() {
        headline.push(' ');
        headline.push_str(&name);
    }
    if let Some(versions) = format_versions(outcome) {
        headline.push_str(&format!("  {}", versions.dimmed()));
    }

    let mut lines = vec![headline, format!("   {}", outcome.path.as_str().dimmed())];
    match &outcome.status {
        OutcomeStatus::Skipped {
            reason: SkipReason::NotOnRemote,
        } => lines.push(format!("   {}", "not on hub".dimmed())),
        OutcomeStatus::Failed { failure, message } => lines.push(format!(
            "   {} {}",
            format!("{:?}:", failure).red(),
            flatten(message)
        )),
        _ => {}
    }
    lines.join("\n")
}

fn format_versions(outcome: &Outcome) -> Option<String> {
    match (outcome.previous_version, outcome.version) {
        (Some(before), Some(after)) if before != after => Some(format!("v{} -> v{}", before, after)),
        (None, Some(after)) => Some(format!("v{}", after)),
        (Some(before), _) => Some(format!("v{}", before)),
        (None, None) => None,
    }
}

/// Join a multi-line server message into one line.
fn flatten(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_summary(report: &SyncReport) -> String {
    let counts = format!(
        "{} {}: {} updated, {} skipped, {} failed",
        report.outcomes.len(),
        if report.outcomes.len() == 1 { "record" } else { "records" },
        report.updated(),
        report.skipped(),
        report.failed()
    );
    if report.success() {
        format!("{} {}", "OK".green().bold(), counts)
    } else {
        format!("{} {}", "FAILED".red().bold(), counts)
    }
}
