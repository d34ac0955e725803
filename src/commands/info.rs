use super::print_warnings;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::Path;
use vote_counter::reports::{render_overview, UtcFormatter};
use vote_counter::VoteSession;

/// Validate a session file and dump its settings
pub fn info(session_path: &Path, now: DateTime<Utc>) -> Result<(), Box<dyn std::error::Error>> {
    let session = VoteSession::load(session_path)?;
    println!(
        "✅ {} is a valid vote session",
        session_path.display().to_string().bright_green()
    );
    println!();
    println!(
        "{}",
        render_overview(&session.settings, &session.players, &UtcFormatter)
    );
    println!();

    let result = session.tally(now);
    println!(
        "{}: {}",
        "Events".bright_white().bold(),
        session.events.len().to_string().bright_yellow()
    );
    println!(
        "{}: {}",
        "Majority threshold".bright_white().bold(),
        result.majority_threshold.to_string().bright_yellow()
    );
    if result.warnings.is_empty() {
        println!("{}", "No problems found in the vote log".bright_green());
    } else {
        print_warnings(&result.warnings);
    }

    Ok(())
}
