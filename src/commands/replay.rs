use super::print_warnings;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::Path;
use vote_counter::reports::render;
use vote_counter::VoteSession;

/// Print the vote count as it stood after each event
pub fn replay(session_path: &Path, now: DateTime<Utc>) -> Result<(), Box<dyn std::error::Error>> {
    let session = VoteSession::load(session_path)?;
    let snapshots = session.replay(now);
    let total = snapshots.len();

    let mut last = None;
    for (i, snapshot) in snapshots.enumerate() {
        println!(
            "{}",
            format!("📨 After event {}/{}", i + 1, total).bright_cyan()
        );
        if snapshot.frozen_events > 0 {
            println!("{}", "🔒 Votes are locked".bright_magenta());
        }
        println!("{}\n", render(&snapshot));
        last = Some(snapshot);
    }

    match last {
        Some(result) => print_warnings(&result.warnings),
        None => println!("{}", "No events to replay".bright_yellow()),
    }

    Ok(())
}
