use super::print_warnings;
use chrono::{DateTime, Utc};
use colored::Colorize;
use instant::Instant;
use std::path::Path;
use vote_counter::reports::render;
use vote_counter::VoteSession;

pub fn tally(
    session_path: &Path,
    now: DateTime<Utc>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = VoteSession::load(session_path)?;

    let start = Instant::now();
    let result = session.tally(now);
    let elapsed_ms = start.elapsed().as_millis();

    eprintln!(
        "📊 Replayed {} events for {} players in {} ms",
        session.events.len().to_string().bright_yellow(),
        session.players.len().to_string().bright_yellow(),
        elapsed_ms.to_string().bright_green()
    );
    print_warnings(&result.warnings);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render(&result));
    }

    Ok(())
}
