mod commands;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "votecount", about = "Replay a game's vote log and print the vote count")]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tally the vote log and print the current vote count.
    Tally {
        /// Vote session file (JSON)
        session: PathBuf,
        /// Evaluate timed majority as of this instant (RFC 3339) instead of now
        #[clap(long)]
        now: Option<DateTime<Utc>>,
        /// Print the tally result as JSON instead of the text report
        #[clap(long)]
        json: bool,
    },
    /// Print the vote count after every event in the log.
    Replay {
        /// Vote session file (JSON)
        session: PathBuf,
        /// Evaluate timed majority as of this instant (RFC 3339) instead of now
        #[clap(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Validate a vote session and dump its settings.
    Info {
        /// Vote session file (JSON)
        session: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();

    let outcome = match opts.command {
        Command::Tally { session, now, json } => {
            commands::tally(&session, now.unwrap_or_else(Utc::now), json)
        }
        Command::Replay { session, now } => {
            commands::replay(&session, now.unwrap_or_else(Utc::now))
        }
        Command::Info { session } => commands::info(&session, Utc::now()),
    };

    if let Err(e) = outcome {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
