//! Vote counting for social deduction games.
//!
//! [`tally::tally`] replays a vote log against the player list and produces a
//! [`tally::TallyResult`]; [`reports::render`] turns that into an aligned
//! plain-text scoreboard.

pub mod model;
pub mod reports;
pub mod session;
pub mod tally;

pub use model::{Player, PlayerId, RoundLabel, TallySettings, VoteEvent};
pub use session::{SessionError, VoteSession};
pub use tally::{replay, tally, TallyResult, TallyWarning, Wagon};
