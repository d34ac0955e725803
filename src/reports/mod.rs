//! Plain-text rendering of vote counts and vote counter settings.
//!
//! Nothing here applies platform markup; callers embedding the text in a
//! chat message wrap it themselves.

pub mod overview;
pub mod timestamp;
pub mod votecount;

pub use overview::render_overview;
pub use timestamp::{TimestampFormatter, UtcFormatter};
pub use votecount::{render, render_with};
