use chrono::{DateTime, Utc};

/// Turns a timestamp into the string shown to players. The presentation
/// layer usually supplies its own (relative times, platform timestamp tags).
pub trait TimestampFormatter {
    fn format(&self, timestamp: DateTime<Utc>) -> String;
}

/// Plain UTC wall-clock time, minute precision
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcFormatter;

impl TimestampFormatter for UtcFormatter {
    fn format(&self, timestamp: DateTime<Utc>) -> String {
        timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}
