//! Loading vote sessions (settings, players and the vote log) from JSON.

use crate::model::{Player, TallySettings, VoteEvent};
use crate::tally::{self, Replay, TallyResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid session: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Everything one vote count needs, as handed over by the store that owns
/// the vote log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSession {
    #[serde(default)]
    pub settings: TallySettings,
    pub players: Vec<Player>,
    #[serde(default)]
    pub events: Vec<VoteEvent>,
}

impl VoteSession {
    /// Read and validate a session file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let session: VoteSession = serde_json::from_str(json)?;
        session.validate()?;
        Ok(session)
    }

    /// Check the player list. Events are not checked here; unknown voters
    /// and targets turn into tally warnings instead.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for player in &self.players {
            if !seen.insert(&player.id) {
                return Err(SessionError::Invalid(format!(
                    "duplicate player id {}",
                    player.id
                )));
            }
            if player.vote_weight == 0 {
                return Err(SessionError::Invalid(format!(
                    "player {} has a vote weight of 0",
                    player.id
                )));
            }
            if player.display_name.trim().is_empty() {
                return Err(SessionError::Invalid(format!(
                    "player {} has an empty name",
                    player.id
                )));
            }
        }

        Ok(())
    }

    pub fn tally(&self, now: DateTime<Utc>) -> TallyResult {
        tally::tally(&self.players, &self.events, &self.settings, now)
    }

    pub fn replay(&self, now: DateTime<Utc>) -> Replay<'_> {
        tally::replay(&self.players, &self.events, &self.settings, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_document() {
        let session = VoteSession::from_json(
            r#"{
                "settings": { "majorityEnabled": true, "round": { "round": 2, "iteration": 4 } },
                "players": [
                    { "id": "1", "displayName": "Alice" },
                    { "id": "2", "displayName": "Bob", "voteWeight": 2 }
                ],
                "events": [
                    { "voterId": "1", "targetId": "2", "timestamp": "2024-05-01T12:00:00Z" },
                    { "voterId": "2", "isNoResolution": true, "timestamp": "2024-05-01T12:01:00Z" }
                ]
            }"#,
        )
        .unwrap();

        assert!(session.settings.majority_enabled);
        assert_eq!(session.settings.round.round, 2);
        assert_eq!(session.players[1].vote_weight, 2);
        assert_eq!(session.events.len(), 2);
        assert!(session.events[1].is_no_resolution);
    }

    #[test]
    fn rejects_duplicate_players() {
        let err = VoteSession::from_json(
            r#"{ "players": [
                { "id": "1", "displayName": "Alice" },
                { "id": "1", "displayName": "Alicia" }
            ] }"#,
        )
        .unwrap_err();

        assert!(matches!(err, SessionError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_vote_weight() {
        let err = VoteSession::from_json(
            r#"{ "players": [{ "id": "1", "displayName": "Alice", "voteWeight": 0 }] }"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("vote weight of 0"));
    }

    #[test]
    fn reports_malformed_json() {
        let err = VoteSession::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = VoteSession::load(Path::new("/nonexistent/session.json")).unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
    }
}
