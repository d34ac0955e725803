use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque player identifier (a chat platform user id, in practice)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId(id.to_string())
    }
}

/// A player taking part in the vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    /// Multiplies the weight of every vote this player casts
    #[serde(default = "default_vote_weight")]
    pub vote_weight: u32,
    /// Added to any wagon on this player once it has at least one voter
    #[serde(default)]
    pub bonus_votes: u32,
    /// Whether this player may be the target of a vote
    #[serde(default = "default_true")]
    pub eligible: bool,
}

fn default_vote_weight() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Player {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            display_name: display_name.into(),
            vote_weight: default_vote_weight(),
            bonus_votes: 0,
            eligible: true,
        }
    }

    pub fn with_vote_weight(mut self, vote_weight: u32) -> Self {
        self.vote_weight = vote_weight;
        self
    }

    pub fn with_bonus_votes(mut self, bonus_votes: u32) -> Self {
        self.bonus_votes = bonus_votes;
        self
    }

    pub fn ineligible(mut self) -> Self {
        self.eligible = false;
        self
    }
}

/// One entry of the vote log, as recorded by whoever owns persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteEvent {
    pub voter_id: PlayerId,
    #[serde(default)]
    pub target_id: Option<PlayerId>,
    #[serde(default)]
    pub is_no_resolution: bool,
    pub timestamp: DateTime<Utc>,
}

impl VoteEvent {
    pub fn vote(voter: &str, target: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            voter_id: PlayerId::from(voter),
            target_id: Some(PlayerId::from(target)),
            is_no_resolution: false,
            timestamp,
        }
    }

    pub fn no_resolution(voter: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            voter_id: PlayerId::from(voter),
            target_id: None,
            is_no_resolution: true,
            timestamp,
        }
    }

    pub fn unvote(voter: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            voter_id: PlayerId::from(voter),
            target_id: None,
            is_no_resolution: false,
            timestamp,
        }
    }

    /// What this event asks for. An event carrying both a target and the
    /// no-resolution flag resolves to `NoResolution`; the flag wins.
    pub fn choice(&self) -> VoteChoice<'_> {
        match (&self.target_id, self.is_no_resolution) {
            (_, true) => VoteChoice::NoResolution,
            (Some(target), false) => VoteChoice::Player(target),
            (None, false) => VoteChoice::Unvote,
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.target_id.is_some() && self.is_no_resolution
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice<'a> {
    Player(&'a PlayerId),
    NoResolution,
    Unvote,
}

/// Round/iteration pair identifying which vote count this is ("Day 2, VC 3")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLabel {
    pub round: u32,
    pub iteration: u32,
}

impl Default for RoundLabel {
    fn default() -> Self {
        Self {
            round: 1,
            iteration: 1,
        }
    }
}

impl fmt::Display for RoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {}, VC {}", self.round, self.iteration)
    }
}

/// Vote counter toggles for one tally run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TallySettings {
    pub majority_enabled: bool,
    pub no_resolution_enabled: bool,
    /// Majority checking switches on once `now` is past this instant
    pub majority_enabled_after: Option<DateTime<Utc>>,
    pub votes_locked_after_majority: bool,
    pub round: RoundLabel,
}

impl Default for TallySettings {
    fn default() -> Self {
        Self {
            majority_enabled: false,
            no_resolution_enabled: false,
            majority_enabled_after: None,
            votes_locked_after_majority: true,
            round: RoundLabel::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn choice_prefers_no_resolution_on_malformed_event() {
        let mut event = VoteEvent::vote("a", "b", at(0));
        event.is_no_resolution = true;

        assert!(event.is_malformed());
        assert_eq!(event.choice(), VoteChoice::NoResolution);
    }

    #[test]
    fn choice_distinguishes_vote_and_unvote() {
        let target = PlayerId::from("b");
        assert_eq!(
            VoteEvent::vote("a", "b", at(0)).choice(),
            VoteChoice::Player(&target)
        );
        assert_eq!(VoteEvent::unvote("a", at(0)).choice(), VoteChoice::Unvote);
        assert!(!VoteEvent::unvote("a", at(0)).is_malformed());
    }

    #[test]
    fn player_defaults_from_json() {
        let player: Player =
            serde_json::from_str(r#"{"id": "42", "displayName": "Alice"}"#).unwrap();

        assert_eq!(player.id, PlayerId::from("42"));
        assert_eq!(player.vote_weight, 1);
        assert_eq!(player.bonus_votes, 0);
        assert!(player.eligible);
    }

    #[test]
    fn settings_defaults_lock_votes() {
        let settings: TallySettings = serde_json::from_str("{}").unwrap();
        assert!(settings.votes_locked_after_majority);
        assert!(!settings.majority_enabled);
        assert_eq!(settings.round, RoundLabel::default());
    }

    #[test]
    fn round_label_display() {
        let label = RoundLabel {
            round: 2,
            iteration: 5,
        };
        assert_eq!(label.to_string(), "Day 2, VC 5");
    }
}
