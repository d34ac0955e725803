//! Vote count reconstruction.
//!
//! The vote log is replayed from scratch on every run. Each event is folded
//! into a `TallyState` record that is passed forward, so the state after
//! event `n` is a value that can be snapshotted and rendered on its own.

pub mod majority;

use crate::model::{Player, PlayerId, RoundLabel, TallySettings, VoteChoice, VoteEvent};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

pub use majority::majority_threshold;

/// Player configuration indexed by id, in the order the players were given.
/// Later duplicates of an id are dropped.
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
}

impl Roster {
    pub fn new(players: &[Player]) -> Self {
        let mut roster = Roster {
            players: Vec::with_capacity(players.len()),
            index: HashMap::with_capacity(players.len()),
        };

        for player in players {
            if roster.index.contains_key(&player.id) {
                continue;
            }
            roster.index.insert(player.id.clone(), roster.players.len());
            roster.players.push(player.clone());
        }

        roster
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.index.get(id).map(|&i| &self.players[i])
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn vote_weight(&self, id: &PlayerId) -> u32 {
        self.get(id).map(|p| p.vote_weight).unwrap_or(1)
    }

    pub fn bonus_votes(&self, id: &PlayerId) -> u32 {
        self.get(id).map(|p| p.bonus_votes).unwrap_or(0)
    }
}

/// Voters currently supporting the elimination of `target`, in vote order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wagon {
    pub target: PlayerId,
    pub voters: Vec<PlayerId>,
}

/// Something odd in the vote log. The tally still completes; these are
/// handed back so the caller can decide whether to surface them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TallyWarning {
    #[error("event {index}: {voter} voted for {target} and for no resolution at once; counted as no resolution")]
    Malformed {
        index: usize,
        voter: PlayerId,
        target: PlayerId,
    },
    #[error("event {index}: voter {voter} is not a player; ignored")]
    UnknownVoter { index: usize, voter: PlayerId },
    #[error("event {index}: {voter} voted for {target}, who is not a player; ignored")]
    UnknownTarget {
        index: usize,
        voter: PlayerId,
        target: PlayerId,
    },
}

/// Point-in-time vote count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResult {
    pub round: RoundLabel,
    pub players: Vec<Player>,
    /// Wagons with at least one voter, in the order they were opened. A wagon
    /// is dropped once its last voter leaves.
    pub wagons: Vec<Wagon>,
    pub voting_no_resolution: Vec<PlayerId>,
    pub abstaining: Vec<PlayerId>,
    pub ineligible_targets: Vec<PlayerId>,
    pub majority_reached: bool,
    /// Whether majority checking was active at the end of the run, either
    /// configured or switched on by `majority_enabled_after`
    pub majority_enabled: bool,
    pub majority_enabled_after: Option<DateTime<Utc>>,
    pub majority_threshold: u32,
    /// Events skipped because votes were locked after majority
    pub frozen_events: usize,
    pub warnings: Vec<TallyWarning>,
}

impl TallyResult {
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Display name, falling back to the raw id for unknown players
    pub fn display_name<'a>(&'a self, id: &'a PlayerId) -> &'a str {
        self.player(id)
            .map(|p| p.display_name.as_str())
            .unwrap_or_else(|| id.as_str())
    }

    pub fn vote_weight(&self, id: &PlayerId) -> u32 {
        self.player(id).map(|p| p.vote_weight).unwrap_or(1)
    }

    pub fn bonus_votes(&self, id: &PlayerId) -> u32 {
        self.player(id).map(|p| p.bonus_votes).unwrap_or(0)
    }

    pub fn wagon(&self, target: &PlayerId) -> Option<&Wagon> {
        self.wagons.iter().find(|w| &w.target == target)
    }

    /// Wagons that currently have at least one voter
    pub fn active_wagons(&self) -> impl Iterator<Item = &Wagon> {
        self.wagons.iter().filter(|w| !w.voters.is_empty())
    }

    /// Effective weight of the wagon on `target`, bonus votes included
    pub fn wagon_weight(&self, target: &PlayerId) -> u32 {
        let voter_weight = self
            .wagon(target)
            .map(|w| majority::saturating_sum(w.voters.iter().map(|id| self.vote_weight(id))))
            .unwrap_or(0);

        if voter_weight > 0 {
            voter_weight.saturating_add(self.bonus_votes(target))
        } else {
            0
        }
    }

    /// Combined weight of everyone voting for no resolution
    pub fn no_resolution_weight(&self) -> u32 {
        majority::saturating_sum(
            self.voting_no_resolution
                .iter()
                .map(|id| self.vote_weight(id)),
        )
    }
}

/// Inputs shared by every step of one replay
struct TallyContext<'a> {
    roster: Roster,
    settings: &'a TallySettings,
    now: DateTime<Utc>,
    threshold: u32,
}

impl<'a> TallyContext<'a> {
    fn new(players: &[Player], settings: &'a TallySettings, now: DateTime<Utc>) -> Self {
        let roster = Roster::new(players);
        let threshold = majority_threshold(roster.len());
        Self {
            roster,
            settings,
            now,
            threshold,
        }
    }

    fn deferred_majority_elapsed(&self) -> bool {
        self.settings
            .majority_enabled_after
            .map_or(false, |after| self.now > after)
    }
}

/// Where a voter ends up after an event
enum Placement {
    Wagon(PlayerId),
    NoResolution,
    Abstain,
}

/// Replay state carried from one event to the next
#[derive(Debug, Clone, Default)]
struct TallyState {
    wagons: Vec<Wagon>,
    voting_no_resolution: Vec<PlayerId>,
    abstaining: Vec<PlayerId>,
    /// Latch: once majority checking is on it stays on
    majority_enabled: bool,
    majority_reached: bool,
    frozen_events: usize,
    warnings: Vec<TallyWarning>,
}

impl TallyState {
    fn new(ctx: &TallyContext<'_>) -> Self {
        Self {
            abstaining: ctx.roster.players().iter().map(|p| p.id.clone()).collect(),
            majority_enabled: ctx.settings.majority_enabled,
            ..Self::default()
        }
    }

    /// Fold one event into the state
    fn apply(mut self, index: usize, event: &VoteEvent, ctx: &TallyContext<'_>) -> Self {
        self = self.settle(ctx);

        if self.majority_reached && ctx.settings.votes_locked_after_majority {
            if self.frozen_events == 0 {
                debug!(index, "majority reached, ignoring the rest of the vote log");
            }
            self.frozen_events += 1;
            return self;
        }

        let voter = &event.voter_id;
        if ctx.roster.get(voter).is_none() {
            self.warn(TallyWarning::UnknownVoter {
                index,
                voter: voter.clone(),
            });
            return self;
        }

        if let (true, Some(target)) = (event.is_malformed(), &event.target_id) {
            self.warn(TallyWarning::Malformed {
                index,
                voter: voter.clone(),
                target: target.clone(),
            });
        }

        let placement = match event.choice() {
            VoteChoice::Player(target) => match ctx.roster.get(target) {
                Some(player) if player.eligible => Placement::Wagon(target.clone()),
                Some(_) => Placement::Abstain,
                None => {
                    self.warn(TallyWarning::UnknownTarget {
                        index,
                        voter: voter.clone(),
                        target: target.clone(),
                    });
                    return self;
                }
            },
            VoteChoice::NoResolution if ctx.settings.no_resolution_enabled => {
                Placement::NoResolution
            }
            VoteChoice::NoResolution | VoteChoice::Unvote => Placement::Abstain,
        };

        self.place(voter, placement, &ctx.roster);
        self.settle(ctx)
    }

    /// Move `voter` out of wherever they were and into `placement`
    fn place(&mut self, voter: &PlayerId, placement: Placement, roster: &Roster) {
        let focus = match &placement {
            Placement::Wagon(target) => Some(target),
            _ => None,
        };

        for wagon in self.wagons.iter_mut() {
            if Some(&wagon.target) != focus {
                wagon.voters.retain(|id| id != voter);
            }
        }
        self.voting_no_resolution.retain(|id| id != voter);

        match placement {
            Placement::Wagon(target) => {
                let position = match self.wagons.iter().position(|w| w.target == target) {
                    Some(position) => position,
                    None => {
                        self.wagons.push(Wagon {
                            target,
                            voters: Vec::new(),
                        });
                        self.wagons.len() - 1
                    }
                };
                let voters = &mut self.wagons[position].voters;
                if !voters.contains(voter) {
                    voters.push(voter.clone());
                }
            }
            Placement::NoResolution => self.voting_no_resolution.push(voter.clone()),
            Placement::Abstain => {}
        }
        self.wagons.retain(|w| !w.voters.is_empty());

        let wagons = &self.wagons;
        let voting_no_resolution = &self.voting_no_resolution;
        self.abstaining = roster
            .players()
            .iter()
            .map(|p| &p.id)
            .filter(|id| {
                !voting_no_resolution.contains(*id)
                    && !wagons.iter().any(|w| w.voters.contains(*id))
            })
            .cloned()
            .collect();
    }

    /// Flip the deferred-majority latch if due and recompute the majority check
    fn settle(mut self, ctx: &TallyContext<'_>) -> Self {
        if ctx.deferred_majority_elapsed() {
            self.majority_enabled = true;
        }

        let top = majority::top_wagon_weight(
            &ctx.roster,
            self.wagons.iter().map(|w| (&w.target, w.voters.as_slice())),
        );
        self.majority_reached = self.majority_enabled && top >= ctx.threshold;
        self
    }

    fn warn(&mut self, warning: TallyWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn snapshot(&self, ctx: &TallyContext<'_>) -> TallyResult {
        let players = ctx.roster.players();
        TallyResult {
            round: ctx.settings.round,
            players: players.to_vec(),
            wagons: self.wagons.clone(),
            voting_no_resolution: self.voting_no_resolution.clone(),
            abstaining: self.abstaining.clone(),
            ineligible_targets: players
                .iter()
                .filter(|p| !p.eligible)
                .map(|p| p.id.clone())
                .collect(),
            majority_reached: self.majority_reached,
            majority_enabled: self.majority_enabled,
            majority_enabled_after: ctx.settings.majority_enabled_after,
            majority_threshold: ctx.threshold,
            frozen_events: self.frozen_events,
            warnings: self.warnings.clone(),
        }
    }
}

/// Events in timestamp order, paired with their index in the caller's log.
/// The sort is stable so ties keep log order.
fn sorted_events(events: &[VoteEvent]) -> Vec<(usize, &VoteEvent)> {
    let mut sorted: Vec<_> = events.iter().enumerate().collect();
    sorted.sort_by_key(|(_, event)| event.timestamp);
    sorted
}

/// Replay the whole vote log and return the resulting vote count
pub fn tally(
    players: &[Player],
    events: &[VoteEvent],
    settings: &TallySettings,
    now: DateTime<Utc>,
) -> TallyResult {
    let ctx = TallyContext::new(players, settings, now);

    sorted_events(events)
        .into_iter()
        .fold(TallyState::new(&ctx), |state, (index, event)| {
            state.apply(index, event, &ctx)
        })
        .settle(&ctx)
        .snapshot(&ctx)
}

/// Replay the vote log one event at a time, yielding the vote count after
/// each event (in timestamp order). The last snapshot matches [`tally`].
pub fn replay<'a>(
    players: &[Player],
    events: &'a [VoteEvent],
    settings: &'a TallySettings,
    now: DateTime<Utc>,
) -> Replay<'a> {
    let ctx = TallyContext::new(players, settings, now);
    let state = TallyState::new(&ctx);
    Replay {
        events: sorted_events(events).into_iter(),
        ctx,
        state,
    }
}

pub struct Replay<'a> {
    ctx: TallyContext<'a>,
    events: std::vec::IntoIter<(usize, &'a VoteEvent)>,
    state: TallyState,
}

impl<'a> Iterator for Replay<'a> {
    type Item = TallyResult;

    fn next(&mut self) -> Option<TallyResult> {
        let (index, event) = self.events.next()?;
        self.state = std::mem::take(&mut self.state).apply(index, event, &self.ctx);
        Some(self.state.snapshot(&self.ctx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

impl<'a> ExactSizeIterator for Replay<'a> {}
