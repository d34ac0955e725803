use super::Roster;
use crate::model::PlayerId;

/// Minimum effective weight a wagon needs to end the round
pub fn majority_threshold(player_count: usize) -> u32 {
    (player_count / 2 + 1) as u32
}

/// Sum of vote weights, capped at `u32::MAX`
pub fn saturating_sum<I>(weights: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    weights
        .into_iter()
        .fold(0u32, |total, weight| total.saturating_add(weight))
}

/// Effective weight of a wagon: the voters' weights plus the target's bonus
/// votes. Bonus votes only count once somebody is actually on the wagon.
pub fn wagon_weight(roster: &Roster, target: &PlayerId, voters: &[PlayerId]) -> u32 {
    let voter_weight = saturating_sum(voters.iter().map(|id| roster.vote_weight(id)));

    if voter_weight > 0 {
        voter_weight.saturating_add(roster.bonus_votes(target))
    } else {
        0
    }
}

/// Weight of the heaviest wagon (0 when there are none)
pub fn top_wagon_weight<'a, I>(roster: &Roster, wagons: I) -> u32
where
    I: IntoIterator<Item = (&'a PlayerId, &'a [PlayerId])>,
{
    wagons
        .into_iter()
        .map(|(target, voters)| wagon_weight(roster, target, voters))
        .max()
        .unwrap_or(0)
}
