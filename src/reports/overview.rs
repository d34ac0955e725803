use super::timestamp::TimestampFormatter;
use crate::model::{Player, TallySettings};

fn toggle(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

fn player_markers(player: &Player) -> Vec<String> {
    let mut markers = Vec::new();
    if player.vote_weight != 1 {
        markers.push(format!("x{}", player.vote_weight));
    }
    if player.bonus_votes > 0 {
        markers.push(format!("+{}", player.bonus_votes));
    }
    if !player.eligible {
        markers.push("cannot be voted".to_string());
    }
    markers
}

/// Summary of a vote counter's configuration: toggles, current round and
/// the numbered player list
pub fn render_overview(
    settings: &TallySettings,
    players: &[Player],
    formatter: &dyn TimestampFormatter,
) -> String {
    let mut lines = vec![
        "Toggles".to_string(),
        format!("Majority: {}", toggle(settings.majority_enabled)),
        format!("No-Resolution: {}", toggle(settings.no_resolution_enabled)),
        format!(
            "Lock Votes: {}",
            toggle(settings.votes_locked_after_majority)
        ),
    ];
    if let Some(after) = settings.majority_enabled_after {
        lines.push(format!("Timed Majority: {}", formatter.format(after)));
    }

    lines.push(String::new());
    lines.push("State".to_string());
    lines.push(settings.round.to_string());

    lines.push(String::new());
    lines.push("Players".to_string());
    if players.is_empty() {
        lines.push("None".to_string());
    }
    for (i, player) in players.iter().enumerate() {
        let markers = player_markers(player);
        if markers.is_empty() {
            lines.push(format!("{}. {}", i + 1, player.display_name));
        } else {
            lines.push(format!(
                "{}. {} [{}]",
                i + 1,
                player.display_name,
                markers.join(", ")
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoundLabel;
    use crate::reports::timestamp::UtcFormatter;
    use chrono::{TimeZone, Utc};

    #[test]
    fn lists_players_with_markers() {
        let settings = TallySettings {
            majority_enabled: true,
            majority_enabled_after: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap()),
            round: RoundLabel {
                round: 3,
                iteration: 2,
            },
            ..TallySettings::default()
        };
        let players = vec![
            Player::new("a", "Alice"),
            Player::new("b", "Bob").with_vote_weight(2),
            Player::new("c", "Cat").with_bonus_votes(1).ineligible(),
        ];

        let expected = [
            "Toggles",
            "Majority: on",
            "No-Resolution: off",
            "Lock Votes: on",
            "Timed Majority: 2024-01-02 03:04 UTC",
            "",
            "State",
            "Day 3, VC 2",
            "",
            "Players",
            "1. Alice",
            "2. Bob [x2]",
            "3. Cat [+1, cannot be voted]",
        ]
        .join("\n");
        assert_eq!(render_overview(&settings, &players, &UtcFormatter), expected);
    }

    #[test]
    fn empty_roster_shows_none() {
        let text = render_overview(&TallySettings::default(), &[], &UtcFormatter);
        assert!(text.ends_with("Players\nNone"));
    }
}
