use super::timestamp::{TimestampFormatter, UtcFormatter};
use crate::model::PlayerId;
use crate::tally::TallyResult;
use itertools::Itertools;

const MAJORITY_BANNER: &str = "- Majority has been reached -";
const SEPARATOR: &str = "- - - - -";

/// One aligned line of the scoreboard
#[derive(Debug)]
struct Row {
    label: String,
    size: u32,
    bonus: u32,
    voters: String,
}

impl Row {
    fn format(&self, label_width: usize, size_width: usize) -> String {
        let bonus = if self.bonus > 0 {
            format!(" [+{}]", self.bonus)
        } else {
            String::new()
        };

        format!(
            "{:<lw$} {:>sw$}{} - {}",
            self.label,
            self.size,
            bonus,
            self.voters,
            lw = label_width,
            sw = size_width
        )
    }
}

/// Render a vote count as plain text, showing deferred majority times in UTC
pub fn render(result: &TallyResult) -> String {
    render_with(result, &UtcFormatter)
}

/// Render a vote count as plain text
pub fn render_with(result: &TallyResult, formatter: &dyn TimestampFormatter) -> String {
    let wagon_rows = wagon_rows(result);
    let skipping = skipping_row(result);
    let abstaining = abstaining_row(result);

    // Column widths cover every row, including Skipping/Abstaining
    let all_rows = || {
        wagon_rows
            .iter()
            .chain(skipping.iter())
            .chain(abstaining.iter())
    };
    let label_width = all_rows()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);
    let size_width = all_rows()
        .map(|row| row.size.to_string().len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        format!(
            "Day {} Votecount {}",
            result.round.round, result.round.iteration
        ),
        String::new(),
    ];

    if result.majority_reached {
        lines.push(MAJORITY_BANNER.to_string());
        lines.push(String::new());
    }

    if wagon_rows.is_empty() {
        lines.push("None".to_string());
    }
    for row in &wagon_rows {
        lines.push(row.format(label_width, size_width));
    }

    if skipping.is_some() || abstaining.is_some() {
        lines.push(String::new());
        for row in skipping.iter().chain(abstaining.iter()) {
            lines.push(row.format(label_width, size_width));
        }
    }

    if !result.ineligible_targets.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Cannot Be Voted: {}",
            result
                .ineligible_targets
                .iter()
                .map(|id| result.display_name(id))
                .join(", ")
        ));
    }

    let player_count = result.players.len();
    if result.majority_enabled {
        lines.push(String::new());
        lines.push(SEPARATOR.to_string());
        lines.push(format!(
            "With {} players, majority is {} votes",
            player_count, result.majority_threshold
        ));
    } else if let Some(after) = result.majority_enabled_after {
        lines.push(String::new());
        lines.push(format!(
            "With {} players, majority of {} will be enabled at {}",
            player_count,
            result.majority_threshold,
            formatter.format(after)
        ));
    }

    lines.join("\n")
}

/// Voter name with a `[xN]` marker for weighted votes
fn weighted_name(result: &TallyResult, id: &PlayerId) -> String {
    let name = result.display_name(id);
    match result.vote_weight(id) {
        weight if weight > 1 => format!("{} [x{}]", name, weight),
        _ => name.to_string(),
    }
}

/// Wagons with voters, then bonus-only wagons in player order
fn wagon_rows(result: &TallyResult) -> Vec<Row> {
    let mut rows: Vec<Row> = result
        .active_wagons()
        .map(|wagon| Row {
            label: format!("{}: ", result.display_name(&wagon.target)),
            size: result.wagon_weight(&wagon.target),
            bonus: result.bonus_votes(&wagon.target),
            voters: wagon
                .voters
                .iter()
                .map(|id| weighted_name(result, id))
                .join(", "),
        })
        .collect();

    let bonus_only = result.players.iter().filter(|p| {
        p.bonus_votes > 0 && !result.active_wagons().any(|w| w.target == p.id)
    });
    for player in bonus_only {
        rows.push(Row {
            label: format!("{}: ", player.display_name),
            size: player.bonus_votes,
            bonus: player.bonus_votes,
            voters: "Nobody".to_string(),
        });
    }

    rows
}

fn skipping_row(result: &TallyResult) -> Option<Row> {
    if result.voting_no_resolution.is_empty() {
        return None;
    }

    Some(Row {
        label: "Skipping: ".to_string(),
        size: result.no_resolution_weight(),
        bonus: 0,
        voters: result
            .voting_no_resolution
            .iter()
            .map(|id| result.display_name(id))
            .join(", "),
    })
}

/// Size is the number of abstainers, not their combined weight
fn abstaining_row(result: &TallyResult) -> Option<Row> {
    if result.abstaining.is_empty() {
        return None;
    }

    Some(Row {
        label: "Abstaining: ".to_string(),
        size: result.abstaining.len() as u32,
        bonus: 0,
        voters: result
            .abstaining
            .iter()
            .map(|id| weighted_name(result, id))
            .join(", "),
    })
}
