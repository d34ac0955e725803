mod info;
mod replay;
mod tally;

pub use info::info;
pub use replay::replay;
pub use tally::tally;

use colored::Colorize;
use vote_counter::TallyWarning;

fn print_warnings(warnings: &[TallyWarning]) {
    for warning in warnings {
        eprintln!("⚠️  {}", warning.to_string().yellow());
    }
}
