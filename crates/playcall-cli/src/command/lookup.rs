use std::{fmt::Write as _, path::PathBuf};

use playcall_engine::{PlayDistribution, Situation};
use serde::Serialize;

use crate::{command::TreeArg, output::ReportOutput};

const PERCENTILE_POINTS: [f32; 3] = [25.0, 50.0, 75.0];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LookupArg {
    #[clap(flatten)]
    tree: TreeArg,
    /// Down number (0-4)
    #[arg(long)]
    down: i32,
    /// Yards needed for a first down
    #[arg(long)]
    to_go: i32,
    /// Yards to the opponent's goal line
    #[arg(long)]
    yard_line: i32,
    /// Minutes left in the game
    #[arg(long)]
    minutes: i32,
    /// Our score
    #[arg(long, default_value_t = 0)]
    score: i32,
    /// The opponent's score
    #[arg(long, default_value_t = 0)]
    opponent_score: i32,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct LookupResult<'a> {
    situation: Situation,
    plays: &'a PlayDistribution,
}

pub(crate) fn run(arg: &LookupArg) -> anyhow::Result<()> {
    let situation = Situation::from_raw(
        arg.down,
        arg.to_go,
        arg.yard_line,
        arg.minutes,
        arg.score,
        arg.opponent_score,
    )?;
    let (_store, tree) = arg.tree.load_tree()?;
    let plays = tree.find_plays(&situation);

    let mut output = ReportOutput::create(arg.output.as_deref())?;
    if arg.json {
        let result = LookupResult { situation, plays };
        output.emit("lookup result", |w| {
            serde_json::to_writer_pretty(&mut *w, &result)?;
            writeln!(w)
        })?;
    } else {
        let text = format_plays(&situation, plays);
        output.emit("lookup result", |w| w.write_all(text.as_bytes()))?;
    }
    Ok(())
}

fn format_plays(situation: &Situation, plays: &PlayDistribution) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "Down {}, {}, {}, {}, {}",
        situation.down,
        situation.distance_needed,
        situation.field_location,
        situation.time_remaining,
        situation.score_differential,
    );
    if plays.is_empty() {
        text.push_str("No plays recorded for this situation\n");
        return text;
    }
    for (play_type, summary) in plays.iter() {
        let _ = writeln!(text, "{play_type}: {summary}");
        let percentiles = summary.percentiles(&PERCENTILE_POINTS);
        let _ = write!(text, "  plays:{} dist", summary.play_count());
        for (point, value) in percentiles.iter() {
            let _ = write!(text, " P{point}:{value}");
        }
        let overall = summary.overall();
        let _ = writeln!(
            text,
            " overall avg dist:{} overall dist var:{} overall Turnover pct:{}",
            overall.average_distance, overall.distance_std_dev, overall.turnover_per_mille
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use playcall_engine::{PlayType, RawPlay, RecordStore, TreeNode};

    use super::*;

    #[test]
    fn test_format_plays() {
        let mut store = RecordStore::new();
        for gained in [2, 4, 6, 8] {
            store
                .insert(RawPlay {
                    play_type: PlayType::RunRight,
                    down: 2,
                    distance_needed: 3,
                    yard_line: 30,
                    minutes: 10,
                    own_score: 3,
                    opp_score: 0,
                    distance_gained: gained,
                    turned_over: false,
                })
                .unwrap();
        }
        store.finalize().unwrap();
        let tree =
            TreeNode::build(store.index_set().unwrap(), &store, store.baseline().unwrap()).unwrap();
        let situation = Situation::from_raw(2, 3, 30, 10, 3, 0).unwrap();

        let text = format_plays(&situation, tree.find_plays(&situation));
        assert_eq!(
            text,
            "Down 2, one to four yards, between red zones, Outside two minute warning, \
             Up 7 or less points\n\
             Run Right: pct of category:1000 pct of all type plays:1000 avg dist:5 dist var:2 \
             Turnover pct:0\n  \
             plays:4 dist P25:4 P50:6 P75:8 overall avg dist:5 overall dist var:2 \
             overall Turnover pct:0\n"
        );
    }

    #[test]
    fn test_format_empty_plays() {
        let situation = Situation::from_raw(4, 1, 5, 1, 0, 21).unwrap();
        let text = format_plays(&situation, &PlayDistribution::new());
        assert!(text.ends_with("No plays recorded for this situation\n"));
    }
}
