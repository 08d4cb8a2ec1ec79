use std::{fmt, io, path::Path};

use anyhow::Context;
use playcall_engine::{PlayType, RawPlay, RecordStore};
use serde::Deserialize;
use tracing::{debug, info};

/// Teams whose plays feed the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub team: String,
    pub opponent: String,
    pub similar_to_team: Vec<String>,
    pub similar_to_opponent: Vec<String>,
}

impl Matchup {
    /// Whether a play run by `offense` against `defense` is relevant.
    ///
    /// Our own offense counts against the opponent or against teams similar
    /// to it, and teams similar to us count against the opponent.
    pub fn selects(&self, offense: &str, defense: &str) -> bool {
        if offense == self.team {
            defense == self.opponent || self.similar_to_opponent.iter().any(|t| t == defense)
        } else {
            defense == self.opponent && self.similar_to_team.iter().any(|t| t == offense)
        }
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Us:{} Opponent: {} ", self.team, self.opponent)?;
        if !self.similar_to_team.is_empty() {
            f.write_str("Similiar to Us:")?;
            for team in &self.similar_to_team {
                write!(f, "{team} ")?;
            }
        }
        if !self.similar_to_opponent.is_empty() {
            f.write_str("Similiar to Other:")?;
            for team in &self.similar_to_opponent {
                write!(f, "{team} ")?;
            }
        }
        Ok(())
    }
}

/// One row of a play file.
///
/// `down` is empty for plays outside a down series (kickoffs, extra points).
#[derive(Debug, Clone, Deserialize)]
struct PlayRow {
    offense: String,
    defense: String,
    play_type: PlayType,
    down: Option<i32>,
    to_go: i32,
    yard_line: i32,
    minutes: i32,
    offense_score: i32,
    defense_score: i32,
    gained: i32,
    turnover: bool,
}

impl PlayRow {
    fn to_raw(&self) -> Option<RawPlay> {
        Some(RawPlay {
            play_type: self.play_type,
            down: self.down?,
            distance_needed: self.to_go,
            yard_line: self.yard_line,
            minutes: self.minutes,
            own_score: self.offense_score,
            opp_score: self.defense_score,
            distance_gained: self.gained,
            turned_over: self.turnover,
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub accepted: usize,
    pub without_down: usize,
}

/// Inserts the plays of `reader` selected by `matchup` into `store`.
pub fn load_plays<R>(
    reader: R,
    source: &str,
    matchup: &Matchup,
    store: &mut RecordStore,
) -> anyhow::Result<LoadStats>
where
    R: io::Read,
{
    let mut stats = LoadStats::default();
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (line, row) in csv_reader.deserialize::<PlayRow>().enumerate() {
        let row = row.with_context(|| format!("Failed to parse play {} in {source}", line + 1))?;
        stats.rows += 1;
        if !matchup.selects(&row.offense, &row.defense) {
            continue;
        }
        let Some(raw) = row.to_raw() else {
            stats.without_down += 1;
            continue;
        };
        store
            .insert(raw)
            .with_context(|| format!("Invalid play {} in {source}", line + 1))?;
        stats.accepted += 1;
    }
    debug!(source, ?stats, "loaded play file");
    Ok(stats)
}

/// Loads every play file in `paths` into a fresh, finalized store.
pub fn load_store<P>(paths: &[P], matchup: &Matchup) -> anyhow::Result<RecordStore>
where
    P: AsRef<Path>,
{
    let mut store = RecordStore::new();
    for path in paths {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open play file: {}", path.display()))?;
        let stats = load_plays(
            io::BufReader::new(file),
            &path.display().to_string(),
            matchup,
            &mut store,
        )?;
        info!(
            path = %path.display(),
            rows = stats.rows,
            accepted = stats.accepted,
            "loaded plays"
        );
    }
    store.finalize()?;
    anyhow::ensure!(
        store.is_finalized(),
        "No plays selected for {} against {}",
        matchup.team,
        matchup.opponent
    );
    Ok(store)
}
