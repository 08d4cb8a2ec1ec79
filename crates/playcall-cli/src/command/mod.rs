use std::path::PathBuf;

use clap::{Parser, Subcommand};
use playcall_engine::{BuildParams, RecordStore, TreeNode};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::loader::{self, Matchup};

use self::{build::BuildArg, lookup::LookupArg};

mod build;
mod lookup;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Build a play-call tree for a matchup and render it as a report
    Build(#[clap(flatten)] BuildArg),
    /// Build a play-call tree and look up the plays for one game situation
    Lookup(#[clap(flatten)] LookupArg),
}

/// Play data selection and tree construction options shared by all modes.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TreeArg {
    /// CSV play files to load
    #[arg(required = true)]
    plays: Vec<PathBuf>,
    /// Our team, as spelled in the play files
    #[arg(long)]
    team: String,
    /// The opposing team
    #[arg(long)]
    opponent: String,
    /// Teams whose offense resembles ours, comma separated
    #[arg(long, value_delimiter = ',')]
    similar_us: Vec<String>,
    /// Teams whose defense resembles the opponent's, comma separated
    #[arg(long, value_delimiter = ',')]
    similar_opponent: Vec<String>,
    /// Keep over-fit leaves instead of pruning them
    #[arg(long)]
    no_prune: bool,
    /// Minimum information gain ratio for an attribute to be split on
    #[arg(
        long,
        default_value_t = BuildParams::DEFAULT_MIN_GAIN_RATIO,
        value_parser = parse_gain_ratio,
    )]
    min_gain_ratio: f64,
}

fn parse_gain_ratio(s: &str) -> Result<f64, String> {
    let ratio = s.parse::<f64>().map_err(|e| e.to_string())?;
    if !ratio.is_finite() {
        return Err(format!("gain ratio must be a finite number, got {s}"));
    }
    Ok(ratio)
}

impl TreeArg {
    pub(crate) fn matchup(&self) -> Matchup {
        Matchup {
            team: self.team.clone(),
            opponent: self.opponent.clone(),
            similar_to_team: self.similar_us.clone(),
            similar_to_opponent: self.similar_opponent.clone(),
        }
    }

    /// Loads the selected plays and builds the (optionally pruned) tree.
    pub(crate) fn load_tree(&self) -> anyhow::Result<(RecordStore, TreeNode)> {
        let store = loader::load_store(&self.plays, &self.matchup())?;
        info!(records = store.len(), "building tree");

        let params = BuildParams {
            min_gain_ratio: self.min_gain_ratio,
        };
        let mut tree =
            TreeNode::build_with(store.index_set()?, &store, store.baseline()?, &params)?;
        info!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "tree built"
        );
        if !self.no_prune {
            tree.prune();
            info!(
                leaves = tree.leaf_count(),
                depth = tree.depth(),
                "tree pruned"
            );
        }
        Ok((store, tree))
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Build(arg) => build::run(&arg)?,
        Mode::Lookup(arg) => lookup::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gain_ratio() {
        assert_eq!(parse_gain_ratio("0.05"), Ok(0.05));
        assert_eq!(parse_gain_ratio("0"), Ok(0.0));
        assert!(parse_gain_ratio("NaN").is_err());
        assert!(parse_gain_ratio("inf").is_err());
        assert!(parse_gain_ratio("high").is_err());
    }
}
