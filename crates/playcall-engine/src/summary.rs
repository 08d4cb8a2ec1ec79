//! Statistics over groups of plays
//!
//! - [`OverallSummary`] condenses one play type over a set of plays
//! - [`Baseline`] holds the overall summary of every play type across the
//!   whole dataset
//! - [`DetailedSummary`] describes one play type within a tree node, relative
//!   to the node and to the baseline
//! - [`PlayDistribution`] maps the play types present in a node to their
//!   detailed summaries

use std::{collections::BTreeMap, fmt};

use playcall_stats::{descriptive::IntegerStats, percentiles::Percentiles};
use serde::Serialize;

use crate::{ConsistencyError, IndexSet, PlayRecord, PlayType, RecordStore};

/// `count` as a per-mille share of `total`, or 0 when `total` is 0.
fn per_mille(count: usize, total: usize) -> usize {
    (count * 1000).checked_div(total).unwrap_or(0)
}

/// Distance samples and turnover counts, grouped by play type.
#[derive(Debug, Default)]
struct TypeSamples {
    distances: [Vec<i32>; PlayType::LEN],
    turnovers: [usize; PlayType::LEN],
}

impl TypeSamples {
    fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PlayRecord>,
    {
        let mut samples = Self::default();
        for record in records {
            let slot = record.play_type().index();
            samples.distances[slot].push(record.distance_gained());
            if record.turned_over() {
                samples.turnovers[slot] += 1;
            }
        }
        samples
    }
}

/// Summary of one play type over a set of plays.
///
/// All values are truncating integers. Rates are per-mille.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverallSummary {
    pub average_distance: i32,
    pub distance_std_dev: i32,
    pub turnover_per_mille: usize,
    pub total_count: usize,
}

impl OverallSummary {
    /// Summarizes plays from their gained distances and turnover count.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_engine::OverallSummary;
    ///
    /// let summary = OverallSummary::from_samples(&[3, 7, -2, 12], 1);
    /// assert_eq!(summary.total_count, 4);
    /// assert_eq!(summary.average_distance, 5);
    /// assert_eq!(summary.distance_std_dev, 5);
    /// assert_eq!(summary.turnover_per_mille, 250);
    /// ```
    #[must_use]
    pub fn from_samples(distances: &[i32], turnover_count: usize) -> Self {
        Self::from_stats(
            IntegerStats::new(distances.iter().copied()),
            turnover_count,
        )
    }

    fn from_sorted_samples(sorted_distances: &[i32], turnover_count: usize) -> Self {
        Self::from_stats(IntegerStats::from_sorted(sorted_distances), turnover_count)
    }

    fn from_stats(stats: Option<IntegerStats>, turnover_count: usize) -> Self {
        let Some(stats) = stats else {
            return Self::default();
        };
        Self {
            average_distance: stats.mean,
            distance_std_dev: stats.std_dev,
            turnover_per_mille: per_mille(turnover_count, stats.count),
            total_count: stats.count,
        }
    }
}

/// Dataset-wide summary of every play type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Baseline {
    by_type: [OverallSummary; PlayType::LEN],
}

impl Baseline {
    /// Computes the baseline over `records`.
    ///
    /// Play types absent from `records` get an all-zero summary.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PlayRecord>,
    {
        let samples = TypeSamples::from_records(records);
        let by_type = PlayType::ALL.map(|play_type| {
            let slot = play_type.index();
            OverallSummary::from_samples(&samples.distances[slot], samples.turnovers[slot])
        });
        Self { by_type }
    }

    #[must_use]
    pub fn get(&self, play_type: PlayType) -> &OverallSummary {
        &self.by_type[play_type.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayType, &OverallSummary)> + '_ {
        PlayType::ALL.into_iter().zip(&self.by_type)
    }
}

/// Statistics of one play type within a tree node.
///
/// Distance samples are kept sorted so that summaries can be merged and
/// percentiles read without re-sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedSummary {
    distances: Vec<i32>,
    turnover_count: usize,
    group: OverallSummary,
    overall: OverallSummary,
    /// Per-mille share of this type among all plays of the node.
    share_of_node: usize,
    /// Per-mille share of this type's dataset-wide plays that fall in the node.
    share_of_type: usize,
}

impl DetailedSummary {
    /// Builds the summary of one play type from its samples in a node holding
    /// `node_total` plays, against the type's `overall` baseline summary.
    #[must_use]
    pub fn new(
        mut distances: Vec<i32>,
        turnover_count: usize,
        node_total: usize,
        overall: OverallSummary,
    ) -> Self {
        distances.sort_unstable();
        let group = OverallSummary::from_sorted_samples(&distances, turnover_count);
        Self {
            share_of_node: per_mille(group.total_count, node_total),
            share_of_type: per_mille(group.total_count, overall.total_count),
            distances,
            turnover_count,
            group,
            overall,
        }
    }

    /// Folds `other` (the same play type in a sibling node) into `self`.
    ///
    /// Samples and turnovers are combined and the group statistics recomputed.
    /// The node share is recomputed against `combined_total`, the play count of
    /// the merged node, while the type share is recomputed against the
    /// baseline.
    pub fn merge(&mut self, other: &DetailedSummary, combined_total: usize) {
        let mut distances = Vec::with_capacity(self.distances.len() + other.distances.len());
        let mut lhs = self.distances.iter().peekable();
        let mut rhs = other.distances.iter().peekable();
        while let (Some(&&a), Some(&&b)) = (lhs.peek(), rhs.peek()) {
            if a <= b {
                distances.push(a);
                lhs.next();
            } else {
                distances.push(b);
                rhs.next();
            }
        }
        distances.extend(lhs);
        distances.extend(rhs);

        self.distances = distances;
        self.turnover_count += other.turnover_count;
        self.group = OverallSummary::from_sorted_samples(&self.distances, self.turnover_count);
        self.share_of_type = per_mille(self.group.total_count, self.overall.total_count);
        self.update_node_share(combined_total);
    }

    /// Recomputes the node share against a new node play count.
    pub fn update_node_share(&mut self, node_total: usize) {
        self.share_of_node = per_mille(self.group.total_count, node_total);
    }

    /// Sorted gained distances of the plays summarized.
    #[must_use]
    pub fn distances(&self) -> &[i32] {
        &self.distances
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.group.total_count
    }

    #[must_use]
    pub fn turnover_count(&self) -> usize {
        self.turnover_count
    }

    #[must_use]
    pub fn average_distance(&self) -> i32 {
        self.group.average_distance
    }

    #[must_use]
    pub fn distance_std_dev(&self) -> i32 {
        self.group.distance_std_dev
    }

    #[must_use]
    pub fn turnover_per_mille(&self) -> usize {
        self.group.turnover_per_mille
    }

    #[must_use]
    pub fn share_of_node(&self) -> usize {
        self.share_of_node
    }

    #[must_use]
    pub fn share_of_type(&self) -> usize {
        self.share_of_type
    }

    /// Baseline summary of this play type over the whole dataset.
    #[must_use]
    pub fn overall(&self) -> &OverallSummary {
        &self.overall
    }

    #[must_use]
    pub fn percentiles(&self, points: &[f32]) -> Percentiles {
        Percentiles::from_sorted(&self.distances, points)
    }
}

impl fmt::Display for DetailedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pct of category:{} pct of all type plays:{} avg dist:{} dist var:{} Turnover pct:{}",
            self.share_of_node,
            self.share_of_type,
            self.group.average_distance,
            self.group.distance_std_dev,
            self.group.turnover_per_mille,
        )
    }
}

/// Play types observed in a node, each with its detailed summary.
///
/// Only play types with at least one play are present. Iteration follows the
/// play type enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlayDistribution {
    by_type: BTreeMap<PlayType, DetailedSummary>,
}

pub(crate) static EMPTY_DISTRIBUTION: PlayDistribution = PlayDistribution::new();

impl PlayDistribution {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_type: BTreeMap::new(),
        }
    }

    /// Summarizes the records covered by `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` refers to a record missing from `store`.
    pub fn from_index(
        index: &IndexSet,
        store: &RecordStore,
        baseline: &Baseline,
    ) -> Result<Self, ConsistencyError> {
        let records = index
            .record_ids()
            .map(|id| store.indexed(id))
            .collect::<Result<Vec<_>, _>>()?;
        let samples = TypeSamples::from_records(records);
        let node_total = index.record_count();
        let by_type = PlayType::ALL
            .into_iter()
            .zip(samples.distances.into_iter().zip(samples.turnovers))
            .filter(|(_, (distances, _))| !distances.is_empty())
            .map(|(play_type, (distances, turnovers))| {
                let overall = *baseline.get(play_type);
                let summary = DetailedSummary::new(distances, turnovers, node_total, overall);
                (play_type, summary)
            })
            .collect();
        Ok(Self { by_type })
    }

    /// Folds a sibling distribution into `self`.
    ///
    /// Shared play types are merged, play types only in `other` are adopted,
    /// and every node share is recomputed against the combined play count.
    pub fn merge(&mut self, other: &PlayDistribution) {
        let combined_total = self.total_plays() + other.total_plays();
        for (&play_type, theirs) in &other.by_type {
            match self.by_type.get_mut(&play_type) {
                Some(ours) => ours.merge(theirs, combined_total),
                None => {
                    self.by_type.insert(play_type, theirs.clone());
                }
            }
        }
        for summary in self.by_type.values_mut() {
            summary.update_node_share(combined_total);
        }
    }

    #[must_use]
    pub fn get(&self, play_type: PlayType) -> Option<&DetailedSummary> {
        self.by_type.get(&play_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayType, &DetailedSummary)> + '_ {
        self.by_type.iter().map(|(&play_type, summary)| (play_type, summary))
    }

    /// Number of play types present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Total number of plays over all play types.
    #[must_use]
    pub fn total_plays(&self) -> usize {
        self.by_type.values().map(DetailedSummary::play_count).sum()
    }

    /// The play type with the most plays and its count.
    ///
    /// Ties go to the earliest type in enumeration order.
    #[must_use]
    pub fn most_frequent(&self) -> Option<(PlayType, usize)> {
        self.iter()
            .map(|(play_type, summary)| (play_type, summary.play_count()))
            .fold(None, |best, (play_type, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((play_type, count)),
            })
    }
}
