//! Decision tree induction over historical play calls.
//!
//! Plays are inserted raw into a [`RecordStore`], which categorizes each one
//! once and, when finalized, builds an [`IndexSet`] (one partition per
//! situational attribute) plus dataset-wide [`Baseline`] statistics. The index
//! set is then consumed by [`TreeNode::build`], which recursively splits it on
//! the attribute chosen by information gain ratio. [`TreeNode::prune`] collapses
//! over-fit leaves afterwards, and [`TreeNode::find_plays`] answers situation
//! queries against the finished tree.
//!
//! # Example
//!
//! ```
//! use playcall_engine::{PlayType, RawPlay, RecordStore, Situation, TreeNode};
//!
//! let mut store = RecordStore::new();
//! for (play_type, minutes) in [
//!     (PlayType::RunMiddle, 20),
//!     (PlayType::RunMiddle, 25),
//!     (PlayType::PassDeepLeft, 1),
//!     (PlayType::PassDeepLeft, 1),
//! ] {
//!     store.insert(RawPlay {
//!         play_type,
//!         down: 1,
//!         distance_needed: 10,
//!         yard_line: 50,
//!         minutes,
//!         own_score: 0,
//!         opp_score: 0,
//!         distance_gained: 4,
//!         turned_over: false,
//!     })?;
//! }
//! store.finalize()?;
//!
//! let mut tree = TreeNode::build(store.index_set()?, &store, store.baseline()?)?;
//! tree.prune();
//!
//! let situation = Situation::from_raw(1, 10, 50, 1, 0, 0)?;
//! let plays = tree.find_plays(&situation);
//! assert!(plays.get(PlayType::PassDeepLeft).is_some());
//! # Ok::<(), playcall_engine::ConsistencyError>(())
//! ```

pub use self::{
    index::{IndexSet, Partition},
    play_type_set::PlayTypeSet,
    record::{
        Attribute, DistanceNeeded, Down, FieldLocation, PlayRecord, PlayType, RawPlay, RecordId,
        ScoreDifferential, Situation, TimeRemaining,
    },
    store::RecordStore,
    summary::{Baseline, DetailedSummary, OverallSummary, PlayDistribution},
    tree::{BuildParams, DecisionNode, TreeNode},
};

pub mod index;
pub mod play_type_set;
pub mod record;
pub mod store;
pub mod summary;
pub mod tree;

#[cfg(test)]
mod testing;

/// An internal invariant of the store, index or tree was violated.
///
/// Every detected inconsistency is fatal for the build that observed it; no
/// partial tree or partial statistics survive one.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("consistency error: {message}")]
pub struct ConsistencyError {
    message: String,
}

impl ConsistencyError {
    pub(crate) fn new<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
