use tracing::debug;

use super::TreeNode;
use crate::{PlayDistribution, PlayTypeSet};

/// A play type is significant in a leaf when its node share reaches this
/// fraction of the leaf's largest node share.
const SIGNIFICANT_SHARE_NUMERATOR: usize = 3;
const SIGNIFICANT_SHARE_DENOMINATOR: usize = 4;

/// Leaves whose most frequent play type has at most this many plays treat
/// every present play type as significant.
const LOW_SAMPLE_LIMIT: usize = 5;

impl TreeNode {
    /// Collapses decision nodes whose leaf children do not justify the split.
    ///
    /// Children are pruned first. A decision node whose children are all
    /// leaves is replaced by the merge of those leaves when any of these hold:
    ///
    /// - all but at most one leaf hold a single play of a single type
    /// - every leaf has the same set of significant play types
    /// - the play types significant in only some leaves are exactly the play
    ///   types never seen more than once in a leaf, and they account for at
    ///   most half of the plays
    pub fn prune(&mut self) {
        let TreeNode::Decision(decision) = self else {
            return;
        };

        let mut all_leaves = true;
        for child in &mut decision.children {
            child.prune();
            all_leaves &= child.is_leaf();
        }
        if !all_leaves {
            return;
        }

        let leaves = decision
            .children
            .iter()
            .filter_map(TreeNode::as_leaf)
            .collect::<Vec<_>>();
        if !should_merge(&leaves) {
            return;
        }

        let attribute = decision.attribute;
        let merged = merge_leaves(&leaves);
        debug!(
            %attribute,
            leaves = leaves.len(),
            plays = merged.total_plays(),
            "pruned decision node"
        );
        *self = TreeNode::Leaf(merged);
    }
}

fn should_merge(leaves: &[&PlayDistribution]) -> bool {
    if is_overfit(leaves) {
        return true;
    }
    let profile = SignificanceProfile::new(leaves);
    profile.is_uniform() || profile.has_isolated_minor_types(leaves)
}

/// Whether all but at most one leaf hold exactly one play.
fn is_overfit(leaves: &[&PlayDistribution]) -> bool {
    let single_play_leaves = leaves
        .iter()
        .filter(|leaf| leaf.len() == 1 && leaf.total_plays() == 1)
        .count();
    single_play_leaves + 1 >= leaves.len()
}

fn significant_types(leaf: &PlayDistribution) -> PlayTypeSet {
    let max_share = leaf
        .iter()
        .map(|(_, summary)| summary.share_of_node())
        .max()
        .unwrap_or(0);
    let threshold = max_share * SIGNIFICANT_SHARE_NUMERATOR / SIGNIFICANT_SHARE_DENOMINATOR;
    let low_sample = leaf
        .most_frequent()
        .is_some_and(|(_, count)| count <= LOW_SAMPLE_LIMIT);
    leaf.iter()
        .filter(|(_, summary)| low_sample || summary.share_of_node() >= threshold)
        .map(|(play_type, _)| play_type)
        .collect()
}

#[derive(Debug)]
struct SignificanceProfile {
    /// Types occurring exactly once in some leaf.
    seen_once: PlayTypeSet,
    /// Types occurring more than once in some leaf.
    seen_repeatedly: PlayTypeSet,
    /// Types significant in at least one leaf.
    significant_anywhere: PlayTypeSet,
    /// Types significant in every leaf.
    significant_everywhere: PlayTypeSet,
    total_plays: usize,
}

impl SignificanceProfile {
    fn new(leaves: &[&PlayDistribution]) -> Self {
        let mut profile = Self {
            seen_once: PlayTypeSet::empty(),
            seen_repeatedly: PlayTypeSet::empty(),
            significant_anywhere: PlayTypeSet::empty(),
            significant_everywhere: PlayTypeSet::full(),
            total_plays: 0,
        };
        for leaf in leaves {
            for (play_type, summary) in leaf.iter() {
                if summary.play_count() > 1 {
                    profile.seen_repeatedly.insert(play_type);
                } else {
                    profile.seen_once.insert(play_type);
                }
            }
            let significant = significant_types(leaf);
            profile.significant_anywhere = profile.significant_anywhere.union(significant);
            profile.significant_everywhere =
                profile.significant_everywhere.intersection(significant);
            profile.total_plays += leaf.total_plays();
        }
        profile
    }

    fn is_uniform(&self) -> bool {
        self.significant_anywhere == self.significant_everywhere
    }

    fn has_isolated_minor_types(&self, leaves: &[&PlayDistribution]) -> bool {
        let only_seen_once = self.seen_once.difference(self.seen_repeatedly);
        let partially_significant = self
            .significant_anywhere
            .difference(self.significant_everywhere);
        if only_seen_once != partially_significant {
            return false;
        }
        let minor_plays = leaves
            .iter()
            .flat_map(|leaf| leaf.iter())
            .filter(|(play_type, _)| partially_significant.contains(*play_type))
            .map(|(_, summary)| summary.play_count())
            .sum::<usize>();
        minor_plays <= self.total_plays / 2
    }
}

/// Folds every leaf after the first into a copy of the first.
fn merge_leaves(leaves: &[&PlayDistribution]) -> PlayDistribution {
    let mut rest = leaves.iter();
    let mut merged = rest.next().map_or_else(PlayDistribution::new, |&first| first.clone());
    for leaf in rest {
        merged.merge(leaf);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Attribute, PlayType, RawPlay, RecordStore,
        testing::{finalized_store, play, random_store},
        tree::DecisionNode,
    };

    fn build(store: &RecordStore) -> TreeNode {
        TreeNode::build(store.index_set().unwrap(), store, store.baseline().unwrap()).unwrap()
    }

    fn on_down(down: i32, play_type: PlayType, count: usize) -> impl Iterator<Item = RawPlay> {
        std::iter::repeat_n(
            RawPlay {
                down,
                ..play(play_type)
            },
            count,
        )
    }

    fn leaf_of(counts: &[(PlayType, usize)]) -> PlayDistribution {
        let store = finalized_store(
            counts
                .iter()
                .flat_map(|&(play_type, count)| on_down(1, play_type, count)),
        );
        let index = store.index_set().unwrap();
        PlayDistribution::from_index(&index, &store, store.baseline().unwrap()).unwrap()
    }

    fn decision_of(leaves: Vec<PlayDistribution>) -> TreeNode {
        TreeNode::Decision(DecisionNode {
            attribute: Attribute::DownNumber,
            child_slots: (0..Attribute::DownNumber.category_count())
                .map(|slot| (slot < leaves.len()).then_some(slot))
                .collect(),
            children: leaves.into_iter().map(TreeNode::Leaf).collect(),
        })
    }

    #[test]
    fn test_single_play_leaves_are_merged() {
        let store = finalized_store(
            on_down(1, PlayType::RunLeft, 1)
                .chain(on_down(2, PlayType::RunRight, 1))
                .chain(on_down(3, PlayType::Punt, 1)),
        );
        let mut tree = build(&store);
        assert!(tree.is_decision());

        tree.prune();
        let merged = tree.as_leaf().unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.total_plays(), 3);
        for (_, summary) in merged.iter() {
            assert_eq!(summary.share_of_node(), 333);
        }
    }

    #[test]
    fn test_single_play_siblings_of_one_type_are_merged() {
        let single = |turned_over| {
            let store = finalized_store([RawPlay {
                turned_over,
                ..play(PlayType::RunLeft)
            }]);
            let index = store.index_set().unwrap();
            PlayDistribution::from_index(&index, &store, store.baseline().unwrap()).unwrap()
        };
        let mut tree = decision_of(vec![single(true), single(false)]);
        tree.prune();

        let merged = tree.as_leaf().unwrap();
        assert_eq!(merged.len(), 1);
        let run = merged.get(PlayType::RunLeft).unwrap();
        assert_eq!(run.play_count(), 2);
        assert_eq!(run.turnover_count(), 1);
        assert_eq!(run.turnover_per_mille(), 500);
        assert_eq!(run.share_of_node(), 1000);
    }

    #[test]
    fn test_distinct_leaves_are_kept() {
        let store = finalized_store(
            on_down(1, PlayType::RunMiddle, 10)
                .chain(on_down(3, PlayType::PassShortLeft, 10))
                .chain(on_down(4, PlayType::Punt, 10)),
        );
        let mut tree = build(&store);
        let before = tree.clone();
        tree.prune();
        assert_eq!(tree, before);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_same_significant_mix_is_merged() {
        // Both leaves mix runs and passes evenly; the second adds a rare punt
        let mut tree = decision_of(vec![
            leaf_of(&[(PlayType::RunMiddle, 10), (PlayType::PassShortLeft, 10)]),
            leaf_of(&[
                (PlayType::RunMiddle, 10),
                (PlayType::PassShortLeft, 9),
                (PlayType::Punt, 1),
            ]),
        ]);
        tree.prune();
        let merged = tree.as_leaf().unwrap();
        assert_eq!(merged.total_plays(), 40);
        let run = merged.get(PlayType::RunMiddle).unwrap();
        assert_eq!(run.play_count(), 20);
        assert_eq!(run.share_of_node(), 500);
        assert_eq!(merged.get(PlayType::Punt).unwrap().share_of_node(), 25);
    }

    #[test]
    fn test_isolated_minor_types() {
        // A thin leaf makes its lone field goal significant there only
        let leaves = [
            leaf_of(&[(PlayType::RunMiddle, 20), (PlayType::PassShortLeft, 20)]),
            leaf_of(&[(PlayType::RunMiddle, 20), (PlayType::PassShortLeft, 20)]),
            leaf_of(&[
                (PlayType::RunMiddle, 1),
                (PlayType::PassShortLeft, 1),
                (PlayType::FieldGoal, 1),
            ]),
        ];
        let refs = leaves.iter().collect::<Vec<_>>();
        let profile = SignificanceProfile::new(&refs);
        assert!(!is_overfit(&refs));
        assert!(!profile.is_uniform());
        assert!(profile.has_isolated_minor_types(&refs));

        let mut tree = decision_of(leaves.to_vec());
        tree.prune();
        let merged = tree.as_leaf().unwrap();
        assert_eq!(merged.total_plays(), 83);
        assert_eq!(merged.get(PlayType::FieldGoal).unwrap().play_count(), 1);
    }

    #[test]
    fn test_repeated_minor_type_blocks_merge() {
        // The field goal is significant in one leaf only and occurs twice there
        let leaves = [
            leaf_of(&[(PlayType::RunMiddle, 20), (PlayType::PassShortLeft, 20)]),
            leaf_of(&[(PlayType::FieldGoal, 2), (PlayType::RunMiddle, 1)]),
        ];
        let refs = leaves.iter().collect::<Vec<_>>();
        assert!(!SignificanceProfile::new(&refs).has_isolated_minor_types(&refs));

        let mut tree = decision_of(leaves.to_vec());
        tree.prune();
        assert!(tree.is_decision());
    }

    #[test]
    fn test_pruning_preserves_play_counts() {
        for seed in 0..6 {
            let store = random_store(
                seed,
                300,
                &[PlayType::RunLeft, PlayType::PassDeepRight, PlayType::FieldGoal],
            );
            let mut tree = build(&store);
            let leaves_before = tree.leaf_count();
            tree.prune();
            assert!(tree.leaf_count() <= leaves_before);
            let total = tree.leaves().map(PlayDistribution::total_plays).sum::<usize>();
            assert_eq!(total, store.len());
        }
    }

    #[test]
    fn test_prune_is_idempotent() {
        for seed in 0..6 {
            let store = random_store(seed, 300, &PlayType::ALL);
            let mut tree = build(&store);
            tree.prune();
            let once = tree.clone();
            tree.prune();
            assert_eq!(tree, once);
        }
    }

    #[test]
    fn test_leaf_is_untouched() {
        let mut tree = TreeNode::Leaf(leaf_of(&[(PlayType::Punt, 3)]));
        let before = tree.clone();
        tree.prune();
        assert_eq!(tree, before);
    }
}
