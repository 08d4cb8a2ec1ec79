use arrayvec::ArrayVec;
use playcall_stats::entropy::InformationGain;
use tracing::{debug, trace};

use super::{BuildParams, DecisionNode, TreeNode};
use crate::{
    Attribute, Baseline, ConsistencyError, IndexSet, Partition, PlayDistribution, PlayType,
    RecordId, RecordStore,
};

type TypeCounts = [usize; PlayType::LEN];

fn count_types<I>(ids: I, store: &RecordStore) -> Result<TypeCounts, ConsistencyError>
where
    I: IntoIterator<Item = RecordId>,
{
    let mut counts = [0; PlayType::LEN];
    for id in ids {
        counts[store.indexed(id)?.play_type().index()] += 1;
    }
    Ok(counts)
}

/// Information gain ratio of splitting `partition` by its categories.
///
/// Returns `None` when fewer than two categories are populated, since such a
/// partition cannot split its records at all.
fn gain_ratio(
    partition: &Partition,
    store: &RecordStore,
) -> Result<Option<f64>, ConsistencyError> {
    if partition.populated_categories().nth(1).is_none() {
        return Ok(None);
    }
    let groups = partition
        .categories()
        .iter()
        .map(|ids| count_types(ids.iter().copied(), store))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(InformationGain::from_groups(&groups).map_or(0.0, |gain| gain.ratio())))
}

impl TreeNode {
    /// Builds a tree over the records of `index` with default parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any index split violates the index invariants, or
    /// if `index` covers no record at all.
    pub fn build(
        index: IndexSet,
        store: &RecordStore,
        baseline: &Baseline,
    ) -> Result<Self, ConsistencyError> {
        Self::build_with(index, store, baseline, &BuildParams::default())
    }

    /// Builds a tree over the records of `index`.
    ///
    /// A node becomes a leaf when its records share one play type or when no
    /// tracked attribute reaches `params.min_gain_ratio`. Otherwise it splits on
    /// the last tracked attribute (in attribute order) that does, and every
    /// attribute below the threshold is dropped for the whole subtree.
    ///
    /// # Errors
    ///
    /// Returns an error if any index split violates the index invariants, or
    /// if `index` covers no record at all.
    pub fn build_with(
        mut index: IndexSet,
        store: &RecordStore,
        baseline: &Baseline,
        params: &BuildParams,
    ) -> Result<Self, ConsistencyError> {
        let counts = count_types(index.record_ids(), store)?;
        let present = counts.iter().filter(|&&count| count > 0).count();
        if present == 0 {
            return Err(ConsistencyError::new(
                "cannot build a tree node over an empty index set",
            ));
        }

        let chosen = if present > 1 {
            choose_split(&mut index, store, params)?
        } else {
            None
        };
        match chosen {
            Some((attribute, ratio)) => {
                debug!(%attribute, ratio, records = index.record_count(), "chose split");
                Self::build_decision(index, attribute, store, baseline, params)
            }
            None => {
                trace!(records = index.record_count(), play_types = present, "leaf");
                PlayDistribution::from_index(&index, store, baseline).map(TreeNode::Leaf)
            }
        }
    }

    fn build_decision(
        mut index: IndexSet,
        attribute: Attribute,
        store: &RecordStore,
        baseline: &Baseline,
        params: &BuildParams,
    ) -> Result<Self, ConsistencyError> {
        let category_count = attribute.category_count();
        let mut child_slots = vec![None; category_count];
        let populated = index.partition_for(attribute).populated_categories();
        for (slot, category) in populated.enumerate() {
            child_slots[category] = Some(slot);
        }
        let expected_children = child_slots.iter().flatten().count();

        let siblings = index.split_by(attribute, store)?;
        if siblings.is_empty() {
            return Err(ConsistencyError::new(format!(
                "split on {attribute} produced no sibling index sets"
            )));
        }
        if siblings.len() + 1 != expected_children {
            return Err(ConsistencyError::new(format!(
                "split on {attribute} produced {} index sets for {expected_children} categories",
                siblings.len() + 1
            )));
        }
        debug!(%attribute, children = expected_children, "split index set");

        let mut children = Vec::with_capacity(expected_children);
        children.push(Self::build_with(index, store, baseline, params)?);
        for sibling in siblings {
            children.push(Self::build_with(sibling, store, baseline, params)?);
        }

        Ok(TreeNode::Decision(DecisionNode {
            attribute,
            child_slots,
            children,
        }))
    }
}

/// Scores every tracked attribute, dropping those that cannot split the
/// records or fall below the threshold.
///
/// Returns the last attribute clearing the threshold and its ratio, if any.
fn choose_split(
    index: &mut IndexSet,
    store: &RecordStore,
    params: &BuildParams,
) -> Result<Option<(Attribute, f64)>, ConsistencyError> {
    let candidates = index
        .tracked_attributes()
        .iter()
        .copied()
        .collect::<ArrayVec<Attribute, { Attribute::LEN }>>();
    let mut chosen = None;
    for attribute in candidates {
        match gain_ratio(index.partition_for(attribute), store)? {
            Some(ratio) if ratio >= params.min_gain_ratio => chosen = Some((attribute, ratio)),
            Some(ratio) => {
                trace!(%attribute, ratio, "attribute below gain threshold");
                index.drop_attribute(attribute);
            }
            None => {
                trace!(%attribute, "attribute has a single category");
                index.drop_attribute(attribute);
            }
        }
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        RawPlay, Situation,
        testing::{finalized_store, play, random_store},
    };

    fn build(store: &RecordStore) -> TreeNode {
        TreeNode::build(store.index_set().unwrap(), store, store.baseline().unwrap()).unwrap()
    }

    /// Runs on early downs, passes on third down, punts on fourth down.
    fn down_driven_store() -> RecordStore {
        let mut plays = Vec::new();
        for _ in 0..6 {
            plays.push(RawPlay {
                down: 1,
                ..play(PlayType::RunMiddle)
            });
            plays.push(RawPlay {
                down: 2,
                ..play(PlayType::RunMiddle)
            });
            plays.push(RawPlay {
                down: 3,
                ..play(PlayType::PassShortMiddle)
            });
            plays.push(RawPlay {
                down: 4,
                ..play(PlayType::Punt)
            });
        }
        finalized_store(plays)
    }

    #[test]
    fn test_single_play_type_is_leaf() {
        let store = finalized_store((1..=4).map(|down| RawPlay {
            down,
            ..play(PlayType::RunLeft)
        }));
        let tree = build(&store);
        let distribution = tree.as_leaf().unwrap();
        assert_eq!(distribution.len(), 1);
        assert_eq!(distribution.total_plays(), 4);
    }

    #[test]
    fn test_splits_on_informative_attribute() {
        let store = down_driven_store();
        let tree = build(&store);

        let root = tree.as_decision().unwrap();
        assert_eq!(root.attribute(), Attribute::DownNumber);
        assert_eq!(
            root.branches().map(|(category, _)| category).collect::<Vec<_>>(),
            [1, 2, 3, 4]
        );
        assert!(root.children().iter().all(TreeNode::is_leaf));

        let third_down = Situation::from_raw(3, 10, 50, 45, 0, 0).unwrap();
        let plays = tree.find_plays(&third_down);
        assert_eq!(plays.len(), 1);
        let pass = plays.get(PlayType::PassShortMiddle).unwrap();
        assert_eq!(pass.play_count(), 6);
        assert_eq!(pass.share_of_node(), 1000);
        assert_eq!(pass.share_of_type(), 1000);
    }

    #[test]
    fn test_uninformative_attributes_give_leaf() {
        // Same situation for every play: no attribute has two populated categories
        let store = finalized_store([
            play(PlayType::RunLeft),
            play(PlayType::RunRight),
            play(PlayType::RunLeft),
        ]);
        let tree = build(&store);
        assert_eq!(tree.as_leaf().unwrap().len(), 2);
    }

    #[test]
    fn test_threshold_disables_splits() {
        let store = down_driven_store();
        let params = BuildParams {
            min_gain_ratio: 2.0,
        };
        let tree = TreeNode::build_with(
            store.index_set().unwrap(),
            &store,
            store.baseline().unwrap(),
            &params,
        )
        .unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.as_leaf().unwrap().total_plays(), store.len());
    }

    #[test]
    fn test_single_category_attributes_never_split() {
        // Only the down varies, so every other attribute has one category
        let store = finalized_store([
            RawPlay {
                down: 1,
                ..play(PlayType::RunLeft)
            },
            RawPlay {
                down: 2,
                ..play(PlayType::RunRight)
            },
        ]);
        for min_gain_ratio in [0.0, -1.0] {
            let params = BuildParams { min_gain_ratio };
            let tree = TreeNode::build_with(
                store.index_set().unwrap(),
                &store,
                store.baseline().unwrap(),
                &params,
            )
            .unwrap();
            let root = tree.as_decision().unwrap();
            assert_eq!(root.attribute(), Attribute::DownNumber);
            assert_eq!(tree.leaf_count(), 2);
        }
    }

    #[test]
    fn test_last_clearing_attribute_wins() {
        // Down and time remaining separate the play types equally well
        let mut plays = Vec::new();
        for _ in 0..4 {
            plays.push(RawPlay {
                down: 1,
                minutes: 45,
                ..play(PlayType::RunLeft)
            });
            plays.push(RawPlay {
                down: 2,
                minutes: 1,
                ..play(PlayType::PassDeepLeft)
            });
        }
        let store = finalized_store(plays);
        let tree = build(&store);
        assert_eq!(
            tree.as_decision().map(DecisionNode::attribute),
            Some(Attribute::TimeRemaining)
        );
    }

    #[test]
    fn test_leaves_partition_all_records() {
        for seed in 0..6 {
            let store = random_store(
                seed,
                300,
                &[PlayType::RunMiddle, PlayType::PassShortLeft, PlayType::Punt],
            );
            let tree = build(&store);
            let total = tree.leaves().map(PlayDistribution::total_plays).sum::<usize>();
            assert_eq!(total, store.len());
            for leaf in tree.leaves() {
                assert!(!leaf.is_empty());
            }
        }
    }

    #[test]
    fn test_every_record_routes_to_a_leaf_with_its_play_type() {
        for seed in 0..6 {
            let store = random_store(seed, 250, &PlayType::ALL);
            let tree = build(&store);
            for record in store.records() {
                let plays = tree.find_plays(record.situation());
                assert!(plays.get(record.play_type()).is_some());
            }
        }
    }

    #[test]
    fn test_index_from_another_store_is_an_error() {
        let small = finalized_store([play(PlayType::RunLeft)]);
        let large = finalized_store([
            RawPlay {
                down: 1,
                ..play(PlayType::RunLeft)
            },
            RawPlay {
                down: 2,
                ..play(PlayType::Punt)
            },
        ]);
        let result = TreeNode::build(large.index_set().unwrap(), &small, small.baseline().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_index_is_an_error() {
        let store = finalized_store([play(PlayType::RunLeft)]);
        let result = TreeNode::build(IndexSet::default(), &store, store.baseline().unwrap());
        assert!(result.is_err());
    }
}
