//! Play-call decision tree
//!
//! A [`TreeNode`] is either a [`DecisionNode`] splitting on one attribute, or a
//! leaf holding the [`PlayDistribution`] of the plays that reached it. Trees are
//! built from an index set by [`TreeNode::build`], optionally pruned with
//! [`TreeNode::prune`], queried with [`TreeNode::find_plays`] and rendered
//! through [`Display`](std::fmt::Display).

use crate::{
    Attribute, ConsistencyError, PlayDistribution, Situation, summary::EMPTY_DISTRIBUTION,
};

mod build;
mod prune;
mod render;

/// Tuning of tree construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildParams {
    /// Attributes whose information gain ratio falls below this value are
    /// never split on.
    pub min_gain_ratio: f64,
}

impl BuildParams {
    pub const DEFAULT_MIN_GAIN_RATIO: f64 = 0.02;
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            min_gain_ratio: Self::DEFAULT_MIN_GAIN_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum TreeNode {
    Decision(DecisionNode),
    Leaf(PlayDistribution),
}

/// Internal node routing each populated category of one attribute to a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionNode {
    attribute: Attribute,
    /// Child position per category, `None` for categories with no plays.
    child_slots: Vec<Option<usize>>,
    children: Vec<TreeNode>,
}

impl DecisionNode {
    #[must_use]
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Returns the child for `category`, if that category had plays.
    #[must_use]
    pub fn child_for(&self, category: usize) -> Option<&TreeNode> {
        let slot = self.child_slots.get(category).copied().flatten()?;
        self.children.get(slot)
    }

    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Iterates over `(category, child)` pairs in category order.
    pub fn branches(&self) -> impl Iterator<Item = (usize, &TreeNode)> + '_ {
        self.child_slots
            .iter()
            .enumerate()
            .filter_map(|(category, slot)| Some((category, self.children.get((*slot)?)?)))
    }
}

impl TreeNode {
    /// Returns the play distribution of the leaf `situation` routes to.
    ///
    /// A situation reaching a category for which no child exists gets an empty
    /// distribution.
    #[must_use]
    pub fn find_plays(&self, situation: &Situation) -> &PlayDistribution {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(distribution) => return distribution,
                TreeNode::Decision(decision) => {
                    match decision.child_for(situation.value(decision.attribute)) {
                        Some(child) => node = child,
                        None => return &EMPTY_DISTRIBUTION,
                    }
                }
            }
        }
    }

    /// Categorizes raw game values and looks the resulting situation up.
    ///
    /// # Errors
    ///
    /// Returns an error if `down` lies outside `0..=4`.
    pub fn find_plays_raw(
        &self,
        down: i32,
        distance_needed: i32,
        yard_line: i32,
        minutes: i32,
        own_score: i32,
        opp_score: i32,
    ) -> Result<&PlayDistribution, ConsistencyError> {
        let situation = Situation::from_raw(
            down,
            distance_needed,
            yard_line,
            minutes,
            own_score,
            opp_score,
        )?;
        Ok(self.find_plays(&situation))
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&PlayDistribution> {
        match self {
            TreeNode::Leaf(distribution) => Some(distribution),
            TreeNode::Decision(_) => None,
        }
    }

    #[must_use]
    pub fn as_decision(&self) -> Option<&DecisionNode> {
        match self {
            TreeNode::Decision(decision) => Some(decision),
            TreeNode::Leaf(_) => None,
        }
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Decision(decision) => {
                decision.children.iter().map(TreeNode::leaf_count).sum()
            }
        }
    }

    /// Number of decision levels above the deepest leaf; a single leaf has
    /// depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Decision(decision) => {
                1 + decision
                    .children
                    .iter()
                    .map(TreeNode::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Iterates over all leaf distributions, depth first in category order.
    pub fn leaves(&self) -> impl Iterator<Item = &PlayDistribution> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                match node {
                    TreeNode::Leaf(distribution) => return Some(distribution),
                    TreeNode::Decision(decision) => stack.extend(decision.children.iter().rev()),
                }
            }
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        PlayType, RawPlay, TimeRemaining,
        testing::{finalized_store, play},
    };

    fn leaf(play_type: PlayType, count: usize) -> TreeNode {
        let store = finalized_store((0..count).map(|_| play(play_type)));
        let index = store.index_set().unwrap();
        let distribution =
            PlayDistribution::from_index(&index, &store, store.baseline().unwrap()).unwrap();
        TreeNode::Leaf(distribution)
    }

    fn two_minute_tree() -> TreeNode {
        TreeNode::Decision(DecisionNode {
            attribute: Attribute::TimeRemaining,
            child_slots: vec![Some(0), None],
            children: vec![leaf(PlayType::RunMiddle, 2)],
        })
    }

    #[test]
    fn test_find_plays_routes_by_category() {
        let tree = two_minute_tree();
        let situation = Situation::from_raw(1, 10, 50, 40, 0, 0).unwrap();
        assert_eq!(situation.time_remaining, TimeRemaining::OutsideTwoMinutes);
        let plays = tree.find_plays(&situation);
        assert_eq!(plays.get(PlayType::RunMiddle).unwrap().play_count(), 2);
    }

    #[test]
    fn test_find_plays_missing_child_is_empty() {
        let tree = two_minute_tree();
        let plays = tree.find_plays_raw(1, 10, 50, 1, 0, 0).unwrap();
        assert!(plays.is_empty());
    }

    #[test]
    fn test_find_plays_raw_rejects_bad_down() {
        let tree = two_minute_tree();
        assert!(tree.find_plays_raw(9, 10, 50, 1, 0, 0).is_err());
    }

    #[test]
    fn test_introspection() {
        let tree = TreeNode::Decision(DecisionNode {
            attribute: Attribute::DownNumber,
            child_slots: vec![None, Some(0), None, Some(1), None],
            children: vec![leaf(PlayType::Punt, 1), two_minute_tree()],
        });
        assert!(tree.is_decision());
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaves().count(), 2);

        let decision = tree.as_decision().unwrap();
        assert_eq!(
            decision.branches().map(|(c, _)| c).collect::<Vec<_>>(),
            [1, 3]
        );
        assert!(decision.child_for(0).is_none());
        assert!(decision.child_for(1).unwrap().is_leaf());

        let situation = Situation::from_raw(3, 10, 50, 40, 0, 0).unwrap();
        assert!(tree.find_plays(&situation).get(PlayType::RunMiddle).is_some());
        let raw = RawPlay {
            down: 1,
            ..play(PlayType::Punt)
        };
        let punt = tree
            .find_plays_raw(raw.down, raw.distance_needed, raw.yard_line, raw.minutes, 0, 0)
            .unwrap();
        assert!(punt.get(PlayType::Punt).is_some());
    }
}
