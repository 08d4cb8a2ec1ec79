use std::collections::BTreeSet;

use arrayvec::ArrayVec;
use tracing::trace;

use crate::{Attribute, ConsistencyError, PlayRecord, RecordId, RecordStore};

/// Grouping of one record subset by the categories of a single attribute.
///
/// A partition with no categories at all is a dropped (untracked) partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    categories: Vec<Vec<RecordId>>,
}

static DROPPED_PARTITION: Partition = Partition {
    categories: Vec::new(),
};

impl Partition {
    fn with_categories(count: usize) -> Self {
        Self {
            categories: vec![Vec::new(); count],
        }
    }

    /// Returns the records in `category`, or an empty slice for categories the
    /// partition does not have.
    #[must_use]
    pub fn category(&self, category: usize) -> &[RecordId] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn categories(&self) -> &[Vec<RecordId>] {
        &self.categories
    }

    /// Number of records across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(Vec::is_empty)
    }

    /// Iterates over the indices of categories holding at least one record.
    pub fn populated_categories(&self) -> impl Iterator<Item = usize> + '_ {
        self.categories
            .iter()
            .enumerate()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(category, _)| category)
    }

    /// Iterates over all records, category by category.
    pub fn record_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.categories.iter().flatten().copied()
    }
}

/// One partition per attribute over the same record subset.
///
/// Every tracked partition covers exactly the same records; untracked
/// attributes keep an empty partition. An index set always tracks at least one
/// attribute once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet {
    tracked: BTreeSet<Attribute>,
    partitions: [Partition; Attribute::LEN],
}

impl IndexSet {
    /// Partitions `records` by every attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if any resulting partition is empty.
    pub(crate) fn from_records(records: &[PlayRecord]) -> Result<Self, ConsistencyError> {
        let mut partitions: [Partition; Attribute::LEN] =
            Attribute::ALL.map(|attribute| Partition::with_categories(attribute.category_count()));
        for record in records {
            for attribute in Attribute::ALL {
                let category = record.situation().value(attribute);
                partitions[attribute.index()].categories[category].push(record.id());
            }
        }
        if let Some(attribute) = Attribute::ALL
            .into_iter()
            .find(|attribute| partitions[attribute.index()].is_empty())
        {
            return Err(ConsistencyError::new(format!(
                "partition for {attribute} is empty after indexing"
            )));
        }
        Ok(Self {
            tracked: Attribute::ALL.into_iter().collect(),
            partitions,
        })
    }

    /// Returns the partition for `attribute`, which is empty once the
    /// attribute has been dropped.
    #[must_use]
    pub fn partition_for(&self, attribute: Attribute) -> &Partition {
        if self.tracked.contains(&attribute) {
            &self.partitions[attribute.index()]
        } else {
            &DROPPED_PARTITION
        }
    }

    /// Stops tracking `attribute` and discards its partition.
    ///
    /// Dropping the last tracked attribute is refused silently, so that the
    /// index set keeps knowing which records it covers.
    pub fn drop_attribute(&mut self, attribute: Attribute) {
        if self.tracked.len() <= 1 {
            return;
        }
        if self.tracked.remove(&attribute) {
            self.partitions[attribute.index()] = Partition::default();
        }
    }

    #[must_use]
    pub fn tracked_attributes(&self) -> &BTreeSet<Attribute> {
        &self.tracked
    }

    #[must_use]
    pub fn is_tracked(&self, attribute: Attribute) -> bool {
        self.tracked.contains(&attribute)
    }

    /// Number of records covered by this index set.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.tracked
            .first()
            .map_or(0, |&attribute| self.partitions[attribute.index()].len())
    }

    /// Iterates over the covered records, in the order of the first tracked
    /// partition.
    pub fn record_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.tracked
            .first()
            .into_iter()
            .flat_map(|&attribute| self.partitions[attribute.index()].record_ids())
    }

    /// Splits this index set by the populated categories of `attribute`.
    ///
    /// `attribute` is dropped first. When it has `k >= 2` populated
    /// categories, `self` keeps the records of the first populated category and
    /// the returned `k - 1` sibling index sets hold the others, in category
    /// order. Each resulting index set tracks the same attributes, with every
    /// tracked partition narrowed to its records. With `k <= 1` nothing is
    /// split and an empty vector is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if a partition does not distribute into exactly `k`
    /// non-empty groups, if a record's category has no group, or if the
    /// record count is not conserved.
    pub fn split_by(
        &mut self,
        attribute: Attribute,
        store: &RecordStore,
    ) -> Result<Vec<IndexSet>, ConsistencyError> {
        let populated = self
            .partition_for(attribute)
            .populated_categories()
            .collect::<ArrayVec<usize, { Attribute::MAX_CATEGORIES }>>();
        let before = self.record_count();
        self.drop_attribute(attribute);

        let group_count = populated.len();
        if group_count <= 1 {
            trace!(%attribute, group_count, "nothing to split");
            return Ok(Vec::new());
        }

        let mut group_of = [None; Attribute::MAX_CATEGORIES];
        for (group, &category) in populated.iter().enumerate() {
            group_of[category] = Some(group);
        }

        let mut siblings = (1..group_count)
            .map(|_| IndexSet {
                tracked: self.tracked.clone(),
                partitions: Default::default(),
            })
            .collect::<Vec<_>>();

        let tracked = self
            .tracked
            .iter()
            .copied()
            .collect::<ArrayVec<Attribute, { Attribute::LEN }>>();
        for tracked_attribute in tracked {
            let slot = tracked_attribute.index();
            let existing = std::mem::take(&mut self.partitions[slot]);
            let groups = regroup(existing, attribute, &group_of, group_count, store)?;

            let non_empty = groups.iter().filter(|p| !p.is_empty()).count();
            if non_empty != group_count {
                return Err(ConsistencyError::new(format!(
                    "splitting by {attribute}: partition for {tracked_attribute} produced \
                     {non_empty} non-empty groups, expected {group_count}"
                )));
            }

            let mut groups = groups.into_iter();
            if let Some(first) = groups.next() {
                self.partitions[slot] = first;
            }
            for (sibling, group) in siblings.iter_mut().zip(groups) {
                sibling.partitions[slot] = group;
            }
        }

        let after =
            self.record_count() + siblings.iter().map(IndexSet::record_count).sum::<usize>();
        if after != before {
            return Err(ConsistencyError::new(format!(
                "splitting by {attribute} changed the record count from {before} to {after}"
            )));
        }

        trace!(%attribute, group_count, records = before, "split index set");
        Ok(siblings)
    }
}

/// Redistributes `existing` into `group_count` partitions by the value each
/// record has for `split`, preserving category and insertion order.
fn regroup(
    existing: Partition,
    split: Attribute,
    group_of: &[Option<usize>],
    group_count: usize,
    store: &RecordStore,
) -> Result<Vec<Partition>, ConsistencyError> {
    let category_count = existing.categories.len();
    let mut groups = (0..group_count)
        .map(|_| Partition::with_categories(category_count))
        .collect::<Vec<_>>();
    for (category, ids) in existing.categories.into_iter().enumerate() {
        for id in ids {
            let value = store.indexed(id)?.situation().value(split);
            let group = group_of.get(value).copied().flatten().ok_or_else(|| {
                ConsistencyError::new(format!(
                    "record {id} has {split} category {value} with no split group"
                ))
            })?;
            groups[group].categories[category].push(id);
        }
    }
    Ok(groups)
}
