use tracing::{debug, warn};

use crate::{Baseline, ConsistencyError, IndexSet, PlayRecord, RawPlay, RecordId};

/// Append-only arena owning every categorized play record.
///
/// Records are addressed by [`RecordId`], which stays valid for the lifetime of
/// the store. [`RecordStore::finalize`] freezes the records visible to index
/// building and computes the baseline statistics; records inserted afterwards
/// are kept but never indexed.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<PlayRecord>,
    finalized: Option<Finalized>,
    late_inserts: usize,
}

#[derive(Debug)]
struct Finalized {
    index: IndexSet,
    baseline: Baseline,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Categorizes `raw` and appends it to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the down number lies outside `0..=4`.
    pub fn insert(&mut self, raw: RawPlay) -> Result<RecordId, ConsistencyError> {
        let id = RecordId::new(self.records.len());
        let record = PlayRecord::from_raw(id, &raw)?;
        if self.finalized.is_some() {
            if self.late_inserts == 0 {
                warn!("record inserted after finalize; it will not be indexed");
            }
            self.late_inserts += 1;
        }
        self.records.push(record);
        Ok(id)
    }

    /// Builds the index set and baseline over all records inserted so far.
    ///
    /// Finalizing an empty store is a no-op that leaves the store unfinalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the store was already finalized, or if any built
    /// partition ends up empty.
    pub fn finalize(&mut self) -> Result<(), ConsistencyError> {
        if self.finalized.is_some() {
            return Err(ConsistencyError::new("record store already finalized"));
        }
        if self.records.is_empty() {
            warn!("finalize called on an empty record store");
            return Ok(());
        }

        let index = IndexSet::from_records(&self.records)?;
        let baseline = Baseline::from_records(&self.records);
        debug!(records = self.records.len(), "record store finalized");
        self.finalized = Some(Finalized { index, baseline });
        Ok(())
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// Returns a fresh copy of the full index set, ready to be consumed by a
    /// tree build.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not finalized.
    pub fn index_set(&self) -> Result<IndexSet, ConsistencyError> {
        self.finalized().map(|finalized| finalized.index.clone())
    }

    /// Returns the baseline statistics of the records visible at finalize.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not finalized.
    pub fn baseline(&self) -> Result<&Baseline, ConsistencyError> {
        self.finalized().map(|finalized| &finalized.baseline)
    }

    fn finalized(&self) -> Result<&Finalized, ConsistencyError> {
        self.finalized
            .as_ref()
            .ok_or_else(|| ConsistencyError::new("record store is not finalized"))
    }

    /// Returns the record with `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    #[must_use]
    pub fn record(&self, id: RecordId) -> &PlayRecord {
        &self.records[id.index()]
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&PlayRecord> {
        self.records.get(id.index())
    }

    /// Like [`get`](Self::get), for ids taken from an index over this store.
    pub(crate) fn indexed(&self, id: RecordId) -> Result<&PlayRecord, ConsistencyError> {
        self.get(id)
            .ok_or_else(|| ConsistencyError::new(format!("record {id} is not in the store")))
    }

    #[must_use]
    pub fn records(&self) -> &[PlayRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records inserted after finalize.
    #[must_use]
    pub fn late_inserts(&self) -> usize {
        self.late_inserts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, PlayType, testing::play};

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut store = RecordStore::new();
        let a = store.insert(play(PlayType::RunLeft)).unwrap();
        let b = store.insert(play(PlayType::Punt)).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(store.record(b).play_type(), PlayType::Punt);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_rejects_bad_down() {
        let mut store = RecordStore::new();
        let err = store
            .insert(RawPlay {
                down: 7,
                ..play(PlayType::RunLeft)
            })
            .unwrap_err();
        assert!(err.message().contains("down 7"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_finalize_empty_store_is_noop() {
        let mut store = RecordStore::new();
        store.finalize().unwrap();
        assert!(!store.is_finalized());
        assert!(store.index_set().is_err());
        assert!(store.baseline().is_err());
    }

    #[test]
    fn test_finalize_twice_fails() {
        let mut store = RecordStore::new();
        store.insert(play(PlayType::RunLeft)).unwrap();
        store.finalize().unwrap();
        assert!(store.finalize().is_err());
    }

    #[test]
    fn test_partitions_cover_all_records() {
        let mut store = RecordStore::new();
        for down in 1..=4 {
            store
                .insert(RawPlay {
                    down,
                    ..play(PlayType::RunMiddle)
                })
                .unwrap();
        }
        store.finalize().unwrap();

        let index = store.index_set().unwrap();
        for attribute in Attribute::ALL {
            assert_eq!(index.partition_for(attribute).len(), 4);
        }
        let downs = index.partition_for(Attribute::DownNumber);
        assert!(downs.category(0).is_empty());
        for down in 1..=4 {
            assert_eq!(downs.category(down).len(), 1);
        }
    }

    #[test]
    fn test_late_inserts_are_not_indexed() {
        let mut store = RecordStore::new();
        store.insert(play(PlayType::RunLeft)).unwrap();
        store.finalize().unwrap();
        store.insert(play(PlayType::RunRight)).unwrap();
        store.insert(play(PlayType::RunRight)).unwrap();

        assert_eq!(store.late_inserts(), 2);
        assert_eq!(store.len(), 3);
        assert_eq!(store.index_set().unwrap().record_count(), 1);
        let baseline = store.baseline().unwrap();
        assert_eq!(baseline.get(PlayType::RunRight).total_count, 0);
    }
}
