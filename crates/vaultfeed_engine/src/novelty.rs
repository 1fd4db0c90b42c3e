use vaultfeed_core::{diff_against_store, EntryLists, NoveltyOutcome};
use vaultfeed_logging::feed_debug;

use crate::store::{EntryStore, StoreError};

/// Compares candidates with the store and persists the merged result.
pub struct NoveltyFilter<'a> {
    store: &'a dyn EntryStore,
}

impl<'a> NoveltyFilter<'a> {
    pub fn new(store: &'a dyn EntryStore) -> Self {
        Self { store }
    }

    /// Returns the outcome only after the merged state has been saved.
    pub fn apply(&self, candidates: EntryLists) -> Result<NoveltyOutcome, StoreError> {
        let stored = self.store.load()?;
        let outcome = diff_against_store(stored, candidates);
        feed_debug!(
            "{} novel entries, {} candidates skipped as stored or repeated",
            outcome.novel.len(),
            outcome.skipped
        );
        self.store.save(&outcome.merged)?;
        Ok(outcome)
    }
}
