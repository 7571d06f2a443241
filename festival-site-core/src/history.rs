use tracing::debug;

use crate::error::StoreError;
use crate::store::{load_json, save_json, PersistentStore};

pub const SEARCH_HISTORY_KEY: &str = "festivalSearchHistory";
pub const SEARCH_HISTORY_CAPACITY: usize = 10;

/// The key holding the history of one visitor when a store is shared.
#[must_use]
pub fn scoped_key(scope: &str) -> String {
    format!("{SEARCH_HISTORY_KEY}:{scope}")
}

/// Past search terms, most recent first, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    key: String,
    entries: Vec<String>,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self {
            key: SEARCH_HISTORY_KEY.to_owned(),
            entries: Vec::new(),
        }
    }
}

impl SearchHistory {
    pub fn load<S: PersistentStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Self::load_from(store, SEARCH_HISTORY_KEY.to_owned())
    }

    /// Loads the history that `scope` keeps in a store shared with others.
    pub fn load_scoped<S: PersistentStore + ?Sized>(
        store: &S,
        scope: &str,
    ) -> Result<Self, StoreError> {
        Self::load_from(store, scoped_key(scope))
    }

    fn load_from<S: PersistentStore + ?Sized>(store: &S, key: String) -> Result<Self, StoreError> {
        let mut entries: Vec<String> = load_json(store, &key)?;
        entries.truncate(SEARCH_HISTORY_CAPACITY);
        Ok(Self { key, entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves `term` to the front and persists the result.
    pub fn record<S: PersistentStore + ?Sized>(
        &mut self,
        store: &mut S,
        term: &str,
    ) -> Result<(), StoreError> {
        self.entries.retain(|entry| entry != term);
        self.entries.insert(0, term.to_owned());
        self.entries.truncate(SEARCH_HISTORY_CAPACITY);
        debug!("search history is now {:?}", self.entries);
        save_json(store, &self.key, &self.entries)
    }

    pub fn clear<S: PersistentStore + ?Sized>(&mut self, store: &mut S) -> Result<(), StoreError> {
        self.entries.clear();
        store.remove(&self.key)
    }
}
