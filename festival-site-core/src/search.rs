use tracing::debug;

use crate::catalog::{FestivalCatalog, FestivalRecord};
use crate::error::StoreError;
use crate::history::SearchHistory;
use crate::store::PersistentStore;

/// What the caller should show after a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// The term was empty, show the whole catalog again.
    ShowCatalog,
    NoMatches,
    Single(&'a FestivalRecord),
    /// Only reachable with a catalog that has duplicate names.
    Multiple(Vec<&'a FestivalRecord>),
}

impl<'a> SearchOutcome<'a> {
    /// The detail resource to open in a new context, if any.
    #[must_use]
    pub fn open_in_new_context(&self) -> Option<&'a str> {
        match self {
            SearchOutcome::Single(record) => Some(record.link.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn records(&self) -> Vec<&'a FestivalRecord> {
        match self {
            SearchOutcome::ShowCatalog | SearchOutcome::NoMatches => Vec::new(),
            SearchOutcome::Single(record) => vec![*record],
            SearchOutcome::Multiple(records) => records.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    catalog: &'a FestivalCatalog,
}

impl<'a> SearchEngine<'a> {
    #[must_use]
    pub const fn new(catalog: &'a FestivalCatalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub const fn catalog(&self) -> &'a FestivalCatalog {
        self.catalog
    }

    #[must_use]
    pub fn exact_match(&self, term: &str) -> Vec<&'a FestivalRecord> {
        self.catalog
            .iter()
            .filter(|record| record.name == term)
            .collect()
    }

    #[must_use]
    pub fn substring_match(&self, term: &str) -> Vec<&'a FestivalRecord> {
        self.catalog
            .iter()
            .filter(|record| {
                record.name.contains(term)
                    || record.description.contains(term)
                    || record.season.contains(term)
            })
            .collect()
    }

    /// Runs a search the way the search box does: empty terms reset the view,
    /// everything else is recorded in the history before matching.
    pub fn search<S: PersistentStore + ?Sized>(
        &self,
        store: &mut S,
        history: &mut SearchHistory,
        term: &str,
    ) -> Result<SearchOutcome<'a>, StoreError> {
        let term = term.trim();
        if term.is_empty() {
            debug!("empty search term, showing the whole catalog");
            return Ok(SearchOutcome::ShowCatalog);
        }

        history.record(store, term)?;

        let mut matches = self.exact_match(term);
        debug!("search for {term:?} found {} festivals", matches.len());
        Ok(match matches.len() {
            0 => SearchOutcome::NoMatches,
            1 => SearchOutcome::Single(matches.remove(0)),
            _ => SearchOutcome::Multiple(matches),
        })
    }

    #[must_use]
    pub const fn clear_search(&self) -> SearchOutcome<'a> {
        SearchOutcome::ShowCatalog
    }
}
