//! Festival search, search history, live suggestions and the feedback form for the
//! festival site. Everything in here is synchronous and free of any rendering
//! concerns; the backend crate turns the results into pages.

pub mod catalog;
pub mod email;
pub mod error;
pub mod form;
pub mod history;
pub mod search;
pub mod store;
pub mod suggestions;
pub mod validation;

pub use catalog::{FestivalCatalog, FestivalRecord};
pub use error::{CatalogError, StoreError};
pub use form::{FeedbackLog, FeedbackMessage, FormController};
pub use history::SearchHistory;
pub use search::{SearchEngine, SearchOutcome};
pub use store::{JsonFileStore, MemoryStore, PersistentStore};
pub use suggestions::SuggestionController;
pub use validation::{Field, FieldError};
