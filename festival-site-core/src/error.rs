use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access store file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to persist store file: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("stored value is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("festival name {0:?} appears more than once in the catalog")]
    DuplicateName(String),
}
