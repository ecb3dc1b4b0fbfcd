use thiserror::Error;

/// Persistence failure: connectivity, constraint violation, unreadable row.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
