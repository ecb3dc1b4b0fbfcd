//! SQLite store for weather observations and forecasts.
//!
//! Rows from the extractor are written with match-on-natural-key
//! replace-or-insert and read back per location for the presentation
//! layer, which goes through a short-TTL [`reader::CachedReader`].
//!
//! # Usage
//!
//! ```rust
//! use wxd_db::Database;
//!
//! let db = Database::new().unwrap();
//! assert!(db.forecast_snapshot("new+york").unwrap().is_none());
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `historical_daily`, `historical_hourly` keyed by (city, datetime)
//! - `forecast_daily`, `forecast_hourly` keyed by (location, datetime), with
//!   at most one `forecast_hourly` row flagged `current`

pub mod error;
pub mod models;
mod queries;
pub mod reader;
pub mod schema;
mod upsert;

#[cfg(test)]
mod test_rows;

pub use error::StoreError;
pub use models::{ForecastSnapshot, HistoricalSnapshot, Snapshot, UpsertCount, UpsertReport};
pub use reader::{
    CachedReader, ForecastReader, ForecastSource, HistoricalReader, HistoricalSource,
    SharedSnapshot, SnapshotSource,
};

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Handle to the weather store.
///
/// Cheaply cloneable; clones share one connection behind a mutex, so the
/// ingestion writer and any number of readers can hold their own handle.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file and apply the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        log::info!("Opening weather store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}
