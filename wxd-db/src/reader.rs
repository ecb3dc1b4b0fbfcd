//! Short-TTL memoized reads of the store for the presentation layer.
//!
//! A [`CachedReader`] keeps one snapshot per location in a `moka` cache.
//! Within the TTL, repeated reads of a location return the same `Arc` without
//! touching SQLite; after it, the next read reloads both tables. An empty
//! result is cached the same way.

use log::debug;
use moka::sync::Cache;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{ForecastSnapshot, HistoricalSnapshot, Snapshot};
use crate::{Database, StoreError};

/// Default lifetime of a cached snapshot.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Locations kept per reader before the least useful entry is evicted.
const MAX_LOCATIONS: u64 = 64;

/// Which collection pair a reader loads.
pub trait SnapshotSource {
    type Daily: Send + Sync + 'static;
    type Hourly: Send + Sync + 'static;

    /// Label used in log lines.
    const NAME: &'static str;

    fn load(
        db: &Database,
        location: &str,
    ) -> Result<Option<Snapshot<Self::Daily, Self::Hourly>>, StoreError>;
}

/// Loads `forecast_daily` + `forecast_hourly`.
#[derive(Debug, Clone, Copy)]
pub struct ForecastSource;

/// Loads `historical_daily` + `historical_hourly`.
#[derive(Debug, Clone, Copy)]
pub struct HistoricalSource;

impl SnapshotSource for ForecastSource {
    type Daily = wxd_wwo::ForecastDaily;
    type Hourly = wxd_wwo::ForecastHourly;
    const NAME: &'static str = "forecast";

    fn load(db: &Database, location: &str) -> Result<Option<ForecastSnapshot>, StoreError> {
        db.forecast_snapshot(location)
    }
}

impl SnapshotSource for HistoricalSource {
    type Daily = wxd_wwo::HistoricalDaily;
    type Hourly = wxd_wwo::HistoricalHourly;
    const NAME: &'static str = "historical";

    fn load(db: &Database, location: &str) -> Result<Option<HistoricalSnapshot>, StoreError> {
        db.historical_snapshot(location)
    }
}

/// What a read hands back: shared, possibly absent, snapshot.
pub type SharedSnapshot<S> =
    Arc<Option<Snapshot<<S as SnapshotSource>::Daily, <S as SnapshotSource>::Hourly>>>;

pub struct CachedReader<S: SnapshotSource> {
    db: Database,
    /// `None` when the TTL is zero.
    cache: Option<Cache<String, SharedSnapshot<S>>>,
    source: PhantomData<fn() -> S>,
}

pub type ForecastReader = CachedReader<ForecastSource>;
pub type HistoricalReader = CachedReader<HistoricalSource>;

impl<S: SnapshotSource> CachedReader<S> {
    /// Reader with a TTL of [`DEFAULT_TTL`].
    pub fn new(db: Database) -> Self {
        Self::with_ttl(db, DEFAULT_TTL)
    }

    /// A zero TTL disables caching: every read goes to the store.
    pub fn with_ttl(db: Database, ttl: Duration) -> Self {
        let cache = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(MAX_LOCATIONS)
                .time_to_live(ttl)
                .build()
        });
        Self {
            db,
            cache,
            source: PhantomData,
        }
    }

    /// Latest snapshot of `location`, served from cache when it is younger
    /// than the TTL.
    pub fn get_latest_snapshot(&self, location: &str) -> Result<SharedSnapshot<S>, StoreError> {
        self.read(location, true)
    }

    /// Read the snapshot of `location`. With `allow_cached = false` the store
    /// is always consulted and the cached entry replaced.
    ///
    /// A failed load leaves the previous entry in place and returns the error.
    pub fn read(
        &self,
        location: &str,
        allow_cached: bool,
    ) -> Result<SharedSnapshot<S>, StoreError> {
        if allow_cached {
            if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(location)) {
                debug!("{} snapshot for {} served from cache", S::NAME, location);
                return Ok(hit);
            }
        }

        // Concurrent misses may both load; the last insert wins.
        let value = Arc::new(S::load(&self.db, location)?);
        debug!(
            "{} snapshot for {} loaded from store (present={})",
            S::NAME,
            location,
            value.is_some()
        );
        if let Some(cache) = &self.cache {
            cache.insert(location.to_string(), Arc::clone(&value));
        }
        Ok(value)
    }

    /// Drop every cached entry so the next reads go to the store.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}
