//! Result types returned by the store.

use serde::Serialize;
use wxd_wwo::{ForecastDaily, ForecastHourly, HistoricalDaily, HistoricalHourly};

/// Matched vs inserted rows for one collection. Logged, never acted upon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertCount {
    pub rows: usize,
    /// Rows whose natural key already existed and were replaced.
    pub updated: usize,
    pub inserted: usize,
}

impl UpsertCount {
    pub(crate) fn record(&mut self, matched: bool) {
        self.rows += 1;
        if matched {
            self.updated += 1;
        } else {
            self.inserted += 1;
        }
    }
}

/// Outcome of upserting a (daily, hourly) batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertReport {
    pub daily: UpsertCount,
    pub hourly: UpsertCount,
    /// Previous "current" forecast rows replaced by a newer live observation.
    pub superseded_current: usize,
}

/// The daily and hourly tables of one collection pair, in key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<D, H> {
    pub daily: Vec<D>,
    pub hourly: Vec<H>,
}

pub type HistoricalSnapshot = Snapshot<HistoricalDaily, HistoricalHourly>;
pub type ForecastSnapshot = Snapshot<ForecastDaily, ForecastHourly>;

impl<D, H> Snapshot<D, H> {
    /// Pair up two tables. Either one empty means there is no data yet.
    pub fn from_tables(daily: Vec<D>, hourly: Vec<H>) -> Option<Self> {
        if daily.is_empty() || hourly.is_empty() {
            None
        } else {
            Some(Self { daily, hourly })
        }
    }
}
