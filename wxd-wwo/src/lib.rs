//! Core types and World Weather Online client for the weather dashboard.
//!
//! - [`client`]: GETs against the historical and forecast endpoints
//! - [`response`]: typed provider payload, validated at parse time
//! - [`extract`]: flattening into daily/hourly rows ([`observation`])
//! - [`date_range`], [`location`], [`city`]: inputs to ingestion and the selectors

pub mod city;
pub mod client;
pub mod date_range;
pub mod error;
pub mod extract;
pub mod location;
pub mod observation;
pub mod response;

pub use client::{Credentials, WwoClient, DEFAULT_BASE_URL};
pub use error::{InvalidRangeError, RequestError};
pub use observation::{
    ForecastBatch, ForecastDaily, ForecastHourly, HistoricalBatch, HistoricalDaily,
    HistoricalHourly, Mode,
};
