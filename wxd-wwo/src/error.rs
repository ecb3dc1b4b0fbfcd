//! Errors raised while fetching and flattening provider data.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure talking to the weather provider or making sense of its answer.
///
/// Transport and status failures are not retried by the client; they
/// propagate to the caller (the scheduler decides whether to swallow them).
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider rejected request: {0}")]
    Provider(String),

    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl RequestError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// A date range whose start falls after its end.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("start date {start} must not be later than end date {end}")]
pub struct InvalidRangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}
