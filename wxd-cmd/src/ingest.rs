//! One fetch→extract→upsert pass for either mode.

use chrono::NaiveDate;
use log::info;
use thiserror::Error;
use wxd_db::{Database, StoreError, UpsertReport};
use wxd_wwo::date_range::DateRange;
use wxd_wwo::extract::{load_forecast, load_historical};
use wxd_wwo::{ForecastBatch, InvalidRangeError, RequestError, WwoClient};

/// Anything that can stop an ingestion pass.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetch the forecast for `location` and upsert it.
pub async fn ingest_forecast(
    client: &WwoClient,
    db: &Database,
    location: &str,
    num_of_days: u32,
    num_of_hours: usize,
) -> Result<UpsertReport, IngestError> {
    let batch = load_forecast(client, location, num_of_days, num_of_hours).await?;
    Ok(db.upsert_forecast(&batch)?)
}

/// Fetch and extract a forecast for `location` without storing it.
pub async fn preview_forecast(
    client: &WwoClient,
    location: &str,
    num_of_days: u32,
    num_of_hours: usize,
) -> Result<ForecastBatch, IngestError> {
    Ok(load_forecast(client, location, num_of_days, num_of_hours).await?)
}

/// Fetch every day in `start..=end` for `location` and upsert them.
///
/// The range is validated before any request goes out.
pub async fn ingest_historical(
    client: &WwoClient,
    db: &Database,
    location: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<UpsertReport, IngestError> {
    let range = DateRange::new(start, end)?;
    info!(
        "Ingesting historical weather for {} from {} to {} ({} days)",
        location,
        range.start(),
        range.end(),
        range.days()
    );
    let dates: Vec<NaiveDate> = range.collect();
    let batch = load_historical(client, location, &dates).await?;
    Ok(db.upsert_historical(&batch)?)
}
