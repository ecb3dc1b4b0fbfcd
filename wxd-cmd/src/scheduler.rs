//! Periodic forecast ingestion.
//!
//! One tick runs immediately, then one per interval, forever. A tick that
//! fails is logged and dropped; the next one still runs. The interval is
//! counted from the end of a tick, so ticks never overlap.

use log::{info, warn};
use std::time::Duration;
use wxd_db::Database;
use wxd_wwo::WwoClient;

use crate::config::Settings;
use crate::ingest::ingest_forecast;

pub struct Scheduler {
    client: WwoClient,
    db: Database,
    location: String,
    num_of_days: u32,
    num_of_hours: usize,
    interval: Duration,
}

impl Scheduler {
    pub fn new(client: WwoClient, db: Database, settings: &Settings) -> Self {
        Self {
            client,
            db,
            location: settings.location.clone(),
            num_of_days: settings.num_of_days,
            num_of_hours: settings.num_of_hours,
            interval: settings.poll_interval(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// One ingestion pass. Returns whether it succeeded; errors never escape.
    pub async fn tick(&self) -> bool {
        match ingest_forecast(
            &self.client,
            &self.db,
            &self.location,
            self.num_of_days,
            self.num_of_hours,
        )
        .await
        {
            Ok(report) => {
                info!(
                    "Forecast tick for {}: daily={}, hourly={}",
                    self.location, report.daily.rows, report.hourly.rows
                );
                true
            }
            Err(e) => {
                warn!("Forecast tick for {} failed: {}", self.location, e);
                false
            }
        }
    }

    /// Tick now, then every interval. Never returns.
    pub async fn run(&self) {
        info!(
            "Polling forecast for {} every {:?}",
            self.location, self.interval
        );
        loop {
            self.tick().await;
            tokio::time::sleep(self.interval).await;
        }
    }
}
