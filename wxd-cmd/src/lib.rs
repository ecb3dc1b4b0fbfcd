//! Command implementations for the weather dashboard CLI.
//!
//! Ingestion on demand or on a schedule, and JSON output of what is stored
//! for the dashboard to render.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use log::info;
use std::path::Path;
use std::time::Duration;
use wxd_db::Database;
use wxd_wwo::city::CityDirectory;
use wxd_wwo::location::location_query;
use wxd_wwo::{Mode, WwoClient};

pub mod config;
pub mod ingest;
pub mod output;
pub mod scheduler;

#[cfg(test)]
mod test_payloads;

use config::Settings;
use scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Historical,
    Forecast,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Historical => Mode::Historical,
            ModeArg::Forecast => Mode::Forecast,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest past weather for every day in a date range
    Historical {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,

        /// Last day (inclusive), YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,

        /// Location key; defaults to the configured location
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Ingest the forecast once
    Forecast {
        /// Location key; defaults to the configured location
        #[arg(short, long)]
        location: Option<String>,

        /// Forecast days to request
        #[arg(long)]
        days: Option<u32>,

        /// Hourly rows to keep, the current observation included
        #[arg(long)]
        hours: Option<usize>,
    },

    /// Ingest the forecast now and then on every poll interval, forever
    Watch {
        /// Location key; defaults to the configured location
        #[arg(short, long)]
        location: Option<String>,

        /// Seconds between the end of one ingestion and the start of the next
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Print the stored tables of one mode and location as JSON
    Snapshot {
        #[arg(value_enum, default_value = "forecast")]
        mode: ModeArg,

        /// Location key; defaults to the configured location
        #[arg(short, long)]
        location: Option<String>,

        /// Bypass the snapshot cache
        #[arg(long)]
        fresh: bool,

        /// Print again every this many seconds, forever, through one cache
        #[arg(long)]
        every: Option<u64>,
    },

    /// Fetch a forecast for a city without storing it and print it as JSON
    Preview {
        #[arg(long)]
        city: String,

        /// Full state name, e.g. "Rhode Island"
        #[arg(long)]
        state: String,

        #[arg(long)]
        days: Option<u32>,

        #[arg(long)]
        hours: Option<usize>,
    },

    /// List states, or the cities of one state
    Cities {
        #[arg(long)]
        state: Option<String>,
    },
}

pub async fn run(config: Option<&Path>, command: Command) -> anyhow::Result<()> {
    let settings = Settings::load(config)?;
    let client = || WwoClient::with_base_url(&settings.provider.base_url, settings.credentials());

    match command {
        Command::Historical {
            start,
            end,
            location,
        } => {
            let db = open_database(&settings)?;
            let location = location.unwrap_or_else(|| settings.location.clone());
            let report =
                ingest::ingest_historical(&client(), &db, &location, start, end).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Forecast {
            location,
            days,
            hours,
        } => {
            let db = open_database(&settings)?;
            let location = location.unwrap_or_else(|| settings.location.clone());
            let report = ingest::ingest_forecast(
                &client(),
                &db,
                &location,
                days.unwrap_or(settings.num_of_days),
                hours.unwrap_or(settings.num_of_hours),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Watch { location, interval } => {
            let db = open_database(&settings)?;
            let mut watch = settings.clone();
            if let Some(location) = location {
                watch.location = location;
            }
            if let Some(interval) = interval {
                watch.poll_interval_secs = interval;
            }
            Scheduler::new(client(), db, &watch).run().await;
        }
        Command::Snapshot {
            mode,
            location,
            fresh,
            every,
        } => {
            let db = open_database(&settings)?;
            let mode = Mode::from(mode);
            let location = location.unwrap_or_else(|| settings.location.clone());
            info!("Reading {} snapshot for {}", mode, location);
            let view = output::SnapshotView::new(db, mode, settings.cache_ttl());
            match every {
                None => println!("{}", view.render(&location, !fresh)?),
                Some(secs) => {
                    view.watch(
                        &location,
                        !fresh,
                        Duration::from_secs(secs),
                        None,
                        std::io::stdout(),
                    )
                    .await?
                }
            }
        }
        Command::Preview {
            city,
            state,
            days,
            hours,
        } => {
            let location = location_query(&city, &state);
            let batch = ingest::preview_forecast(
                &client(),
                &location,
                days.unwrap_or(settings.num_of_days),
                hours.unwrap_or(settings.num_of_hours),
            )
            .await?;
            let preview = output::Preview::from_batch(&location, batch);
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        Command::Cities { state } => {
            let directory = CityDirectory::embedded().context("Failed to parse city list")?;
            println!("{}", output::cities_json(&directory, state.as_deref())?);
        }
    }
    Ok(())
}

fn open_database(settings: &Settings) -> anyhow::Result<Database> {
    Database::open(&settings.database).with_context(|| {
        format!(
            "Failed to open weather store at {}",
            settings.database.display()
        )
    })
}
