use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use wxd_utils::dates::format_date;

use crate::error::RequestError;
use crate::response::WwoResponse;

/// Production endpoint root for the premium API.
pub const DEFAULT_BASE_URL: &str = "http://api.worldweatheronline.com/premium/v1";

const HISTORICAL_ENDPOINT: &str = "past-weather.ashx";
const FORECAST_ENDPOINT: &str = "weather.ashx";
const RESPONSE_FORMAT: &str = "json";
/// `tp=1`: one hourly entry per hour.
const INTERVAL_HOURS: &str = "1";

/// Provider API keys. The historical and forecast endpoints are keyed separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub historical_key: String,
    pub forecast_key: String,
}

/// Thin client over the two World Weather Online endpoints.
///
/// Each call is a single GET. Failures are returned as [`RequestError`]
/// and never retried here.
#[derive(Debug, Clone)]
pub struct WwoClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl WwoClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, credentials)
    }

    /// Client against a custom endpoint root (mock servers, proxies).
    pub fn with_base_url(base_url: &str, credentials: Credentials) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Fetch one past day for `location`.
    pub async fn past_weather(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<WwoResponse, RequestError> {
        let params = [
            ("key", self.credentials.historical_key.clone()),
            ("format", RESPONSE_FORMAT.to_string()),
            ("q", location.to_string()),
            ("date", format_date(&date)),
            ("tp", INTERVAL_HOURS.to_string()),
        ];
        self.get(HISTORICAL_ENDPOINT, &params).await
    }

    /// Fetch `num_of_days` forecast days plus the live condition for `location`.
    pub async fn forecast(
        &self,
        location: &str,
        num_of_days: u32,
    ) -> Result<WwoResponse, RequestError> {
        let params = [
            ("key", self.credentials.forecast_key.clone()),
            ("format", RESPONSE_FORMAT.to_string()),
            ("q", location.to_string()),
            ("tp", INTERVAL_HOURS.to_string()),
            ("num_of_days", num_of_days.to_string()),
            ("show_comments", "no".to_string()),
            ("showlocaltime", "yes".to_string()),
        ];
        self.get(FORECAST_ENDPOINT, &params).await
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<WwoResponse, RequestError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let query = params
            .iter()
            .find(|(name, _)| *name == "q")
            .map(|(_, value)| value.as_str())
            .unwrap_or_default();
        debug!("GET {} q={}", url, query);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|source| RequestError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| RequestError::Transport {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: WwoResponse = serde_json::from_str(&body)?;
        if let Some(message) = parsed.data.error.first() {
            return Err(RequestError::Provider(message.value.clone()));
        }
        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
