use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::{Config, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS},
    error::WeatherError,
    model::{WeatherQuery, WeatherSnapshot},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_endpoint(
            api_key,
            DEFAULT_BASE_URL.to_string(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_endpoint(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url,
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_endpoint(
            config.resolve_api_key(),
            config.base_url().to_string(),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot> {
        let q = query.to_query_param();
        debug!(q = %q, url = %self.base_url, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", q.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|err| {
                warn!("OpenWeather request failed: {err}");
                WeatherError::NetworkFailure(err.to_string())
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            warn!("Failed to read OpenWeather response body: {err}");
            WeatherError::NetworkFailure(err.to_string())
        })?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "OpenWeather returned an error");
            return Err(WeatherError::from_status(status).into());
        }

        let snapshot: WeatherSnapshot = serde_json::from_str(&body).map_err(|err| {
            warn!("Failed to parse OpenWeather JSON: {err}; body: {}", truncate_body(&body));
            WeatherError::Unknown {
                status: Some(status.as_u16()),
            }
        })?;

        debug!(
            city = %snapshot.name,
            country = %snapshot.sys.country,
            "received current weather"
        );
        Ok(snapshot)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
