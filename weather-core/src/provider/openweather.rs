use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::WeatherError,
    model::{Coordinates, OpenWeatherResponse, Units},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: Units,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    base_url: String,
    units: Units,
    timeout: Duration,
}

impl OpenWeatherProviderBuilder {
    pub fn units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider, WeatherError> {
        let http = Client::builder().timeout(self.timeout).build()?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            units: self.units,
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: String) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    async fn fetch_current(&self, coords: Coordinates) -> Result<OpenWeatherResponse, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        let lat = format!("{:.6}", coords.lat());
        let lon = format!("{:.6}", coords.lon());

        debug!(%url, %lat, %lon, units = %self.units, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", self.units.as_query()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(redact)?;

        let status = res.status();
        let body = res.text().await.map_err(redact)?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(%status, %message, "OpenWeather rejected the request");
            return Err(WeatherError::Api { status, message });
        }

        let parsed: OpenWeatherResponse = serde_json::from_str(&body)?;
        debug!(location = %parsed.name, cod = parsed.cod, "decoded current weather");

        Ok(parsed)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(
        &self,
        coords: Coordinates,
    ) -> Result<OpenWeatherResponse, WeatherError> {
        self.fetch_current(coords).await
    }
}

fn redact(err: reqwest::Error) -> WeatherError {
    WeatherError::Network(err.without_url())
}

/// OpenWeather error payload, e.g. `{"cod":401,"message":"Invalid API key"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
