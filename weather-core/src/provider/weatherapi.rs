use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{LocationQuery, WeatherResult},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

const LOCALTIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    fn current_url(&self) -> String {
        format!("{}/v1/current.json", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, query: &LocationQuery) -> Result<WeatherResult, WeatherError> {
        let q = query.as_query_string();
        tracing::debug!(q = %q, "requesting current conditions");

        let res = self
            .http
            .get(self.current_url())
            .query(&[("key", self.api_key.as_str()), ("q", q.as_str()), ("aqi", "no")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "WeatherAPI current request failed");
            return Err(WeatherError::Network { status });
        }

        let parsed: WaResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "WeatherAPI current response did not match schema");
            WeatherError::Parse(e.to_string())
        })?;

        parsed.into_result()
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    country: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    condition: WaCondition,
    humidity: u8,
    wind_kph: f64,
    wind_dir: String,
    uv: f64,
    pressure_mb: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

impl WaResponse {
    /// Checks the parts serde cannot express before building the result.
    fn into_result(self) -> Result<WeatherResult, WeatherError> {
        let WaResponse { location, current } = self;

        if location.name.trim().is_empty() {
            return Err(WeatherError::Parse("location name is empty".into()));
        }
        if current.humidity > 100 {
            return Err(WeatherError::Parse(format!("humidity out of range: {}", current.humidity)));
        }

        let local_time = NaiveDateTime::parse_from_str(&location.localtime, LOCALTIME_FORMAT)
            .map_err(|e| WeatherError::Parse(format!("bad localtime '{}': {e}", location.localtime)))?;

        Ok(WeatherResult {
            location_name: location.name,
            region: location.region,
            country: location.country,
            local_time,
            temperature_c: current.temp_c,
            feels_like_c: current.feelslike_c,
            condition: current.condition.text,
            icon_url: normalize_icon_url(&current.condition.icon),
            humidity_pct: current.humidity,
            wind_kph: current.wind_kph,
            wind_dir: current.wind_dir,
            uv_index: current.uv,
            pressure_mb: current.pressure_mb,
        })
    }
}

/// The API hands out protocol-relative icon URLs (`//cdn.weatherapi.com/...`).
fn normalize_icon_url(icon: &str) -> String {
    if icon.starts_with("//") { format!("https:{icon}") } else { icon.to_string() }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
