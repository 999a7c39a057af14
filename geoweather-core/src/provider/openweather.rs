use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::{error::WeatherError, model::Coordinates};

use super::WeatherFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Current-conditions client for the OpenWeatherMap 2.5 API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: Client::new(),
        }
    }

    /// `{base}/data/2.5/weather?lat=..&lon=..&appid=..&units=metric`
    pub fn request_url(&self, coords: Coordinates, api_key: &str) -> Result<Url, WeatherError> {
        let endpoint = format!("{}{CURRENT_WEATHER_PATH}", self.base_url);
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        Url::parse_with_params(
            &endpoint,
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ],
        )
        .map_err(|e| {
            WeatherError::Transport(format!("Invalid weather endpoint {endpoint}: {e}"))
        })
    }
}

impl Default for OpenWeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    async fn fetch_weather(
        &self,
        coords: Coordinates,
        api_key: &str,
    ) -> Result<Value, WeatherError> {
        let url = self.request_url(coords, api_key)?;
        tracing::debug!(
            lat = coords.latitude,
            lon = coords.longitude,
            "requesting current weather"
        );

        let res = self.http.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%status, "OpenWeather request failed");
            return Err(WeatherError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let body = res.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| WeatherError::MalformedResponse(format!("body is not JSON: {e}")))
    }
}
