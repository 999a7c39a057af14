use crate::{error::WeatherError, model::Coordinates};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod openweather;

/// Fetches the raw current-weather document for a position.
///
/// The document is returned as-is; shaping it into a
/// [`WeatherSnapshot`](crate::WeatherSnapshot) is the caller's job.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch_weather(
        &self,
        coords: Coordinates,
        api_key: &str,
    ) -> Result<Value, WeatherError>;
}
