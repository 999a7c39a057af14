use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WeatherError;

const ICON_URL_PREFIX: &str = "https://openweathermap.org/img/wn/";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub icon: String,
    pub description: String,
}

/// Current conditions for one location, validated out of the raw
/// OpenWeather document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    /// Never empty.
    pub conditions: Vec<Condition>,
    pub temperature: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    /// Validate an untyped response document into a snapshot.
    ///
    /// Requires `name`, a numeric `main.temp` and a non-empty `weather` array
    /// whose entries carry string `icon` and `description`. `dt` is optional.
    pub fn from_document(doc: &Value) -> Result<Self, WeatherError> {
        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing string field `name`"))?
            .to_string();

        let temperature = doc
            .pointer("/main/temp")
            .and_then(Value::as_f64)
            .ok_or_else(|| malformed("missing numeric field `main.temp`"))?;

        let entries = doc
            .get("weather")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("missing array field `weather`"))?;

        if entries.is_empty() {
            return Err(malformed("`weather` array is empty"));
        }

        let conditions = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let field = |key: &str| {
                    entry
                        .get(key)
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .ok_or_else(|| {
                            malformed(&format!("missing string field `weather[{i}].{key}`"))
                        })
                };
                Ok(Condition {
                    icon: field("icon")?,
                    description: field("description")?,
                })
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        let observed_at = doc
            .get("dt")
            .and_then(Value::as_i64)
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

        Ok(Self {
            name,
            conditions,
            temperature,
            observed_at,
        })
    }

    /// First condition entry; the one the panel displays.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }

    pub fn icon_url(&self) -> Option<String> {
        self.primary_condition().map(|c| icon_url(&c.icon))
    }
}

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL_PREFIX}{icon}@2x.png")
}

fn malformed(detail: &str) -> WeatherError {
    WeatherError::MalformedResponse(detail.to_string())
}

/// Observable state of a [`WeatherPanel`](crate::WeatherPanel).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub loading: bool,
    pub error: Option<String>,
    pub weather: Option<WeatherSnapshot>,
}

impl PanelState {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.weather = None;
    }

    pub(crate) fn succeed(&mut self, snapshot: WeatherSnapshot) {
        self.loading = false;
        self.error = None;
        self.weather = Some(snapshot);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.loading = false;
        self.weather = None;
        self.error = Some(message);
    }
}
