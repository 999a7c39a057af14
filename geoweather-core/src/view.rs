use chrono::{DateTime, Utc};

use crate::{model::PanelState, panel::WeatherPanel};

pub const KEY_LABEL: &str = "OpenWeatherMap API Key : ";
pub const KEY_PLACEHOLDER: &str = "Enter your API Key";
pub const SAVE_BUTTON_LABEL: &str = "Save API key";
pub const LOADING_TEXT: &str = "Loading...";

/// What the front-end draws for the current panel state.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub key_label: &'static str,
    /// One `*` per key character, or the placeholder when empty.
    pub key_field: String,
    pub key_is_placeholder: bool,
    pub button_label: &'static str,
    pub loading: bool,
    pub error: Option<String>,
    pub weather: Option<WeatherCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub location_name: String,
    pub icon_url: String,
    pub temperature_c: f64,
    pub description: String,
    pub observed_at: Option<DateTime<Utc>>,
}

impl PanelView {
    pub fn from_panel(panel: &WeatherPanel) -> Self {
        Self::project(panel.api_key(), panel.state())
    }

    pub fn project(api_key: &str, state: &PanelState) -> Self {
        let (key_field, key_is_placeholder) = if api_key.is_empty() {
            (KEY_PLACEHOLDER.to_string(), true)
        } else {
            ("*".repeat(api_key.chars().count()), false)
        };

        let weather = state.weather.as_ref().and_then(|snap| {
            let condition = snap.primary_condition()?;
            Some(WeatherCard {
                location_name: snap.name.clone(),
                icon_url: crate::model::icon_url(&condition.icon),
                temperature_c: snap.temperature,
                description: condition.description.clone(),
                observed_at: snap.observed_at,
            })
        });

        Self {
            key_label: KEY_LABEL,
            key_field,
            key_is_placeholder,
            button_label: SAVE_BUTTON_LABEL,
            loading: state.loading,
            error: state.error.clone(),
            weather,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, WeatherSnapshot};

    #[test]
    fn masks_the_key_and_shows_placeholder_when_empty() {
        let state = PanelState::default();

        let view = PanelView::project("abc123", &state);
        assert_eq!(view.key_field, "******");
        assert!(!view.key_is_placeholder);
        assert_eq!(view.button_label, "Save API key");

        let view = PanelView::project("", &state);
        assert_eq!(view.key_field, KEY_PLACEHOLDER);
        assert!(view.key_is_placeholder);
    }

    #[test]
    fn weather_card_uses_first_condition() {
        let state = PanelState {
            loading: false,
            error: None,
            weather: Some(WeatherSnapshot {
                name: "Seoul".into(),
                conditions: vec![
                    Condition {
                        icon: "10n".into(),
                        description: "light rain".into(),
                    },
                    Condition {
                        icon: "50n".into(),
                        description: "mist".into(),
                    },
                ],
                temperature: 12.25,
                observed_at: None,
            }),
        };

        let card = PanelView::project("k", &state).weather.expect("card");
        assert_eq!(card.location_name, "Seoul");
        assert_eq!(card.icon_url, "https://openweathermap.org/img/wn/10n@2x.png");
        assert_eq!(card.temperature_c, 12.25);
        assert_eq!(card.description, "light rain");
    }

    #[test]
    fn error_and_loading_are_passed_through() {
        let state = PanelState {
            loading: true,
            error: None,
            weather: None,
        };
        let view = PanelView::project("k", &state);
        assert!(view.loading);
        assert!(view.error.is_none() && view.weather.is_none());

        let state = PanelState {
            loading: false,
            error: Some("nope".into()),
            weather: None,
        };
        assert_eq!(PanelView::project("k", &state).error.as_deref(), Some("nope"));
    }
}
