//! Core library for the `geoweather` panel.
//!
//! This crate defines:
//! - The save-key, locate, fetch pipeline and its observable state
//! - Collaborator seams for location, weather data and key storage
//! - Error kinds and the messages shown for them
//! - Settings handling
//!
//! It is used by `geoweather-cli`, but the panel runs with any
//! [`LocationProvider`], [`WeatherFetcher`] and [`KeyValueStore`].

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod panel;
pub mod provider;
pub mod store;
pub mod view;

pub use config::Settings;
pub use error::{LocationError, StoreError, WeatherError, error_message};
pub use location::{FixedLocation, IpLocation, LocationProvider, Unsupported};
pub use model::{Condition, Coordinates, PanelState, WeatherSnapshot};
pub use panel::WeatherPanel;
pub use provider::{WeatherFetcher, openweather::OpenWeatherClient};
pub use store::{CredentialStore, FileStore, KeyValueStore, MemoryStore};
pub use view::{PanelView, WeatherCard};
