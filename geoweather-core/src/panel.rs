//! The weather panel: key entry plus the save-and-fetch pipeline.

use crate::{
    error::{WeatherError, error_message},
    location::LocationProvider,
    model::{PanelState, WeatherSnapshot},
    provider::WeatherFetcher,
    store::CredentialStore,
};

/// Orchestrates credential store, location provider and weather fetcher, and
/// holds the resulting [`PanelState`].
///
/// [`save_and_fetch`](Self::save_and_fetch) borrows the panel mutably, so one
/// panel never runs two cycles at once. If a cycle's future is dropped before
/// it settles, `loading` stays set until the next cycle starts over.
#[derive(Debug)]
pub struct WeatherPanel {
    location: Box<dyn LocationProvider>,
    fetcher: Box<dyn WeatherFetcher>,
    store: CredentialStore,
    api_key: String,
    state: PanelState,
}

impl WeatherPanel {
    /// Build a panel whose key input starts out with the stored key, if any.
    pub fn new(
        location: Box<dyn LocationProvider>,
        fetcher: Box<dyn WeatherFetcher>,
        store: CredentialStore,
    ) -> Result<Self, WeatherError> {
        let api_key = store.read()?.unwrap_or_default();

        Ok(Self {
            location,
            fetcher,
            store,
            api_key,
            state: PanelState::default(),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Key input change notification. Nothing is persisted until the next
    /// [`save_and_fetch`](Self::save_and_fetch).
    pub fn set_api_key(&mut self, value: impl Into<String>) {
        self.api_key = value.into();
    }

    /// Whether the next [`save_and_fetch`](Self::save_and_fetch) gets past the
    /// key check and enters loading.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Persist the held key, then locate, fetch and store the outcome.
    ///
    /// Without a usable stored key no network call is made.
    pub async fn save_and_fetch(&mut self) -> &PanelState {
        let api_key = match self.persist_key() {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(error = %err, "not fetching weather");
                self.state.loading = false;
                self.state.weather = None;
                self.state.error = Some(error_message(&err));
                return &self.state;
            }
        };

        self.state.begin();

        match self.locate_and_fetch(&api_key).await {
            Ok(snapshot) => {
                tracing::info!(
                    location = %snapshot.name,
                    temp = snapshot.temperature,
                    "weather updated"
                );
                self.state.succeed(snapshot);
            }
            Err(err) => {
                tracing::warn!(error = %err, "weather fetch failed");
                self.state.fail(error_message(&err));
            }
        }

        &self.state
    }

    fn persist_key(&mut self) -> Result<String, WeatherError> {
        self.store.write(&self.api_key)?;
        self.store.read()?.ok_or(WeatherError::MissingApiKey)
    }

    async fn locate_and_fetch(&self, api_key: &str) -> Result<WeatherSnapshot, WeatherError> {
        let coords = self.location.current_location().await?;
        tracing::debug!(
            lat = coords.latitude,
            lon = coords.longitude,
            "position resolved"
        );

        let doc = self.fetcher.fetch_weather(coords, api_key).await?;
        WeatherSnapshot::from_document(&doc)
    }
}
