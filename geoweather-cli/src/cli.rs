use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use geoweather_core::{
    Coordinates, CredentialStore, PanelView, Settings, WeatherPanel, view::KEY_PLACEHOLDER,
};
use inquire::{Password, PasswordDisplayMode};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Current weather for where you are")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Latitude to use instead of looking up the current position.
    #[arg(long, global = true, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude to use instead of looking up the current position.
    #[arg(long, global = true, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save an OpenWeatherMap API key, then show the weather.
    Save {
        /// API key; prompted for (masked) when absent.
        #[arg(long)]
        key: Option<String>,
    },

    /// Show the weather using the stored API key.
    Show,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };

        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            settings.location = Some(Coordinates::new(lat, lon));
        }
        tracing::debug!(?settings, "settings loaded");

        let store = settings.open_store()?;
        let mut panel = WeatherPanel::new(
            settings.location_provider(),
            Box::new(settings.weather_client()),
            CredentialStore::new(Box::new(store)),
        )
        .context("Failed to read the stored API key")?;

        if let Command::Save { key } = self.command {
            let key = match key {
                Some(key) => key,
                None => prompt_api_key(panel.api_key())?,
            };
            panel.set_api_key(key);
        }

        render::print_controls(&PanelView::from_panel(&panel));
        if panel.has_api_key() {
            render::print_loading();
        }

        panel.save_and_fetch().await;

        let after = PanelView::from_panel(&panel);
        render::print_status(&after);

        Ok(if after.error.is_some() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}

/// Masked key entry. An empty answer keeps the current key.
fn prompt_api_key(current: &str) -> anyhow::Result<String> {
    let help = if current.is_empty() {
        KEY_PLACEHOLDER.to_string()
    } else {
        format!("{KEY_PLACEHOLDER} (leave empty to keep the saved key)")
    };

    let answer = Password::new("OpenWeatherMap API Key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(&help)
        .prompt()
        .context("Failed to read API key")?;

    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer
    })
}
