//! Error type shared by the selector, the provider and the fetcher.

use reqwest::StatusCode;
use thiserror::Error;

/// Shown when a fetch is requested without any usable location.
pub const MISSING_LOCATION: &str = "Please enter a city name or select a location on the map.";

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("{0}")]
    Validation(String),

    #[error("weather request failed with status {status}")]
    Network { status: StatusCode },

    #[error("weather request could not be sent: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected weather response: {0}")]
    Parse(String),

    #[error("{0}")]
    Config(String),
}

impl WeatherError {
    pub fn missing_location() -> Self {
        Self::Validation(MISSING_LOCATION.to_string())
    }

    /// Message for the display surface.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Config(msg) => msg.clone(),
            Self::Network { .. } | Self::Transport(_) => "Failed to fetch weather data.".to_string(),
            Self::Parse(_) => "Something went wrong.".to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
