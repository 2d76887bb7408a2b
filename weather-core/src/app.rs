//! One widget: a location selector feeding a weather fetcher.

use std::sync::Arc;

use crate::{
    config::Config,
    error::WeatherError,
    fetcher::WeatherFetcher,
    map::MapConfig,
    model::RequestState,
    provider::{WeatherProvider, provider_from_config},
    selector::{InputMode, LocationSelector},
};

#[derive(Debug)]
pub struct WeatherApp {
    selector: LocationSelector,
    fetcher: WeatherFetcher,
}

impl WeatherApp {
    /// Build the app against weatherapi.com using the key and map settings in `config`.
    pub fn new(config: &Config) -> Result<Self, WeatherError> {
        let provider = provider_from_config(config)?;
        Ok(Self::with_provider(provider, config.map.clone()))
    }

    pub fn with_provider(provider: Arc<dyn WeatherProvider>, map: MapConfig) -> Self {
        Self { selector: LocationSelector::new(map), fetcher: WeatherFetcher::new(provider) }
    }

    pub fn selector(&self) -> &LocationSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut LocationSelector {
        &mut self.selector
    }

    pub fn fetcher_mut(&mut self) -> &mut WeatherFetcher {
        &mut self.fetcher
    }

    pub fn state(&self) -> &RequestState {
        self.fetcher.state()
    }

    pub fn mode(&self) -> InputMode {
        self.selector.mode()
    }

    /// Switch between manual entry and the map. Clears input, result and error.
    pub fn toggle_mode(&mut self) -> InputMode {
        let mode = self.selector.toggle_mode();
        self.fetcher.reset();
        tracing::debug!(?mode, "input mode switched");
        mode
    }

    /// Fetch for whatever the selector currently holds.
    ///
    /// Runs one request to completion; see [`WeatherFetcher::fetch`] for
    /// issuing overlapping requests through `fetcher_mut()`.
    pub async fn submit(&mut self) -> &RequestState {
        match self.selector.build_query() {
            Ok(query) => self.fetcher.fetch(query).await,
            Err(err) => {
                self.fetcher.fail(&err);
                self.fetcher.state()
            }
        }
    }

    /// Handle a click on the map: move the marker and fetch for that point.
    ///
    /// Returns `None` when the click was not accepted (manual mode or a point
    /// off the map); no request is issued then.
    pub async fn map_click(&mut self, lat: f64, lon: f64) -> Option<&RequestState> {
        self.selector.click_map(lat, lon)?;
        Some(self.submit().await)
    }
}
