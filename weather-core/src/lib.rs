//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration (API key, endpoint, map settings)
//! - The location selector and map component
//! - The weatherapi.com provider and the request state machine
//! - Shared domain models and text rendering of the result card
//!
//! It is used by `weather-cli`, but any other front end can drive a
//! [`WeatherApp`] the same way.

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod fetcher;
pub mod map;
pub mod model;
pub mod provider;
pub mod selector;

pub use app::WeatherApp;
pub use config::Config;
pub use display::render_state;
pub use error::WeatherError;
pub use fetcher::{RequestTicket, WeatherFetcher};
pub use map::{MapConfig, MapView};
pub use model::{Coordinates, LocationQuery, RequestState, WeatherResult};
pub use provider::{WeatherProvider, weatherapi::WeatherApiProvider};
pub use selector::{InputMode, LocationSelector};
