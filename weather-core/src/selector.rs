//! Location selector: manual entry or a click on the map, never both.

use crate::{
    error::WeatherError,
    map::{MapConfig, MapView},
    model::{Coordinates, LocationQuery},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Manual,
    Map,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Manual => InputMode::Map,
            InputMode::Map => InputMode::Manual,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationSelector {
    mode: InputMode,
    city: String,
    lat: Option<f64>,
    lon: Option<f64>,
    map: MapView,
}

impl LocationSelector {
    pub fn new(map: MapConfig) -> Self {
        Self { mode: InputMode::Manual, city: String::new(), lat: None, lon: None, map: MapView::new(map) }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        (self.lat, self.lon)
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn set_latitude(&mut self, lat: Option<f64>) {
        self.lat = lat;
    }

    pub fn set_longitude(&mut self, lon: Option<f64>) {
        self.lon = lon;
    }

    /// Empty text clears the latitude.
    pub fn set_latitude_text(&mut self, text: &str) -> Result<(), WeatherError> {
        self.lat = parse_coordinate(text, "Latitude")?;
        Ok(())
    }

    /// Empty text clears the longitude.
    pub fn set_longitude_text(&mut self, text: &str) -> Result<(), WeatherError> {
        self.lon = parse_coordinate(text, "Longitude")?;
        Ok(())
    }

    /// Register a map click. Only honoured in map mode.
    ///
    /// The returned point is the location-selected event; the caller is
    /// expected to fetch for it.
    pub fn click_map(&mut self, lat: f64, lon: f64) -> Option<Coordinates> {
        if self.mode != InputMode::Map {
            tracing::debug!("map click ignored in manual mode");
            return None;
        }

        let point = self.map.place_marker(lat, lon)?;
        self.lat = Some(point.lat);
        self.lon = Some(point.lon);
        Some(point)
    }

    /// Switch input mode, dropping everything entered so far.
    pub fn toggle_mode(&mut self) -> InputMode {
        self.mode = self.mode.toggled();
        self.reset();
        self.mode
    }

    pub fn reset(&mut self) {
        self.city.clear();
        self.lat = None;
        self.lon = None;
        self.map.clear();
    }

    /// A complete coordinate pair wins over the city name.
    pub fn build_query(&self) -> Result<LocationQuery, WeatherError> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Ok(LocationQuery::Coordinates(Coordinates::new(lat, lon)));
        }

        let city = self.city.trim();
        if city.is_empty() {
            return Err(WeatherError::missing_location());
        }

        Ok(LocationQuery::City(city.to_string()))
    }
}

impl Default for LocationSelector {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

fn parse_coordinate(text: &str, label: &str) -> Result<Option<f64>, WeatherError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(WeatherError::Validation(format!("{label} must be a number."))),
    }
}
