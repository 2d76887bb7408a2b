//! Text rendering of the display surface.

use std::fmt;

use crate::model::{RequestState, WeatherResult};

/// Whatever the widget shows for `state`. Empty while idle.
pub fn render_state(state: &RequestState) -> String {
    match state {
        RequestState::Idle => String::new(),
        RequestState::Loading => "Loading...".to_string(),
        RequestState::Error(msg) => msg.clone(),
        RequestState::Success(result) => result.to_string(),
    }
}

/// The weather card.
impl fmt::Display for WeatherResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}, {}", self.location_name, self.country)?;
        writeln!(f, "Local time: {}", self.local_time.format("%Y-%m-%d %H:%M"))?;
        writeln!(f, "Temperature: {}°C (feels like {}°C)", self.temperature_c, self.feels_like_c)?;
        writeln!(f, "Condition: {}", self.condition)?;
        writeln!(f, "Icon: {}", self.icon_url)?;
        writeln!(f, "Humidity: {}%", self.humidity_pct)?;
        writeln!(f, "Wind: {} kph {}", self.wind_kph, self.wind_dir)?;
        writeln!(f, "UV index: {}", self.uv_index)?;
        write!(f, "Pressure: {} mb", self.pressure_mb)
    }
}
