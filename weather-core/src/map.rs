//! Map component: tile source configuration and the single click marker.

use serde::{Deserialize, Serialize};

use crate::model::Coordinates;

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Web Mercator cuts off here.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Deepest zoom the OSM tile servers serve.
pub const MAX_ZOOM: u32 = 19;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Template with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url: String,
    pub subdomains: Vec<String>,
    pub zoom: u32,
    pub center: Coordinates,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: DEFAULT_TILE_URL.to_string(),
            subdomains: vec!["a".into(), "b".into(), "c".into()],
            zoom: 2,
            center: Coordinates::new(20.0, 0.0),
        }
    }
}

/// Slippy-map tile index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// Tile containing `point` at `zoom`, with `zoom` capped at [`MAX_ZOOM`].
pub fn tile_for(point: Coordinates, zoom: u32) -> Tile {
    let zoom = zoom.min(MAX_ZOOM);
    let n = 1u32 << zoom;
    let lat_rad = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();

    let x = ((point.lon + 180.0) / 360.0 * n as f64).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
        * n as f64)
        .floor();

    let max = (n - 1) as f64;
    Tile { x: x.clamp(0.0, max) as u32, y: y.clamp(0.0, max) as u32, z: zoom }
}

/// Wrap a longitude into [-180, 180]. In-range values are returned untouched.
pub fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 { 180.0 } else { wrapped }
}

#[derive(Debug, Clone)]
pub struct MapView {
    config: MapConfig,
    marker: Option<Coordinates>,
}

impl MapView {
    pub fn new(mut config: MapConfig) -> Self {
        if config.zoom > MAX_ZOOM {
            tracing::warn!(zoom = config.zoom, max = MAX_ZOOM, "map zoom out of range, capping");
            config.zoom = MAX_ZOOM;
        }
        Self { config, marker: None }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn marker(&self) -> Option<Coordinates> {
        self.marker
    }

    /// Normalise a clicked point and make it the only marker.
    ///
    /// Returns `None` for points that cannot be on the map (non-finite values
    /// or latitude beyond the poles); the previous marker is kept in that case.
    pub fn place_marker(&mut self, lat: f64, lon: f64) -> Option<Coordinates> {
        if !lat.is_finite() || !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
            tracing::debug!(lat, lon, "ignoring click outside the map");
            return None;
        }

        let point = Coordinates::new(lat, wrap_longitude(lon));
        self.marker = Some(point);
        Some(point)
    }

    pub fn clear(&mut self) {
        self.marker = None;
    }

    /// Tile URL under the current marker at the configured zoom.
    pub fn marker_tile_url(&self) -> Option<String> {
        self.marker.map(|point| self.tile_url_for(point))
    }

    pub fn tile_url_for(&self, point: Coordinates) -> String {
        let tile = tile_for(point, self.config.zoom);
        let subdomain = if self.config.subdomains.is_empty() {
            ""
        } else {
            let idx = (tile.x as usize + tile.y as usize) % self.config.subdomains.len();
            self.config.subdomains[idx].as_str()
        };

        self.config
            .tile_url
            .replace("{s}", subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}
