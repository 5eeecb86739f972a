//! Offline reverse geocoding against a static city dataset.
//!
//! The [`Geocoder`] is built once at startup, usually with [`Geocoder::load`],
//! and then shared by reference. Place names are best-effort: when the dataset
//! is unavailable every lookup degrades to a descriptive fallback string.

pub mod city;
pub mod index;
pub mod nearest;

use camino::Utf8Path;
use tracing::{info, warn};

use crate::model::Coordinates;

pub use city::{City, CityColumns, load_cities, parse_cities};
pub use index::CityIndex;
pub use nearest::Nearest;

/// Turns coordinates into a place name, if it can.
pub trait LocationResolver {
    fn resolve(&self, coordinates: Coordinates) -> Option<String>;
}

impl<F> LocationResolver for F
where
    F: Fn(Coordinates) -> Option<String>,
{
    fn resolve(&self, coordinates: Coordinates) -> Option<String> {
        self(coordinates)
    }
}

#[derive(Debug, Default)]
pub struct Geocoder {
    /// `None` when the dataset could not be loaded.
    index: Option<CityIndex>,
}

impl Geocoder {
    /// Loads the dataset at `path` and builds the index. Failures are logged
    /// and leave the geocoder unavailable rather than failing startup.
    pub fn load(path: &Utf8Path, columns: &CityColumns) -> Self {
        match load_cities(path, columns) {
            Ok(cities) => Self::from_cities(cities),
            Err(e) => {
                warn!("reverse geocoding disabled: {e}");
                Self::unavailable()
            }
        }
    }

    pub fn from_cities(cities: Vec<City>) -> Self {
        let index = CityIndex::build(cities);
        info!(cities = index.len(), depth = index.depth(), "city index built");
        Self { index: Some(index) }
    }

    pub fn unavailable() -> Self {
        Self { index: None }
    }

    pub fn is_available(&self) -> bool {
        self.index.as_ref().is_some_and(|index| !index.is_empty())
    }

    pub fn nearest(&self, coordinates: Coordinates) -> Option<Nearest<'_>> {
        self.index.as_ref()?.nearest(coordinates)
    }

    /// Names the place at `(latitude, longitude)` as `"<city>, <country>"`.
    ///
    /// `(0, 0)` is the "no fix" convention and is never looked up.
    pub fn resolve_location(&self, latitude: f64, longitude: f64) -> String {
        if !latitude.is_finite() || !longitude.is_finite() {
            return UNKNOWN_LOCATION.to_string();
        }
        match Coordinates::from_raw(latitude, longitude) {
            None => UNKNOWN_LOCATION.to_string(),
            Some(coordinates) => self
                .resolve(coordinates)
                .unwrap_or_else(|| format!("{UNKNOWN_LOCATION} ({latitude:.4}, {longitude:.4})")),
        }
    }
}

impl LocationResolver for Geocoder {
    fn resolve(&self, coordinates: Coordinates) -> Option<String> {
        self.nearest(coordinates).map(|nearest| nearest.city.to_string())
    }
}

pub const UNKNOWN_LOCATION: &str = "Unknown location";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from_dataset() {
        let geocoder = Geocoder::load(Utf8Path::new("test_data/cities.csv"), &CityColumns::default());
        assert!(geocoder.is_available());
        assert_eq!(geocoder.resolve_location(35.6937, 139.7013), "Tokyo, Japan");
        assert_eq!(geocoder.resolve_location(38.70, -9.14), "Lisbon, Portugal");
        assert_eq!(geocoder.resolve_location(-36.9, 174.8), "Auckland, New Zealand");
    }

    #[test]
    fn test_missing_dataset_falls_back() {
        let geocoder = Geocoder::load(Utf8Path::new("test_data/missing.csv"), &CityColumns::default());
        assert!(!geocoder.is_available());
        assert_eq!(
            geocoder.resolve_location(35.6937, 139.7013),
            "Unknown location (35.6937, 139.7013)"
        );
    }

    #[test]
    fn test_no_fix_is_not_looked_up() {
        let geocoder = Geocoder::from_cities(vec![City::new("Null Island", "Atlantic", 0.0, 0.0)]);
        assert_eq!(geocoder.resolve_location(0.0, 0.0), UNKNOWN_LOCATION);
        assert_eq!(geocoder.resolve_location(f64::NAN, 1.0), UNKNOWN_LOCATION);
        assert_eq!(geocoder.resolve_location(0.1, 0.1), "Null Island, Atlantic");
    }

    #[test]
    fn test_geocoder_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Geocoder>();
    }
}
