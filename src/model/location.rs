use serde::Serialize;

/// Mean Earth radius used for every great-circle computation, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds coordinates from a raw metadata pair, where `(0, 0)` means
    /// the camera recorded no fix.
    pub fn from_raw(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude == 0.0 && longitude == 0.0 {
            None
        } else {
            Some(Self::new(latitude, longitude))
        }
    }

    /// Finite and within ±90° latitude and ±180° longitude.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().atan2((1.0 - a).clamp(0.0, 1.0).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Where a photo was taken.
///
/// The place name is derived from the coordinates, so a location without
/// coordinates never carries one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    coordinates: Option<Coordinates>,
    name: Option<String>,
}

impl Location {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn new(coordinates: Option<Coordinates>, name: Option<String>) -> Self {
        let name = match coordinates {
            Some(_) => name.filter(|n| !n.trim().is_empty()),
            None => None,
        };
        Self { coordinates, name }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.name.is_some()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        if self.coordinates.is_some() && !name.trim().is_empty() {
            self.name = Some(name);
        }
    }
}
