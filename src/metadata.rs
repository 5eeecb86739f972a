//! What the image metadata reader hands over for a photo.
//!
//! Decoding EXIF itself happens elsewhere; this module only fixes the shape
//! of its answer and the "no fix" convention for coordinates.

use chrono::NaiveDateTime;

use crate::model::Coordinates;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhotoMetadata {
    pub coordinates: Option<Coordinates>,
    pub taken_at: Option<NaiveDateTime>,
}

impl PhotoMetadata {
    pub fn new(coordinates: Option<Coordinates>, taken_at: Option<NaiveDateTime>) -> Self {
        Self {
            coordinates,
            taken_at,
        }
    }

    /// From a raw reading where `(0, 0)` stands for "no GPS data".
    pub fn from_raw(latitude: f64, longitude: f64, taken_at: Option<NaiveDateTime>) -> Self {
        Self::new(Coordinates::from_raw(latitude, longitude), taken_at)
    }
}
