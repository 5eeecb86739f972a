//! Trip diary persistence with offline reverse geocoding.
//!
//! Trips own an album of photos. [`storage`] reads and writes them in a
//! line-oriented, escaped text format and keeps going when a single trip
//! record is damaged. [`geo`] maps photo coordinates to the nearest city of a
//! static dataset through a k-d tree. [`Diary`] ties both together for the
//! command layer.

pub mod config;
pub mod diary;
pub mod error;
pub mod geo;
pub mod metadata;
pub mod model;
pub mod storage;

pub use config::DiaryConfig;
pub use diary::Diary;
pub use error::{CityDataError, ConfigError, LoadError, ModelError, WriteError};
pub use geo::{City, CityIndex, Geocoder, LocationResolver};
pub use metadata::PhotoMetadata;
pub use model::{Album, Coordinates, Location, Photo, Trip};
pub use storage::{Diagnostic, DiagnosticKind, Loaded};
