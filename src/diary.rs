//! Entry point for the diary's command layer: save, load and place naming.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::warn;

use crate::config::DiaryConfig;
use crate::error::{LoadError, ModelError, WriteError};
use crate::geo::{Geocoder, LocationResolver};
use crate::metadata::PhotoMetadata;
use crate::model::{Location, Photo, Trip};
use crate::storage::{self, Loaded};

pub struct Diary {
    data_file: Utf8PathBuf,
    geocoder: Arc<Geocoder>,
}

impl Diary {
    pub fn new(data_file: impl Into<Utf8PathBuf>, geocoder: Arc<Geocoder>) -> Self {
        Self {
            data_file: data_file.into(),
            geocoder,
        }
    }

    /// Builds the city index up front and binds the configured data file.
    pub fn open(config: &DiaryConfig) -> Self {
        let geocoder = Geocoder::load(&config.cities.path, &config.cities.columns);
        Self::new(config.data_file.clone(), Arc::new(geocoder))
    }

    pub fn data_file(&self) -> &Utf8Path {
        &self.data_file
    }

    pub fn geocoder(&self) -> &Arc<Geocoder> {
        &self.geocoder
    }

    pub fn save(&self, trips: &[Trip]) -> Result<(), WriteError> {
        storage::save(&self.data_file, trips)
    }

    /// Loads every intact trip. Skipped records are logged as warnings; use
    /// [`Diary::load_with_diagnostics`] to inspect them.
    pub fn load(&self) -> Result<Vec<Trip>, LoadError> {
        let loaded = self.load_with_diagnostics()?;
        for diagnostic in &loaded.diagnostics {
            warn!(path = %self.data_file, "{diagnostic}");
        }
        Ok(loaded.trips)
    }

    pub fn load_with_diagnostics(&self) -> Result<Loaded, LoadError> {
        storage::load(&self.data_file, self.geocoder.as_ref())
    }

    pub fn resolve_location(&self, latitude: f64, longitude: f64) -> String {
        self.geocoder.resolve_location(latitude, longitude)
    }

    /// Creates a photo from what the metadata reader found, naming its place
    /// when coordinates are known. Coordinates outside the valid range are
    /// rejected so the photo can always be saved and loaded back.
    pub fn new_photo(
        &self,
        file_path: impl Into<String>,
        name: impl Into<String>,
        caption: Option<String>,
        metadata: PhotoMetadata,
    ) -> Result<Photo, ModelError> {
        let place = metadata
            .coordinates
            .and_then(|coordinates| self.geocoder.resolve(coordinates));
        let location = Location::new(metadata.coordinates, place);
        Photo::new(file_path, name, caption, metadata.taken_at, location)
    }
}
