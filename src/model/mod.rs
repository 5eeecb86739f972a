//! In-memory diary records: trips own an album, albums own photos.

pub mod location;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::ModelError;

pub use location::{Coordinates, EARTH_RADIUS_KM, Location};

/// Shown in place of a caption the user never wrote.
pub const NO_CAPTION: &str = "no caption";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    name: String,
    pub description: String,
    pub album: Option<Album>,
}

impl Trip {
    /// Creates a trip with an empty album. The name must not be blank.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyTripName);
        }
        Ok(Self {
            name,
            description: description.into(),
            album: Some(Album::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photo_count(&self) -> usize {
        self.album.as_ref().map_or(0, |album| album.photos.len())
    }
}

/// Photos in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Album {
    pub photos: Vec<Photo>,
}

impl Album {
    pub fn push(&mut self, photo: Photo) {
        self.photos.push(photo);
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    file_path: String,
    name: String,
    pub caption: Option<String>,
    pub taken_at: Option<NaiveDateTime>,
    pub location: Location,
}

impl Photo {
    pub fn new(
        file_path: impl Into<String>,
        name: impl Into<String>,
        caption: Option<String>,
        taken_at: Option<NaiveDateTime>,
        location: Location,
    ) -> Result<Self, ModelError> {
        let file_path = file_path.into();
        let name = name.into();
        if file_path.trim().is_empty() {
            return Err(ModelError::EmptyPhotoPath);
        }
        if name.trim().is_empty() {
            return Err(ModelError::EmptyPhotoName);
        }
        if let Some(c) = location.coordinates().filter(|c| !c.is_valid()) {
            return Err(ModelError::InvalidCoordinates {
                latitude: c.latitude,
                longitude: c.longitude,
            });
        }
        Ok(Self {
            file_path,
            name,
            caption: caption.filter(|c| !c.is_empty()),
            taken_at,
            location,
        })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn caption_or_default(&self) -> &str {
        self.caption.as_deref().unwrap_or(NO_CAPTION)
    }
}
