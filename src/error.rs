use camino::Utf8PathBuf;
use thiserror::Error;

/// Validation failures raised when building diary records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("trip name must not be empty")]
    EmptyTripName,

    #[error("photo file path must not be empty")]
    EmptyPhotoPath,

    #[error("photo name must not be empty")]
    EmptyPhotoName,

    #[error("coordinates ({latitude}, {longitude}) are out of range")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Saving failed. Whatever reached the disk before the failure is undefined.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to write diary to {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a whole load.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read diary from {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line_number}: {reason}: {line:?}")]
    Format {
        path: Utf8PathBuf,
        line_number: usize,
        line: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum CityDataError {
    #[error("failed to read city dataset {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("city dataset {path} is empty")]
    MissingHeader { path: Utf8PathBuf },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
