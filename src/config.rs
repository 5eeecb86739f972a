use std::fs;
use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::geo::CityColumns;

pub const DEFAULT_CONFIG_FILE: &str = "tripdiary.yaml";

/// Settings read from `tripdiary.yaml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiaryConfig {
    /// Diary records file.
    pub data_file: Utf8PathBuf,
    pub cities: CityDataConfig,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            data_file: Utf8PathBuf::from("diary.txt"),
            cities: CityDataConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityDataConfig {
    pub path: Utf8PathBuf,
    #[serde(flatten)]
    pub columns: CityColumns,
}

impl Default for CityDataConfig {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("data/cities.csv"),
            columns: CityColumns::default(),
        }
    }
}

impl DiaryConfig {
    pub fn from_yaml(path: &Utf8Path, content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &content)
    }

    /// Like [`DiaryConfig::load`], but a missing file means defaults.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!(path = %path, "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }
}
