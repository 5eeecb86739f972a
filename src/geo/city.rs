use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CityDataError;
use crate::model::Coordinates;

const COLUMN_SEPARATOR: char = ';';

/// A reference city. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            latitude,
            longitude,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

/// Column positions in the semicolon separated dataset. The defaults match
/// the GeoNames "cities" export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityColumns {
    pub name_column: usize,
    pub country_column: usize,
    /// Holds `"<lat>, <lon>"`.
    pub coordinates_column: usize,
}

impl Default for CityColumns {
    fn default() -> Self {
        Self {
            name_column: 1,
            country_column: 7,
            coordinates_column: 19,
        }
    }
}

impl CityColumns {
    fn required_len(&self) -> usize {
        self.name_column
            .max(self.country_column)
            .max(self.coordinates_column)
            + 1
    }
}

pub fn load_cities(path: &Utf8Path, columns: &CityColumns) -> Result<Vec<City>, CityDataError> {
    let file = File::open(path).map_err(|source| CityDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let cities = parse_cities(BufReader::new(file), columns)
        .map_err(|source| CityDataError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| CityDataError::MissingHeader {
            path: path.to_path_buf(),
        })?;

    info!(path = %path, cities = cities.len(), "city dataset loaded");
    Ok(cities)
}

/// Parses dataset rows after the header. Returns `None` when there is not
/// even a header line. Malformed rows, including rows that are not valid
/// UTF-8, are skipped.
pub fn parse_cities<R: BufRead>(
    mut input: R,
    columns: &CityColumns,
) -> io::Result<Option<Vec<City>>> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }

    let mut cities = Vec::new();
    let mut skipped = 0usize;
    // the header is line 1
    let mut line_number = 1;
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let row = std::str::from_utf8(&buf)
            .ok()
            .and_then(|line| parse_row(line.trim_end_matches(['\n', '\r']), columns));
        match row {
            Some(city) => cities.push(city),
            None => {
                skipped += 1;
                debug!(line_number, "skipping malformed city row");
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, "city rows skipped");
    }
    Ok(Some(cities))
}

fn parse_row(line: &str, columns: &CityColumns) -> Option<City> {
    let cells: Vec<&str> = line.split(COLUMN_SEPARATOR).collect();
    if cells.len() < columns.required_len() {
        return None;
    }

    let name = cells[columns.name_column].trim();
    if name.is_empty() {
        return None;
    }
    let country = cells[columns.country_column].trim();
    let (latitude, longitude) = parse_coordinate_pair(cells[columns.coordinates_column])?;

    Some(City::new(name, country, latitude, longitude))
}

fn parse_coordinate_pair(cell: &str) -> Option<(f64, f64)> {
    let (lat, lon) = cell.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;

    let valid = latitude.is_finite()
        && longitude.is_finite()
        && latitude.abs() <= 90.0
        && longitude.abs() <= 180.0;
    valid.then_some((latitude, longitude))
}
