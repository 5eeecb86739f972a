use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

use camino::Utf8Path;
use tracing::{debug, info};

use super::codec::{encode, encode_opt, join_fields};
use super::{ALBUM_MARKER, DATETIME_FORMAT, PHOTO_MARKER, TRIP_MARKER};
use crate::error::WriteError;
use crate::model::{Photo, Trip};

/// Writes `trips` to `path`, replacing any previous content.
pub fn save(path: &Utf8Path, trips: &[Trip]) -> Result<(), WriteError> {
    let wrap = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    let file = File::create(path).map_err(wrap)?;
    let mut out = BufWriter::new(file);
    write_trips(&mut out, trips).map_err(wrap)?;
    out.flush().map_err(wrap)?;

    info!(path = %path, trips = trips.len(), "diary saved");
    Ok(())
}

/// Serializes `trips` as record lines into `out`.
pub fn write_trips<W: Write>(out: &mut W, trips: &[Trip]) -> io::Result<()> {
    for trip in trips {
        writeln!(
            out,
            "{}",
            join_fields(&[
                TRIP_MARKER.to_string(),
                encode(trip.name()),
                encode(&trip.description),
            ])
        )?;

        let Some(album) = &trip.album else {
            debug!(trip = trip.name(), "trip has no album");
            continue;
        };

        writeln!(
            out,
            "{}",
            join_fields(&[ALBUM_MARKER.to_string(), encode(trip.name())])
        )?;

        for photo in &album.photos {
            writeln!(out, "{}", photo_line(photo))?;
        }
    }
    Ok(())
}

fn photo_line(photo: &Photo) -> String {
    let taken_at = photo
        .taken_at
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .unwrap_or_default();
    let (latitude, longitude) = photo
        .location
        .coordinates()
        .map(|c| (c.latitude.to_string(), c.longitude.to_string()))
        .unwrap_or_default();

    join_fields(&[
        PHOTO_MARKER.to_string(),
        encode(photo.file_path()),
        encode(photo.name()),
        encode_opt(photo.caption.as_deref()),
        taken_at,
        encode_opt(photo.location.name()),
        latitude,
        longitude,
    ])
}
