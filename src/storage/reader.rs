use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};

use camino::Utf8Path;
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use super::codec::{decode, split_fields};
use super::{ALBUM_MARKER, DATETIME_FORMAT, PHOTO_MARKER, TRIP_MARKER};
use crate::error::LoadError;
use crate::geo::LocationResolver;
use crate::model::{Coordinates, Location, Photo, Trip};

/// Trips recovered from a diary file, plus everything that had to be skipped.
#[derive(Debug, Default)]
pub struct Loaded {
    pub trips: Vec<Trip>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Loaded {
    pub fn photo_count(&self) -> usize {
        self.trips.iter().map(Trip::photo_count).sum()
    }
}

/// A recoverable problem found while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line_number: usize,
    pub line: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// The trip record could not be built; it and its child lines were dropped.
    CorruptTrip { reason: String, skipped_lines: usize },
    /// A single photo record was dropped; its trip was kept.
    InvalidPhoto { reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::CorruptTrip {
                reason,
                skipped_lines,
            } => write!(
                f,
                "line {}: corrupt trip ({reason}), skipped {skipped_lines} child line(s): {:?}",
                self.line_number, self.line
            ),
            DiagnosticKind::InvalidPhoto { reason } => write!(
                f,
                "line {}: invalid photo ({reason}): {:?}",
                self.line_number, self.line
            ),
        }
    }
}

/// Loads a diary file. A file that does not exist yet is an empty diary.
pub fn load(path: &Utf8Path, resolver: &dyn LocationResolver) -> Result<Loaded, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path, "no diary file yet, starting empty");
            return Ok(Loaded::default());
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let loaded = read_trips(BufReader::new(file), path, resolver)?;
    info!(
        path = %path,
        trips = loaded.trips.len(),
        photos = loaded.photo_count(),
        diagnostics = loaded.diagnostics.len(),
        "diary loaded"
    );
    Ok(loaded)
}

/// Parses record lines from `input`. `source` only labels errors.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD so that one damaged
/// line only affects its own record.
pub fn read_trips<R: BufRead>(
    mut input: R,
    source: &Utf8Path,
    resolver: &dyn LocationResolver,
) -> Result<Loaded, LoadError> {
    let mut parser = Parser::new(source, resolver);
    let mut buf = Vec::new();
    let mut line_number = 0;
    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .map_err(|source_err| LoadError::Io {
                path: source.to_path_buf(),
                source: source_err,
            })?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let text = String::from_utf8_lossy(&buf);
        if matches!(text, Cow::Owned(_)) {
            warn!(path = %source, line_number, "line is not valid UTF-8, bad bytes replaced");
        }
        let line = text.strip_suffix('\n').unwrap_or(&*text);
        parser.feed(line_number, line)?;
    }
    Ok(parser.finish())
}

enum ReaderState {
    NoTrip,
    Active { trip: Trip, album_open: bool },
    /// Index of the diagnostic describing the broken trip.
    Corrupted { diagnostic: usize },
}

struct Parser<'a> {
    source: &'a Utf8Path,
    resolver: &'a dyn LocationResolver,
    state: ReaderState,
    loaded: Loaded,
}

impl<'a> Parser<'a> {
    fn new(source: &'a Utf8Path, resolver: &'a dyn LocationResolver) -> Self {
        Self {
            source,
            resolver,
            state: ReaderState::NoTrip,
            loaded: Loaded::default(),
        }
    }

    fn feed(&mut self, line_number: usize, raw: &str) -> Result<(), LoadError> {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            return Ok(());
        }

        let fields = split_fields(line);
        let marker = fields[0];

        if marker == TRIP_MARKER {
            self.start_trip(line_number, line, &fields);
            return Ok(());
        }

        if let ReaderState::Corrupted { diagnostic } = self.state {
            debug!(line_number, "skipping line of corrupt trip");
            if let DiagnosticKind::CorruptTrip { skipped_lines, .. } =
                &mut self.loaded.diagnostics[diagnostic].kind
            {
                *skipped_lines += 1;
            }
            return Ok(());
        }

        match marker {
            ALBUM_MARKER => self.open_album(line_number, line, &fields),
            PHOTO_MARKER => self.add_photo(line_number, line, &fields),
            _ => Err(format_error(
                self.source,
                line_number,
                line,
                "unknown record marker",
            )),
        }
    }

    fn start_trip(&mut self, line_number: usize, line: &str, fields: &[&str]) {
        self.flush();

        let created = if fields.len() < 3 {
            Err("expected a name and a description".to_string())
        } else {
            Trip::new(decode(fields[1]), decode(fields[2])).map_err(|e| e.to_string())
        };

        self.state = match created {
            Ok(trip) => ReaderState::Active {
                trip,
                album_open: false,
            },
            Err(reason) => {
                self.loaded.diagnostics.push(Diagnostic {
                    line_number,
                    line: line.to_string(),
                    kind: DiagnosticKind::CorruptTrip {
                        reason,
                        skipped_lines: 0,
                    },
                });
                ReaderState::Corrupted {
                    diagnostic: self.loaded.diagnostics.len() - 1,
                }
            }
        };
    }

    fn open_album(
        &mut self,
        line_number: usize,
        line: &str,
        fields: &[&str],
    ) -> Result<(), LoadError> {
        let ReaderState::Active { trip, album_open } = &mut self.state else {
            return Err(format_error(
                self.source,
                line_number,
                line,
                "album record outside of a trip",
            ));
        };
        if fields.len() < 2 {
            return Err(format_error(
                self.source,
                line_number,
                line,
                "album record without a label",
            ));
        }

        let label = decode(fields[1]);
        if label != trip.name() {
            debug!(
                line_number,
                label = %label,
                trip = trip.name(),
                "album label differs from trip name"
            );
        }
        trip.album.get_or_insert_with(Default::default);
        *album_open = true;
        Ok(())
    }

    fn add_photo(
        &mut self,
        line_number: usize,
        line: &str,
        fields: &[&str],
    ) -> Result<(), LoadError> {
        let trip = match &mut self.state {
            ReaderState::Active {
                trip,
                album_open: true,
            } => trip,
            ReaderState::Active { .. } => {
                return Err(format_error(
                    self.source,
                    line_number,
                    line,
                    "photo record before album record",
                ));
            }
            _ => return Err(format_error(
                self.source,
                line_number,
                line,
                "photo record outside of a trip",
            )),
        };
        if fields.len() < 3 {
            return Err(format_error(
                self.source,
                line_number,
                line,
                "photo record without path and name",
            ));
        }

        match parse_photo(fields, self.resolver) {
            Ok(photo) => {
                trip.album.get_or_insert_with(Default::default).push(photo);
            }
            Err(reason) => self.loaded.diagnostics.push(Diagnostic {
                line_number,
                line: line.to_string(),
                kind: DiagnosticKind::InvalidPhoto { reason },
            }),
        }
        Ok(())
    }

    fn flush(&mut self) {
        if let ReaderState::Active { trip, .. } =
            std::mem::replace(&mut self.state, ReaderState::NoTrip)
        {
            self.loaded.trips.push(trip);
        }
    }

    fn finish(mut self) -> Loaded {
        self.flush();
        self.loaded
    }
}

fn format_error(source: &Utf8Path, line_number: usize, line: &str, reason: &str) -> LoadError {
    LoadError::Format {
        path: source.to_path_buf(),
        line_number,
        line: line.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_photo(fields: &[&str], resolver: &dyn LocationResolver) -> Result<Photo, String> {
    let field = |idx: usize| fields.get(idx).copied().unwrap_or("");

    let caption = Some(decode(field(3))).filter(|c| !c.is_empty());
    let taken_at = match field(4) {
        "" => None,
        raw => Some(
            NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
                .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))?,
        ),
    };
    let name = Some(decode(field(5))).filter(|n| !n.is_empty());
    let coordinates = parse_coordinates(field(6), field(7))?;

    let mut location = Location::new(coordinates, name);
    if let Some(coordinates) = coordinates.filter(|_| !location.is_resolved()) {
        if let Some(resolved) = resolver.resolve(coordinates) {
            location.set_name(resolved);
        }
    }

    Photo::new(decode(field(1)), decode(field(2)), caption, taken_at, location)
        .map_err(|e| e.to_string())
}

fn parse_coordinates(latitude: &str, longitude: &str) -> Result<Option<Coordinates>, String> {
    if latitude.is_empty() && longitude.is_empty() {
        return Ok(None);
    }
    let latitude = parse_degrees(latitude, 90.0, "latitude")?;
    let longitude = parse_degrees(longitude, 180.0, "longitude")?;
    Ok(Coordinates::from_raw(latitude, longitude))
}

fn parse_degrees(raw: &str, limit: f64, what: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid {what} {raw:?}"))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!("{what} {raw:?} out of range"));
    }
    Ok(value)
}
