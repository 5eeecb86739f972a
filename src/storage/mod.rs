//! Line-oriented diary file format.
//!
//! One record per line, fields separated by `|` and escaped with [`codec`]:
//!
//! ```text
//! T|<trip name>|<description>
//! A|<trip name>
//! P|<path>|<name>|<caption>|<YYYY-MM-DD HH:MM:SS>|<place>|<latitude>|<longitude>
//! ```
//!
//! Optional photo fields are written empty. Loading keeps every intact trip
//! even when others are damaged; see [`reader`].

pub mod codec;
pub mod reader;
pub mod writer;

pub use reader::{Diagnostic, DiagnosticKind, Loaded, load, read_trips};
pub use writer::{save, write_trips};

pub const TRIP_MARKER: &str = "T";
pub const ALBUM_MARKER: &str = "A";
pub const PHOTO_MARKER: &str = "P";

/// Photo timestamps, no timezone.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
