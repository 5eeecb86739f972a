use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use tripdiary::geo::{CityColumns, load_cities};
use tripdiary::{
    City, Coordinates, Diary, DiagnosticKind, Geocoder, LoadError, Location, PhotoMetadata, Trip,
};

fn scratch_file(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap()
}

fn dataset_geocoder() -> Arc<Geocoder> {
    Arc::new(Geocoder::load(
        Utf8Path::new("test_data/cities.csv"),
        &CityColumns::default(),
    ))
}

fn sample_trips(diary: &Diary) -> Vec<Trip> {
    let mut japan = Trip::new("Japan 2024", "Cherry blossoms | temples\nand too much ramen").unwrap();
    let album = japan.album.as_mut().unwrap();
    album.push(
        diary
            .new_photo(
                "/photos/japan/shinjuku.jpg",
                "Shinjuku at night",
                Some("Neon\\rain".to_string()),
                PhotoMetadata::from_raw(
                    35.6937,
                    139.7013,
                    NaiveDate::from_ymd_opt(2024, 4, 2)
                        .and_then(|d| d.and_hms_milli_opt(21, 14, 3, 750)),
                ),
            )
            .unwrap(),
    );
    album.push(
        diary
            .new_photo("/photos/japan/scan.png", "Old scan", None, PhotoMetadata::default())
            .unwrap(),
    );

    let empty = Trip::new("Planned", "").unwrap();

    let mut no_album = Trip::new("Day trip", "no pictures taken").unwrap();
    no_album.album = None;

    vec![japan, empty, no_album]
}

#[test]
fn carriage_returns_survive_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let diary = Diary::new(scratch_file(&dir, "diary.txt"), dataset_geocoder());

    let mut windows = Trip::new("Notepad\r", "ends with cr\r").unwrap();
    windows.album = None;
    let mut mixed = Trip::new("Mixed", "line one\r\nline two\r").unwrap();
    mixed.album.as_mut().unwrap().push(
        diary
            .new_photo("/a.jpg", "A\r", Some("cap\r".to_string()), PhotoMetadata::default())
            .unwrap(),
    );
    let trips = vec![windows, mixed];

    diary.save(&trips).unwrap();
    let raw = std::fs::read_to_string(diary.data_file()).unwrap();
    assert!(!raw.contains('\r'));

    let loaded = diary.load_with_diagnostics().unwrap();
    assert!(loaded.diagnostics.is_empty());
    assert_eq!(loaded.trips[0].name(), "Notepad\r");
    assert_eq!(loaded.trips[0].description, "ends with cr\r");
    assert_eq!(loaded.trips[1].description, "line one\r\nline two\r");
    let photo = &loaded.trips[1].album.as_ref().unwrap().photos[0];
    assert_eq!(photo.name(), "A\r");
    assert_eq!(photo.caption.as_deref(), Some("cap\r"));
}

#[test]
fn invalid_utf8_line_keeps_neighbouring_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = scratch_file(&dir, "diary.txt");
    std::fs::write(
        &path,
        b"T|Good|one\nA|Good\nT|Bad\xff|two\nT|Also good|three\n".as_slice(),
    )
    .unwrap();

    let loaded = Diary::new(path, dataset_geocoder())
        .load_with_diagnostics()
        .unwrap();
    let names: Vec<&str> = loaded.trips.iter().map(Trip::name).collect();
    assert_eq!(names, vec!["Good", "Bad\u{FFFD}", "Also good"]);
}

#[test]
fn save_then_load_reproduces_trips() {
    let dir = tempfile::tempdir().unwrap();
    let diary = Diary::new(scratch_file(&dir, "nested/diary.txt"), dataset_geocoder());

    let trips = sample_trips(&diary);
    diary.save(&trips).unwrap();
    let loaded = diary.load_with_diagnostics().unwrap();
    assert!(loaded.diagnostics.is_empty());

    let names: Vec<&str> = loaded.trips.iter().map(Trip::name).collect();
    assert_eq!(names, vec!["Japan 2024", "Planned", "Day trip"]);

    let japan = &loaded.trips[0];
    assert_eq!(japan.description, "Cherry blossoms | temples\nand too much ramen");

    let photos = &japan.album.as_ref().unwrap().photos;
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].file_path(), "/photos/japan/shinjuku.jpg");
    assert_eq!(photos[0].caption.as_deref(), Some("Neon\\rain"));
    // Sub-second precision is not stored.
    assert_eq!(
        photos[0].taken_at,
        NaiveDate::from_ymd_opt(2024, 4, 2).and_then(|d| d.and_hms_opt(21, 14, 3))
    );
    assert_eq!(
        photos[0].location.coordinates(),
        Some(Coordinates::new(35.6937, 139.7013))
    );
    assert_eq!(photos[0].location.name(), Some("Tokyo, Japan"));

    assert_eq!(photos[1].caption_or_default(), "no caption");
    assert_eq!(photos[1].location, Location::unknown());

    assert_eq!(loaded.trips[1].photo_count(), 0);
    // Trips always come back with an album.
    assert!(loaded.trips[2].album.as_ref().is_some_and(|a| a.is_empty()));
}

#[test]
fn saved_file_has_one_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = scratch_file(&dir, "diary.txt");
    let diary = Diary::new(path.clone(), dataset_geocoder());
    diary.save(&sample_trips(&diary)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let markers: Vec<&str> = text.lines().map(|l| &l[..1]).collect();
    assert_eq!(markers, vec!["T", "A", "P", "P", "T", "A", "T"]);
}

#[test]
fn corrupt_trip_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let path = scratch_file(&dir, "diary.txt");
    let diary = Diary::new(path.clone(), dataset_geocoder());
    diary.save(&sample_trips(&diary)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines: Vec<&str> = text.lines().collect();
    lines.insert(4, "T");
    lines.insert(5, "A|");
    lines.insert(6, "P|/photos/lost.jpg|Lost|||||");
    std::fs::write(&path, lines.join("\n")).unwrap();

    let loaded = diary.load_with_diagnostics().unwrap();
    let names: Vec<&str> = loaded.trips.iter().map(Trip::name).collect();
    assert_eq!(names, vec!["Japan 2024", "Planned", "Day trip"]);
    assert_eq!(loaded.diagnostics.len(), 1);
    assert_eq!(loaded.diagnostics[0].line_number, 5);
    assert!(matches!(
        loaded.diagnostics[0].kind,
        DiagnosticKind::CorruptTrip { skipped_lines: 2, .. }
    ));
}

#[test]
fn photo_before_album_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = scratch_file(&dir, "diary.txt");
    std::fs::write(&path, "T|Trip|desc\nP|/a.jpg|A||||35.0|139.0\n").unwrap();

    let diary = Diary::new(path.clone(), dataset_geocoder());
    match diary.load() {
        Err(LoadError::Format {
            path: err_path,
            line_number,
            ..
        }) => {
            assert_eq!(err_path, path);
            assert_eq!(line_number, 2);
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn write_error_wraps_cause() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = scratch_file(&dir, "file");
    std::fs::write(&blocker, "").unwrap();

    // The parent "directory" is a regular file.
    let diary = Diary::new(blocker.join("diary.txt"), dataset_geocoder());
    let err = diary.save(&[]).unwrap_err();
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn tree_matches_linear_scan_over_dataset() {
    let cities = load_cities(Utf8Path::new("test_data/cities.csv"), &CityColumns::default()).unwrap();
    let geocoder = Geocoder::from_cities(cities.clone());
    let mut rng = fastrand::Rng::with_seed(2024);

    for _ in 0..5000 {
        let target = Coordinates::new(rng.f64() * 180.0 - 90.0, rng.f64() * 360.0 - 180.0);
        let nearest = geocoder.nearest(target).unwrap();
        let scan = cities
            .iter()
            .map(|c| target.distance_to(&c.coordinates()))
            .fold(f64::INFINITY, f64::min);
        assert!((nearest.distance_km - scan).abs() < 1e-6, "target {target:?}");
    }
}

#[test]
fn tokyo_singapore_example() {
    let geocoder = Geocoder::from_cities(vec![
        City::new("Tokyo", "Japan", 35.6895, 139.6917),
        City::new("Singapore", "Singapore", 1.3521, 103.8198),
    ]);
    assert_eq!(geocoder.resolve_location(35.6937, 139.7013), "Tokyo, Japan");
}

#[test]
fn geocoder_shared_across_threads() {
    let geocoder = dataset_geocoder();
    let handles: Vec<_> = [(48.86, 2.35), (51.5, -0.12), (-33.9, 151.2)]
        .into_iter()
        .map(|(lat, lon)| {
            let geocoder = Arc::clone(&geocoder);
            std::thread::spawn(move || geocoder.resolve_location(lat, lon))
        })
        .collect();

    let names: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        names,
        vec!["Paris, France", "London, United Kingdom", "Sydney, Australia"]
    );
}
