//! End-to-end tests of the archive pipeline over real zip files on disk.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use gtfs_fix::config::{Options, build_registry};
use gtfs_fix::error::FixError;
use gtfs_fix::pipeline::transform_zip;
use gtfs_fix::registry::{Outcome, Registry};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

fn entry_names(path: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn entry_bytes(path: &Path, name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    bytes
}

fn gtfs_fixture(dir: &TempDir) -> std::path::PathBuf {
    let source = dir.path().join("source.zip");
    write_zip(
        &source,
        &[
            ("agency.txt", b"agency_id,agency_name\na1,Metro\n"),
            (
                "stops.txt",
                b"stop_id,location_type\ns1,0\ns2,1\ns3,2\ns4,2\n",
            ),
            ("trips.txt", b"trip_id,route_id\nt1,r1\nt2,r2\n"),
            ("calendar.txt", b"service_id,monday\nwk,1\n"),
        ],
    );
    source
}

#[test]
fn test_empty_registry_copies_everything() {
    let dir = TempDir::new().unwrap();
    let source = gtfs_fixture(&dir);
    let target = dir.path().join("target.zip");

    let summary = transform_zip(&source, &target, &Registry::new()).unwrap();

    assert_eq!(summary.entries, 4);
    assert_eq!(summary.copied, 4);
    assert_eq!(summary.transformed, 0);
    assert_eq!(entry_names(&target), entry_names(&source));
    for name in ["agency.txt", "stops.txt", "trips.txt", "calendar.txt"] {
        assert_eq!(entry_bytes(&target, name), entry_bytes(&source, name));
    }
}

#[test]
fn test_untouched_entries_keep_source_order() {
    let dir = TempDir::new().unwrap();
    let source = gtfs_fixture(&dir);
    let target = dir.path().join("target.zip");

    let options = Options {
        bikes_allowed: true,
        ..Default::default()
    };
    let registry = build_registry(&options).unwrap();
    transform_zip(&source, &target, &registry).unwrap();

    assert_eq!(
        entry_names(&target),
        vec!["agency.txt", "stops.txt", "trips.txt", "calendar.txt"]
    );
    // Untouched neighbors are byte-identical.
    assert_eq!(
        entry_bytes(&target, "agency.txt"),
        entry_bytes(&source, "agency.txt")
    );
    assert_eq!(
        entry_bytes(&target, "trips.txt"),
        b"trip_id,route_id,bikes_allowed\nt1,r1,1\nt2,r2,1\n"
    );
}

#[test]
fn test_delete_omits_entry_and_keeps_order() {
    let dir = TempDir::new().unwrap();
    let source = gtfs_fixture(&dir);
    let target = dir.path().join("target.zip");

    let options = Options {
        delete: vec!["calendar.txt".to_string()],
        ..Default::default()
    };
    let registry = build_registry(&options).unwrap();
    let summary = transform_zip(&source, &target, &registry).unwrap();

    assert_eq!(summary.deleted, 1);
    assert_eq!(
        entry_names(&target),
        vec!["agency.txt", "stops.txt", "trips.txt"]
    );
}

#[test]
fn test_location_type_rewrite_end_to_end() {
    let dir = TempDir::new().unwrap();
    let source = gtfs_fixture(&dir);
    let target = dir.path().join("target.zip");

    let options = Options {
        change_stop_location_type: true,
        ..Default::default()
    };
    let registry = build_registry(&options).unwrap();
    let summary = transform_zip(&source, &target, &registry).unwrap();

    assert_eq!(summary.transformed, 1);
    assert_eq!(
        entry_bytes(&target, "stops.txt"),
        b"stop_id,location_type\ns1,0\ns2,1\ns3,0\ns4,0\n"
    );
}

#[test]
fn test_failed_chain_leaves_no_target_file() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.zip");
    write_zip(
        &source,
        &[
            ("agency.txt", b"agency_id\na1\n"),
            ("trips.txt", b"trip_id,bikes_allowed\nt1,1\n"),
        ],
    );
    let target = dir.path().join("target.zip");

    // Column already exists and exists_ok is off: the run must abort.
    let options = Options {
        bikes_allowed: true,
        ..Default::default()
    };
    let registry = build_registry(&options).unwrap();
    let err = transform_zip(&source, &target, &registry).unwrap_err();

    match err {
        FixError::Transform { entry, source } => {
            assert_eq!(entry, "trips.txt");
            assert!(matches!(*source, FixError::UnexpectedColumn(_)));
        }
        other => panic!("expected Transform error, got {other:?}"),
    }
    assert!(!target.exists());
    assert!(!dir.path().join("target.zip.part").exists());
}

#[test]
fn test_invalid_utf8_in_chained_entry_is_fatal() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.zip");
    write_zip(&source, &[("trips.txt", &[0xff, 0xfe, 0x00][..])]);
    let target = dir.path().join("target.zip");

    let options = Options {
        bikes_allowed: true,
        ..Default::default()
    };
    let registry = build_registry(&options).unwrap();
    let err = transform_zip(&source, &target, &registry).unwrap_err();

    match err {
        FixError::InvalidUtf8 { entry, .. } => assert_eq!(entry, "trips.txt"),
        other => panic!("expected InvalidUtf8, got {other:?}"),
    }
    assert!(!target.exists());
}

#[test]
fn test_invalid_utf8_in_untouched_entry_is_copied() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.zip");
    let binary = [0xff_u8, 0xfe, 0x00, 0x01];
    write_zip(
        &source,
        &[("shapes.bin", &binary[..]), ("trips.txt", b"trip_id\nt1\n")],
    );
    let target = dir.path().join("target.zip");

    let options = Options {
        bikes_allowed: true,
        ..Default::default()
    };
    let registry = build_registry(&options).unwrap();
    transform_zip(&source, &target, &registry).unwrap();

    assert_eq!(entry_bytes(&target, "shapes.bin"), binary);
}

#[test]
fn test_combined_flags_full_run() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.zip");
    write_zip(
        &source,
        &[
            (
                "routes.txt",
                "route_id,route_long_name\nr1,\"Cadolzburg ( \"Rangaubahn\" )\"\n".as_bytes(),
            ),
            ("trips.txt", b"trip_id,bikes_allowed\nt1,\nt2,0\nt3,1\nt4,2\n"),
            ("stops.txt", b"stop_id,location_type\ns1,2\n"),
            ("calendar.txt", b"service_id\nwk\n"),
        ],
    );
    let target = dir.path().join("target.zip");

    let options = Options {
        bikes_allowed: true,
        bikes_allowed_exists_ok: true,
        escape_double_quotes: vec!["routes.txt".to_string()],
        change_stop_location_type: true,
        delete: vec!["calendar.txt".to_string()],
    };
    let registry = build_registry(&options).unwrap();
    let summary = transform_zip(&source, &target, &registry).unwrap();

    assert_eq!(summary.entries, 4);
    assert_eq!(summary.transformed, 3);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.copied, 0);

    assert_eq!(
        entry_names(&target),
        vec!["routes.txt", "trips.txt", "stops.txt"]
    );
    assert_eq!(
        entry_bytes(&target, "routes.txt"),
        b"route_id,route_long_name\nr1,\"Cadolzburg ( \"\"Rangaubahn\"\" )\"\n"
    );
    assert_eq!(
        entry_bytes(&target, "trips.txt"),
        b"trip_id,bikes_allowed\nt1,1\nt2,1\nt3,1\nt4,2\n"
    );
    assert_eq!(
        entry_bytes(&target, "stops.txt"),
        b"stop_id,location_type\ns1,0\n"
    );
}

#[test]
fn test_chain_composition_via_registry() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.zip");
    write_zip(&source, &[("notes.txt", b"hello")]);
    let target = dir.path().join("target.zip");

    let mut registry = Registry::new();
    registry.register(
        "notes.txt",
        Box::new(|text| Ok(Outcome::Continue(format!("{text} world")))),
    );
    registry.register(
        "notes.txt",
        Box::new(|text| Ok(Outcome::Continue(text.to_uppercase()))),
    );
    transform_zip(&source, &target, &registry).unwrap();

    assert_eq!(entry_bytes(&target, "notes.txt"), b"HELLO WORLD");
}
