mod common;

use std::path::Path;

use filetime::{set_file_mtime, FileTime};
use rando_core::Language;
use rando_sync::{ArchiveOutcome, Supervisor, SyncJob, SyncOptions};
use tempfile::TempDir;

use common::{catalog, settings, zip_entries, FakeRenderer, FakeTiles, RecordingProgress};

fn options(dst: &Path) -> SyncOptions {
    let mut options = SyncOptions::new(dst, "http://rando.example.org");
    options.languages = Some(vec![Language::from("en"), Language::from("fr")]);
    options.skip_tiles = true;
    options
}

fn feature_count(path: &Path) -> usize {
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    value["features"].as_array().unwrap().len()
}

#[test]
fn each_language_gets_only_its_treks() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let job = SyncJob::new(options(&out), settings(dir.path())).unwrap();
    let catalog = catalog();
    let renderer = FakeRenderer::new(catalog.clone());

    let report = Supervisor::new(&job, &catalog, &renderer, &FakeTiles::default())
        .run()
        .unwrap();

    assert!(report.success(), "{:?}", report.failures);
    assert!(out.join("api/en/treks/1/lac-blanc.gpx").is_file());
    assert!(out.join("api/en/treks/1/profile.json").is_file());
    assert!(out.join("api/fr/treks/2/col-de-balme.pdf").is_file());
    assert!(!out.join("api/fr/treks/1").exists());
    assert!(!out.join("api/en/treks/2").exists());
    assert!(!out.join("api/en/treks/3").exists());

    assert!(out.join("zip/treks/en/1.zip").is_file());
    assert!(out.join("zip/treks/fr/2.zip").is_file());
    assert!(!out.join("zip/treks/fr/1.zip").exists());
    assert!(!out.join("zip/treks/en/2.zip").exists());
    assert!(!out.join("zip/tiles").exists());

    assert_eq!(feature_count(&out.join("api/en/treks.geojson")), 1);
    assert_eq!(feature_count(&out.join("api/fr/treks.geojson")), 1);

    assert!(out.join("static/trekking/trek.svg").is_file());
    assert!(out.join("media/upload/theme.svg").is_file());
    assert_eq!(
        zip_entries(&out.join("zip/treks/fr/2.zip")),
        vec!["media/resized/two.jpg"]
    );
    assert!(!dir.path().join("tmp_sync_rando").exists());
}

#[test]
fn every_render_call_carries_its_own_language() {
    let dir = TempDir::new().unwrap();
    let job = SyncJob::new(options(&dir.path().join("out")), settings(dir.path())).unwrap();
    let catalog = catalog();
    let renderer = FakeRenderer::new(catalog.clone());
    Supervisor::new(&job, &catalog, &renderer, &FakeTiles::default())
        .run()
        .unwrap();

    for request in renderer.seen.borrow().iter() {
        let prefix = format!("api/{}/", request.language);
        assert!(request.route().starts_with(&prefix), "{}", request.route());
        assert_eq!(request.host, "rando.example.org");
    }
}

#[test]
fn rerun_without_changes_keeps_archive_timestamps() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let job = SyncJob::new(options(&out), settings(dir.path())).unwrap();
    let catalog = catalog();
    let renderer = FakeRenderer::new(catalog.clone());

    let first = Supervisor::new(&job, &catalog, &renderer, &FakeTiles::default())
        .run()
        .unwrap();
    assert!(first.archives.iter().all(|a| a.outcome == ArchiveOutcome::Zipped));

    let archive = out.join("zip/treks/en/global.zip");
    let past = FileTime::from_unix_time(1_500_000_000, 0);
    set_file_mtime(&archive, past).unwrap();

    let second = Supervisor::new(&job, &catalog, &renderer, &FakeTiles::default())
        .run()
        .unwrap();
    assert_eq!(second.unchanged_archives(), second.archives.len());
    let mtime = FileTime::from_last_modification_time(&std::fs::metadata(&archive).unwrap());
    assert_eq!(mtime, past);
}

#[test]
fn tiles_are_archived_for_published_treks_only() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let mut options = options(&out);
    options.skip_tiles = false;
    let job = SyncJob::new(options, settings(dir.path())).unwrap();
    let catalog = catalog();
    let renderer = FakeRenderer::new(catalog.clone());
    let tiles = FakeTiles::default();

    let report = Supervisor::new(&job, &catalog, &renderer, &tiles).run().unwrap();

    assert!(report.success());
    let global = zip_entries(&out.join("zip/tiles/global.zip"));
    assert!(global.contains(&"0/0/0.png".to_string()));
    assert!(out.join("zip/tiles/1.zip").is_file());
    assert!(out.join("zip/tiles/2.zip").is_file());
    assert!(!out.join("zip/tiles/3.zip").exists());

    let fetched = tiles.fetched.borrow();
    assert_eq!(report.tiles_fetched, fetched.len());
    let trek_one = zip_entries(&out.join("zip/tiles/1.zip"));
    assert!(trek_one.iter().all(|name| name.starts_with("10/") || name.starts_with("11/")));
}

#[test]
fn missing_tiles_degrade_the_run() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let mut options = options(&out);
    options.skip_tiles = false;
    let job = SyncJob::new(options, settings(dir.path())).unwrap();
    let catalog = catalog();
    let renderer = FakeRenderer::new(catalog.clone());
    let tiles = FakeTiles {
        missing: vec![rando_tiles::Tile::new(0, 0, 0)],
        ..FakeTiles::default()
    };

    let report = Supervisor::new(&job, &catalog, &renderer, &tiles).run().unwrap();

    assert!(!report.success());
    assert_eq!(report.failures[0].target, "0/0/0");
    assert!(!zip_entries(&out.join("zip/tiles/global.zip")).contains(&"0/0/0.png".to_string()));
    assert!(out.join("api/en/treks.geojson").is_file());
}

#[test]
fn progress_milestones_are_reported() {
    let dir = TempDir::new().unwrap();
    let mut options = options(&dir.path().join("out"));
    options.skip_tiles = false;
    let job = SyncJob::new(options, settings(dir.path())).unwrap();
    let catalog = catalog();
    let renderer = FakeRenderer::new(catalog.clone());
    let progress = RecordingProgress::default();

    Supervisor::new(&job, &catalog, &renderer, &FakeTiles::default())
        .with_progress(&progress)
        .run()
        .unwrap();

    let percents: Vec<u8> = progress.milestones.borrow().iter().map(|(p, _)| *p).collect();
    assert_eq!(percents, vec![10, 20, 30, 55, 80, 100]);
    assert_eq!(progress.milestones.borrow()[4].1, "Language : fr ...");
}
