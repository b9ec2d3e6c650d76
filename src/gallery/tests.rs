use super::*;
use crate::config::{GalleryConfig, StorageMode};
use chrono::TimeZone;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that advances one second per reading, starting at a fixed instant.
fn ticking_clock() -> impl Fn() -> DateTime<Utc> + Send + Sync + 'static {
    let seconds = Arc::new(AtomicI64::new(1_700_000_000));
    move || {
        let now = seconds.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(now, 0).unwrap()
    }
}

fn open_repo(temp: &tempfile::TempDir) -> FileRepository {
    FileRepository::open(GalleryOptions::new(temp.path().to_path_buf()))
        .unwrap()
        .with_clock(ticking_clock())
}

#[test]
fn create_then_fetch_returns_record() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&temp);

    let id = repo.create("  Harbour  ", b"strokes-v1").unwrap();
    let record = repo.fetch(id).unwrap().expect("record stored");

    assert_eq!(record.id, id);
    assert_eq!(record.title, "Harbour");
    assert_eq!(record.drawing_data, b"strokes-v1");
    assert_eq!(record.created, record.modified);
    assert!(record.thumbnail.is_none());
}

#[test]
fn update_replaces_data_and_refreshes_modified() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&temp);
    let id = repo.create("Sketch", b"one").unwrap();

    repo.update(id, b"two", Some(b"png-bytes")).unwrap();
    let record = repo.fetch(id).unwrap().unwrap();
    assert_eq!(record.drawing_data, b"two");
    assert_eq!(record.thumbnail.as_deref(), Some(&b"png-bytes"[..]));
    assert!(record.modified > record.created);

    repo.update(id, b"three", None).unwrap();
    let record = repo.fetch(id).unwrap().unwrap();
    assert_eq!(record.drawing_data, b"three");
    assert_eq!(
        record.thumbnail.as_deref(),
        Some(&b"png-bytes"[..]),
        "a missing preview keeps the previous thumbnail"
    );
}

#[test]
fn update_of_unknown_id_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&temp);
    let missing = Uuid::new_v4();

    let err = repo.update(missing, b"data", None).unwrap_err();
    assert!(matches!(err, GalleryError::NotFound(id) if id == missing));
    assert!(repo.fetch_all().unwrap().is_empty());
}

#[test]
fn fetch_all_orders_by_modified_descending() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&temp);

    let a = repo.create("A", b"a").unwrap();
    let b = repo.create("B", b"b").unwrap();
    let ids: Vec<Uuid> = repo.fetch_all().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b, a]);

    repo.update(a, b"a2", None).unwrap();
    let ids: Vec<Uuid> = repo.fetch_all().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn modified_never_precedes_created() {
    let temp = tempfile::tempdir().unwrap();
    let late = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
    let early = Utc.timestamp_opt(1_600_000_000, 0).unwrap();

    let mut repo = FileRepository::open(GalleryOptions::new(temp.path().to_path_buf()))
        .unwrap()
        .with_clock(move || late);
    let id = repo.create("Clock skew", b"x").unwrap();

    let mut repo = repo.with_clock(move || early);
    repo.update(id, b"y", None).unwrap();
    let record = repo.fetch(id).unwrap().unwrap();
    assert_eq!(record.modified, record.created);
}

#[test]
fn delete_removes_files_and_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&temp);
    let id = repo.create("Doomed", b"data").unwrap();
    repo.update(id, b"data", Some(b"png")).unwrap();

    assert!(repo.delete(id).unwrap());
    assert!(repo.fetch(id).unwrap().is_none());
    let leftovers = fs::read_dir(repo.options().drawings_dir()).unwrap().count();
    assert_eq!(leftovers, 0);

    assert!(!repo.delete(id).unwrap());
    assert!(!repo.delete(Uuid::new_v4()).unwrap());
}

#[test]
fn rename_changes_title_only() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&temp);
    let id = repo.create("Draft", b"data").unwrap();

    repo.rename(id, "Final").unwrap();
    let record = repo.fetch(id).unwrap().unwrap();
    assert_eq!(record.title, "Final");
    assert_eq!(record.drawing_data, b"data");

    assert!(matches!(
        repo.rename(Uuid::new_v4(), "x"),
        Err(GalleryError::NotFound(_))
    ));
}

#[test]
fn blank_or_placeholder_titles_are_refused() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&temp);
    let id = repo.create("Keeper", b"data").unwrap();

    for title in ["", "   ", "Untitled"] {
        assert!(matches!(
            repo.rename(id, title),
            Err(GalleryError::TitleRequired { .. })
        ));
        assert!(matches!(
            repo.create(title, b"data"),
            Err(GalleryError::TitleRequired { .. })
        ));
    }

    let records = repo.fetch_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Keeper");
}

#[test]
fn corrupt_metadata_is_skipped_when_listing() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(&temp);
    let good = repo.create("Good", b"data").unwrap();

    let bogus = repo
        .options()
        .drawings_dir()
        .join(format!("{}.json", Uuid::new_v4()));
    fs::write(&bogus, "{ not json").unwrap();

    let records = repo.fetch_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, good);
}

#[test]
fn oversized_drawing_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = GalleryOptions::new(temp.path().to_path_buf());
    options.max_drawing_bytes = 4;
    let mut repo = FileRepository::open(options).unwrap();

    let err = repo.create("Big", b"too large").unwrap_err();
    assert!(matches!(err, GalleryError::TooLarge { size: 9, limit: 4 }));
    assert!(repo.fetch_all().unwrap().is_empty());
}

#[test]
fn options_from_config_custom_storage() {
    let temp = tempfile::tempdir().unwrap();
    let custom_dir = temp.path().join("drawings-here");

    let mut cfg = GalleryConfig::default();
    cfg.storage = StorageMode::Custom;
    cfg.custom_directory = Some(custom_dir.to_string_lossy().to_string());
    cfg.thumbnail_size = 128;
    cfg.max_drawing_size_mb = 2;

    let options = options_from_config(&cfg, temp.path()).unwrap();
    assert_eq!(options.base_dir, custom_dir);
    assert_eq!(options.thumbnail_size, 128);
    assert_eq!(options.max_drawing_bytes, 2 * 1024 * 1024);
}

#[test]
fn options_from_config_config_storage_uses_config_dir() {
    let temp = tempfile::tempdir().unwrap();
    let mut cfg = GalleryConfig::default();
    cfg.storage = StorageMode::Config;

    let options = options_from_config(&cfg, temp.path()).unwrap();
    assert_eq!(options.base_dir, temp.path());
    assert_eq!(options.lock_file_path(), temp.path().join("gallery.lock"));
}

#[test]
fn options_from_config_custom_without_directory_fails() {
    let temp = tempfile::tempdir().unwrap();
    let mut cfg = GalleryConfig::default();
    cfg.storage = StorageMode::Custom;
    assert!(options_from_config(&cfg, temp.path()).is_err());
}
