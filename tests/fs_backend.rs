use std::fs;
use testrec::error::RecordError;
use testrec::store::{FsBackend, StorageBackend};

#[test]
fn write_replaces_contents_without_leaving_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let backend = FsBackend::new();

    backend.write(&path, "first\n").unwrap();
    backend.write(&path, "second\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn read_of_missing_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new();
    assert!(backend.read(&dir.path().join("nope.csv")).unwrap().is_none());
}

#[test]
fn create_new_refuses_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let backend = FsBackend::new();

    backend.create_new(&path, "header\n").unwrap();
    let err = backend.create_new(&path, "other\n").unwrap_err();

    assert!(matches!(err, RecordError::AlreadyExists(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "header\n");
}

#[test]
fn list_dir_skips_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.csv"), "x").unwrap();
    fs::create_dir(dir.path().join("nested.csv")).unwrap();

    let files = FsBackend::new().list_dir(dir.path()).unwrap();
    assert_eq!(files, vec![dir.path().join("a.csv")]);
}
