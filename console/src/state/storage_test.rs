use super::*;

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_load_missing_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    assert_eq!(storage.load().unwrap(), None);
}

#[test]
fn file_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("nested").join("session.json"));
    storage.save(r#"{"token":"t"}"#).unwrap();
    assert_eq!(storage.load().unwrap().as_deref(), Some(r#"{"token":"t"}"#));
    assert!(!storage.path().with_extension("tmp").exists());
}

#[test]
fn file_clear_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.save("{}").unwrap();
    storage.clear().unwrap();
    storage.clear().unwrap();
    assert_eq!(storage.load().unwrap(), None);
}

#[cfg(unix)]
#[test]
fn file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.save("{}").unwrap();
    let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn file_load_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let err = storage.load().unwrap_err();
    assert!(err.to_string().contains("session storage I/O failed"));
}

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_round_trip() {
    let storage = MemoryStorage::default();
    assert_eq!(storage.load().unwrap(), None);
    storage.save("x").unwrap();
    assert_eq!(storage.load().unwrap().as_deref(), Some("x"));
    storage.clear().unwrap();
    assert_eq!(storage.load().unwrap(), None);
}

#[test]
fn memory_with_raw_is_preloaded() {
    let storage = MemoryStorage::with_raw("seed");
    assert_eq!(storage.load().unwrap().as_deref(), Some("seed"));
}
