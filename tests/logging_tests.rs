use std::fs;
use tasklane::logging::{LogSink, LogTarget};

#[test]
fn test_file_target_opens_log_in_new_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("tasklane.log");
    assert!(matches!(LogSink::resolve(LogTarget::File, &path), LogSink::File(_)));
    assert!(path.exists());
}

#[test]
fn test_unopenable_log_file_is_discarded_not_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let path = blocker.join("tasklane.log");
    assert!(matches!(LogSink::resolve(LogTarget::File, &path), LogSink::Discard));
}

#[test]
fn test_stderr_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasklane.log");
    assert!(matches!(LogSink::resolve(LogTarget::Stderr, &path), LogSink::Stderr));
    assert!(!path.exists());
}
