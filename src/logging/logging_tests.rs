//! Tests for log file setup.

use super::*;
use serial_test::serial;
use std::fs;

#[test]
fn split_log_path_separates_directory_and_file() {
    let path = Path::new("/var/tmp/devconsole/run.log");
    let (directory, file_name) = split_log_path(path).expect("valid path");
    assert_eq!(directory, Path::new("/var/tmp/devconsole"));
    assert_eq!(file_name, "run.log");
}

#[test]
fn split_log_path_rejects_root() {
    let result = split_log_path(Path::new("/"));
    assert!(
        matches!(result, Err(LoggingError::InvalidPath(_))),
        "Root has no file name: {:?}",
        result
    );
}

#[test]
fn split_log_path_accepts_bare_file_name() {
    let (directory, file_name) = split_log_path(Path::new("devconsole.log")).unwrap();
    assert!(directory.as_os_str().is_empty());
    assert_eq!(file_name, "devconsole.log");
}

#[test]
#[serial(tracing_init)]
fn init_creates_log_directory_if_missing() {
    let test_dir = std::env::temp_dir().join("devconsole_test_logs_create");
    let log_file = test_dir.join("test.log");

    let _ = fs::remove_dir_all(&test_dir);

    // May fail with SubscriberAlreadySet; the directory is created first
    let _ = init(&log_file);

    assert!(
        test_dir.exists(),
        "Log directory should be created: {:?}",
        test_dir
    );

    let _ = fs::remove_dir_all(&test_dir);
}

#[test]
#[serial(tracing_init)]
fn init_succeeds_when_directory_already_exists() {
    let test_dir = std::env::temp_dir().join("devconsole_test_logs_exists");
    let log_file = test_dir.join("test.log");

    let _ = fs::create_dir_all(&test_dir);

    let result = init(&log_file);
    assert!(
        matches!(result, Ok(()) | Err(LoggingError::SubscriberAlreadySet)),
        "Unexpected init failure: {:?}",
        result
    );
    assert!(test_dir.exists());

    let _ = fs::remove_dir_all(&test_dir);
}

#[test]
#[serial(tracing_init)]
fn second_init_reports_subscriber_already_set() {
    let test_dir = std::env::temp_dir().join("devconsole_test_logs_twice");
    let log_file = test_dir.join("twice.log");

    let _ = init(&log_file);
    let again = init(&log_file);
    assert!(matches!(again, Err(LoggingError::SubscriberAlreadySet)));

    let _ = fs::remove_dir_all(&test_dir);
}
