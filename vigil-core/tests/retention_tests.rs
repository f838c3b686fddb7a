//! Integration tests for the retention reaper

use chrono::{Local, TimeZone};
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;
use vigil_core::retention::{reap, RetentionPolicy};

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"").unwrap();
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn count_bound_keeps_the_newest_files() {
    let dir = tempdir().unwrap();
    for minute in 0..5 {
        touch(dir.path(), &format!("2025-06-01_10-0{}-00.avi", minute));
    }

    let summary = reap(
        dir.path(),
        ".avi",
        &RetentionPolicy::CountBound { max_files: 2 },
        Local::now(),
    )
    .unwrap();

    assert_eq!(summary.deleted, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        names(dir.path()),
        vec!["2025-06-01_10-03-00.avi", "2025-06-01_10-04-00.avi"]
    );
}

#[test]
fn count_bound_under_limit_deletes_nothing() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2025-06-01_10-00-00.avi");
    touch(dir.path(), "2025-06-01_10-01-00.avi");

    let summary = reap(
        dir.path(),
        ".avi",
        &RetentionPolicy::CountBound { max_files: 5 },
        Local::now(),
    )
    .unwrap();

    assert_eq!(summary.deleted, 0);
    assert_eq!(names(dir.path()).len(), 2);
}

#[test]
fn age_bound_deletes_exactly_the_expired_files() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2025-06-01_11-40-00.jpg"); // 20 min old
    touch(dir.path(), "2025-06-01_11-45-00.jpg"); // exactly at the window
    touch(dir.path(), "2025-06-01_11-50-00.jpg"); // 10 min old

    let now = Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let summary = reap(
        dir.path(),
        ".jpg",
        &RetentionPolicy::AgeBound {
            max_age: Duration::from_secs(15 * 60),
        },
        now,
    )
    .unwrap();

    // Age >= window is expired; strictly younger survives.
    assert_eq!(summary.deleted, 2);
    assert_eq!(names(dir.path()), vec!["2025-06-01_11-50-00.jpg"]);
}

#[test]
fn only_the_active_suffix_is_considered() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2025-06-01_10-00-00.avi");
    touch(dir.path(), "2025-06-01_10-00-00.jpg");
    touch(dir.path(), "notes.txt");

    let summary = reap(
        dir.path(),
        ".avi",
        &RetentionPolicy::CountBound { max_files: 0 },
        Local::now(),
    )
    .unwrap();

    assert_eq!(summary.deleted, 1);
    assert_eq!(names(dir.path()), vec!["2025-06-01_10-00-00.jpg", "notes.txt"]);
}

#[test]
fn one_failing_deletion_does_not_stop_the_sweep() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2025-06-01_10-00-00.avi");
    // A directory with an artifact-shaped name: remove_file on it fails,
    // standing in for a permission error.
    std::fs::create_dir(dir.path().join("2025-06-01_10-01-00.avi")).unwrap();
    touch(dir.path(), "2025-06-01_10-02-00.avi");

    let summary = reap(
        dir.path(),
        ".avi",
        &RetentionPolicy::CountBound { max_files: 0 },
        Local::now(),
    )
    .unwrap();

    assert_eq!(summary.deleted, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(names(dir.path()), vec!["2025-06-01_10-01-00.avi"]);
}

#[test]
fn foreign_names_fall_back_to_file_age() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2020-01-01_00-00-00.jpg"); // ancient by name
    touch(dir.path(), "imported.jpg"); // just created, no timestamp in name

    let summary = reap(
        dir.path(),
        ".jpg",
        &RetentionPolicy::AgeBound {
            max_age: Duration::from_secs(15 * 60),
        },
        Local::now(),
    )
    .unwrap();

    // The freshly-written foreign file is younger than the window and
    // survives on its mtime.
    assert_eq!(summary.deleted, 1);
    assert_eq!(names(dir.path()), vec!["imported.jpg"]);
}

#[test]
fn foreign_names_order_by_mtime_under_count_bound() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "2020-01-01_00-00-00.avi");
    touch(dir.path(), "imported.avi");

    let summary = reap(
        dir.path(),
        ".avi",
        &RetentionPolicy::CountBound { max_files: 1 },
        Local::now(),
    )
    .unwrap();

    // The named artifact is older than the just-written foreign file.
    assert_eq!(summary.deleted, 1);
    assert_eq!(names(dir.path()), vec!["imported.avi"]);
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempdir().unwrap();
    let gone = dir.path().join("nope");
    let result = reap(
        &gone,
        ".avi",
        &RetentionPolicy::CountBound { max_files: 0 },
        Local::now(),
    );
    assert!(result.is_err());
}

#[test]
fn empty_directory_sweeps_cleanly() {
    let dir = tempdir().unwrap();
    let summary = reap(
        dir.path(),
        ".avi",
        &RetentionPolicy::AgeBound {
            max_age: Duration::from_secs(1),
        },
        Local::now(),
    )
    .unwrap();
    assert_eq!(summary.deleted, 0);
    assert_eq!(summary.failed, 0);
}
