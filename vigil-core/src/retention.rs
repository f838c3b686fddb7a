//! Retention reaper
//!
//! Sweeps the artifact directory and deletes the oldest files once a
//! configured bound is exceeded. Artifact age comes from the timestamp in
//! the file name; files with foreign names fall back to filesystem
//! modification time, which keeps the sweep portable across filesystems
//! that do not expose creation time.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::types::parse_artifact_name;

/// When the reaper deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep at most `max_files` artifacts; delete the oldest beyond that
    CountBound { max_files: usize },
    /// Delete every artifact whose age is at least `max_age`
    AgeBound { max_age: Duration },
}

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapSummary {
    /// Files successfully deleted
    pub deleted: usize,
    /// Eligible files whose deletion failed; they remain on disk and will
    /// be retried naturally on the next sweep
    pub failed: usize,
}

/// One artifact found during a sweep, ordered oldest first
struct Candidate {
    path: PathBuf,
    created: DateTime<Local>,
}

/// Sweep `dir` and delete artifacts violating `policy`.
///
/// Only file names ending in `suffix` are considered; the sweep never
/// reads file contents. Per-file deletion failures are logged and counted
/// but never abort the sweep.
pub fn reap(
    dir: &Path,
    suffix: &str,
    policy: &RetentionPolicy,
    now: DateTime<Local>,
) -> Result<ReapSummary> {
    let mut candidates = collect_candidates(dir, suffix)?;
    candidates.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.path.cmp(&b.path)));

    let eligible: Vec<&Candidate> = match policy {
        RetentionPolicy::CountBound { max_files } => {
            let excess = candidates.len().saturating_sub(*max_files);
            candidates.iter().take(excess).collect()
        }
        RetentionPolicy::AgeBound { max_age } => candidates
            .iter()
            .filter(|c| {
                let age = now.signed_duration_since(c.created);
                age.to_std().map(|a| a >= *max_age).unwrap_or(false)
            })
            .collect(),
    };

    let mut summary = ReapSummary::default();
    for candidate in eligible {
        match std::fs::remove_file(&candidate.path) {
            Ok(()) => {
                info!("Deleted old artifact: {}", candidate.path.display());
                summary.deleted += 1;
            }
            Err(e) => {
                warn!(
                    "Failed to delete {}: {} (will retry next sweep)",
                    candidate.path.display(),
                    e
                );
                summary.failed += 1;
            }
        }
    }

    debug!(
        deleted = summary.deleted,
        failed = summary.failed,
        "retention sweep finished"
    );
    Ok(summary)
}

fn collect_candidates(dir: &Path, suffix: &str) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.ends_with(suffix) {
            continue;
        }
        let path = entry.path();
        let created = match parse_artifact_name(name) {
            Some(ts) => ts,
            None => match modified_time(&path) {
                Some(ts) => ts,
                // Unreadable metadata: treat as brand new so the file is
                // never deleted on guesswork.
                None => Local::now(),
            },
        };
        candidates.push(Candidate { path, created });
    }
    Ok(candidates)
}

fn modified_time(path: &Path) -> Option<DateTime<Local>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified))
}
