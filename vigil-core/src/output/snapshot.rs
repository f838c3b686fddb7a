//! Snapshot output

use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::debug;

use crate::error::Result;
use crate::output::{ArtifactWriter, WriteOutcome};
use crate::types::{artifact_file_name, Frame, RunMode};

/// Artifact writer producing one dated JPEG per frame. No persistent sink.
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactWriter for SnapshotWriter {
    fn persist(&mut self, frame: &Frame, now: DateTime<Local>) -> Result<WriteOutcome> {
        let path = self
            .dir
            .join(artifact_file_name(now, RunMode::Snapshot.artifact_extension()));
        frame.save_jpeg(&path)?;
        debug!("snapshot written: {}", path.display());
        Ok(WriteOutcome::Snapshot)
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    fn suffix(&self) -> &'static str {
        RunMode::Snapshot.artifact_suffix()
    }
}
