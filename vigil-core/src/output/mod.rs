//! Artifact writers
//!
//! One capability with two variants: chunked video files rotated on a
//! wall-clock interval, or one JPEG snapshot per loop iteration. The
//! capture loop is parameterized by this trait and never branches on the
//! run mode itself.

mod chunk;
mod snapshot;

pub use chunk::{ChunkedWriter, FfmpegSink, SinkFactory, VideoSink};
pub use snapshot::SnapshotWriter;

use chrono::{DateTime, Local};

use crate::error::Result;

/// What a persist call did, so the loop knows when to run the reaper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Frame appended to the current chunk, no boundary crossed
    Appended,
    /// Frame appended, then the chunk rotated; a sweep is due
    Rotated,
    /// A snapshot file was written; a sweep is due
    Snapshot,
}

/// Persists composited frames as dated artifacts
pub trait ArtifactWriter {
    /// Persist one frame. `now` names the artifact for snapshot writes and
    /// freshly-opened chunks.
    fn persist(&mut self, frame: &crate::types::Frame, now: DateTime<Local>) -> Result<WriteOutcome>;

    /// Flush and close any open sink. Called once when the loop stops.
    fn finish(&mut self) -> Result<()>;

    /// File name suffix of this writer's artifacts, for the reaper
    fn suffix(&self) -> &'static str;
}
