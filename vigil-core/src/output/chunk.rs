//! Chunked video output
//!
//! Frames are appended to a bounded-duration video file; when the chunk's
//! wall-clock duration elapses, the sink is closed and a new one opened.
//! The concrete sink pipes raw RGB24 into an ffmpeg child process, the
//! same division of labor the original deployment had with its external
//! codec.

use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{Result, VigilError};
use crate::output::{ArtifactWriter, WriteOutcome};
use crate::types::{artifact_file_name, Frame, RunMode};

/// An open video file accepting frames at a fixed rate
pub trait VideoSink {
    /// Append one frame. Must not be called after `finish`.
    fn append(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and close the file
    fn finish(&mut self) -> Result<()>;
}

/// Opens a new sink for each chunk path
pub type SinkFactory = Box<dyn FnMut(&Path) -> Result<Box<dyn VideoSink>> + Send>;

struct OpenChunk {
    sink: Box<dyn VideoSink>,
    opened_at: Instant,
}

/// Artifact writer producing rotated video chunks.
///
/// Exactly one sink is open at a time. The sink is opened lazily for the
/// first frame; a rotation closes it and immediately opens the successor,
/// so the frame that triggered the rotation lands in the old chunk and
/// every later frame in the new one.
pub struct ChunkedWriter {
    dir: PathBuf,
    chunk_duration: std::time::Duration,
    clock: Arc<dyn Clock>,
    factory: SinkFactory,
    current: Option<OpenChunk>,
}

impl ChunkedWriter {
    /// Build a writer with a custom sink factory (used by tests)
    pub fn new(
        dir: impl Into<PathBuf>,
        chunk_duration: std::time::Duration,
        clock: Arc<dyn Clock>,
        factory: SinkFactory,
    ) -> Self {
        Self {
            dir: dir.into(),
            chunk_duration,
            clock,
            factory,
            current: None,
        }
    }

    /// Build a writer whose sinks are ffmpeg child processes
    pub fn ffmpeg(
        dir: impl Into<PathBuf>,
        chunk_duration: std::time::Duration,
        fps: u32,
        width: u32,
        height: u32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let factory: SinkFactory = Box::new(move |path: &Path| {
            FfmpegSink::open(path, fps, width, height)
                .map(|sink| Box::new(sink) as Box<dyn VideoSink>)
        });
        Self::new(dir, chunk_duration, clock, factory)
    }

    fn open_chunk(&mut self, now: DateTime<Local>) -> Result<()> {
        let path = self
            .dir
            .join(artifact_file_name(now, RunMode::Chunked.artifact_extension()));
        let sink = (self.factory)(&path)?;
        info!("Started recording: {}", path.display());
        self.current = Some(OpenChunk {
            sink,
            opened_at: self.clock.now(),
        });
        Ok(())
    }
}

impl ArtifactWriter for ChunkedWriter {
    fn persist(&mut self, frame: &Frame, now: DateTime<Local>) -> Result<WriteOutcome> {
        if self.current.is_none() {
            self.open_chunk(now)?;
        }
        let Some(chunk) = self.current.as_mut() else {
            return Err(VigilError::encode("no open chunk"));
        };

        chunk.sink.append(frame)?;

        let elapsed = self.clock.now().saturating_duration_since(chunk.opened_at);
        if elapsed >= self.chunk_duration {
            let Some(mut done) = self.current.take() else {
                return Err(VigilError::encode("no open chunk"));
            };
            done.sink.finish()?;
            self.open_chunk(now)?;
            return Ok(WriteOutcome::Rotated);
        }
        Ok(WriteOutcome::Appended)
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(mut chunk) = self.current.take() {
            chunk.sink.finish()?;
        }
        Ok(())
    }

    fn suffix(&self) -> &'static str {
        RunMode::Chunked.artifact_suffix()
    }
}

/// Video sink backed by an ffmpeg child process.
///
/// Raw RGB24 frames go down the child's stdin; ffmpeg encodes them into an
/// AVI container at the given frame rate.
pub struct FfmpegSink {
    child: Child,
    stdin: Option<ChildStdin>,
    path: PathBuf,
    frame_len: usize,
    frames_written: u64,
}

impl FfmpegSink {
    /// Spawn ffmpeg writing to `path`
    pub fn open(path: &Path, fps: u32, width: u32, height: u32) -> Result<Self> {
        let mut child = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &format!("{}x{}", width, height)])
            .args(["-r", &fps.to_string()])
            .args(["-i", "-"])
            .args(["-c:v", "mpeg4", "-q:v", "5"])
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| VigilError::encode(format!("failed to spawn ffmpeg: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VigilError::encode("ffmpeg stdin not captured"))?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            path: path.to_path_buf(),
            frame_len: width as usize * height as usize * 3,
            frames_written: 0,
        })
    }
}

impl VideoSink for FfmpegSink {
    fn append(&mut self, frame: &Frame) -> Result<()> {
        if frame.data().len() != self.frame_len {
            return Err(VigilError::encode(format!(
                "frame size {} does not match sink's expected {}",
                frame.data().len(),
                self.frame_len
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| VigilError::encode("append after sink was closed"))?;
        stdin
            .write_all(frame.data())
            .map_err(|e| VigilError::encode(format!("writing frame to ffmpeg: {}", e)))?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        // Closing stdin signals end of stream; ffmpeg then finalizes the
        // container.
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| VigilError::encode(format!("waiting for ffmpeg: {}", e)))?;
        if !status.success() {
            return Err(VigilError::encode(format!(
                "ffmpeg exited with {} for {}",
                status,
                self.path.display()
            )));
        }
        debug!(
            frames = self.frames_written,
            path = %self.path.display(),
            "chunk finalized"
        );
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // Finish was not called: close the pipe and reap the child so a
        // dropped sink never leaves a zombie process.
        if self.stdin.take().is_some() {
            let _ = self.child.wait();
        }
    }
}
