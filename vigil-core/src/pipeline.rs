//! Capture loop
//!
//! Drives capture, composition, persistence and retention at a fixed
//! cadence. Fully synchronous: the only blocking points are device reads,
//! file I/O, and the inter-iteration sleep. Cancellation is observed at
//! iteration boundaries only, so an in-flight write always completes
//! before the loop stops.

use chrono::Local;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::capture::FrameSource;
use crate::clock::{Clock, RealClock};
use crate::compose::compose;
use crate::error::{Result, VigilError};
use crate::output::{ArtifactWriter, WriteOutcome};
use crate::retention::{reap, RetentionPolicy};
use crate::types::OVERLAY_TIMESTAMP;

/// Capture loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Devices not yet opened
    Starting,
    /// Producing artifacts
    Running,
    /// Flushing the sink and running the final sweep
    Stopping,
    /// Loop has exited; no further calls are valid
    Terminated,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Running => write!(f, "running"),
            Self::Stopping => write!(f, "stopping"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopReport {
    /// Frames successfully handed to the artifact writer
    pub frames_persisted: u64,
    /// Frames lost to write/encode failures
    pub frames_lost: u64,
    /// Chunk rotations (chunked mode only)
    pub chunks_rotated: u64,
    /// Artifacts deleted by the reaper across all sweeps
    pub files_reaped: u64,
    /// Per-file deletion failures across all sweeps
    pub reap_failures: u64,
}

/// Opens the frame source when the loop starts. Deferred so a device-open
/// failure is owned by the loop's Starting state, and so tests can hand in
/// mock devices.
pub type SourceOpener = Box<dyn FnOnce() -> Result<FrameSource>>;

/// The retention-bounded capture loop.
///
/// One instance per run; `run` consumes the opener and may only be called
/// once.
pub struct CaptureLoop {
    opener: Option<SourceOpener>,
    writer: Box<dyn ArtifactWriter>,
    policy: RetentionPolicy,
    output_dir: PathBuf,
    period: Duration,
    clock: Arc<dyn Clock>,
    shutdown: Arc<AtomicBool>,
    state: LoopState,
}

impl CaptureLoop {
    pub fn new(
        opener: impl FnOnce() -> Result<FrameSource> + 'static,
        writer: Box<dyn ArtifactWriter>,
        policy: RetentionPolicy,
        output_dir: impl Into<PathBuf>,
        period: Duration,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            opener: Some(Box::new(opener)),
            writer,
            policy,
            output_dir: output_dir.into(),
            period,
            clock: Arc::new(RealClock::new()),
            shutdown,
            state: LoopState::Starting,
        }
    }

    /// Replace the wall clock, for deterministic tests
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run until cancelled or until a device is lost.
    ///
    /// Returns the report on a graceful stop and `DeviceUnavailable` when
    /// the camera or screen fails mid-run; resources are released either
    /// way.
    pub fn run(&mut self) -> Result<LoopReport> {
        let opener = self
            .opener
            .take()
            .ok_or_else(|| VigilError::config("capture loop already ran"))?;

        std::fs::create_dir_all(&self.output_dir).inspect_err(|_| {
            self.transition(LoopState::Terminated);
        })?;

        let mut source = match opener() {
            Ok(source) => source,
            Err(e) => {
                error!("failed to open capture devices: {}", e);
                self.transition(LoopState::Terminated);
                return Err(e);
            }
        };

        self.transition(LoopState::Running);
        let mut report = LoopReport::default();
        let mut fatal: Option<VigilError> = None;

        while !self.shutdown.load(Ordering::Relaxed) {
            let iter_start = self.clock.now();

            let camera_frame = match source.capture_camera() {
                Ok(frame) => frame,
                Err(e) => {
                    error!("camera read failed, treating as device loss: {}", e);
                    fatal = Some(e);
                    break;
                }
            };
            let screen_frame = match source.capture_screen() {
                Ok(frame) => frame,
                Err(e) => {
                    error!("screen grab failed, treating as device loss: {}", e);
                    fatal = Some(e);
                    break;
                }
            };

            let now = Local::now();
            let frame = compose(
                &camera_frame,
                &screen_frame,
                &now.format(OVERLAY_TIMESTAMP).to_string(),
            );

            match self.writer.persist(&frame, now) {
                Ok(WriteOutcome::Appended) => {
                    report.frames_persisted += 1;
                }
                Ok(WriteOutcome::Rotated) => {
                    report.frames_persisted += 1;
                    report.chunks_rotated += 1;
                    self.sweep(&mut report);
                }
                Ok(WriteOutcome::Snapshot) => {
                    report.frames_persisted += 1;
                    self.sweep(&mut report);
                }
                Err(e) => {
                    warn!("artifact write failed, frame lost: {}", e);
                    report.frames_lost += 1;
                }
            }

            // Hold the target cadence; an overlong iteration just runs the
            // loop slower, never skips or catches up.
            let elapsed = self.clock.now().saturating_duration_since(iter_start);
            let idle = self.period.saturating_sub(elapsed);
            if !idle.is_zero() {
                self.clock.sleep(idle);
            }
        }

        self.transition(LoopState::Stopping);
        if let Err(e) = self.writer.finish() {
            warn!("closing artifact sink failed: {}", e);
        }
        self.sweep(&mut report);
        drop(source);
        self.transition(LoopState::Terminated);

        info!(
            frames = report.frames_persisted,
            rotated = report.chunks_rotated,
            reaped = report.files_reaped,
            "capture loop finished"
        );
        match fatal {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    fn sweep(&self, report: &mut LoopReport) {
        match reap(
            &self.output_dir,
            self.writer.suffix(),
            &self.policy,
            Local::now(),
        ) {
            Ok(summary) => {
                report.files_reaped += summary.deleted as u64;
                report.reap_failures += summary.failed as u64;
            }
            Err(e) => warn!("retention sweep failed: {}", e),
        }
    }

    fn transition(&mut self, next: LoopState) {
        let valid = matches!(
            (self.state, next),
            (LoopState::Starting, LoopState::Running)
                | (LoopState::Starting, LoopState::Terminated)
                | (LoopState::Running, LoopState::Stopping)
                | (LoopState::Stopping, LoopState::Terminated)
        );
        debug_assert!(valid, "invalid transition {} -> {}", self.state, next);
        if !valid {
            warn!("invalid state transition {} -> {}", self.state, next);
        }
        info!("capture loop: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Install a Ctrl-C handler that flips the returned flag.
///
/// The handler thread only stores into the atomic; the loop observes it at
/// its next iteration boundary.
pub fn shutdown_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    })
    .map_err(|e| VigilError::config(format!("failed to install interrupt handler: {}", e)))?;
    Ok(flag)
}
