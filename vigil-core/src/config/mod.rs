//! Configuration types for Vigil
//!
//! Runtime settings are carried in an immutable [`CaptureConfig`] built
//! once at startup and passed into each component, never ambient state.

mod file;

pub use file::{sample_config, ConfigFile};

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, VigilError};
use crate::retention::RetentionPolicy;
use crate::types::RunMode;

/// Default artifact directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "recordings";

/// Complete runtime configuration for a capture run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Directory artifacts are written to (created at startup if absent)
    pub output_dir: PathBuf,
    /// Chunk-mode frame rate and target loop cadence
    pub frame_rate: u32,
    /// Wall-clock duration of one video chunk before rotation
    pub chunk_duration_secs: u64,
    /// CountBound retention: maximum chunk files kept on disk
    pub max_chunks_retained: usize,
    /// Snapshot-mode loop cadence
    pub snapshot_interval_secs: u64,
    /// AgeBound retention: snapshots older than this window are deleted
    pub retention_window_mins: u64,
    /// Camera device index
    pub camera_index: u32,
    /// Camera frames are resized to this width
    pub camera_width: u32,
    /// Camera frames are resized to this height
    pub camera_height: u32,
    /// Screen frames are resized to this width
    pub screen_width: u32,
    /// Screen frames are resized to this height
    pub screen_height: u32,
    /// Which monitor the screen grabber targets
    pub monitor_index: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            frame_rate: 15,
            chunk_duration_secs: 60,
            max_chunks_retained: 15,
            snapshot_interval_secs: 5,
            retention_window_mins: 15,
            camera_index: 0,
            camera_width: 640,
            camera_height: 480,
            screen_width: 640,
            screen_height: 480,
            monitor_index: 0,
        }
    }
}

impl CaptureConfig {
    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the chunk-mode frame rate
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps;
        self
    }

    /// Set the camera device index
    pub fn with_camera_index(mut self, index: u32) -> Self {
        self.camera_index = index;
        self
    }

    /// Set the monitor index
    pub fn with_monitor_index(mut self, index: usize) -> Self {
        self.monitor_index = index;
        self
    }

    /// Validate settings that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(VigilError::config("frame_rate must be at least 1"));
        }
        if self.chunk_duration_secs == 0 {
            return Err(VigilError::config("chunk_duration_secs must be at least 1"));
        }
        if self.snapshot_interval_secs == 0 {
            return Err(VigilError::config(
                "snapshot_interval_secs must be at least 1",
            ));
        }
        if self.camera_width == 0 || self.camera_height == 0 {
            return Err(VigilError::config("camera dimensions must be non-zero"));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(VigilError::config("screen dimensions must be non-zero"));
        }
        Ok(())
    }

    /// Target loop period for the given run mode
    pub fn loop_period(&self, mode: RunMode) -> Duration {
        match mode {
            RunMode::Chunked => Duration::from_secs(1) / self.frame_rate,
            RunMode::Snapshot => Duration::from_secs(self.snapshot_interval_secs),
        }
    }

    /// Retention policy applied by the reaper in the given run mode
    pub fn retention_policy(&self, mode: RunMode) -> RetentionPolicy {
        match mode {
            RunMode::Chunked => RetentionPolicy::CountBound {
                max_files: self.max_chunks_retained,
            },
            RunMode::Snapshot => RetentionPolicy::AgeBound {
                max_age: Duration::from_secs(self.retention_window_mins * 60),
            },
        }
    }

    /// Wall-clock duration of one chunk
    pub fn chunk_duration(&self) -> Duration {
        Duration::from_secs(self.chunk_duration_secs)
    }

    /// Dimensions of the composited frame: camera and screen side by side
    pub fn composited_size(&self) -> (u32, u32) {
        (
            self.camera_width + self.screen_width,
            self.camera_height.max(self.screen_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = CaptureConfig::default();
        assert_eq!(config.frame_rate, 15);
        assert_eq!(config.chunk_duration_secs, 60);
        assert_eq!(config.max_chunks_retained, 15);
        assert_eq!(config.camera_width, 640);
        assert_eq!(config.composited_size(), (1280, 480));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_frame_rate_is_rejected() {
        let config = CaptureConfig::default().with_frame_rate(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn loop_period_per_mode() {
        let config = CaptureConfig::default();
        assert_eq!(
            config.loop_period(RunMode::Chunked),
            Duration::from_secs(1) / 15
        );
        assert_eq!(
            config.loop_period(RunMode::Snapshot),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn retention_policy_per_mode() {
        let config = CaptureConfig::default();
        assert_eq!(
            config.retention_policy(RunMode::Chunked),
            RetentionPolicy::CountBound { max_files: 15 }
        );
        assert_eq!(
            config.retention_policy(RunMode::Snapshot),
            RetentionPolicy::AgeBound {
                max_age: Duration::from_secs(15 * 60)
            }
        );
    }

    #[test]
    fn composited_height_is_max_of_inputs() {
        let mut config = CaptureConfig::default();
        config.screen_height = 720;
        assert_eq!(config.composited_size(), (1280, 720));
    }
}
