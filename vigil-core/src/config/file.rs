//! Configuration file loading and merging
//!
//! Loads user configuration from `~/.config/vigil/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{CaptureConfig, DEFAULT_OUTPUT_DIR};
use crate::error::{Result, VigilError};

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,

    /// Capture cadence settings
    #[serde(default)]
    pub capture: CaptureSettings,

    /// Camera device settings
    #[serde(default)]
    pub camera: CameraSettings,

    /// Screen grabber settings
    #[serde(default)]
    pub screen: ScreenSettings,

    /// Retention settings
    #[serde(default)]
    pub retention: RetentionSettings,
}

/// Where artifacts land
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Artifact directory
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

/// Loop cadence and chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Chunk-mode frame rate (frames per second)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Seconds of video per chunk before rotation
    #[serde(default = "default_chunk_duration")]
    pub chunk_duration_secs: u64,

    /// Seconds between snapshots in snapshot mode
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,
}

/// Camera device settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Device index (0 = first camera)
    #[serde(default)]
    pub index: u32,

    /// Capture width in pixels
    #[serde(default = "default_dimension_width")]
    pub width: u32,

    /// Capture height in pixels
    #[serde(default = "default_dimension_height")]
    pub height: u32,
}

/// Screen grabber settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSettings {
    /// Monitor index (0 = first monitor)
    #[serde(default)]
    pub monitor: usize,

    /// Capture width in pixels
    #[serde(default = "default_dimension_width")]
    pub width: u32,

    /// Capture height in pixels
    #[serde(default = "default_dimension_height")]
    pub height: u32,
}

/// Retention bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Maximum chunk files kept in chunked mode
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,

    /// Snapshot retention window in minutes
    #[serde(default = "default_window_mins")]
    pub window_mins: u64,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_frame_rate() -> u32 {
    15
}

fn default_chunk_duration() -> u64 {
    60
}

fn default_snapshot_interval() -> u64 {
    5
}

fn default_dimension_width() -> u32 {
    640
}

fn default_dimension_height() -> u32 {
    480
}

fn default_max_chunks() -> usize {
    15
}

fn default_window_mins() -> u64 {
    15
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            chunk_duration_secs: default_chunk_duration(),
            snapshot_interval_secs: default_snapshot_interval(),
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_dimension_width(),
            height: default_dimension_height(),
        }
    }
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            monitor: 0,
            width: default_dimension_width(),
            height: default_dimension_height(),
        }
    }
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            max_chunks: default_max_chunks(),
            window_mins: default_window_mins(),
        }
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("vigil").join("config.toml")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("vigil")
                .join("config.toml")
        } else {
            PathBuf::from("/etc/vigil/config.toml")
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| VigilError::config(format!("Failed to read config file: {}", e)))?;

        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| VigilError::config(format!("Failed to parse config file: {}", e)))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, logging a warning and returning defaults on error
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    VigilError::config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| VigilError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| VigilError::config(format!("Failed to write config file: {}", e)))?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Flatten the file sections into a runtime [`CaptureConfig`]
    pub fn into_capture_config(self) -> CaptureConfig {
        CaptureConfig {
            output_dir: self.output.dir,
            frame_rate: self.capture.frame_rate,
            chunk_duration_secs: self.capture.chunk_duration_secs,
            max_chunks_retained: self.retention.max_chunks,
            snapshot_interval_secs: self.capture.snapshot_interval_secs,
            retention_window_mins: self.retention.window_mins,
            camera_index: self.camera.index,
            camera_width: self.camera.width,
            camera_height: self.camera.height,
            screen_width: self.screen.width,
            screen_height: self.screen.height,
            monitor_index: self.screen.monitor,
        }
    }
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# Vigil Configuration

[output]
# Directory artifacts are written to (created at startup if absent)
dir = "recordings"

[capture]
# Chunked mode: recorded frame rate, also the capture loop cadence
frame_rate = 15

# Seconds of video per chunk file before rotating to a new one
chunk_duration_secs = 60

# Snapshot mode: seconds between snapshots
snapshot_interval_secs = 5

[camera]
# Camera device index (0 = first camera)
index = 0

# Camera frames are resized to these dimensions
width = 640
height = 480

[screen]
# Monitor index to capture (0 = first monitor)
monitor = 0

# Screen frames are resized to these dimensions
width = 640
height = 480

[retention]
# Chunked mode: keep at most this many chunk files, oldest deleted first
max_chunks = 15

# Snapshot mode: delete snapshots older than this many minutes
window_mins = 15
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert_eq!(config.capture.frame_rate, 15);
        assert_eq!(config.retention.max_chunks, 15);
        assert_eq!(config.output.dir, PathBuf::from("recordings"));
    }

    #[test]
    fn test_sample_config_parses() {
        let sample = sample_config();
        let config: ConfigFile = toml::from_str(&sample).unwrap();
        assert_eq!(config.capture.chunk_duration_secs, 60);
        assert_eq!(config.screen.monitor, 0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ConfigFile = toml::from_str("[camera]\nindex = 2\n").unwrap();
        assert_eq!(config.camera.index, 2);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.capture.frame_rate, 15);
    }

    #[test]
    fn test_into_capture_config() {
        let mut config = ConfigFile::default();
        config.retention.window_mins = 30;
        config.screen.monitor = 1;

        let runtime = config.into_capture_config();
        assert_eq!(runtime.retention_window_mins, 30);
        assert_eq!(runtime.monitor_index, 1);
        assert!(runtime.validate().is_ok());
    }
}
