//! Core types for Vigil
//!
//! Frames, run modes, and the timestamp conventions that artifact file
//! names are built from.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use image::{imageops, ImageBuffer, Rgb};
use std::path::Path;

use crate::error::{Result, VigilError};

/// Timestamp format used in artifact file names (`2025-08-24_13-05-59.avi`)
pub const ARTIFACT_TIMESTAMP: &str = "%Y-%m-%d_%H-%M-%S";

/// Human-readable timestamp burned into composited frames
pub const OVERLAY_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Which kind of artifact a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Bounded-duration video chunks, rotated on a wall-clock interval
    Chunked,
    /// One JPEG per loop iteration
    Snapshot,
}

impl RunMode {
    /// File extension for this mode's artifacts (without the dot)
    pub fn artifact_extension(&self) -> &'static str {
        match self {
            Self::Chunked => "avi",
            Self::Snapshot => "jpg",
        }
    }

    /// File name suffix the retention reaper matches on
    pub fn artifact_suffix(&self) -> &'static str {
        match self {
            Self::Chunked => ".avi",
            Self::Snapshot => ".jpg",
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chunked => write!(f, "chunked"),
            Self::Snapshot => write!(f, "snapshot"),
        }
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chunked" | "chunk" | "video" => Ok(Self::Chunked),
            "snapshot" | "snapshots" | "image" => Ok(Self::Snapshot),
            _ => Err(format!("Unknown run mode: {}", s)),
        }
    }
}

/// Build a timestamped artifact file name such as `2025-08-24_13-05-59.avi`
pub fn artifact_file_name(now: DateTime<Local>, extension: &str) -> String {
    format!("{}.{}", now.format(ARTIFACT_TIMESTAMP), extension)
}

/// Parse the creation time out of an artifact file name.
///
/// Returns `None` for names that do not follow the artifact convention,
/// letting callers fall back to filesystem metadata.
pub fn parse_artifact_name(file_name: &str) -> Option<DateTime<Local>> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let naive = NaiveDateTime::parse_from_str(stem, ARTIFACT_TIMESTAMP).ok()?;
    Local.from_local_datetime(&naive).single()
}

/// An owned RGB24 raster image.
///
/// Frames live for one loop iteration; they are produced by the capture
/// backends, merged by the compositor, and handed to an artifact writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Create a black frame of the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Wrap a raw RGB24 buffer, validating its length against the dimensions
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(VigilError::BadFrame {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB24 pixel data, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw pixel data
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read one pixel. Callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Resize to the target dimensions with a deterministic linear filter.
    ///
    /// Returns the frame unchanged when it already has the target size.
    pub fn resize(&self, width: u32, height: u32) -> Frame {
        if self.width == width && self.height == height {
            return self.clone();
        }
        let img = self.to_image();
        let resized = imageops::resize(&img, width, height, imageops::FilterType::Triangle);
        Frame {
            width,
            height,
            data: resized.into_raw(),
        }
    }

    /// Encode this frame as a JPEG file at `path`
    pub fn save_jpeg(&self, path: &Path) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }

    fn to_image(&self) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        // The length invariant is enforced by every constructor.
        ImageBuffer::from_raw(self.width, self.height, self.data.clone())
            .expect("frame buffer matches its dimensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn artifact_name_round_trips() {
        let now = Local.with_ymd_and_hms(2025, 8, 24, 13, 5, 59).unwrap();
        let name = artifact_file_name(now, "avi");
        assert_eq!(name, "2025-08-24_13-05-59.avi");

        let parsed = parse_artifact_name(&name).unwrap();
        assert_eq!(parsed, now);
        assert_eq!(parsed.second(), 59);
    }

    #[test]
    fn unparseable_names_return_none() {
        assert!(parse_artifact_name("notes.txt").is_none());
        assert!(parse_artifact_name("2025-08-24.avi").is_none());
        assert!(parse_artifact_name("").is_none());
    }

    #[test]
    fn from_raw_rejects_short_buffers() {
        let err = Frame::from_raw(4, 4, vec![0; 10]).unwrap_err();
        assert!(matches!(
            err,
            VigilError::BadFrame {
                expected: 48,
                actual: 10
            }
        ));
    }

    #[test]
    fn resize_changes_dimensions() {
        let frame = Frame::new(8, 8);
        let resized = frame.resize(4, 2);
        assert_eq!(resized.width(), 4);
        assert_eq!(resized.height(), 2);
        assert_eq!(resized.data().len(), 4 * 2 * 3);
    }

    #[test]
    fn resize_noop_at_same_size() {
        let frame = Frame::new(6, 6);
        assert_eq!(frame.resize(6, 6), frame);
    }

    #[test]
    fn run_mode_parses() {
        assert_eq!("chunked".parse::<RunMode>().unwrap(), RunMode::Chunked);
        assert_eq!("snapshot".parse::<RunMode>().unwrap(), RunMode::Snapshot);
        assert!("mpeg".parse::<RunMode>().is_err());
    }
}
