//! Vigil Core Library
//!
//! Retention-bounded webcam + screen recorder.
//!
//! This library provides:
//! - Webcam and screen capture behind swappable device traits
//! - Side-by-side composition with a burned-in timestamp
//! - Chunked video or per-frame snapshot persistence
//! - A retention reaper that keeps the artifact directory bounded
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌────────────┐    ┌────────────────┐
//! │ FrameSource  │───▶│ Compositor │───▶│ ArtifactWriter │
//! │ (cam+screen) │    │ (hstack+ts)│    │ (chunks/jpegs) │
//! └──────────────┘    └────────────┘    └───────┬────────┘
//!        ▲                                      │
//!        └────────── CaptureLoop ──────▶ RetentionReaper
//! ```

pub mod capture;
pub mod clock;
pub mod compose;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod retention;
pub mod types;

pub use config::{CaptureConfig, ConfigFile};
pub use error::{Result, VigilError};
pub use pipeline::{CaptureLoop, LoopReport, LoopState};
pub use retention::{reap, ReapSummary, RetentionPolicy};
pub use types::{Frame, RunMode};
