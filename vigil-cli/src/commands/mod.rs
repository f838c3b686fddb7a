//! CLI command implementations

mod config;
mod monitors;
mod record;
mod snapshot;
mod sweep;

pub use config::{config, ConfigArgs};
pub use monitors::list_monitors;
pub use record::{record, RecordArgs};
pub use snapshot::{snapshot, SnapshotArgs};
pub use sweep::{sweep, SweepArgs};

use anyhow::Result;
use std::path::Path;
use vigil_core::{CaptureConfig, ConfigFile, LoopReport};

/// Load the config file (default path unless overridden) and flatten it
/// into a runtime configuration.
fn base_config(path: Option<&Path>) -> Result<CaptureConfig> {
    let file = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load_or_default(),
    };
    Ok(file.into_capture_config())
}

/// Print the end-of-run counters
fn print_report(report: &LoopReport) {
    println!();
    println!("Run finished:");
    println!("  Frames persisted:  {}", report.frames_persisted);
    if report.frames_lost > 0 {
        println!("  Frames lost:       {}", report.frames_lost);
    }
    if report.chunks_rotated > 0 {
        println!("  Chunks rotated:    {}", report.chunks_rotated);
    }
    println!("  Artifacts reaped:  {}", report.files_reaped);
    if report.reap_failures > 0 {
        println!("  Failed deletions:  {}", report.reap_failures);
    }
}
