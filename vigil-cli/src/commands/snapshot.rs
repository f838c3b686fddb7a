//! Snapshot command - periodic JPEG mode

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use vigil_core::capture::FrameSource;
use vigil_core::output::SnapshotWriter;
use vigil_core::pipeline::{shutdown_flag, CaptureLoop};
use vigil_core::RunMode;

use super::{base_config, print_report};

/// Arguments for the snapshot command
#[derive(Args)]
pub struct SnapshotArgs {
    /// Output directory for snapshot files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seconds between snapshots
    #[arg(short, long)]
    interval: Option<u64>,

    /// Retention window in minutes
    #[arg(short, long)]
    window: Option<u64>,

    /// Camera device index
    #[arg(long)]
    camera: Option<u32>,

    /// Monitor index to capture
    #[arg(short, long)]
    monitor: Option<usize>,

    /// Use a specific config file instead of the default
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Write periodic snapshots until interrupted
pub fn snapshot(args: SnapshotArgs) -> Result<()> {
    let mut cfg = base_config(args.config.as_deref())?;
    if let Some(output) = args.output {
        cfg.output_dir = output;
    }
    if let Some(interval) = args.interval {
        cfg.snapshot_interval_secs = interval;
    }
    if let Some(window) = args.window {
        cfg.retention_window_mins = window;
    }
    if let Some(camera) = args.camera {
        cfg.camera_index = camera;
    }
    if let Some(monitor) = args.monitor {
        cfg.monitor_index = monitor;
    }
    cfg.validate()?;

    println!("Vigil - Periodic Snapshots\n");
    println!("  Output:    {}", cfg.output_dir.display());
    println!("  Interval:  {} s", cfg.snapshot_interval_secs);
    println!("  Retention: {} min", cfg.retention_window_mins);
    println!("\nPress Ctrl-C to stop.\n");

    let writer = SnapshotWriter::new(cfg.output_dir.clone());
    let shutdown = shutdown_flag()?;
    let source_cfg = cfg.clone();
    let mut capture = CaptureLoop::new(
        move || FrameSource::open(&source_cfg),
        Box::new(writer),
        cfg.retention_policy(RunMode::Snapshot),
        cfg.output_dir.clone(),
        cfg.loop_period(RunMode::Snapshot),
        shutdown,
    );

    match capture.run() {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            if let Some(hint) = e.user_hint() {
                eprintln!("hint: {}", hint);
            }
            Err(e.into())
        }
    }
}
