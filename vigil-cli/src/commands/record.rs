//! Record command - chunked video mode

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use vigil_core::capture::FrameSource;
use vigil_core::clock::{Clock, RealClock};
use vigil_core::output::ChunkedWriter;
use vigil_core::pipeline::{shutdown_flag, CaptureLoop};
use vigil_core::RunMode;

use super::{base_config, print_report};

/// Arguments for the record command
#[derive(Args)]
pub struct RecordArgs {
    /// Output directory for chunk files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frame rate (also the capture cadence)
    #[arg(long)]
    fps: Option<u32>,

    /// Seconds of video per chunk before rotation
    #[arg(long)]
    chunk_duration: Option<u64>,

    /// Maximum chunk files kept on disk
    #[arg(long)]
    max_chunks: Option<usize>,

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

/// Record rotated video chunks until interrupted
pub fn record(args: RecordArgs) -> Result<()> {
    let mut cfg = base_config(args.config.as_deref())?;
    if let Some(output) = args.output {
        cfg.output_dir = output;
    }
    if let Some(fps) = args.fps {
        cfg.frame_rate = fps;
    }
    if let Some(secs) = args.chunk_duration {
        cfg.chunk_duration_secs = secs;
    }
    if let Some(max) = args.max_chunks {
        cfg.max_chunks_retained = max;
    }
    if let Some(camera) = args.camera {
        cfg.camera_index = camera;
    }
    if let Some(monitor) = args.monitor {
        cfg.monitor_index = monitor;
    }
    cfg.validate()?;

    println!("Vigil - Chunked Recording\n");
    println!("  Output:          {}", cfg.output_dir.display());
    println!("  Frame rate:      {} fps", cfg.frame_rate);
    println!("  Chunk duration:  {} s", cfg.chunk_duration_secs);
    println!("  Chunks retained: {}", cfg.max_chunks_retained);
    println!("\nPress Ctrl-C to stop.\n");

    let clock: Arc<dyn Clock> = Arc::new(RealClock::new());
    let (width, height) = cfg.composited_size();
    let writer = ChunkedWriter::ffmpeg(
        cfg.output_dir.clone(),
        cfg.chunk_duration(),
        cfg.frame_rate,
        width,
        height,
        clock.clone(),
    );

    let shutdown = shutdown_flag()?;
    let source_cfg = cfg.clone();
    let mut capture = CaptureLoop::new(
        move || FrameSource::open(&source_cfg),
        Box::new(writer),
        cfg.retention_policy(RunMode::Chunked),
        cfg.output_dir.clone(),
        cfg.loop_period(RunMode::Chunked),
        shutdown,
    )
    .with_clock(clock);

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
