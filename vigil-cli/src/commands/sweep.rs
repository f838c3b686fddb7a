//! Sweep command - one retention pass without capturing

use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use vigil_core::{reap, RunMode};

use super::base_config;

/// Arguments for the sweep command
#[derive(Args)]
pub struct SweepArgs {
    /// Which artifact kind to sweep (chunked or snapshot)
    #[arg(short, long, default_value = "chunked")]
    mode: String,

    /// Directory to sweep (defaults to the configured output directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Use a specific config file instead of the default
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Run a single retention sweep
pub fn sweep(args: SweepArgs) -> Result<()> {
    let mode: RunMode = args
        .mode
        .parse()
        .map_err(|e| anyhow::anyhow!("{}. Valid options: chunked, snapshot", e))?;

    let cfg = base_config(args.config.as_deref())?;
    let dir = args.dir.unwrap_or_else(|| cfg.output_dir.clone());

    if !dir.exists() {
        println!("Nothing to sweep: {} does not exist", dir.display());
        return Ok(());
    }

    let summary = reap(
        &dir,
        mode.artifact_suffix(),
        &cfg.retention_policy(mode),
        Local::now(),
    )?;

    println!(
        "Swept {} ({} artifacts): {} deleted, {} failed",
        dir.display(),
        mode,
        summary.deleted,
        summary.failed
    );
    Ok(())
}
