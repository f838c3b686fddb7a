//! Vigil CLI
//!
//! Retention-bounded webcam + screen recorder.
//!
//! # Usage
//!
//! ```bash
//! # Record rotated one-minute video chunks, keeping the newest 15
//! vigil record
//!
//! # Write a timestamped snapshot every 5 seconds, keeping 15 minutes
//! vigil snapshot
//!
//! # Run one retention sweep without capturing
//! vigil sweep --mode chunked
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Vigil - retention-bounded webcam + screen recorder
#[derive(Parser)]
#[command(name = "vigil")]
#[command(version)]
#[command(about = "Records webcam + screen side by side with rolling retention", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record rotated video chunks (count-bounded retention)
    Record(commands::RecordArgs),

    /// Write periodic snapshots (age-bounded retention)
    Snapshot(commands::SnapshotArgs),

    /// Run one retention sweep without capturing
    Sweep(commands::SweepArgs),

    /// List attached monitors
    #[command(alias = "ls")]
    ListMonitors,

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("vigil={}", level).parse().expect("valid directive")),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Record(args) => commands::record(args)?,
        Commands::Snapshot(args) => commands::snapshot(args)?,
        Commands::Sweep(args) => commands::sweep(args)?,
        Commands::ListMonitors => commands::list_monitors()?,
        Commands::Config(args) => commands::config(args)?,
    }

    Ok(())
}
