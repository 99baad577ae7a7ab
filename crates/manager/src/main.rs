// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mr-manager` - MapReduce cluster Manager entry point.

use anyhow::Result;
use clap::Parser;
use mr_manager::{Manager, ManagerConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mr-manager", about = "MapReduce cluster manager", version)]
struct Args {
    /// Address to listen on (TCP control plane and UDP heartbeats)
    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(long, default_value_t = 6000)]
    port: u16,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    logfile: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    loglevel: String,

    /// Parent directory for per-job shared temporary directories
    #[arg(long = "shared_dir")]
    shared_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_tracing(args.logfile.as_deref(), &args.loglevel)?;

    let mut config = ManagerConfig::new(args.host, args.port);
    config.shared_dir = args.shared_dir;

    let manager = Manager::bind(config).await?;
    manager.run().await?;
    Ok(())
}

fn init_tracing(
    logfile: Option<&Path>,
    loglevel: &str,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_new(loglevel)?;
    match logfile {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            Ok(None)
        }
    }
}
