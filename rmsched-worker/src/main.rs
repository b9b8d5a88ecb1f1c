/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use rmsched::analysis::AnalysisLimits;
use rmsched::config::SchedConfig;
use rmsched::protocol::{serve_connection, FrameCodec};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Remote analysis worker for rmsched.
///
/// Example:
///   rmsched-worker -p 50060
#[derive(Debug, Parser)]
#[command(
    name = "rmsched-worker",
    about = "rmsched remote analysis worker",
    long_about = None,
)]
struct Cli {
    /// Address to bind.
    #[arg(short = 'b', long = "bind", default_value = "0.0.0.0")]
    bind: String,

    /// TCP port to listen on; overrides `remote.port`.
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Path to the YAML configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("rmsched-worker starting up...");

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SchedConfig::load_or_default(cli.config.as_deref())?;
    let port = cli.port.unwrap_or(config.remote.port);

    let listener = TcpListener::bind((cli.bind.as_str(), port))
        .await
        .with_context(|| format!("Cannot bind {}:{}", cli.bind, port))?;

    info!(
        addr = %listener.local_addr()?,
        max_horizon = config.analysis.max_horizon,
        max_frame_bytes = config.remote.max_frame_bytes,
        "Listening"
    );

    let codec = config.frame_codec();
    let limits = config.analysis_limits();

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tokio::spawn(handle_connection(stream, peer, codec, limits));
                }
                Err(e) => warn!(error = %e, "Accept failed"),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                return Ok(());
            }
        }
    }
}

/// One request, one response, then the connection is dropped.
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    codec: FrameCodec,
    limits: AnalysisLimits,
) {
    debug!(%peer, "Connection accepted");
    match serve_connection(&mut stream, &codec, limits).await {
        Ok(response) => info!(%peer, horizon = response.horizon, "Request served"),
        Err(e) => warn!(%peer, error = %e, "Connection failed"),
    }
}
