/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use rmsched::config::SchedConfig;
use rmsched::harness::{run_ordered, WriterSink};
use rmsched::pipeline::{analyze_line_local, analyze_line_remote};
use rmsched::protocol::RemoteEndpoint;

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Analyze every line in this process.
    Local,
    /// Ship every line to an rmsched-worker.
    Remote,
}

/// Rate-Monotonic analysis of periodic task sets, one per input line.
///
/// Each line holds `<name> <wcet> <period>` triples, e.g.:
///   echo "A 1 3 B 1 4 C 1 6" | rmsched
#[derive(Debug, Parser)]
#[command(
    name = "rmsched",
    about = "Rate-Monotonic task-set analyzer",
    long_about = None,
)]
struct Cli {
    /// Read task sets from this file instead of stdin.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Path to the YAML configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Where the analysis runs.
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = Mode::Local)]
    mode: Mode,

    /// Worker host (remote mode); overrides `remote.host`.
    #[arg(short = 'H', long = "host")]
    host: Option<String>,

    /// Worker port (remote mode); overrides `remote.port`.
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
}

/// Non-blank lines of `reader`, in order.
fn read_task_lines(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries only the reports.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SchedConfig::load_or_default(cli.config.as_deref())?;

    let lines = match &cli.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Cannot open input file: {}", path.display()))?;
            read_task_lines(BufReader::new(file))
        }
        None => read_task_lines(io::stdin().lock()),
    }
    .context("Failed to read task sets")?;

    info!(lines = lines.len(), mode = ?cli.mode, "Starting analysis");

    let sink = Arc::new(WriterSink::new(
        io::stdout(),
        config.output.blank_lines_between_reports,
    ));

    let emitted = match cli.mode {
        Mode::Local => {
            let limits = config.analysis_limits();
            run_ordered(
                lines,
                move |cpu, line| analyze_line_local(cpu, line, limits),
                sink,
            )
            .await?
        }
        Mode::Remote => {
            let endpoint = Arc::new(RemoteEndpoint::new(
                cli.host.unwrap_or_else(|| config.remote.host.clone()),
                cli.port.unwrap_or(config.remote.port),
                config.frame_codec(),
            ));
            info!(host = %endpoint.host, port = endpoint.port, "Using remote worker");
            run_ordered(
                lines,
                move |cpu, line| analyze_line_remote(cpu, line, Arc::clone(&endpoint)),
                sink,
            )
            .await?
        }
    };

    info!(reports = emitted, "Analysis complete");
    Ok(())
}
