/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Concurrent analysis with strictly ordered output.
//!
//! Every input line gets its own tokio task.  Tasks compute their whole
//! report independently, then queue up at a [`TurnTicket`]: a counter that
//! starts at `1` and only the holder of the current turn may advance.
//!
//! ```text
//!  line 1 ──► job ──► wait(1) ──► emit ──► next = 2 ─┐
//!  line 2 ──► job ────────────── wait(2) ◄───────────┘──► emit ──► next = 3
//!  line 3 ──► job (finished first) ─── wait(3) ◄──────────────────┘
//! ```
//!
//! * A job that fails locally still takes its turn and emits an error
//!   report, so later lines are never starved.
//! * A fatal error (transport, output) ends the run immediately; the
//!   remaining tasks, and the jobs they await, are aborted when the
//!   `JoinSet` is dropped.

use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::report::format_error_report;

// ── TurnTicket ────────────────────────────────────────────────────────────────

/// Sequential hand-off between concurrently running tasks.
///
/// The "next turn" value lives behind the watch channel's lock; waiters park
/// on its change notification until the value equals their own index.
#[derive(Debug)]
pub struct TurnTicket {
    next: watch::Sender<usize>,
}

impl TurnTicket {
    /// Ticket whose first turn is `first`.
    pub fn new(first: usize) -> Self {
        let (next, _) = watch::channel(first);
        Self { next }
    }

    /// The index currently allowed to emit.
    pub fn current(&self) -> usize {
        *self.next.borrow()
    }

    /// Wait until it is `index`'s turn.
    ///
    /// The returned guard passes the turn to `index + 1` when dropped, which
    /// also happens if the holder unwinds.
    pub async fn acquire(&self, index: usize) -> Turn<'_> {
        let mut rx = self.next.subscribe();
        // the sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|next| *next == index).await;
        Turn {
            ticket: self,
            index,
        }
    }
}

/// Exclusive right to emit; held by at most one task at a time.
#[derive(Debug)]
pub struct Turn<'a> {
    ticket: &'a TurnTicket,
    index: usize,
}

impl Turn<'_> {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        self.ticket.next.send_modify(|next| *next += 1);
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Destination of finished reports.  Only ever called by the turn holder.
pub trait ReportSink: Send + Sync {
    fn emit(&self, index: usize, report: &str) -> std::io::Result<()>;
}

/// Writes reports to any [`Write`], separated by blank lines.
pub struct WriterSink<W: Write + Send> {
    state: Mutex<SinkState<W>>,
    blank_lines: usize,
}

/// Writer and emission count, updated together under one lock.
struct SinkState<W> {
    out: W,
    emitted: usize,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W, blank_lines: usize) -> Self {
        Self {
            state: Mutex::new(SinkState { out, emitted: 0 }),
            blank_lines,
        }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .out
    }
}

impl<W: Write + Send> ReportSink for WriterSink<W> {
    fn emit(&self, _index: usize, report: &str) -> std::io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        let SinkState { out, emitted } = &mut *state;

        if *emitted > 0 {
            out.write_all("\n".repeat(self.blank_lines).as_bytes())?;
        }
        out.write_all(report.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;

        *emitted += 1;
        Ok(())
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// Cancels the inner job when the task awaiting it is aborted.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run `job(index, line)` for every line concurrently and emit the reports
/// to `sink` in input order.  Indices are 1-based.
///
/// Returns the number of reports emitted.
///
/// # Errors
/// The first fatal [`PipelineError`] reported by any job, or an
/// [`PipelineError::Output`] if the sink fails.  Non-fatal errors become
/// error reports and do not stop the run.
pub async fn run_ordered<J, Fut, S>(
    lines: Vec<String>,
    job: J,
    sink: Arc<S>,
) -> Result<usize, PipelineError>
where
    J: Fn(usize, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, PipelineError>> + Send + 'static,
    S: ReportSink + ?Sized + 'static,
{
    let ticket = Arc::new(TurnTicket::new(1));
    let job = Arc::new(job);
    let mut workers = JoinSet::new();

    for (offset, line) in lines.into_iter().enumerate() {
        let index = offset + 1;
        let ticket = Arc::clone(&ticket);
        let job = Arc::clone(&job);
        let sink = Arc::clone(&sink);

        debug!(cpu = index, "Dispatching analysis");
        workers.spawn(async move {
            // the inner task turns a panicking job into a JoinError
            let handle = tokio::spawn(job(index, line));
            let _inner = AbortOnDrop(handle.abort_handle());
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(PipelineError::Worker {
                    cpu: index,
                    reason: e.to_string(),
                }),
            };

            let report = match outcome {
                Ok(report) => report,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(cpu = index, error = %e, "Analysis failed");
                    format_error_report(index, &e)
                }
            };

            let turn = ticket.acquire(index).await;
            debug!(cpu = turn.index(), "Emitting report");
            sink.emit(index, &report).map_err(PipelineError::Output)
        });
    }

    let mut emitted = 0;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(())) => emitted += 1,
            Ok(Err(e)) => return Err(e),
            // only reachable if the runtime is shutting down
            Err(e) => {
                return Err(PipelineError::Worker {
                    cpu: 0,
                    reason: e.to_string(),
                })
            }
        }
    }

    Ok(emitted)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
