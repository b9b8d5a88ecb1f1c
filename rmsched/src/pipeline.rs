/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-line jobs handed to [`run_ordered`](crate::harness::run_ordered).
//!
//! | Mode | Steps |
//! |---|---|
//! | local | parse → analyze → simulate → format (blocking pool) |
//! | remote | parse (for the task list) → exchange with worker → decode → format |

use std::sync::Arc;

use tracing::debug;

use crate::analysis::{analyze, AnalysisLimits};
use crate::error::PipelineError;
use crate::protocol::RemoteEndpoint;
use crate::report::format_report;
use crate::task::TaskSet;

/// Full synchronous pipeline for one line.
pub fn analyze_line(cpu: usize, line: &str, limits: &AnalysisLimits) -> Result<String, PipelineError> {
    let tasks = TaskSet::parse(line)?;
    let result = analyze(&tasks, limits)?;
    debug!(cpu, verdict = %result.verdict(), "Line analyzed");
    Ok(format_report(cpu, &tasks, &result))
}

/// [`analyze_line`] on tokio's blocking pool; the simulation is CPU-bound.
pub async fn analyze_line_local(
    cpu: usize,
    line: String,
    limits: AnalysisLimits,
) -> Result<String, PipelineError> {
    tokio::task::spawn_blocking(move || analyze_line(cpu, &line, &limits))
        .await
        .map_err(|e| PipelineError::Worker {
            cpu,
            reason: e.to_string(),
        })?
}

/// Ship `line` to a remote worker and format its answer locally.
pub async fn analyze_line_remote(
    cpu: usize,
    line: String,
    endpoint: Arc<RemoteEndpoint>,
) -> Result<String, PipelineError> {
    let tasks = TaskSet::parse(&line)?;
    let response = endpoint.request_analysis(&line).await?;
    let result = response.into_result().map_err(PipelineError::Rejected)?;
    debug!(cpu, verdict = %result.verdict(), "Remote line analyzed");
    Ok(format_report(cpu, &tasks, &result))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use tokio::net::TcpListener;

    use crate::harness::{run_ordered, ReportSink, WriterSink};
    use crate::protocol::{serve_connection, FrameCodec};

    const LINES: [&str; 4] = ["A 1 4", "A 2 4 B 2 4", "A 3 4 B 2 4", "A 1 5 B 2 10 C 1 20"];

    #[derive(Default)]
    struct CollectSink {
        reports: Mutex<Vec<String>>,
    }

    impl ReportSink for CollectSink {
        fn emit(&self, _index: usize, report: &str) -> std::io::Result<()> {
            self.reports.lock().unwrap().push(report.to_string());
            Ok(())
        }
    }

    /// Worker that answers `connections` requests, one per connection.
    async fn spawn_worker(connections: usize) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            for _ in 0..connections {
                let (mut stream, _) = listener.accept().await.unwrap();
                tokio::spawn(async move {
                    serve_connection(&mut stream, &FrameCodec::default(), AnalysisLimits::default())
                        .await
                        .unwrap();
                });
            }
        });
        port
    }

    #[test]
    fn analyze_line_formats_a_full_report() {
        let text = analyze_line(7, "A 1 4", &AnalysisLimits::default()).unwrap();
        assert!(text.starts_with("CPU 7\n"));
        assert!(text.ends_with("Scheduling Diagram for CPU 7: A(1), Idle(3)"));
    }

    #[test]
    fn analyze_line_propagates_parse_errors() {
        let err = analyze_line(1, "A 1 4 B", &AnalysisLimits::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn local_run_prints_reports_in_order() {
        let lines: Vec<String> = ["A 1 4", "", "A 2 4 B 2 4"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let sink = Arc::new(WriterSink::new(Vec::new(), 2));

        run_ordered(
            lines,
            |cpu, line| analyze_line_local(cpu, line, AnalysisLimits::default()),
            Arc::clone(&sink),
        )
        .await
        .unwrap();

        let sink = Arc::try_unwrap(sink).ok().expect("all workers joined");
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let reports: Vec<&str> = text.trim_end().split("\n\n\n").collect();
        assert_eq!(reports.len(), 3);
        assert!(reports[0].starts_with("CPU 1\n"));
        assert!(reports[1].starts_with("CPU 2\n"));
        assert!(reports[1].ends_with("Idle(1)"));
        assert!(reports[2].ends_with("Task set schedulability is unknown"));
    }

    #[tokio::test]
    async fn remote_reports_match_local_reports() {
        let port = spawn_worker(LINES.len()).await;
        let endpoint = Arc::new(RemoteEndpoint::new("127.0.0.1", port, FrameCodec::default()));
        let lines: Vec<String> = LINES.iter().map(|s| s.to_string()).collect();

        let sink = Arc::new(CollectSink::default());
        run_ordered(
            lines,
            move |cpu, line| analyze_line_remote(cpu, line, Arc::clone(&endpoint)),
            Arc::clone(&sink),
        )
        .await
        .unwrap();

        let remote = sink.reports.lock().unwrap().clone();
        let local: Vec<String> = LINES
            .iter()
            .enumerate()
            .map(|(i, line)| analyze_line(i + 1, line, &AnalysisLimits::default()).unwrap())
            .collect();
        assert_eq!(remote, local);
    }

    #[tokio::test]
    async fn remote_parse_error_never_reaches_the_network() {
        // port 1 is never listened on; a parse error must win before connecting
        let endpoint = Arc::new(RemoteEndpoint::new("127.0.0.1", 1, FrameCodec::default()));
        let err = analyze_line_remote(1, "A 1".into(), endpoint).await.unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_worker_is_fatal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = Arc::new(RemoteEndpoint::new("127.0.0.1", port, FrameCodec::default()));
        let err = analyze_line_remote(1, "A 1 4".into(), endpoint).await.unwrap_err();
        assert!(err.is_fatal());
    }
}
