/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Top-level error type for one analysis job.
//!
//! The harness treats the two classes differently:
//!
//! | Class | Variants | Harness behaviour |
//! |---|---|---|
//! | local to one line | `Parse`, `Analysis`, `Rejected`, `Worker` | error report emitted in the line's turn |
//! | fatal for the run | `Protocol`, `Output` | run aborted, process exits non-zero |

use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::protocol::ProtocolError;
use crate::task::ParseError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid task set: {0}")]
    Parse(#[from] ParseError),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// The remote worker answered but could not analyze the line.
    #[error("remote worker rejected the task set: {0}")]
    Rejected(String),

    /// The job panicked or was cancelled before producing a report.
    #[error("analysis worker for CPU {cpu} failed: {reason}")]
    Worker { cpu: usize, reason: String },

    #[error("remote transport failure: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("failed to write report: {0}")]
    Output(#[source] std::io::Error),
}

impl PipelineError {
    /// `true` when the whole run must stop instead of reporting this line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Protocol(_) | PipelineError::Output(_))
    }
}
