/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Remote execution protocol.
//!
//! One request / response exchange per TCP connection:
//!
//! ```text
//! requester                                   worker
//!    │ ── frame("A 1 4") ─────────────────────► │  parse + analyze
//!    │ ◄──────────────── frame("0.25 4 A(1), Idle(3)")
//!    ╳ close
//! ```
//!
//! Response payload grammar (single space separated, payload may contain
//! spaces):
//!
//! | Payload | Meaning |
//! |---|---|
//! | `notSchedulable` | `U > 1` |
//! | `unknown` | above the Liu & Layland bound |
//! | `error <message>` | the worker could not analyze the line |
//! | anything else | the scheduling diagram, e.g. `A(1), Idle(3)` |
//!
//! The requester rebuilds a full [`AnalysisResult`] from the response so the
//! report is formatted locally exactly as in local mode.

pub mod codec;
pub mod error;

pub use codec::{FrameCodec, DEFAULT_MAX_FRAME_BYTES};
pub use error::ProtocolError;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::analysis::{analyze, AnalysisLimits, AnalysisResult, Interval, Outcome, Owner};
use crate::report::{format_diagram, format_utilization};
use crate::task::TaskSet;

/// Default TCP port of `rmsched-worker`.
pub const DEFAULT_PORT: u16 = 50060;

const NOT_SCHEDULABLE_TOKEN: &str = "notSchedulable";
const UNKNOWN_TOKEN: &str = "unknown";
const ERROR_PREFIX: &str = "error ";

// ── Response ──────────────────────────────────────────────────────────────────

/// Third field of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    NotSchedulable,
    Unknown,
    Diagram(Vec<Interval>),
    Rejected(String),
}

/// Compact analysis summary sent back by the worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Already rounded to two decimals on the wire.
    pub utilization: f64,
    pub horizon: u64,
    pub payload: Payload,
}

impl Response {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let payload = match &result.outcome {
            Outcome::NotSchedulable => Payload::NotSchedulable,
            Outcome::Indeterminate => Payload::Unknown,
            Outcome::Schedulable(trace) => Payload::Diagram(trace.clone()),
        };
        Self {
            utilization: result.utilization,
            horizon: result.horizon,
            payload,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            utilization: 0.0,
            horizon: 0,
            payload: Payload::Rejected(message.into()),
        }
    }

    /// `<utilization> <horizon> <payload>`.
    pub fn encode(&self) -> String {
        let payload = match &self.payload {
            Payload::NotSchedulable => NOT_SCHEDULABLE_TOKEN.to_string(),
            Payload::Unknown => UNKNOWN_TOKEN.to_string(),
            Payload::Diagram(trace) => format_diagram(trace),
            Payload::Rejected(message) => format!("{ERROR_PREFIX}{message}"),
        };
        format!(
            "{} {} {}",
            format_utilization(self.utilization),
            self.horizon,
            payload
        )
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let malformed = |reason| ProtocolError::MalformedResponse {
            payload: text.to_string(),
            reason,
        };

        let mut fields = text.splitn(3, ' ');
        let utilization = fields
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| malformed("utilization is not a number"))?;
        let horizon = fields
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| malformed("horizon is not an unsigned integer"))?;
        let rest = fields.next().ok_or_else(|| malformed("missing payload"))?;

        let payload = if rest == NOT_SCHEDULABLE_TOKEN {
            Payload::NotSchedulable
        } else if rest == UNKNOWN_TOKEN {
            Payload::Unknown
        } else if let Some(message) = rest.strip_prefix(ERROR_PREFIX) {
            Payload::Rejected(message.to_string())
        } else {
            let trace = parse_diagram(rest).map_err(malformed)?;
            // the diagram must tile [0, horizon) exactly
            if trace.last().map(|iv| iv.end) != Some(horizon) {
                return Err(malformed("diagram does not cover the horizon"));
            }
            Payload::Diagram(trace)
        };

        Ok(Self {
            utilization,
            horizon,
            payload,
        })
    }

    /// Rebuild the analysis result, or return the worker's rejection message.
    pub fn into_result(self) -> Result<AnalysisResult, String> {
        let outcome = match self.payload {
            Payload::NotSchedulable => Outcome::NotSchedulable,
            Payload::Unknown => Outcome::Indeterminate,
            Payload::Diagram(trace) => Outcome::Schedulable(trace),
            Payload::Rejected(message) => return Err(message),
        };
        Ok(AnalysisResult {
            utilization: self.utilization,
            horizon: self.horizon,
            outcome,
        })
    }
}

/// Inverse of [`format_diagram`]: rebuild intervals with cumulative starts.
fn parse_diagram(text: &str) -> Result<Vec<Interval>, &'static str> {
    let mut intervals = Vec::new();
    let mut cursor = 0u64;

    for token in text.split(", ") {
        let open = token.rfind('(').ok_or("diagram entry without '('")?;
        let duration = token[open + 1..]
            .strip_suffix(')')
            .ok_or("diagram entry without ')'")?
            .parse::<u64>()
            .map_err(|_| "diagram duration is not an unsigned integer")?;
        if duration == 0 {
            return Err("diagram entry with zero duration");
        }

        let name = &token[..open];
        let owner = if name == "Idle" {
            Owner::Idle
        } else {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Owner::Task(c),
                _ => return Err("diagram owner is neither a task name nor Idle"),
            }
        };

        let end = cursor
            .checked_add(duration)
            .ok_or("diagram overflows the tick range")?;
        intervals.push(Interval::new(owner, cursor, end));
        cursor = end;
    }

    Ok(intervals)
}

// ── Responder ─────────────────────────────────────────────────────────────────

/// Analyze one raw task-set line into a response.  Never fails: parse and
/// analysis errors become [`Payload::Rejected`].
pub fn respond(line: &str, limits: &AnalysisLimits) -> Response {
    let tasks = match TaskSet::parse(line) {
        Ok(tasks) => tasks,
        Err(e) => return Response::rejected(e.to_string()),
    };
    match analyze(&tasks, limits) {
        Ok(result) => Response::from_result(&result),
        Err(e) => Response::rejected(e.to_string()),
    }
}

/// Serve exactly one request on `stream`, then shut the write side down.
pub async fn serve_connection<S>(
    stream: &mut S,
    codec: &FrameCodec,
    limits: AnalysisLimits,
) -> Result<Response, ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = codec.read_frame(stream).await?;
    let line = String::from_utf8(request)?;
    debug!(line = %line, "Request received");

    let response = tokio::task::spawn_blocking(move || respond(&line, &limits))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Analysis task failed");
            Response::rejected(format!("analysis task failed: {e}"))
        });

    codec
        .write_frame(stream, response.encode().as_bytes())
        .await?;
    stream.shutdown().await?;

    Ok(response)
}

// ── Requester ─────────────────────────────────────────────────────────────────

/// Send `line` and wait for the response on an already-open stream.
pub async fn exchange<S>(stream: &mut S, codec: &FrameCodec, line: &str) -> Result<Response, ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    codec.write_frame(stream, line.as_bytes()).await?;
    let reply = codec.read_frame(stream).await?;
    Response::decode(&String::from_utf8(reply)?)
}

/// Address of a remote worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    pub host: String,
    pub port: u16,
    pub codec: FrameCodec,
}

impl RemoteEndpoint {
    pub fn new(host: impl Into<String>, port: u16, codec: FrameCodec) -> Self {
        Self {
            host: host.into(),
            port,
            codec,
        }
    }

    /// Open a connection, run one exchange, close the connection.
    pub async fn request_analysis(&self, line: &str) -> Result<Response, ProtocolError> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|source| ProtocolError::Connect {
                addr: format!("{}:{}", self.host, self.port),
                source,
            })?;

        let response = exchange(&mut stream, &self.codec, line).await?;
        debug!(host = %self.host, port = self.port, "Response received");
        Ok(response)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
