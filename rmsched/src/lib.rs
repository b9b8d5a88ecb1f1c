/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rmsched – Rate-Monotonic task-set analyzer
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── task          – Task / TaskSet model and line parser
//! ├── hyperperiod/  – LCM / GCD helpers, horizon
//! ├── analysis/     – feasibility test, trace simulator, AnalysisResult
//! ├── report        – canonical text report
//! ├── protocol/     – length-prefixed remote protocol (codec, requester, responder)
//! ├── pipeline      – per-line local / remote jobs
//! ├── harness       – ordered concurrent runner (turn ticket, sinks)
//! ├── config/       – YAML configuration
//! └── error         – PipelineError
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod harness;
pub mod hyperperiod;
pub mod pipeline;
pub mod protocol;
pub mod report;
pub mod task;
