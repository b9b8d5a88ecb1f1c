/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for [`analyze()`](super::analyze).
//!
//! A `NotSchedulable` or `Indeterminate` verdict is **not** an error: both are
//! ordinary [`AnalysisResult`](super::AnalysisResult)s.  The variants below
//! only cover inputs the analyzer cannot process at all.

use thiserror::Error;

use crate::hyperperiod::HyperperiodError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The LCM of the periods does not fit in `u64`.
    #[error("cannot compute hyperperiod: {0}")]
    Hyperperiod(#[from] HyperperiodError),

    /// A hand-built task carries a zero period.
    #[error("task '{task}' has a period of 0")]
    ZeroPeriod { task: char },

    /// The set is schedulable but its hyperperiod is longer than the
    /// simulator is allowed to run.
    #[error("hyperperiod {horizon} exceeds the simulation limit of {limit} ticks")]
    HorizonTooLarge { horizon: u64, limit: u64 },
}
