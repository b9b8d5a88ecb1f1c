/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Rate-Monotonic feasibility test.
//!
//! # Theory
//! **Liu & Layland (1973)**: under Rate Monotonic scheduling (shorter period →
//! higher priority), a task set of `n` independent periodic tasks is
//! **guaranteed** schedulable on one CPU if:
//!
//! $$U = \sum_{i=1}^{n} \frac{C_i}{T_i} \leq n \left(2^{1/n} - 1\right)$$
//!
//! | n | Bound |
//! |---|---|
//! | 1 | 1.000 |
//! | 2 | 0.828 |
//! | 3 | 0.780 |
//! | 5 | 0.743 |
//! | ∞ | ln(2) ≈ 0.693 |
//!
//! The bound is sufficient, not necessary.  Between the bound and `1.0` the
//! answer is [`Verdict::Indeterminate`]; above `1.0` demand exceeds capacity
//! and the set is [`Verdict::NotSchedulable`].
//!
//! Both comparisons are strict (`>`): `U == 1.0` is never `NotSchedulable`
//! and `U == bound` is `Schedulable`.

use std::fmt;

use crate::task::TaskSet;

// ── Verdict ───────────────────────────────────────────────────────────────────

/// Outcome of the Liu & Layland test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// `U ≤ bound`: a trace is produced.
    Schedulable,
    /// `U > 1.0`: provably infeasible.
    NotSchedulable,
    /// `bound < U ≤ 1.0`: the sufficient test cannot decide.
    Indeterminate,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Schedulable => "schedulable",
            Verdict::NotSchedulable => "not schedulable",
            Verdict::Indeterminate => "indeterminate",
        };
        f.write_str(s)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Compute the Liu & Layland utilisation upper bound for `n` tasks.
///
/// `U_bound(n) = n × (2^(1/n) − 1)`
///
/// Returns `1.0` for `n = 1` and `0.0` for `n = 0`.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

/// Total utilisation `Σ wcet / period`, summed in input order.
///
/// Folds from `+0.0`: `f64: Sum` starts at `-0.0`, which would print as
/// `-0.00` for an empty set.
pub fn utilization(tasks: &TaskSet) -> f64 {
    tasks
        .tasks()
        .iter()
        .fold(0.0, |acc, t| acc + t.utilization())
}

/// Classify a set of `task_count` tasks with total utilisation `u`.
pub fn verdict(u: f64, task_count: usize) -> Verdict {
    if u > 1.0 {
        Verdict::NotSchedulable
    } else if u > liu_layland_bound(task_count) || u < 0.0 {
        Verdict::Indeterminate
    } else {
        Verdict::Schedulable
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
