/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Rate-Monotonic analysis of one task set.
//!
//! [`analyze()`] combines the three steps of the engine:
//!
//! ```text
//! TaskSet ──► hyperperiod ──► utilisation + Liu & Layland verdict
//!                                   │
//!                                   └─(Schedulable)──► simulate ──► trace
//! ```
//!
//! The function is pure: the same task set always yields the same
//! [`AnalysisResult`], which makes it safe to run on any thread and to
//! compare results bit-for-bit.
//!
//! # Example
//! ```rust
//! use rmsched::analysis::{analyze, AnalysisLimits, Verdict};
//! use rmsched::task::TaskSet;
//!
//! let tasks = TaskSet::parse("A 1 4").unwrap();
//! let result = analyze(&tasks, &AnalysisLimits::default()).unwrap();
//! assert_eq!(result.horizon, 4);
//! assert_eq!(result.verdict(), Verdict::Schedulable);
//! ```

pub mod error;
pub mod feasibility;
pub mod simulator;

pub use error::AnalysisError;
pub use feasibility::Verdict;
pub use simulator::{Interval, Owner};

use tracing::debug;

use crate::hyperperiod::hyperperiod;
use crate::task::TaskSet;

use feasibility::{liu_layland_bound, utilization, verdict};
use simulator::simulate;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default cap on the number of ticks the simulator may run.
pub const DEFAULT_MAX_HORIZON: u64 = 1_000_000;

// ── Limits ────────────────────────────────────────────────────────────────────

/// Resource limits applied by [`analyze()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisLimits {
    /// Largest hyperperiod that will be simulated tick by tick.
    pub max_horizon: u64,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

// ── Result ────────────────────────────────────────────────────────────────────

/// Verdict plus, for schedulable sets only, the compressed trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Schedulable(Vec<Interval>),
    NotSchedulable,
    Indeterminate,
}

/// Everything the report needs about one task set.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// `Σ wcet / period`.
    pub utilization: f64,

    /// LCM of all periods, `1` for an empty set.
    pub horizon: u64,

    pub outcome: Outcome,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        match self.outcome {
            Outcome::Schedulable(_) => Verdict::Schedulable,
            Outcome::NotSchedulable => Verdict::NotSchedulable,
            Outcome::Indeterminate => Verdict::Indeterminate,
        }
    }

    /// The interval trace covering `[0, horizon)`, if the set is schedulable.
    pub fn trace(&self) -> Option<&[Interval]> {
        match &self.outcome {
            Outcome::Schedulable(trace) => Some(trace),
            _ => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Analyze `tasks` under Rate-Monotonic priority.
///
/// # Errors
/// * [`AnalysisError::ZeroPeriod`] – a hand-built task has `period == 0`.
/// * [`AnalysisError::Hyperperiod`] – the LCM of the periods overflows.
/// * [`AnalysisError::HorizonTooLarge`] – the set is schedulable but its
///   hyperperiod exceeds `limits.max_horizon`.
pub fn analyze(tasks: &TaskSet, limits: &AnalysisLimits) -> Result<AnalysisResult, AnalysisError> {
    if let Some(t) = tasks.tasks().iter().find(|t| t.period == 0) {
        return Err(AnalysisError::ZeroPeriod { task: t.name });
    }

    let horizon = hyperperiod(tasks)?;
    let u = utilization(tasks);
    let v = verdict(u, tasks.len());

    debug!(
        task_count = tasks.len(),
        utilization = u,
        bound = liu_layland_bound(tasks.len()),
        horizon,
        verdict = %v,
        "Feasibility test"
    );

    let outcome = match v {
        Verdict::NotSchedulable => Outcome::NotSchedulable,
        Verdict::Indeterminate => Outcome::Indeterminate,
        Verdict::Schedulable => {
            if horizon > limits.max_horizon {
                return Err(AnalysisError::HorizonTooLarge {
                    horizon,
                    limit: limits.max_horizon,
                });
            }
            let trace = simulate(tasks, horizon);
            debug!(intervals = trace.len(), "Simulation complete");
            Outcome::Schedulable(trace)
        }
    };

    Ok(AnalysisResult {
        utilization: u,
        horizon,
        outcome,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn run(line: &str) -> AnalysisResult {
        analyze(&TaskSet::parse(line).unwrap(), &AnalysisLimits::default()).unwrap()
    }

    #[test]
    fn single_light_task_is_schedulable_with_trace() {
        let r = run("A 1 4");
        assert!((r.utilization - 0.25).abs() < 1e-12);
        assert_eq!(r.horizon, 4);
        assert_eq!(r.verdict(), Verdict::Schedulable);
        assert_eq!(
            r.trace().unwrap(),
            &[
                Interval::new(Owner::Task('A'), 0, 1),
                Interval::new(Owner::Idle, 1, 4),
            ]
        );
    }

    #[test]
    fn utilization_exactly_one_with_two_tasks_is_indeterminate() {
        let r = run("A 2 4 B 2 4");
        assert!((r.utilization - 1.0).abs() < 1e-12);
        assert_eq!(r.horizon, 4);
        assert_ne!(r.verdict(), Verdict::NotSchedulable);
        assert_eq!(r.verdict(), Verdict::Indeterminate);
        assert!(r.trace().is_none());
    }

    #[test]
    fn utilization_above_one_is_not_schedulable() {
        let r = run("A 3 4 B 2 4");
        assert_eq!(r.verdict(), Verdict::NotSchedulable);
        assert!(r.trace().is_none());
    }

    #[test]
    fn three_task_set_above_the_bound_is_indeterminate() {
        let r = run("A 1 3 B 1 4 C 2 6");
        assert_eq!(r.horizon, 12);
        assert_eq!(r.verdict(), Verdict::Indeterminate);
    }

    #[test]
    fn empty_set_is_vacuously_schedulable() {
        let r = run("");
        assert_eq!(r.utilization, 0.0);
        assert_eq!(r.horizon, 1);
        assert_eq!(
            r.trace().unwrap(),
            &[Interval::new(Owner::Idle, 0, 1)]
        );
    }

    #[test]
    fn single_task_filling_its_period_is_schedulable() {
        let r = run("A 1 1");
        assert_eq!(r.verdict(), Verdict::Schedulable);
        assert_eq!(r.trace().unwrap(), &[Interval::new(Owner::Task('A'), 0, 1)]);
    }

    #[test]
    fn analysis_is_idempotent() {
        let tasks = TaskSet::parse("A 1 5 B 2 10 C 1 20").unwrap();
        let limits = AnalysisLimits::default();
        let first = analyze(&tasks, &limits).unwrap();
        let second = analyze(&tasks, &limits).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.utilization.to_bits(), second.utilization.to_bits());
    }

    #[test]
    fn horizon_above_limit_is_rejected_only_when_simulating() {
        let tasks = TaskSet::parse("A 1 7 B 1 11").unwrap();
        let limits = AnalysisLimits { max_horizon: 50 };
        assert_eq!(
            analyze(&tasks, &limits).unwrap_err(),
            AnalysisError::HorizonTooLarge {
                horizon: 77,
                limit: 50
            }
        );

        // not simulated, so the limit does not apply
        let heavy = TaskSet::parse("A 6 7 B 6 11").unwrap();
        let r = analyze(&heavy, &limits).unwrap();
        assert_eq!(r.verdict(), Verdict::NotSchedulable);
        assert_eq!(r.horizon, 77);
    }

    #[test]
    fn zero_period_task_is_rejected() {
        let tasks = TaskSet::new(vec![Task {
            name: 'Z',
            wcet: 1,
            period: 0,
        }]);
        assert_eq!(
            analyze(&tasks, &AnalysisLimits::default()).unwrap_err(),
            AnalysisError::ZeroPeriod { task: 'Z' }
        );
    }

    #[test]
    fn hyperperiod_overflow_is_an_error() {
        let huge = u64::MAX / 2 + 1;
        let tasks = TaskSet::new(vec![
            Task::new('A', 1, huge).unwrap(),
            Task::new('B', 1, huge - 1).unwrap(),
        ]);
        assert!(matches!(
            analyze(&tasks, &AnalysisLimits::default()),
            Err(AnalysisError::Hyperperiod(_))
        ));
    }
}
