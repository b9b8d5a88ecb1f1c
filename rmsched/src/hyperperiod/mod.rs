/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hyperperiod (horizon) calculation.
//!
//! The hyperperiod of a set of periodic tasks is the Least Common Multiple
//! (LCM) of all their periods: the smallest window after which the whole
//! schedule repeats.  It bounds the trace simulator, which therefore only
//! ever has to run `hyperperiod` ticks.
//!
//! | Situation | Result |
//! |-----------|--------|
//! | empty task set | `Ok(1)` |
//! | LCM exceeds `u64` | `Err(Overflow)` |
//! | otherwise | `Ok(lcm(periods))` |

pub mod math;

use tracing::debug;

use crate::task::TaskSet;
use math::lcm_of_slice;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during hyperperiod calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperperiodError {
    /// LCM calculation overflowed `u64`.
    ///
    /// Contains the two operands that caused the overflow so the caller can
    /// log a useful message.
    Overflow { a: u64, b: u64 },
}

impl std::fmt::Display for HyperperiodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HyperperiodError::Overflow { a, b } => {
                write!(f, "LCM overflow computing lcm({a}, {b})")
            }
        }
    }
}

impl std::error::Error for HyperperiodError {}

// ── Public API ────────────────────────────────────────────────────────────────

/// Hyperperiod of `tasks`, seeded at `1`.
pub fn hyperperiod(tasks: &TaskSet) -> Result<u64, HyperperiodError> {
    let periods = tasks.periods();
    let horizon = lcm_of_slice(&periods)?;

    debug!(
        task_count = periods.len(),
        horizon, "Calculated hyperperiod"
    );

    Ok(horizon)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn horizon_of(line: &str) -> u64 {
        hyperperiod(&TaskSet::parse(line).unwrap()).unwrap()
    }

    #[test]
    fn empty_set_has_horizon_one() {
        assert_eq!(horizon_of(""), 1);
    }

    #[test]
    fn single_task_horizon_is_its_period() {
        assert_eq!(horizon_of("A 1 4"), 4);
    }

    #[test]
    fn three_task_horizon() {
        assert_eq!(horizon_of("A 1 3 B 1 4 C 2 6"), 12);
    }

    #[test]
    fn horizon_is_the_least_common_multiple() {
        let lines = ["A 1 3 B 1 4 C 2 6", "A 1 7 B 2 5", "A 1 8 B 1 12 C 1 18"];
        for line in lines {
            let set = TaskSet::parse(line).unwrap();
            let h = hyperperiod(&set).unwrap();
            assert!(set.tasks().iter().all(|t| h % t.period == 0));
            // no smaller positive value is a common multiple
            let smaller = (1..h).find(|c| set.tasks().iter().all(|t| c % t.period == 0));
            assert_eq!(smaller, None, "{line}: {h} is not the least multiple");
        }
    }

    #[test]
    fn overflow_is_reported() {
        let huge = u64::MAX / 2 + 1;
        let set = TaskSet::new(vec![
            crate::task::Task::new('A', 1, huge).unwrap(),
            crate::task::Task::new('B', 1, huge - 1).unwrap(),
        ]);
        assert!(matches!(
            hyperperiod(&set),
            Err(HyperperiodError::Overflow { .. })
        ));
    }
}
