/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Canonical textual report for one processor (one input line).
//!
//! ```text
//! CPU 1
//! Task scheduling information: A (WCET: 1, Period: 4)
//! Task set utilization: 0.25
//! Hyperperiod: 4
//! Rate Monotonic Algorithm execution for CPU 1:
//! Scheduling Diagram for CPU 1: A(1), Idle(3)
//! ```
//!
//! The same text is produced whether the analysis ran locally or on a remote
//! worker, so the report is the unit both of output ordering and of
//! comparison in tests.

use std::fmt::Write as _;

use crate::analysis::{AnalysisResult, Interval, Outcome};
use crate::task::TaskSet;

const NOT_SCHEDULABLE_LINE: &str = "The task set is not schedulable";
const UNKNOWN_LINE: &str = "Task set schedulability is unknown";

/// Render `intervals` as `A(1), B(2), Idle(3)`.
pub fn format_diagram(intervals: &[Interval]) -> String {
    intervals
        .iter()
        .map(Interval::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Utilisation with two decimals, as shown in reports and on the wire.
pub fn format_utilization(u: f64) -> String {
    format!("{u:.2}")
}

/// Full report for processor `cpu`.
///
/// `tasks` is the set as parsed (input order), not the RM-sorted copy.
pub fn format_report(cpu: usize, tasks: &TaskSet, result: &AnalysisResult) -> String {
    let task_list = tasks
        .tasks()
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "CPU {cpu}");
    let _ = writeln!(out, "Task scheduling information: {task_list}");
    let _ = writeln!(
        out,
        "Task set utilization: {}",
        format_utilization(result.utilization)
    );
    let _ = writeln!(out, "Hyperperiod: {}", result.horizon);
    let _ = writeln!(out, "Rate Monotonic Algorithm execution for CPU {cpu}:");

    match &result.outcome {
        Outcome::NotSchedulable => out.push_str(NOT_SCHEDULABLE_LINE),
        Outcome::Indeterminate => out.push_str(UNKNOWN_LINE),
        Outcome::Schedulable(trace) => {
            let _ = write!(
                out,
                "Scheduling Diagram for CPU {cpu}: {}",
                format_diagram(trace)
            );
        }
    }

    out
}

/// Report emitted in place of [`format_report`] when a line could not be
/// analyzed.
pub fn format_error_report(cpu: usize, error: &dyn std::fmt::Display) -> String {
    format!("CPU {cpu}\nError: {error}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisLimits, Owner};

    fn report(cpu: usize, line: &str) -> String {
        let tasks = TaskSet::parse(line).unwrap();
        let result = analyze(&tasks, &AnalysisLimits::default()).unwrap();
        format_report(cpu, &tasks, &result)
    }

    #[test]
    fn schedulable_report() {
        assert_eq!(
            report(1, "A 1 4"),
            "CPU 1\n\
             Task scheduling information: A (WCET: 1, Period: 4)\n\
             Task set utilization: 0.25\n\
             Hyperperiod: 4\n\
             Rate Monotonic Algorithm execution for CPU 1:\n\
             Scheduling Diagram for CPU 1: A(1), Idle(3)"
        );
    }

    #[test]
    fn indeterminate_report() {
        assert_eq!(
            report(2, "A 2 4 B 2 4"),
            "CPU 2\n\
             Task scheduling information: A (WCET: 2, Period: 4), B (WCET: 2, Period: 4)\n\
             Task set utilization: 1.00\n\
             Hyperperiod: 4\n\
             Rate Monotonic Algorithm execution for CPU 2:\n\
             Task set schedulability is unknown"
        );
    }

    #[test]
    fn not_schedulable_report() {
        let text = report(3, "A 3 4 B 2 4");
        assert!(text.ends_with("Rate Monotonic Algorithm execution for CPU 3:\nThe task set is not schedulable"));
        assert!(text.contains("Task set utilization: 1.25\n"));
    }

    #[test]
    fn empty_set_report() {
        assert_eq!(
            report(1, ""),
            "CPU 1\n\
             Task scheduling information: \n\
             Task set utilization: 0.00\n\
             Hyperperiod: 1\n\
             Rate Monotonic Algorithm execution for CPU 1:\n\
             Scheduling Diagram for CPU 1: Idle(1)"
        );
    }

    #[test]
    fn tasks_are_listed_in_input_order() {
        let text = report(1, "B 1 8 A 1 4");
        assert!(text.contains(
            "Task scheduling information: B (WCET: 1, Period: 8), A (WCET: 1, Period: 4)\n"
        ));
        // but the trace follows RM priority
        assert!(text.ends_with("A(1), B(1), Idle(2), A(1), Idle(3)"));
    }

    #[test]
    fn diagram_has_no_trailing_separator() {
        let d = format_diagram(&[
            Interval::new(Owner::Task('A'), 0, 2),
            Interval::new(Owner::Idle, 2, 5),
        ]);
        assert_eq!(d, "A(2), Idle(3)");
    }

    #[test]
    fn utilization_uses_two_decimals() {
        assert_eq!(format_utilization(11.0 / 12.0), "0.92");
        assert_eq!(format_utilization(0.0), "0.00");
    }

    #[test]
    fn error_report_names_the_cpu() {
        let err = TaskSet::parse("A 1").unwrap_err();
        let text = format_error_report(4, &err);
        assert!(text.starts_with("CPU 4\nError: incomplete task triple"));
    }
}
