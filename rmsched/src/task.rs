/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core task data structures for the Rate-Monotonic analyzer.
//!
//! ```text
//! raw line ──(TaskSet::parse)──►  TaskSet  ──(analysis)──►  AnalysisResult
//!                                  ↑ input order kept for the report
//!                                  RM order produced on demand
//! ```
//!
//! # Ownership model
//! A `TaskSet` is created once per input line and **owned** by the worker
//! that processes that line.  The simulator never mutates it: it works on a
//! private copy sorted by period, so the original input order is still
//! available when the report is rendered.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ── Parse errors ──────────────────────────────────────────────────────────────

/// Why a task-set line was rejected.
///
/// Parsing is strict: a single bad token rejects the whole line rather than
/// silently dropping the trailing partial triple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The number of tokens is not a multiple of three.
    #[error("incomplete task triple at token {position}: expected <name> <wcet> <period>")]
    IncompleteTriple { position: usize },

    /// The name token is not exactly one character.
    #[error("invalid task name '{token}': names must be a single character")]
    InvalidName { token: String },

    /// A WCET or period token is not an unsigned integer.
    #[error("invalid {field} '{token}' for task '{task}': expected an unsigned integer")]
    InvalidNumber {
        task: char,
        field: &'static str,
        token: String,
    },

    /// A period of zero has no activations and would divide by zero.
    #[error("task '{task}' has a period of 0")]
    ZeroPeriod { task: char },
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// One periodic task: `wcet` units of work released every `period` ticks.
///
/// Names are not required to be unique within a set; duplicates are the
/// caller's problem and simply show up twice in the report and the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    /// Single-character identifier used in the report and the diagram.
    pub name: char,

    /// Worst-case execution time per activation, in ticks.
    pub wcet: u64,

    /// Activation interval, in ticks.  Always `> 0` for parsed tasks.
    pub period: u64,
}

impl Task {
    /// Build a task, rejecting a zero period.
    pub fn new(name: char, wcet: u64, period: u64) -> Result<Self, ParseError> {
        if period == 0 {
            return Err(ParseError::ZeroPeriod { task: name });
        }
        Ok(Self { name, wcet, period })
    }

    /// Fraction of one processor this task demands in the long run.
    ///
    /// Returns `0.0` when `period` is zero so that a hand-built task can never
    /// poison a utilisation sum with `inf` / `NaN`.
    pub fn utilization(&self) -> f64 {
        if self.period == 0 {
            return 0.0;
        }
        self.wcet as f64 / self.period as f64
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (WCET: {}, Period: {})",
            self.name, self.wcet, self.period
        )
    }
}

// ── TaskSet ───────────────────────────────────────────────────────────────────

/// Tasks of one input line, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Wrap an already-built list of tasks.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Parse whitespace-separated `<name> <wcet> <period>` triples.
    ///
    /// An empty (or all-whitespace) line yields an empty set, which is a
    /// valid, vacuously schedulable input.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() % 3 != 0 {
            return Err(ParseError::IncompleteTriple {
                position: tokens.len() - tokens.len() % 3 + 1,
            });
        }

        let tasks = tokens
            .chunks_exact(3)
            .map(|triple| parse_triple(triple[0], triple[1], triple[2]))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tasks })
    }

    /// Tasks in input order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Copy of the tasks ordered by Rate-Monotonic priority: ascending
    /// period, ties kept in input order (stable sort).
    pub fn by_rm_priority(&self) -> Vec<Task> {
        let mut sorted = self.tasks.clone();
        sorted.sort_by_key(|t| t.period);
        sorted
    }

    /// All periods in input order.
    pub fn periods(&self) -> Vec<u64> {
        self.tasks.iter().map(|t| t.period).collect()
    }
}

impl FromStr for TaskSet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_triple(name: &str, wcet: &str, period: &str) -> Result<Task, ParseError> {
    let mut chars = name.chars();
    let name = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(ParseError::InvalidName {
                token: name.to_string(),
            })
        }
    };

    let parse_number = |field: &'static str, token: &str| {
        token.parse::<u64>().map_err(|_| ParseError::InvalidNumber {
            task: name,
            field,
            token: token.to_string(),
        })
    };

    let wcet = parse_number("WCET", wcet)?;
    let period = parse_number("period", period)?;

    Task::new(name, wcet, period)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
