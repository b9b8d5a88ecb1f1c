/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Unit-tick preemptive Rate-Monotonic simulation.
//!
//! The simulator walks `0..horizon` one tick at a time:
//!
//! 1. **Reset pass** – every task whose period divides `tick` gets a fresh
//!    activation (`remaining = wcet`).  Any reset closes every interval
//!    recorded so far for extension, so a task resuming right after an
//!    activation boundary starts a new interval.
//! 2. **Dispatch pass** – the first task in RM order with work left runs for
//!    one tick.  A fresh activation always opens a new interval; otherwise
//!    the task's open interval is extended (or a new one opened).
//! 3. No runnable task → the tick is recorded as idle under the same rule.
//!
//! Idle intervals split by an activation boundary are merged at the end.
//! Task intervals are *not*: `A(1), A(1)` marks two distinct activations.

use std::fmt;

use tracing::trace;

use crate::task::{Task, TaskSet};

// ── Trace types ───────────────────────────────────────────────────────────────

/// Who occupied the processor during an [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Task(char),
    Idle,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Task(name) => write!(f, "{name}"),
            Owner::Idle => f.write_str("Idle"),
        }
    }
}

/// Half-open tick range `[start, end)` attributed to one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub owner: Owner,
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub fn new(owner: Owner, start: u64, end: u64) -> Self {
        Self { owner, start, end }
    }

    /// Number of ticks covered.
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }
}

/// Renders as `A(3)` / `Idle(2)`, the diagram token format.
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.owner, self.duration())
    }
}

// ── Simulation state ──────────────────────────────────────────────────────────

/// A task plus the work left in its current activation.
///
/// Invariant: `remaining ∈ [0, task.wcet]`.
struct Activation {
    task: Task,
    remaining: u64,
}

/// Interval list with an "open for extension" watermark.
///
/// Intervals at indices `< open_from` were recorded before the latest
/// activation boundary and may no longer be extended.
#[derive(Default)]
struct TraceBuilder {
    intervals: Vec<Interval>,
    open_from: usize,
}

impl TraceBuilder {
    fn close_all(&mut self) {
        self.open_from = self.intervals.len();
    }

    fn open(&mut self, owner: Owner, tick: u64) {
        self.intervals.push(Interval::new(owner, tick, tick + 1));
    }

    fn extend_or_open(&mut self, owner: Owner, tick: u64) {
        match self.intervals[self.open_from..]
            .iter_mut()
            .find(|iv| iv.owner == owner)
        {
            Some(iv) => iv.end = tick + 1,
            None => self.open(owner, tick),
        }
    }

    fn finish(self) -> Vec<Interval> {
        coalesce_idle(self.intervals)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Simulate `tasks` under Rate-Monotonic priority over `[0, horizon)`.
///
/// The caller is expected to have checked feasibility first; the simulator
/// itself never lets a task run more than `wcet` ticks per activation, so an
/// overloaded set simply produces a trace in which low-priority work is
/// dropped at the next activation.
pub fn simulate(tasks: &TaskSet, horizon: u64) -> Vec<Interval> {
    let mut ready: Vec<Activation> = tasks
        .by_rm_priority()
        .into_iter()
        .map(|task| Activation { task, remaining: 0 })
        .collect();

    let mut builder = TraceBuilder::default();

    for tick in 0..horizon {
        // ── reset pass ────────────────────────────────────────────────────────
        let mut boundary = false;
        for act in ready.iter_mut() {
            if tick % act.task.period == 0 {
                act.remaining = act.task.wcet;
                boundary = true;
            }
        }
        if boundary {
            builder.close_all();
        }

        // ── dispatch pass ─────────────────────────────────────────────────────
        match ready.iter_mut().find(|act| act.remaining > 0) {
            Some(act) => {
                let owner = Owner::Task(act.task.name);
                if act.remaining == act.task.wcet {
                    builder.open(owner, tick);
                } else {
                    builder.extend_or_open(owner, tick);
                }
                act.remaining -= 1;
                trace!(tick, task = %act.task.name, remaining = act.remaining, "dispatch");
            }
            None => builder.extend_or_open(Owner::Idle, tick),
        }
    }

    builder.finish()
}

/// Merge every run of adjacent idle intervals into one.
pub fn coalesce_idle(intervals: Vec<Interval>) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());

    for iv in intervals {
        match merged.last_mut() {
            Some(prev) if prev.owner == Owner::Idle && iv.owner == Owner::Idle => {
                prev.end = iv.end;
            }
            _ => merged.push(iv),
        }
    }

    merged
}

// ── Tests ─────────────────────────────────────────────────────────────────────
