//! Schedule (solution) model.
//!
//! A flow-shop schedule records, per job, the intervals it occupied on each
//! machine, along with the machine-1 execution order and the makespan.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A closed processing interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// Start time.
    pub start: i64,
    /// End time.
    pub end: i64,
}

impl Interval {
    /// Creates a new interval.
    pub fn new(start: i64, end: i64) -> Self {
        debug_assert!(end >= start, "interval end {end} precedes start {start}");
        Self { start, end }
    }

    /// Length of the interval.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Whether the two intervals share more than an endpoint.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Per-job interval lists for one machine, keyed by job id ascending.
pub type MachineSchedule = BTreeMap<usize, Vec<Interval>>;

/// A complete two-machine schedule.
///
/// Machine 2 holds exactly one interval per job; machine 1 may hold several
/// when a job was preempted and resumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowShopSchedule {
    /// Job ids in machine-1 execution order. An id repeats once per resumption.
    pub order: Vec<usize>,
    /// Machine-1 intervals per job, chronological.
    pub machine1: MachineSchedule,
    /// Machine-2 intervals per job, chronological.
    pub machine2: MachineSchedule,
    /// Completion time of the last machine-2 interval.
    pub makespan: i64,
}

impl FlowShopSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a machine-1 interval for a job.
    pub fn add_machine1(&mut self, job_id: usize, interval: Interval) {
        self.order.push(job_id);
        self.machine1.entry(job_id).or_default().push(interval);
    }

    /// Appends a machine-2 interval for a job and extends the makespan.
    pub fn add_machine2(&mut self, job_id: usize, interval: Interval) {
        self.machine2.entry(job_id).or_default().push(interval);
        self.makespan = self.makespan.max(interval.end);
    }

    /// Machine-1 intervals of a job.
    pub fn machine1_intervals(&self, job_id: usize) -> &[Interval] {
        self.machine1.get(&job_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Machine-2 interval of a job, if it has been handed off.
    pub fn machine2_interval(&self, job_id: usize) -> Option<Interval> {
        self.machine2.get(&job_id).and_then(|v| v.first()).copied()
    }

    /// Time the job finished on machine 1.
    pub fn stage1_completion(&self, job_id: usize) -> Option<i64> {
        self.machine1_intervals(job_id).iter().map(|i| i.end).max()
    }

    /// Time the job finished on machine 2.
    pub fn completion_time(&self, job_id: usize) -> Option<i64> {
        self.machine2_interval(job_id).map(|i| i.end)
    }

    /// Machine-2 intervals sorted by start time, paired with their job ids.
    pub fn machine2_sequence(&self) -> Vec<(usize, Interval)> {
        let mut seq: Vec<(usize, Interval)> = self
            .machine2
            .iter()
            .flat_map(|(&id, v)| v.iter().map(move |&i| (id, i)))
            .collect();
        seq.sort_by_key(|&(id, i)| (i.start, id));
        seq
    }

    /// Number of machine-1 intervals beyond one per job.
    pub fn preemption_count(&self) -> usize {
        self.machine1
            .values()
            .map(|v| v.len().saturating_sub(1))
            .sum()
    }

    /// Busy time on machine 1.
    pub fn machine1_busy(&self) -> i64 {
        busy_time(&self.machine1)
    }

    /// Busy time on machine 2.
    pub fn machine2_busy(&self) -> i64 {
        busy_time(&self.machine2)
    }

    /// Number of jobs with a machine-2 interval.
    pub fn job_count(&self) -> usize {
        self.machine2.len()
    }
}

fn busy_time(machine: &MachineSchedule) -> i64 {
    machine
        .values()
        .flat_map(|v| v.iter())
        .map(Interval::duration)
        .sum()
}
