//! Lower bounds on the makespan of a partial schedule.
//!
//! Every bound is a relaxation of the subproblem left at a decision point:
//! machine 1 is at `now`, machine 2 is busy until `machine2_free`, and each
//! unfinished job has some stage-1 work left.
//!
//! | Bound | Relaxation |
//! |-------|------------|
//! | Machine 2 | Nothing more to schedule |
//! | Johnson | Every release moved to `now`; `F2 \|\| C_max` solved exactly |
//! | Machine 1 | Machine 2 ignored except for the last job's `p2` |
//! | Critical path | Each job alone in the shop |
//!
//! # Reference
//! Ignall & Schrage (1965), "Application of the branch and bound technique
//! to some flow-shop scheduling problems"

use crate::dispatching::{johnson_sort, ReadyJob};
use crate::models::Job;

/// Subproblem snapshot handed to the bounding functions.
#[derive(Debug, Clone, Copy)]
pub struct BoundInput<'a> {
    /// All jobs of the instance.
    pub jobs: &'a [Job],
    /// Remaining stage-1 work, indexed like `jobs`.
    pub remaining: &'a [i64],
    /// Whether each job has left machine 1.
    pub finished: &'a [bool],
    /// Current machine-1 time.
    pub now: i64,
    /// Time machine 2 becomes free.
    pub machine2_free: i64,
}

impl BoundInput<'_> {
    fn unfinished(&self) -> impl Iterator<Item = (&Job, i64)> + '_ {
        self.jobs
            .iter()
            .zip(self.remaining)
            .zip(self.finished)
            .filter(|(_, &done)| !done)
            .map(|((job, &rem), _)| (job, rem))
    }
}

/// Largest of all bounds below.
pub fn lower_bound(input: &BoundInput<'_>) -> i64 {
    input
        .machine2_free
        .max(johnson_bound(input))
        .max(machine1_bound(input))
        .max(critical_path_bound(input))
}

/// Johnson makespan of the unfinished jobs with releases relaxed to `now`.
pub fn johnson_bound(input: &BoundInput<'_>) -> i64 {
    let mut ready: Vec<ReadyJob> = input
        .unfinished()
        .map(|(job, rem)| ReadyJob::new(job, rem))
        .collect();
    johnson_sort(&mut ready);

    let mut c1 = input.now;
    let mut c2 = input.machine2_free;
    for job in &ready {
        c1 += job.remaining;
        c2 = c2.max(c1) + job.p2;
    }
    c2
}

/// Preemptive single-machine bound on machine 1 plus the smallest `p2`.
///
/// Earliest-release-first is optimal for `1 | r_j, pmtn | C_max`, so the
/// last stage-1 completion is at least the ERD finish time.
pub fn machine1_bound(input: &BoundInput<'_>) -> i64 {
    let mut pending: Vec<(i64, i64, i64)> = input
        .unfinished()
        .map(|(job, rem)| (job.release, rem, job.p2))
        .collect();
    if pending.is_empty() {
        return input.machine2_free;
    }
    pending.sort_unstable();

    let mut finish = input.now;
    let mut min_p2 = i64::MAX;
    for &(release, rem, p2) in &pending {
        finish = finish.max(release) + rem;
        min_p2 = min_p2.min(p2);
    }
    finish + min_p2
}

/// Largest `max(now, release) + remaining + p2` over unfinished jobs.
pub fn critical_path_bound(input: &BoundInput<'_>) -> i64 {
    input
        .unfinished()
        .map(|(job, rem)| input.now.max(job.release) + rem + job.p2)
        .max()
        .unwrap_or(input.machine2_free)
}
