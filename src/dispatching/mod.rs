//! Dispatching rules for the two-machine flow shop.
//!
//! A dispatching rule answers one question at every decision point: which
//! released, unfinished job runs next on machine 1. The Johnson/Horn rule is
//! the reference; the remaining rules are comparison baselines or adapters
//! for external strategies (priority lists from metaheuristics, black-box
//! scorers).
//!
//! # Usage
//!
//! ```
//! use rand::SeedableRng;
//! use u_flowshop::dispatching::{rules, DispatchRule, ReadyJob};
//!
//! let ready = vec![
//!     ReadyJob { id: 1, release: 0, remaining: 6, p2: 2 },
//!     ReadyJob { id: 2, release: 0, remaining: 3, p2: 4 },
//! ];
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! assert_eq!(rules::Johnson.select(&ready, &mut rng), Some(1));
//! ```
//!
//! # References
//!
//! - Johnson (1954), "Optimal two- and three-stage production schedules
//!   with setup times included"
//! - Horn (1974), "Some simple scheduling algorithms"

pub mod rules;

use rand::RngCore;
use std::cmp::Ordering;
use std::fmt::Debug;

use crate::models::Job;

/// A job that is released and still has stage-1 work at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyJob {
    /// Job id.
    pub id: usize,
    /// Release date.
    pub release: i64,
    /// Remaining machine-1 work.
    pub remaining: i64,
    /// Machine-2 processing time.
    pub p2: i64,
}

impl ReadyJob {
    /// Snapshot of a job with the given remaining stage-1 work.
    pub fn new(job: &Job, remaining: i64) -> Self {
        Self {
            id: job.id,
            release: job.release,
            remaining,
            p2: job.p2,
        }
    }

    /// Johnson's first group: remaining stage-1 work not longer than stage 2.
    #[inline]
    pub fn is_first_stage_short(&self) -> bool {
        self.remaining <= self.p2
    }
}

/// Johnson's two-machine ordering law.
///
/// Jobs with `remaining <= p2` come first in ascending `remaining`; the rest
/// follow in descending `p2`. Ties fall back to job id. Every component that
/// orders jobs by Johnson's rule goes through this comparator.
pub fn johnson_cmp(a: &ReadyJob, b: &ReadyJob) -> Ordering {
    let by_group = match (a.is_first_stage_short(), b.is_first_stage_short()) {
        (true, true) => a.remaining.cmp(&b.remaining),
        (false, false) => b.p2.cmp(&a.p2),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    };
    by_group.then(a.id.cmp(&b.id))
}

/// Sorts jobs in place by [`johnson_cmp`].
pub fn johnson_sort(jobs: &mut [ReadyJob]) {
    jobs.sort_by(johnson_cmp);
}

/// A strategy that picks the next job to run on machine 1.
///
/// Implementors return an index into `ready`, or `None` only when `ready`
/// is empty. Deterministic rules ignore `rng`. External scorers (for
/// instance a fuzzy-logic priority system) plug in by implementing this
/// trait.
pub trait DispatchRule: Send + Sync + Debug {
    /// Rule name (e.g., "JOHNSON", "SPT1").
    fn name(&self) -> &'static str;

    /// Picks the next job among `ready`.
    fn select(&self, ready: &[ReadyJob], rng: &mut dyn RngCore) -> Option<usize>;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Index of the minimum under `cmp`, ties broken by job id.
pub(crate) fn select_min_by<F>(ready: &[ReadyJob], mut cmp: F) -> Option<usize>
where
    F: FnMut(&ReadyJob, &ReadyJob) -> Ordering,
{
    ready
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| cmp(a, b).then(a.id.cmp(&b.id)))
        .map(|(i, _)| i)
}
