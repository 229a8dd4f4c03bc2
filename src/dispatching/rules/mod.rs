//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Two-machine**: JOHNSON, RATIO
//! - **Stage-1 length**: SPT1, LPT1
//! - **Stage-2 length**: LPT2
//! - **External**: RANDOM, LIST, SCORE
//!
//! # Tie-breaking
//! Every deterministic rule breaks ties by job id (input order).
//!
//! # References
//! - Johnson (1954), "Optimal two- and three-stage production schedules"
//! - Nawaz, Enscore & Ham (1983), "A heuristic algorithm for the m-machine,
//!   n-job flow-shop sequencing problem"

use rand::{Rng, RngCore};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::{johnson_cmp, select_min_by, DispatchRule, ReadyJob};

// ======================== Two-machine rules ========================

/// Johnson/Horn rule.
///
/// Runs the first job of Johnson's order over the ready set. Optimal for
/// `F2 || C_max`, and for the preemptive release-date variant once no
/// further arrivals are pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct Johnson;

impl DispatchRule for Johnson {
    fn name(&self) -> &'static str {
        "JOHNSON"
    }

    fn select(&self, ready: &[ReadyJob], _rng: &mut dyn RngCore) -> Option<usize> {
        select_min_by(ready, johnson_cmp)
    }

    fn description(&self) -> &'static str {
        "Johnson's two-machine rule"
    }
}

/// Smallest stage ratio.
///
/// Prefers the smallest `remaining / p2`. Jobs with `p2 == 0` sort last.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmallestStageRatio;

impl DispatchRule for SmallestStageRatio {
    fn name(&self) -> &'static str {
        "RATIO"
    }

    fn select(&self, ready: &[ReadyJob], _rng: &mut dyn RngCore) -> Option<usize> {
        select_min_by(ready, ratio_cmp)
    }

    fn description(&self) -> &'static str {
        "Smallest machine-1 to machine-2 ratio"
    }
}

fn ratio_cmp(a: &ReadyJob, b: &ReadyJob) -> Ordering {
    match (a.p2 == 0, b.p2 == 0) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        // a.remaining / a.p2 vs b.remaining / b.p2 without division
        (false, false) => {
            (i128::from(a.remaining) * i128::from(b.p2)).cmp(&(i128::from(b.remaining) * i128::from(a.p2)))
        }
    }
}

// ======================== Single-stage rules ========================

/// Shortest remaining machine-1 time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestFirstStage;

impl DispatchRule for ShortestFirstStage {
    fn name(&self) -> &'static str {
        "SPT1"
    }

    fn select(&self, ready: &[ReadyJob], _rng: &mut dyn RngCore) -> Option<usize> {
        select_min_by(ready, |a, b| a.remaining.cmp(&b.remaining))
    }

    fn description(&self) -> &'static str {
        "Shortest remaining machine-1 time"
    }
}

/// Longest remaining machine-1 time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestFirstStage;

impl DispatchRule for LongestFirstStage {
    fn name(&self) -> &'static str {
        "LPT1"
    }

    fn select(&self, ready: &[ReadyJob], _rng: &mut dyn RngCore) -> Option<usize> {
        select_min_by(ready, |a, b| b.remaining.cmp(&a.remaining))
    }

    fn description(&self) -> &'static str {
        "Longest remaining machine-1 time"
    }
}

/// Longest machine-2 time.
///
/// Keeps machine 2 fed with long work early.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestSecondStage;

impl DispatchRule for LongestSecondStage {
    fn name(&self) -> &'static str {
        "LPT2"
    }

    fn select(&self, ready: &[ReadyJob], _rng: &mut dyn RngCore) -> Option<usize> {
        select_min_by(ready, |a, b| b.p2.cmp(&a.p2))
    }

    fn description(&self) -> &'static str {
        "Longest machine-2 time"
    }
}

// ======================== External strategies ========================

/// Uniformly random choice among ready jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPick;

impl DispatchRule for RandomPick {
    fn name(&self) -> &'static str {
        "RANDOM"
    }

    fn select(&self, ready: &[ReadyJob], rng: &mut dyn RngCore) -> Option<usize> {
        if ready.is_empty() {
            return None;
        }
        Some(rng.random_range(0..ready.len()))
    }

    fn description(&self) -> &'static str {
        "Uniform random choice"
    }
}

/// Follows an externally supplied job-id priority list.
///
/// Runs the ready job that appears earliest in the list. Jobs missing from
/// the list rank after every listed job, by id. This is how a permutation
/// produced by a metaheuristic (NEH, VNS) is turned into a schedule.
#[derive(Debug, Clone, Default)]
pub struct PriorityList {
    positions: HashMap<usize, usize>,
}

impl PriorityList {
    /// Creates a rule from job ids in priority order.
    ///
    /// Later duplicates of an id are ignored.
    pub fn new(order: &[usize]) -> Self {
        let mut positions = HashMap::with_capacity(order.len());
        for (pos, &id) in order.iter().enumerate() {
            positions.entry(id).or_insert(pos);
        }
        Self { positions }
    }

    fn rank(&self, id: usize) -> usize {
        self.positions.get(&id).copied().unwrap_or(usize::MAX)
    }
}

impl DispatchRule for PriorityList {
    fn name(&self) -> &'static str {
        "LIST"
    }

    fn select(&self, ready: &[ReadyJob], _rng: &mut dyn RngCore) -> Option<usize> {
        select_min_by(ready, |a, b| self.rank(a.id).cmp(&self.rank(b.id)))
    }

    fn description(&self) -> &'static str {
        "External priority list"
    }
}

/// Adapter for a black-box priority scorer.
///
/// The closure maps a ready job to a priority; the highest priority runs.
/// NaN scores rank lowest.
pub struct PriorityScore<F>
where
    F: Fn(&ReadyJob) -> f64 + Send + Sync,
{
    score: F,
}

impl<F> PriorityScore<F>
where
    F: Fn(&ReadyJob) -> f64 + Send + Sync,
{
    /// Wraps a scoring function.
    pub fn new(score: F) -> Self {
        Self { score }
    }
}

impl<F> std::fmt::Debug for PriorityScore<F>
where
    F: Fn(&ReadyJob) -> f64 + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityScore").finish_non_exhaustive()
    }
}

impl<F> DispatchRule for PriorityScore<F>
where
    F: Fn(&ReadyJob) -> f64 + Send + Sync,
{
    fn name(&self) -> &'static str {
        "SCORE"
    }

    fn select(&self, ready: &[ReadyJob], _rng: &mut dyn RngCore) -> Option<usize> {
        let scores: Vec<f64> = ready
            .iter()
            .map(|j| {
                let s = (self.score)(j);
                if s.is_nan() {
                    f64::NEG_INFINITY
                } else {
                    s
                }
            })
            .collect();
        ready
            .iter()
            .enumerate()
            .min_by(|&(i, a), &(k, b)| {
                scores[k]
                    .partial_cmp(&scores[i])
                    .unwrap_or(Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            })
            .map(|(i, _)| i)
    }

    fn description(&self) -> &'static str {
        "Externally scored priority"
    }
}
