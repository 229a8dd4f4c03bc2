//! Job and problem-instance models.
//!
//! A job visits machine 1, then machine 2. Stage-1 processing may be
//! preempted; stage-2 processing may not.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 6

use serde::{Deserialize, Serialize};

use crate::error::{FlowShopError, FlowShopResult};
use crate::validation::validate_jobs;

/// A job in the two-machine flow shop.
///
/// # Time Representation
/// All times are integers in abstract units relative to t=0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Job {
    /// 1-based position in the input.
    pub id: usize,
    /// Earliest time the job may start on machine 1.
    pub release: i64,
    /// Processing time on machine 1.
    pub p1: i64,
    /// Processing time on machine 2.
    pub p2: i64,
}

impl Job {
    /// Creates a new job.
    pub fn new(id: usize, release: i64, p1: i64, p2: i64) -> Self {
        Self {
            id,
            release,
            p1,
            p2,
        }
    }
}

/// A validated `F2 | r_j, pmtn | C_max` instance.
///
/// Job ids equal their 1-based input position and index the job list as
/// `jobs[id - 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Job>", into = "Vec<Job>")]
pub struct FlowShopProblem {
    jobs: Vec<Job>,
}

impl TryFrom<Vec<Job>> for FlowShopProblem {
    type Error = FlowShopError;

    fn try_from(jobs: Vec<Job>) -> FlowShopResult<Self> {
        Self::new(jobs)
    }
}

impl From<FlowShopProblem> for Vec<Job> {
    fn from(problem: FlowShopProblem) -> Self {
        problem.jobs
    }
}

impl FlowShopProblem {
    /// Builds an instance from `(release, p1, p2)` triples.
    ///
    /// # Errors
    /// [`FlowShopError::InvalidInput`] if the list is empty or any time is
    /// negative.
    pub fn from_triples(triples: &[(i64, i64, i64)]) -> FlowShopResult<Self> {
        let jobs = triples
            .iter()
            .enumerate()
            .map(|(i, &(release, p1, p2))| Job::new(i + 1, release, p1, p2))
            .collect();
        Self::new(jobs)
    }

    /// Builds an instance from jobs, renumbering ids by position.
    ///
    /// # Errors
    /// [`FlowShopError::InvalidInput`] if the list is empty or any time is
    /// negative.
    pub fn new(jobs: Vec<Job>) -> FlowShopResult<Self> {
        let jobs: Vec<Job> = jobs
            .into_iter()
            .enumerate()
            .map(|(i, job)| Job { id: i + 1, ..job })
            .collect();
        validate_jobs(&jobs).map_err(FlowShopError::InvalidInput)?;
        Ok(Self { jobs })
    }

    /// All jobs in input order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Looks up a job by its 1-based id.
    pub fn job(&self, id: usize) -> Option<&Job> {
        id.checked_sub(1).and_then(|i| self.jobs.get(i))
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Always `false` for a validated instance.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Earliest release date.
    pub fn earliest_release(&self) -> i64 {
        self.jobs.iter().map(|j| j.release).min().unwrap_or(0)
    }

}
