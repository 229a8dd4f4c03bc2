//! Input and schedule validation for the two-machine flow shop.
//!
//! Input checks run before any search and detect:
//! - An empty job list
//! - Negative release dates
//! - Negative processing times
//! - Instances whose time horizon does not fit in `i64`
//!
//! Schedule checks verify a finished [`FlowShopSchedule`] against its
//! instance: release dates, machine capacity, stage precedence, and that
//! every job received exactly its processing time.
//!
//! # Reference
//! Brucker (2007), "Scheduling Algorithms", Ch. 6 (Shop Scheduling)

use crate::models::{FlowShopProblem, FlowShopSchedule, Interval, Job, MachineSchedule};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No jobs were supplied.
    EmptyJobList,
    /// A job has a negative release date.
    NegativeRelease,
    /// A job has a negative processing time on either machine.
    NegativeProcessingTime,
    /// `max(release) + sum(p1) + sum(p2)` does not fit in `i64`.
    HorizonOverflow,
    /// A job runs on machine 1 before its release date.
    StartsBeforeRelease,
    /// A job's machine-1 intervals do not add up to its `p1`.
    Stage1WorkMismatch,
    /// A job does not have exactly one machine-2 interval of length `p2`.
    Stage2Mismatch,
    /// A job starts on machine 2 before finishing on machine 1.
    StagePrecedence,
    /// Two intervals on the same machine overlap.
    MachineOverlap,
    /// The reported makespan differs from the last machine-2 completion.
    MakespanMismatch,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the jobs of a problem instance.
///
/// Checks:
/// 1. At least one job
/// 2. No negative release date
/// 3. No negative `p1` or `p2`
/// 4. `max(release) + sum(p1) + sum(p2)` fits in `i64`, so every simulated
///    time does
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_jobs(jobs: &[Job]) -> ValidationResult {
    let mut errors = Vec::new();

    if jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyJobList,
            "Job list is empty",
        ));
    }

    for job in jobs {
        if job.release < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeRelease,
                format!("Job {} has negative release {}", job.id, job.release),
            ));
        }
        if job.p1 < 0 || job.p2 < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeProcessingTime,
                format!(
                    "Job {} has negative processing time (p1={}, p2={})",
                    job.id, job.p1, job.p2
                ),
            ));
        }
    }

    if errors.is_empty() && horizon(jobs).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::HorizonOverflow,
            "Latest release plus total processing time overflows i64",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Upper bound on any time a schedule of `jobs` can reach.
fn horizon(jobs: &[Job]) -> Option<i64> {
    let latest_release = jobs.iter().map(|j| j.release).max().unwrap_or(0);
    jobs.iter()
        .try_fold(latest_release, |acc, j| acc.checked_add(j.p1)?.checked_add(j.p2))
}

/// Checks that a schedule is feasible for the given instance.
///
/// Checks:
/// 1. No machine-1 interval starts before the job's release
/// 2. Machine-1 time per job equals its `p1`
/// 3. Exactly one machine-2 interval per job, of length `p2`
/// 4. Machine-2 start is not before the job's last machine-1 end
/// 5. No two intervals overlap on the same machine
/// 6. The makespan equals the latest machine-2 end
pub fn check_schedule(problem: &FlowShopProblem, schedule: &FlowShopSchedule) -> ValidationResult {
    let mut errors = Vec::new();

    for job in problem.jobs() {
        let m1 = schedule.machine1_intervals(job.id);

        if let Some(early) = m1.iter().find(|i| i.start < job.release) {
            errors.push(ValidationError::new(
                ValidationErrorKind::StartsBeforeRelease,
                format!(
                    "Job {} starts at {} before its release {}",
                    job.id, early.start, job.release
                ),
            ));
        }

        let worked: i64 = m1.iter().map(Interval::duration).sum();
        if worked != job.p1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::Stage1WorkMismatch,
                format!(
                    "Job {} received {} units on machine 1, expected {}",
                    job.id, worked, job.p1
                ),
            ));
        }

        let m2 = schedule.machine2.get(&job.id).map(Vec::as_slice).unwrap_or(&[]);
        match m2 {
            [single] if single.duration() == job.p2 => {
                let stage1_end = m1.iter().map(|i| i.end).max().unwrap_or(job.release);
                if single.start < stage1_end {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::StagePrecedence,
                        format!(
                            "Job {} starts on machine 2 at {} before finishing machine 1 at {}",
                            job.id, single.start, stage1_end
                        ),
                    ));
                }
            }
            _ => errors.push(ValidationError::new(
                ValidationErrorKind::Stage2Mismatch,
                format!(
                    "Job {} has {} machine-2 intervals, expected one of length {}",
                    job.id,
                    m2.len(),
                    job.p2
                ),
            )),
        }
    }

    for (label, machine) in [("1", &schedule.machine1), ("2", &schedule.machine2)] {
        if let Some((a, b)) = find_overlap(machine) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MachineOverlap,
                format!("Jobs {a} and {b} overlap on machine {label}"),
            ));
        }
    }

    let last_end = schedule
        .machine2
        .values()
        .flat_map(|v| v.iter())
        .map(|i| i.end)
        .max()
        .unwrap_or(0);
    if last_end != schedule.makespan {
        errors.push(ValidationError::new(
            ValidationErrorKind::MakespanMismatch,
            format!(
                "Reported makespan {} differs from last machine-2 end {}",
                schedule.makespan, last_end
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Sweeps the machine's intervals in start order and returns the first
/// overlapping pair of job ids.
fn find_overlap(machine: &MachineSchedule) -> Option<(usize, usize)> {
    let mut all: Vec<(Interval, usize)> = machine
        .iter()
        .flat_map(|(&id, v)| v.iter().map(move |&i| (i, id)))
        .filter(|(i, _)| i.duration() > 0)
        .collect();
    all.sort_by_key(|&(i, id)| (i.start, i.end, id));

    all.windows(2)
        .find(|w| w[0].0.overlaps(&w[1].0))
        .map(|w| (w[0].1, w[1].1))
}
