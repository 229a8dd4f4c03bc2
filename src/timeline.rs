//! Two-machine timeline simulator.
//!
//! Advances the machine-1 clock by running one selected job either to the
//! end of its stage-1 work or until the next job arrives, whichever comes
//! first. A job that finishes stage 1 is handed to machine 2 immediately and
//! queued behind whatever machine 2 is already processing.
//!
//! The same simulator drives the Horn heuristic and every branch-and-bound
//! node, so both produce timetables under identical rules.

use crate::models::{FlowShopSchedule, Interval, Job};

/// One executed stage-1 slice and, if it finished the job, its stage-2 slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    /// Job that ran.
    pub job_id: usize,
    /// Interval on machine 1.
    pub machine1: Interval,
    /// Interval on machine 2, present when stage 1 completed.
    pub machine2: Option<Interval>,
}

impl TraceEntry {
    /// Whether this slice completed the job's stage-1 work.
    pub fn completes_stage1(&self) -> bool {
        self.machine2.is_some()
    }

    /// Appends this entry's intervals to a schedule.
    pub fn record_into(&self, schedule: &mut FlowShopSchedule) {
        schedule.add_machine1(self.job_id, self.machine1);
        if let Some(m2) = self.machine2 {
            schedule.add_machine2(self.job_id, m2);
        }
    }
}

/// Builds a schedule by replaying trace entries in order.
pub fn schedule_from_trace(entries: &[TraceEntry]) -> FlowShopSchedule {
    let mut schedule = FlowShopSchedule::new();
    for entry in entries {
        entry.record_into(&mut schedule);
    }
    schedule
}

/// Distinct release dates of an instance, ascending.
///
/// Answers "when does the next job arrive after `t`" for the simulator's
/// preemption points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCalendar {
    releases: Vec<i64>,
}

impl ReleaseCalendar {
    /// Collects the release dates of `jobs`.
    pub fn new(jobs: &[Job]) -> Self {
        let mut releases: Vec<i64> = jobs.iter().map(|j| j.release).collect();
        releases.sort_unstable();
        releases.dedup();
        Self { releases }
    }

    /// Earliest release strictly after `time`.
    pub fn next_after(&self, time: i64) -> Option<i64> {
        let idx = self.releases.partition_point(|&r| r <= time);
        self.releases.get(idx).copied()
    }
}

/// Machine clocks for one simulated path.
///
/// `machine1` is the current decision time; `machine2` is the time machine 2
/// becomes free. Both are non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timeline {
    machine1: i64,
    machine2: i64,
}

impl Timeline {
    /// Creates a timeline with machine 1 at `start` and machine 2 free.
    pub fn starting_at(start: i64) -> Self {
        Self {
            machine1: start,
            machine2: 0,
        }
    }

    /// Current machine-1 time.
    #[inline]
    pub fn machine1_time(&self) -> i64 {
        self.machine1
    }

    /// Time at which machine 2 becomes free.
    #[inline]
    pub fn machine2_free(&self) -> i64 {
        self.machine2
    }

    /// Lets machine 1 idle until `time` (no-op if already past it).
    pub fn idle_until(&mut self, time: i64) {
        self.machine1 = self.machine1.max(time);
    }

    /// Runs `job` on machine 1 from the current time.
    ///
    /// The slice length is `min(remaining, next_arrival - now)`; with no
    /// pending arrival the job runs to completion. `remaining` is reduced by
    /// the slice length. When it reaches zero the job is queued on machine 2
    /// at `max(stage-1 end, machine-2 free time)`.
    pub fn run(&mut self, job: &Job, remaining: &mut i64, next_arrival: Option<i64>) -> TraceEntry {
        let start = self.machine1;
        let length = match next_arrival {
            Some(arrival) => {
                debug_assert!(arrival > start, "next arrival {arrival} not after {start}");
                (*remaining).min(arrival - start)
            }
            None => *remaining,
        };

        let end = start + length;
        *remaining -= length;
        self.machine1 = end;

        let machine2 = (*remaining == 0).then(|| self.hand_off(job, end));

        TraceEntry {
            job_id: job.id,
            machine1: Interval::new(start, end),
            machine2,
        }
    }

    /// Runs `job` to the end of its stage-1 work, ignoring arrivals.
    pub fn run_to_completion(&mut self, job: &Job, remaining: &mut i64) -> TraceEntry {
        self.run(job, remaining, None)
    }

    fn hand_off(&mut self, job: &Job, stage1_end: i64) -> Interval {
        let start = stage1_end.max(self.machine2);
        let end = start + job.p2;
        self.machine2 = end;
        Interval::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_to_completion_hands_off() {
        let job = Job::new(1, 2, 3, 4);
        let mut remaining = job.p1;
        let mut tl = Timeline::starting_at(2);

        let entry = tl.run(&job, &mut remaining, None);

        assert_eq!(entry.machine1, Interval::new(2, 5));
        assert_eq!(entry.machine2, Some(Interval::new(5, 9)));
        assert!(entry.completes_stage1());
        assert_eq!(remaining, 0);
        assert_eq!(tl.machine1_time(), 5);
        assert_eq!(tl.machine2_free(), 9);
    }

    #[test]
    fn test_arrival_preempts() {
        let job = Job::new(1, 2, 3, 4);
        let mut remaining = job.p1;
        let mut tl = Timeline::starting_at(2);

        let entry = tl.run(&job, &mut remaining, Some(3));

        assert_eq!(entry.machine1, Interval::new(2, 3));
        assert_eq!(entry.machine2, None);
        assert_eq!(remaining, 2);
        assert_eq!(tl.machine1_time(), 3);
        assert_eq!(tl.machine2_free(), 0);
    }

    #[test]
    fn test_arrival_exactly_at_completion_finishes() {
        let job = Job::new(1, 0, 3, 1);
        let mut remaining = job.p1;
        let mut tl = Timeline::starting_at(0);

        let entry = tl.run(&job, &mut remaining, Some(3));

        assert!(entry.completes_stage1());
        assert_eq!(entry.machine2, Some(Interval::new(3, 4)));
    }

    #[test]
    fn test_machine2_queues_behind_busy_machine() {
        let long = Job::new(1, 0, 1, 10);
        let short = Job::new(2, 0, 1, 2);
        let mut tl = Timeline::starting_at(0);

        let mut r1 = long.p1;
        tl.run_to_completion(&long, &mut r1);
        let mut r2 = short.p1;
        let entry = tl.run_to_completion(&short, &mut r2);

        assert_eq!(entry.machine1, Interval::new(1, 2));
        assert_eq!(entry.machine2, Some(Interval::new(11, 13)));
    }

    #[test]
    fn test_machine2_waits_for_stage1() {
        let job = Job::new(1, 0, 5, 1);
        let mut tl = Timeline::starting_at(0);
        let mut remaining = 5;

        let entry = tl.run_to_completion(&job, &mut remaining);

        assert_eq!(entry.machine2, Some(Interval::new(5, 6)));
    }

    #[test]
    fn test_zero_stage1_work_hands_off_immediately() {
        let job = Job::new(1, 4, 0, 3);
        let mut tl = Timeline::starting_at(4);
        let mut remaining = 0;

        let entry = tl.run(&job, &mut remaining, Some(9));

        assert_eq!(entry.machine1, Interval::new(4, 4));
        assert_eq!(entry.machine2, Some(Interval::new(4, 7)));
    }

    #[test]
    fn test_release_calendar() {
        let jobs = vec![
            Job::new(1, 5, 1, 1),
            Job::new(2, 2, 1, 1),
            Job::new(3, 5, 1, 1),
            Job::new(4, 9, 1, 1),
        ];
        let cal = ReleaseCalendar::new(&jobs);
        assert_eq!(cal.next_after(0), Some(2));
        assert_eq!(cal.next_after(2), Some(5));
        assert_eq!(cal.next_after(6), Some(9));
        assert_eq!(cal.next_after(9), None);
    }

    #[test]
    fn test_schedule_from_trace() {
        let job = Job::new(1, 0, 3, 2);
        let mut tl = Timeline::starting_at(0);
        let mut remaining = job.p1;
        let first = tl.run(&job, &mut remaining, Some(1));
        let second = tl.run_to_completion(&job, &mut remaining);

        let schedule = schedule_from_trace(&[first, second]);

        assert_eq!(schedule.order, vec![1, 1]);
        assert_eq!(
            schedule.machine1_intervals(1),
            &[Interval::new(0, 1), Interval::new(1, 3)]
        );
        assert_eq!(schedule.machine2_interval(1), Some(Interval::new(3, 5)));
        assert_eq!(schedule.makespan, 5);
    }

    #[test]
    fn test_idle_until_never_rewinds() {
        let mut tl = Timeline::starting_at(5);
        tl.idle_until(3);
        assert_eq!(tl.machine1_time(), 5);
        tl.idle_until(8);
        assert_eq!(tl.machine1_time(), 8);
    }
}
