//! Horn-style list scheduler for `F2 | r_j, pmtn | C_max`.
//!
//! # Algorithm
//!
//! 1. Start machine 1 at the earliest release.
//! 2. Collect the ready set (released jobs with stage-1 work left). If it is
//!    empty, idle until the next release.
//! 3. Let the dispatching rule pick a job and run it until it finishes
//!    stage 1 or the next job arrives, whichever is first.
//! 4. Finished jobs queue on machine 2 in completion order.
//!
//! With the Johnson rule this is the classic heuristic relaxation of the
//! problem: exact once every job is released, fast, and a strong initial
//! bound for the branch-and-bound search.
//!
//! # Complexity
//! O(k · n) rule evaluations, where k ≤ n + (distinct releases) is the
//! number of machine-1 slices.
//!
//! # Reference
//! Horn (1974), "Some simple scheduling algorithms", Naval Research
//! Logistics Quarterly 21(1)

use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use crate::dispatching::rules::Johnson;
use crate::dispatching::{DispatchRule, ReadyJob};
use crate::models::{FlowShopProblem, FlowShopSchedule};
use crate::timeline::{schedule_from_trace, ReleaseCalendar, Timeline, TraceEntry};

/// Event-driven list scheduler parameterized by a dispatching rule.
///
/// # Example
///
/// ```
/// use u_flowshop::models::FlowShopProblem;
/// use u_flowshop::scheduler::HornScheduler;
///
/// let problem = FlowShopProblem::from_triples(&[(2, 3, 4), (3, 4, 2), (5, 6, 7)]).unwrap();
/// let schedule = HornScheduler::new().schedule(&problem);
/// assert_eq!(schedule.makespan, 20);
/// ```
#[derive(Debug, Clone)]
pub struct HornScheduler {
    rule: Arc<dyn DispatchRule>,
    seed: u64,
}

impl HornScheduler {
    /// Creates a scheduler using Johnson's rule.
    pub fn new() -> Self {
        Self {
            rule: Arc::new(Johnson),
            seed: 42,
        }
    }

    /// Replaces the dispatching rule.
    pub fn with_rule<R: DispatchRule + 'static>(mut self, rule: R) -> Self {
        self.rule = Arc::new(rule);
        self
    }

    /// Sets the seed handed to randomized rules.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Name of the active rule.
    pub fn rule_name(&self) -> &'static str {
        self.rule.name()
    }

    /// Builds a complete schedule.
    pub fn schedule(&self, problem: &FlowShopProblem) -> FlowShopSchedule {
        schedule_from_trace(&self.trace(problem))
    }

    /// Simulates the schedule and returns its machine-1 slices in order.
    ///
    /// An out-of-range pick from the rule falls back to the first ready job.
    pub fn trace(&self, problem: &FlowShopProblem) -> Vec<TraceEntry> {
        let jobs = problem.jobs();
        let calendar = ReleaseCalendar::new(jobs);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut remaining: Vec<i64> = jobs.iter().map(|j| j.p1).collect();
        let mut finished = vec![false; jobs.len()];
        let mut unfinished = jobs.len();
        let mut timeline = Timeline::starting_at(problem.earliest_release());
        let mut trace = Vec::with_capacity(jobs.len() * 2);

        while unfinished > 0 {
            let now = timeline.machine1_time();
            let ready: Vec<ReadyJob> = jobs
                .iter()
                .filter(|j| !finished[j.id - 1] && j.release <= now)
                .map(|j| ReadyJob::new(j, remaining[j.id - 1]))
                .collect();
            let next_arrival = calendar.next_after(now);

            if ready.is_empty() {
                match next_arrival {
                    Some(t) => {
                        timeline.idle_until(t);
                        continue;
                    }
                    None => break,
                }
            }

            let pick = match self.rule.select(&ready, &mut rng) {
                Some(i) if i < ready.len() => i,
                other => {
                    warn!(
                        "rule {} returned {:?} for {} ready jobs; using the first",
                        self.rule.name(),
                        other,
                        ready.len()
                    );
                    0
                }
            };

            let idx = ready[pick].id - 1;
            let entry = timeline.run(&jobs[idx], &mut remaining[idx], next_arrival);
            if entry.completes_stage1() {
                finished[idx] = true;
                unfinished -= 1;
            }
            trace.push(entry);
        }

        trace
    }
}

impl Default for HornScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules::{
        LongestFirstStage, LongestSecondStage, PriorityList, RandomPick, ShortestFirstStage,
        SmallestStageRatio,
    };
    use crate::models::Interval;
    use crate::validation::check_schedule;

    fn scenario_a() -> FlowShopProblem {
        FlowShopProblem::from_triples(&[(2, 3, 4), (3, 4, 2), (5, 6, 7)]).unwrap()
    }

    fn scenario_b() -> FlowShopProblem {
        FlowShopProblem::from_triples(&[
            (1, 2, 3),
            (2, 3, 4),
            (6, 3, 4),
            (7, 8, 2),
            (10, 1, 2),
            (12, 3, 4),
        ])
        .unwrap()
    }

    fn iv(start: i64, end: i64) -> Interval {
        Interval::new(start, end)
    }

    #[test]
    fn test_johnson_scenario_a_timetable() {
        let s = HornScheduler::new().schedule(&scenario_a());

        assert_eq!(s.machine1_intervals(1), &[iv(2, 3), iv(3, 5)]);
        assert_eq!(s.machine1_intervals(2), &[iv(11, 15)]);
        assert_eq!(s.machine1_intervals(3), &[iv(5, 11)]);
        assert_eq!(s.machine2_interval(1), Some(iv(5, 9)));
        assert_eq!(s.machine2_interval(2), Some(iv(18, 20)));
        assert_eq!(s.machine2_interval(3), Some(iv(11, 18)));
        assert_eq!(s.order, vec![1, 1, 3, 2]);
        assert_eq!(s.makespan, 20);
    }

    #[test]
    fn test_johnson_scenario_b_timetable() {
        let s = HornScheduler::new().schedule(&scenario_b());

        assert_eq!(s.machine1_intervals(1), &[iv(1, 2), iv(2, 3)]);
        assert_eq!(s.machine1_intervals(2), &[iv(3, 6)]);
        assert_eq!(s.machine1_intervals(3), &[iv(6, 7), iv(7, 9)]);
        assert_eq!(s.machine1_intervals(4), &[iv(9, 10), iv(11, 12), iv(15, 21)]);
        assert_eq!(s.machine1_intervals(5), &[iv(10, 11)]);
        assert_eq!(s.machine1_intervals(6), &[iv(12, 15)]);
        assert_eq!(s.machine2_interval(1), Some(iv(3, 6)));
        assert_eq!(s.machine2_interval(2), Some(iv(6, 10)));
        assert_eq!(s.machine2_interval(3), Some(iv(10, 14)));
        assert_eq!(s.machine2_interval(4), Some(iv(21, 23)));
        assert_eq!(s.machine2_interval(5), Some(iv(14, 16)));
        assert_eq!(s.machine2_interval(6), Some(iv(16, 20)));
        assert_eq!(s.makespan, 23);
    }

    #[test]
    fn test_every_rule_yields_feasible_schedule() {
        let problem = scenario_b();
        let schedulers = vec![
            HornScheduler::new(),
            HornScheduler::new().with_rule(ShortestFirstStage),
            HornScheduler::new().with_rule(LongestFirstStage),
            HornScheduler::new().with_rule(LongestSecondStage),
            HornScheduler::new().with_rule(SmallestStageRatio),
            HornScheduler::new().with_rule(RandomPick).with_seed(3),
            HornScheduler::new().with_rule(PriorityList::new(&[6, 5, 4, 3, 2, 1])),
        ];
        for scheduler in schedulers {
            let s = scheduler.schedule(&problem);
            assert!(
                check_schedule(&problem, &s).is_ok(),
                "{} produced an infeasible schedule",
                scheduler.rule_name()
            );
            assert!(s.makespan >= 23, "{} beat the optimum", scheduler.rule_name());
        }
    }

    #[test]
    fn test_random_rule_is_reproducible() {
        let problem = scenario_b();
        let a = HornScheduler::new().with_rule(RandomPick).with_seed(11).schedule(&problem);
        let b = HornScheduler::new().with_rule(RandomPick).with_seed(11).schedule(&problem);
        assert_eq!(a, b);
    }

    #[test]
    fn test_idles_between_releases() {
        let problem = FlowShopProblem::from_triples(&[(0, 1, 1), (10, 2, 3)]).unwrap();
        let s = HornScheduler::new().schedule(&problem);
        assert_eq!(s.machine1_intervals(2), &[iv(10, 12)]);
        assert_eq!(s.makespan, 15);
    }

    #[test]
    fn test_single_job() {
        let problem = FlowShopProblem::from_triples(&[(4, 3, 5)]).unwrap();
        let s = HornScheduler::new().schedule(&problem);
        assert_eq!(s.makespan, 12);
        assert_eq!(s.order, vec![1]);
    }

    #[test]
    fn test_zero_length_jobs() {
        let problem = FlowShopProblem::from_triples(&[(0, 0, 0), (0, 2, 0), (1, 0, 4)]).unwrap();
        let s = HornScheduler::new().schedule(&problem);
        assert!(check_schedule(&problem, &s).is_ok());
        assert_eq!(s.job_count(), 3);
    }

    #[derive(Debug)]
    struct OutOfRange;

    impl DispatchRule for OutOfRange {
        fn name(&self) -> &'static str {
            "BROKEN"
        }

        fn select(&self, _ready: &[ReadyJob], _rng: &mut dyn rand::RngCore) -> Option<usize> {
            Some(usize::MAX)
        }
    }

    #[test]
    fn test_out_of_range_rule_falls_back() {
        let problem = scenario_a();
        let s = HornScheduler::new().with_rule(OutOfRange).schedule(&problem);
        assert!(check_schedule(&problem, &s).is_ok());
    }
}
