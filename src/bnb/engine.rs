//! Depth-first branch-and-bound search.
//!
//! # Search tree
//!
//! A node is a partial schedule plus the job chosen to run next on
//! machine 1. Entering a node runs that job until it finishes stage 1 or
//! the next job arrives. The node's children are every job ready at the
//! following decision point, explored in Johnson order.
//!
//! Once no arrivals are pending the rest of the problem is `F2 || C_max`
//! with machine 2 busy until a known time, which Johnson's rule solves
//! exactly. With `johnson_closure` enabled the path is completed in Johnson
//! order as one leaf.
//!
//! # Complexity
//! Exponential in the worst case. Bounded by the time limit, node limit and
//! cancellation token, all checked on node entry.
//!
//! # Reference
//! Brucker (2007), "Scheduling Algorithms", Ch. 6.2 (Flow Shop Problems)

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::bound::{lower_bound, BoundInput};
use super::cancel::CancellationToken;
use super::config::BnbConfig;
use super::incumbent::Incumbent;
use super::path::PathTrace;
use super::reconstruct::reconstruct;
use crate::dispatching::{johnson_cmp, ReadyJob};
use crate::error::{FlowShopError, FlowShopResult};
use crate::models::{FlowShopProblem, FlowShopSchedule, Job};
use crate::scheduler::HornScheduler;
use crate::timeline::{ReleaseCalendar, Timeline};

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    /// The tree was exhausted; the schedule is optimal.
    Optimal,
    /// The time limit expired.
    TimedOut,
    /// The cancellation token was triggered.
    Cancelled,
    /// The node limit was reached.
    NodeLimit,
}

impl SearchStatus {
    /// Whether the returned schedule is proven optimal.
    pub fn is_proven_optimal(&self) -> bool {
        matches!(self, SearchStatus::Optimal)
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes entered, root included.
    pub nodes_explored: u64,
    /// Nodes discarded by the lower bound.
    pub nodes_pruned: u64,
    /// Complete schedules evaluated.
    pub leaves_evaluated: u64,
    /// Times the incumbent was replaced during the search.
    pub improvements: u64,
    /// Wall-clock time of the run.
    pub elapsed_ms: u64,
}

/// Outcome of [`BranchAndBound::solve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BnbResult {
    /// Best schedule found.
    pub schedule: FlowShopSchedule,
    /// Why the search stopped.
    pub status: SearchStatus,
    /// Search counters.
    pub stats: SearchStats,
}

impl BnbResult {
    /// Makespan of the returned schedule.
    pub fn makespan(&self) -> i64 {
        self.schedule.makespan
    }

    /// Whether the schedule is proven optimal.
    pub fn is_optimal(&self) -> bool {
        self.status.is_proven_optimal()
    }
}

/// Exact solver for `F2 | r_j, pmtn | C_max`.
///
/// # Example
///
/// ```
/// use u_flowshop::bnb::{BnbConfig, BranchAndBound};
/// use u_flowshop::models::FlowShopProblem;
///
/// let problem = FlowShopProblem::from_triples(&[(2, 3, 4), (3, 4, 2), (5, 6, 7)]).unwrap();
/// let result = BranchAndBound::new(BnbConfig::default()).solve(&problem).unwrap();
/// assert_eq!(result.makespan(), 20);
/// assert!(result.is_optimal());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    config: BnbConfig,
    cancel: Option<CancellationToken>,
}

impl BranchAndBound {
    /// Creates a solver with the given configuration.
    pub fn new(config: BnbConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &BnbConfig {
        &self.config
    }

    /// Searches for a minimum-makespan schedule.
    ///
    /// # Errors
    /// - [`FlowShopError::InvalidConfig`] if the configuration is invalid.
    /// - [`FlowShopError::NoIncumbent`] if the search stops before any
    ///   complete schedule was found (only possible without warm start).
    /// - [`FlowShopError::InconsistentTrace`] if the recorded trace cannot
    ///   be turned back into a schedule.
    pub fn solve(&self, problem: &FlowShopProblem) -> FlowShopResult<BnbResult> {
        self.config.validate()?;
        let start = Instant::now();
        let deadline = self
            .config
            .time_limit_ms
            .and_then(|ms| start.checked_add(Duration::from_millis(ms)));
        self.solve_until(problem, start, deadline)
    }

    fn solve_until(
        &self,
        problem: &FlowShopProblem,
        start: Instant,
        deadline: Option<Instant>,
    ) -> FlowShopResult<BnbResult> {
        let mut search = Search::new(problem.jobs(), &self.config, self.cancel.as_ref(), deadline);
        if self.config.warm_start {
            let warm = HornScheduler::new().trace(problem);
            let makespan = warm
                .iter()
                .filter_map(|e| e.machine2)
                .map(|i| i.end)
                .max()
                .unwrap_or(0);
            search.incumbent.offer(makespan, || warm);
            debug!("warm start makespan {makespan}");
        }

        let root = NodeState::root(problem);
        let status = search.run(root);
        search.stats.elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            "search finished: {:?}, makespan {:?}, {} nodes, {} pruned, {} leaves, {} ms",
            status,
            search.incumbent.makespan(),
            search.stats.nodes_explored,
            search.stats.nodes_pruned,
            search.stats.leaves_evaluated,
            search.stats.elapsed_ms
        );

        if search.incumbent.is_empty() {
            return Err(FlowShopError::NoIncumbent);
        }
        let markers = search.incumbent.markers();
        let schedule = reconstruct(&markers.order, &markers.machine1, &markers.machine2)?;

        Ok(BnbResult {
            schedule,
            status,
            stats: search.stats,
        })
    }
}

/// Per-path simulation state. Each child owns its own copy.
#[derive(Debug, Clone)]
struct NodeState {
    timeline: Timeline,
    remaining: Vec<i64>,
    finished: Vec<bool>,
    unfinished: usize,
    trace: PathTrace,
}

impl NodeState {
    fn root(problem: &FlowShopProblem) -> Self {
        let jobs = problem.jobs();
        Self {
            timeline: Timeline::starting_at(problem.earliest_release()),
            remaining: jobs.iter().map(|j| j.p1).collect(),
            finished: vec![false; jobs.len()],
            unfinished: jobs.len(),
            trace: PathTrace::new(),
        }
    }

    fn run(&mut self, job: &Job, next_arrival: Option<i64>) {
        let idx = job.id - 1;
        let entry = self.timeline.run(job, &mut self.remaining[idx], next_arrival);
        if entry.completes_stage1() {
            self.finished[idx] = true;
            self.unfinished -= 1;
        }
        self.trace = self.trace.push(entry);
    }

    fn is_complete(&self) -> bool {
        self.unfinished == 0
    }

    fn makespan(&self) -> i64 {
        self.timeline.machine2_free()
    }
}

/// One run of the search: shared inputs, incumbent and counters.
struct Search<'a> {
    jobs: &'a [Job],
    calendar: ReleaseCalendar,
    config: &'a BnbConfig,
    cancel: Option<&'a CancellationToken>,
    deadline: Option<Instant>,
    incumbent: Incumbent,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    fn new(
        jobs: &'a [Job],
        config: &'a BnbConfig,
        cancel: Option<&'a CancellationToken>,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            jobs,
            calendar: ReleaseCalendar::new(jobs),
            config,
            cancel,
            deadline,
            incumbent: Incumbent::new(),
            stats: SearchStats::default(),
        }
    }

    fn run(&mut self, root: NodeState) -> SearchStatus {
        if let Some(status) = self.enter() {
            return status;
        }

        let mut stack: Vec<(NodeState, usize)> = Vec::new();
        self.expand(root, &mut stack);

        while let Some((mut state, idx)) = stack.pop() {
            if let Some(status) = self.enter() {
                return status;
            }

            let next_arrival = self.calendar.next_after(state.timeline.machine1_time());
            state.run(&self.jobs[idx], next_arrival);

            if state.is_complete() {
                self.leaf(&state);
                continue;
            }

            let bound = lower_bound(&BoundInput {
                jobs: self.jobs,
                remaining: &state.remaining,
                finished: &state.finished,
                now: state.timeline.machine1_time(),
                machine2_free: state.timeline.machine2_free(),
            });
            if self.incumbent.dominates(bound) {
                self.stats.nodes_pruned += 1;
                trace!(
                    "pruned at depth {}: bound {} >= {:?}",
                    state.trace.len(),
                    bound,
                    self.incumbent.makespan()
                );
                continue;
            }

            self.expand(state, &mut stack);
        }

        SearchStatus::Optimal
    }

    /// Node-entry check of the stop conditions; counts the node otherwise.
    fn enter(&mut self) -> Option<SearchStatus> {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            return Some(SearchStatus::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(SearchStatus::TimedOut);
        }
        if self
            .config
            .node_limit
            .is_some_and(|limit| self.stats.nodes_explored >= limit)
        {
            return Some(SearchStatus::NodeLimit);
        }
        self.stats.nodes_explored += 1;
        None
    }

    /// Pushes the children of `state`, or closes the path when no arrivals
    /// are pending.
    fn expand(&mut self, mut state: NodeState, stack: &mut Vec<(NodeState, usize)>) {
        let mut ready = self.ready_set(&state);
        if ready.is_empty() {
            let now = state.timeline.machine1_time();
            match self.calendar.next_after(now) {
                Some(t) => state.timeline.idle_until(t),
                None => return,
            }
            ready = self.ready_set(&state);
        }
        ready.sort_by(johnson_cmp);

        let now = state.timeline.machine1_time();
        if self.config.johnson_closure && self.calendar.next_after(now).is_none() {
            for job in &ready {
                state.run(&self.jobs[job.id - 1], None);
            }
            self.leaf(&state);
            return;
        }

        // Last pushed is explored first.
        let Some((first, rest)) = ready.split_first() else {
            return;
        };
        for job in rest.iter().rev() {
            stack.push((state.clone(), job.id - 1));
        }
        stack.push((state, first.id - 1));
    }

    fn ready_set(&self, state: &NodeState) -> Vec<ReadyJob> {
        let now = state.timeline.machine1_time();
        self.jobs
            .iter()
            .filter(|j| !state.finished[j.id - 1] && j.release <= now)
            .map(|j| ReadyJob::new(j, state.remaining[j.id - 1]))
            .collect()
    }

    fn leaf(&mut self, state: &NodeState) {
        self.stats.leaves_evaluated += 1;
        let makespan = state.makespan();
        if self.incumbent.offer(makespan, || state.trace.to_vec()) {
            self.stats.improvements += 1;
            debug!(
                "new incumbent {} after {} nodes",
                makespan, self.stats.nodes_explored
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::list_makespan;
    use crate::validation::check_schedule;
    use proptest::prelude::*;

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

    fn scenario_c() -> FlowShopProblem {
        FlowShopProblem::from_triples(&[
            (1, 2, 3),
            (2, 3, 4),
            (6, 3, 4),
            (7, 8, 2),
            (10, 1, 2),
            (12, 3, 4),
            (13, 4, 5),
            (14, 1, 2),
            (18, 5, 4),
            (23, 4, 5),
            (27, 8, 9),
            (28, 1, 2),
        ])
        .unwrap()
    }

    // Horn gives 17 here; running job 2 before job 1 gives 16.
    fn johnson_gap() -> FlowShopProblem {
        FlowShopProblem::from_triples(&[(1, 3, 2), (1, 5, 6), (5, 1, 3)]).unwrap()
    }

    fn solve(problem: &FlowShopProblem, config: BnbConfig) -> FlowShopResult<BnbResult> {
        BranchAndBound::new(config).solve(problem)
    }

    /// Best list schedule over every priority permutation.
    fn brute_force(problem: &FlowShopProblem) -> i64 {
        fn permute(p: &FlowShopProblem, prefix: &mut Vec<usize>, rest: &mut Vec<usize>) -> i64 {
            if rest.is_empty() {
                return list_makespan(p, prefix).unwrap();
            }
            let mut best = i64::MAX;
            for i in 0..rest.len() {
                let id = rest.remove(i);
                prefix.push(id);
                best = best.min(permute(p, prefix, rest));
                prefix.pop();
                rest.insert(i, id);
            }
            best
        }
        let mut rest: Vec<usize> = (1..=problem.len()).collect();
        permute(problem, &mut Vec::new(), &mut rest)
    }

    #[test]
    fn test_scenario_a() {
        let problem = scenario_a();
        let result = solve(&problem, BnbConfig::default()).unwrap();
        assert_eq!(result.makespan(), 20);
        assert_eq!(result.status, SearchStatus::Optimal);
        assert!(check_schedule(&problem, &result.schedule).is_ok());
    }

    #[test]
    fn test_scenario_b() {
        let problem = scenario_b();
        let result = solve(&problem, BnbConfig::default()).unwrap();
        assert_eq!(result.makespan(), 23);
        assert!(result.is_optimal());
        assert!(check_schedule(&problem, &result.schedule).is_ok());
    }

    #[test]
    fn test_scenario_c() {
        let problem = scenario_c();
        let result = solve(&problem, BnbConfig::default()).unwrap();
        assert_eq!(result.makespan(), 49);
        assert!(result.is_optimal());
        assert!(check_schedule(&problem, &result.schedule).is_ok());
    }

    #[test]
    fn test_beats_johnson_heuristic() {
        let problem = johnson_gap();
        assert_eq!(HornScheduler::new().schedule(&problem).makespan, 17);

        let result = solve(&problem, BnbConfig::default()).unwrap();
        assert_eq!(result.makespan(), 16);
        assert!(result.stats.improvements >= 1);
        assert!(check_schedule(&problem, &result.schedule).is_ok());
    }

    #[test]
    fn test_search_options_agree() {
        for problem in [scenario_a(), scenario_b(), johnson_gap()] {
            let expected = solve(&problem, BnbConfig::default()).unwrap().makespan();
            for (warm, closure) in [(false, true), (true, false), (false, false)] {
                let config = BnbConfig::default()
                    .with_warm_start(warm)
                    .with_johnson_closure(closure);
                let result = solve(&problem, config).unwrap();
                assert_eq!(result.makespan(), expected);
                assert!(result.is_optimal());
            }
        }
    }

    #[test]
    fn test_single_job() {
        let problem = FlowShopProblem::from_triples(&[(3, 4, 5)]).unwrap();
        let result = solve(&problem, BnbConfig::default()).unwrap();
        assert_eq!(result.makespan(), 12);
        assert_eq!(result.schedule.order, vec![1]);
    }

    #[test]
    fn test_node_limit_keeps_warm_start() {
        let result = solve(&johnson_gap(), BnbConfig::default().with_node_limit(0)).unwrap();
        assert_eq!(result.status, SearchStatus::NodeLimit);
        assert!(!result.is_optimal());
        assert_eq!(result.makespan(), 17);
        assert_eq!(result.stats.nodes_explored, 0);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let result = BranchAndBound::new(BnbConfig::default())
            .with_cancellation(token)
            .solve(&johnson_gap())
            .unwrap();
        assert_eq!(result.status, SearchStatus::Cancelled);
        assert_eq!(result.makespan(), 17);
    }

    #[test]
    fn test_no_incumbent_without_warm_start() {
        let token = CancellationToken::new();
        token.cancel();
        let err = BranchAndBound::new(BnbConfig::default().with_warm_start(false))
            .with_cancellation(token)
            .solve(&johnson_gap())
            .unwrap_err();
        assert_eq!(err, FlowShopError::NoIncumbent);
    }

    #[test]
    fn test_invalid_config() {
        let err = solve(&scenario_a(), BnbConfig::default().with_time_limit_ms(0)).unwrap_err();
        assert!(matches!(err, FlowShopError::InvalidConfig(_)));
    }

    #[test]
    fn test_generous_time_limit_is_optimal() {
        let result = solve(&scenario_b(), BnbConfig::default().with_time_limit_ms(60_000)).unwrap();
        assert_eq!(result.status, SearchStatus::Optimal);
        assert_eq!(result.makespan(), 23);
    }

    #[test]
    fn test_expired_deadline_returns_best_effort() {
        let problem = johnson_gap();
        let solver = BranchAndBound::new(BnbConfig::default().with_time_limit_ms(1));
        let start = Instant::now();
        let result = solver.solve_until(&problem, start, Some(start)).unwrap();

        assert_eq!(result.status, SearchStatus::TimedOut);
        assert!(!result.is_optimal());
        assert!(check_schedule(&problem, &result.schedule).is_ok());
        assert!(result.makespan() <= HornScheduler::new().schedule(&problem).makespan);
        assert_eq!(result.stats.nodes_explored, 0);
    }

    #[test]
    fn test_expired_deadline_without_warm_start() {
        let solver = BranchAndBound::new(BnbConfig::default().with_warm_start(false));
        let start = Instant::now();
        let err = solver.solve_until(&johnson_gap(), start, Some(start)).unwrap_err();
        assert_eq!(err, FlowShopError::NoIncumbent);
    }

    #[test]
    fn test_idempotent() {
        let problem = scenario_b();
        let a = solve(&problem, BnbConfig::default()).unwrap();
        let b = solve(&problem, BnbConfig::default()).unwrap();
        assert_eq!(a.schedule, b.schedule);
        assert_eq!(a.stats.nodes_explored, b.stats.nodes_explored);
    }

    #[test]
    fn test_result_serializes() {
        let result = solve(&scenario_a(), BnbConfig::default()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status\":\"Optimal\""));
        let back: BnbResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    fn instance() -> impl Strategy<Value = FlowShopProblem> {
        prop::collection::vec((0i64..12, 0i64..8, 0i64..8), 1..=5)
            .prop_map(|t| FlowShopProblem::from_triples(&t).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_matches_brute_force(problem in instance()) {
            let result = solve(&problem, BnbConfig::default()).unwrap();
            prop_assert!(result.is_optimal());
            prop_assert_eq!(result.makespan(), brute_force(&problem));
        }

        #[test]
        fn prop_feasible_and_no_worse_than_horn(problem in instance()) {
            let result = solve(&problem, BnbConfig::default()).unwrap();
            prop_assert!(check_schedule(&problem, &result.schedule).is_ok());
            prop_assert!(result.makespan() <= HornScheduler::new().schedule(&problem).makespan);

            let m2 = result.schedule.machine2_sequence();
            for pair in m2.windows(2) {
                prop_assert!(pair[0].1.end <= pair[1].1.start || pair[0].1.duration() == 0 || pair[1].1.duration() == 0);
            }
        }

        #[test]
        fn prop_budget_monotone(problem in instance(), small in 0u64..20) {
            let limited = solve(&problem, BnbConfig::default().with_node_limit(small)).unwrap();
            let larger = solve(&problem, BnbConfig::default().with_node_limit(small * 4 + 10)).unwrap();
            let full = solve(&problem, BnbConfig::default()).unwrap();
            prop_assert!(larger.makespan() <= limited.makespan());
            prop_assert!(full.makespan() <= larger.makespan());
        }
    }
}
