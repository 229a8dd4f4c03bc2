//! Schedule quality metrics (KPIs).
//!
//! Computes standard performance indicators from a completed two-machine
//! schedule and its instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest machine-2 completion |
//! | Busy time | Sum of interval lengths per machine |
//! | Utilization | Busy time / makespan |
//! | Machine-2 idle | Makespan - machine-2 busy time |
//! | Flow time | Machine-2 completion - release |
//! | Preemptions | Machine-1 intervals beyond one per job |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use crate::models::{FlowShopProblem, FlowShopSchedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest machine-2 completion.
    pub makespan: i64,
    /// Total processing on machine 1.
    pub machine1_busy: i64,
    /// Total processing on machine 2.
    pub machine2_busy: i64,
    /// Machine-1 busy time over makespan (0.0..1.0).
    pub machine1_utilization: f64,
    /// Machine-2 busy time over makespan (0.0..1.0).
    pub machine2_utilization: f64,
    /// Time machine 2 spends idle before the makespan.
    pub machine2_idle: i64,
    /// Mean of completion - release over scheduled jobs.
    pub avg_flow_time: f64,
    /// Largest completion - release.
    pub max_flow_time: i64,
    /// Number of machine-1 resumptions.
    pub preemptions: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its instance.
    ///
    /// Jobs without a machine-2 interval are left out of the flow-time
    /// figures.
    pub fn calculate(schedule: &FlowShopSchedule, problem: &FlowShopProblem) -> Self {
        let makespan = schedule.makespan;
        let machine1_busy = schedule.machine1_busy();
        let machine2_busy = schedule.machine2_busy();

        let mut total_flow_time: f64 = 0.0;
        let mut max_flow_time: i64 = 0;
        let mut counted_jobs: usize = 0;

        for job in problem.jobs() {
            if let Some(completion) = schedule.completion_time(job.id) {
                let flow = completion - job.release;
                total_flow_time += flow as f64;
                max_flow_time = max_flow_time.max(flow);
                counted_jobs += 1;
            }
        }

        let utilization = |busy: i64| {
            if makespan > 0 {
                busy as f64 / makespan as f64
            } else {
                0.0
            }
        };

        let avg_flow_time = if counted_jobs == 0 {
            0.0
        } else {
            total_flow_time / counted_jobs as f64
        };

        Self {
            makespan,
            machine1_busy,
            machine2_busy,
            machine1_utilization: utilization(machine1_busy),
            machine2_utilization: utilization(machine2_busy),
            machine2_idle: makespan - machine2_busy,
            avg_flow_time,
            max_flow_time,
            preemptions: schedule.preemption_count(),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_flow_time: i64, min_machine2_utilization: f64) -> bool {
        self.max_flow_time <= max_flow_time
            && self.machine2_utilization >= min_machine2_utilization
    }
}
