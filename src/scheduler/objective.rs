//! Makespan objectives over job sequences.
//!
//! External improvement loops (NEH insertion, VNS, genetic search) work on
//! job permutations and need a scalar cost per candidate. Two evaluations
//! are offered:
//!
//! | Function | Model | Use |
//! |----------|-------|-----|
//! | [`permutation_makespan`] | `F2 \|\| C_max`, releases ignored, no preemption | NEH insertion cost |
//! | [`list_makespan`] | Horn simulation with the permutation as priority list | True objective of the preemptive problem |
//!
//! # Reference
//! Nawaz, Enscore & Ham (1983), "A heuristic algorithm for the m-machine,
//! n-job flow-shop sequencing problem", Omega 11(1)

use crate::dispatching::rules::PriorityList;
use crate::error::{FlowShopError, FlowShopResult};
use crate::models::FlowShopProblem;
use crate::scheduler::HornScheduler;

/// Release-free, non-preemptive makespan of a job sequence.
///
/// Jobs run back to back on machine 1 in `order`; machine 2 processes them
/// in the same order as soon as both the job and the machine are free.
///
/// # Errors
/// [`FlowShopError::InvalidPermutation`] unless `order` holds every job id
/// of `problem` exactly once.
pub fn permutation_makespan(problem: &FlowShopProblem, order: &[usize]) -> FlowShopResult<i64> {
    check_permutation(problem, order)?;

    let mut c1 = 0;
    let mut c2 = 0;
    for &id in order {
        let job = &problem.jobs()[id - 1];
        c1 += job.p1;
        c2 = c2.max(c1) + job.p2;
    }
    Ok(c2)
}

/// Makespan of the Horn schedule that dispatches by `priority`.
///
/// Release dates and machine-1 preemption are honored: at every decision
/// point the released job listed earliest runs until it finishes or the
/// next job arrives.
///
/// # Errors
/// [`FlowShopError::InvalidPermutation`] unless `priority` holds every job
/// id of `problem` exactly once.
pub fn list_makespan(problem: &FlowShopProblem, priority: &[usize]) -> FlowShopResult<i64> {
    check_permutation(problem, priority)?;
    let scheduler = HornScheduler::new().with_rule(PriorityList::new(priority));
    Ok(scheduler.schedule(problem).makespan)
}

fn check_permutation(problem: &FlowShopProblem, order: &[usize]) -> FlowShopResult<()> {
    let n = problem.len();
    if order.len() != n {
        return Err(FlowShopError::InvalidPermutation(format!(
            "expected {} job ids, got {}",
            n,
            order.len()
        )));
    }

    let mut seen = vec![false; n];
    for &id in order {
        if id == 0 || id > n {
            return Err(FlowShopError::InvalidPermutation(format!(
                "job id {id} out of range 1..={n}"
            )));
        }
        if std::mem::replace(&mut seen[id - 1], true) {
            return Err(FlowShopError::InvalidPermutation(format!(
                "job id {id} appears more than once"
            )));
        }
    }
    Ok(())
}
