//! Rebuilds a per-job timetable from flat machine markers.
//!
//! The i-th occurrence of a job id in the order pairs with the i-th
//! machine-1 interval recorded for that job. Machine-2 pairs follow
//! hand-off order, which is the order of each id's last occurrence.

use std::collections::HashMap;

use crate::error::{FlowShopError, FlowShopResult};
use crate::models::{FlowShopSchedule, Interval};

/// Builds a [`FlowShopSchedule`] from an execution order and flat markers.
///
/// # Errors
/// [`FlowShopError::InconsistentTrace`] when marker counts do not match the
/// order or an interval ends before it starts.
pub fn reconstruct(
    order: &[usize],
    machine1: &[i64],
    machine2: &[i64],
) -> FlowShopResult<FlowShopSchedule> {
    if machine1.len() != order.len() * 2 {
        return Err(FlowShopError::InconsistentTrace(format!(
            "{} machine-1 markers for {} order entries",
            machine1.len(),
            order.len()
        )));
    }

    let handoff = handoff_order(order);
    if machine2.len() != handoff.len() * 2 {
        return Err(FlowShopError::InconsistentTrace(format!(
            "{} machine-2 markers for {} jobs",
            machine2.len(),
            handoff.len()
        )));
    }

    let mut schedule = FlowShopSchedule::new();
    for (&id, pair) in order.iter().zip(machine1.chunks_exact(2)) {
        schedule.add_machine1(id, interval(id, pair)?);
    }
    for (&id, pair) in handoff.iter().zip(machine2.chunks_exact(2)) {
        schedule.add_machine2(id, interval(id, pair)?);
    }
    Ok(schedule)
}

/// Distinct ids ordered by their last occurrence.
fn handoff_order(order: &[usize]) -> Vec<usize> {
    let last: HashMap<usize, usize> = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    order
        .iter()
        .enumerate()
        .filter(|&(i, id)| last.get(id) == Some(&i))
        .map(|(_, &id)| id)
        .collect()
}

fn interval(job_id: usize, pair: &[i64]) -> FlowShopResult<Interval> {
    match *pair {
        [start, end] if end >= start => Ok(Interval::new(start, end)),
        _ => Err(FlowShopError::InconsistentTrace(format!(
            "job {job_id} has malformed interval {pair:?}"
        ))),
    }
}
