//! Best-known solution of a search run.

use crate::timeline::TraceEntry;

/// Flat machine markers of a decision trace.
///
/// `machine1` holds one `[start, end]` pair per `order` entry; `machine2`
/// holds one pair per job in hand-off order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionMarkers {
    /// Job ids in machine-1 execution order.
    pub order: Vec<usize>,
    /// `[s0, e0, s1, e1, ...]` for machine 1.
    pub machine1: Vec<i64>,
    /// `[s0, e0, s1, e1, ...]` for machine 2.
    pub machine2: Vec<i64>,
}

impl DecisionMarkers {
    /// Flattens trace entries.
    pub fn from_trace(trace: &[TraceEntry]) -> Self {
        let mut markers = Self {
            order: Vec::with_capacity(trace.len()),
            machine1: Vec::with_capacity(trace.len() * 2),
            machine2: Vec::new(),
        };
        for entry in trace {
            markers.order.push(entry.job_id);
            markers.machine1.extend([entry.machine1.start, entry.machine1.end]);
            if let Some(m2) = entry.machine2 {
                markers.machine2.extend([m2.start, m2.end]);
            }
        }
        markers
    }
}

/// Best complete schedule seen so far.
///
/// Starts empty (infinite makespan) and is only ever replaced by a strictly
/// better one.
#[derive(Debug, Clone, Default)]
pub struct Incumbent {
    makespan: Option<i64>,
    trace: Vec<TraceEntry>,
}

impl Incumbent {
    /// Creates an empty incumbent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Best makespan, `None` while empty.
    pub fn makespan(&self) -> Option<i64> {
        self.makespan
    }

    /// Whether a solution has been recorded.
    pub fn is_empty(&self) -> bool {
        self.makespan.is_none()
    }

    /// Whether a partial path with lower bound `bound` can be discarded.
    pub fn dominates(&self, bound: i64) -> bool {
        self.makespan.is_some_and(|best| bound >= best)
    }

    /// Replaces the incumbent if `makespan` is strictly better.
    ///
    /// `trace` is only called on replacement. Returns whether it happened.
    pub fn offer<F>(&mut self, makespan: i64, trace: F) -> bool
    where
        F: FnOnce() -> Vec<TraceEntry>,
    {
        if self.makespan.is_some_and(|best| makespan >= best) {
            return false;
        }
        self.makespan = Some(makespan);
        self.trace = trace();
        true
    }

    /// Recorded trace entries.
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Flat markers of the recorded trace.
    pub fn markers(&self) -> DecisionMarkers {
        DecisionMarkers::from_trace(&self.trace)
    }
}
