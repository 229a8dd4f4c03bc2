//! Heuristic scheduling, objectives and KPI evaluation.
//!
//! # Algorithm
//!
//! `HornScheduler` is an event-driven list scheduler: at every release or
//! completion it lets a dispatching rule pick one ready job for machine 1.
//! With Johnson's rule it is the classic Horn heuristic, fast and usually
//! close to optimal. It is the comparison baseline for the exact search and
//! supplies its initial incumbent.
//!
//! # Objectives
//!
//! `permutation_makespan` and `list_makespan` turn a job permutation into a
//! makespan for external improvement loops.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, busy and idle time, utilization, flow
//! time and preemption count.
//!
//! # References
//!
//! - Horn (1974), "Some simple scheduling algorithms"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4

mod horn;
mod kpi;
pub mod objective;

pub use horn::HornScheduler;
pub use kpi::ScheduleKpi;
pub use objective::{list_makespan, permutation_makespan};
