//! Two-machine flow shop scheduling with release dates and preemption.
//!
//! Solves `F2 | r_j, pmtn | C_max`: every job runs on machine 1, then on
//! machine 2; jobs arrive over time and may be interrupted on machine 1 when
//! another job arrives; machine 2 never preempts. The objective is the
//! makespan.
//!
//! # Modules
//!
//! - **`models`**: `Job`, `FlowShopProblem`, `FlowShopSchedule`, `Interval`
//! - **`timeline`**: Two-machine simulator shared by every algorithm
//! - **`dispatching`**: Johnson's ordering law and pluggable ready-job rules
//! - **`scheduler`**: Horn list scheduler, permutation objectives, KPIs
//! - **`bnb`**: Exact branch-and-bound search and schedule reconstruction
//! - **`validation`**: Input checks and schedule feasibility checks
//!
//! # Example
//!
//! ```
//! use u_flowshop::{solve, FlowShopProblem};
//!
//! let problem = FlowShopProblem::from_triples(&[(2, 3, 4), (3, 4, 2), (5, 6, 7)]).unwrap();
//! let result = solve(&problem).unwrap();
//! assert_eq!(result.schedule.makespan, 20);
//! assert!(result.is_optimal());
//! ```
//!
//! # References
//!
//! - Johnson (1954), "Optimal two- and three-stage production schedules"
//! - Horn (1974), "Some simple scheduling algorithms"
//! - Brucker (2007), "Scheduling Algorithms"

pub mod bnb;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod timeline;
pub mod validation;

pub use bnb::{BnbConfig, BnbResult, BranchAndBound, CancellationToken, SearchStatus};
pub use error::{FlowShopError, FlowShopResult};
pub use models::{FlowShopProblem, FlowShopSchedule, Interval, Job};
pub use scheduler::HornScheduler;

/// Solves an instance to optimality with the default configuration.
///
/// # Errors
/// See [`BranchAndBound::solve`].
pub fn solve(problem: &FlowShopProblem) -> FlowShopResult<BnbResult> {
    BranchAndBound::default().solve(problem)
}
