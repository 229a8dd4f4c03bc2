//! Exact branch-and-bound search for `F2 | r_j, pmtn | C_max`.
//!
//! # Components
//!
//! - [`BranchAndBound`]: depth-first search over every "which ready job
//!   runs next" decision, with pruning against the incumbent
//! - [`Incumbent`]: best-known schedule, replaced only by a strictly better one
//! - [`bound`]: lower bounds on partial schedules
//! - [`reconstruct`]: flat machine markers back to a per-job timetable
//! - [`CancellationToken`]: cooperative stop flag
//!
//! # Stopping
//!
//! The search stops when the tree is exhausted, the time limit expires, the
//! node limit is reached, or the token is cancelled. Only exhaustion proves
//! optimality; the other outcomes return the best schedule found so far.

pub mod bound;
mod cancel;
mod config;
mod engine;
mod incumbent;
mod path;
mod reconstruct;

pub use cancel::CancellationToken;
pub use config::BnbConfig;
pub use engine::{BnbResult, BranchAndBound, SearchStats, SearchStatus};
pub use incumbent::{DecisionMarkers, Incumbent};
pub use reconstruct::reconstruct;
