//! Flow-shop domain models.
//!
//! Provides the problem instance (`Job`, `FlowShopProblem`) and the
//! solution representation (`FlowShopSchedule`, `Interval`) shared by the
//! heuristics and the exact search.
//!
//! # Domain Mappings
//!
//! | u-flowshop | Manufacturing | Logistics |
//! |------------|---------------|-----------|
//! | Job | Order | Shipment |
//! | Machine 1 | Machining cell | Loading dock |
//! | Machine 2 | Assembly/packing | Transport leg |
//! | Schedule | Production plan | Dispatch plan |

mod job;
mod schedule;

pub use job::{FlowShopProblem, Job};
pub use schedule::{FlowShopSchedule, Interval, MachineSchedule};
