//! Domain model types for truck-and-drone routing.
//!
//! Provides the immutable problem instance, the raw index-based plan, its
//! decoded per-drone trips, rule violations, and the simulated schedule.

mod instance;
mod plan;
mod schedule;
mod trip;
mod violation;

pub use instance::Instance;
pub use plan::Plan;
pub use schedule::{DroneVisit, Schedule, Stop};
pub use trip::{DecodedPlan, Trip};
pub use violation::{Rule, Violation, ViolationType};
