//! Plan evaluation.
//!
//! - [`FeasibilityChecker`] — Static rules: truck route, completeness, structure, drone trips
//! - [`ScheduleSimulator`] — Synchronized truck/drone timelines and the objective
//! - [`Oracle`] — Check, then simulate; the single entry point for search code

mod feasibility;
mod oracle;
mod simulator;

pub use feasibility::{FeasibilityChecker, FeasibilityVerdict};
pub use oracle::{Evaluation, EvaluationResult, Oracle};
pub use simulator::{ScheduleSimulator, Simulate};
