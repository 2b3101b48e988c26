//! # u-strpd
//!
//! Feasibility oracle and synchronized schedule simulator for the single
//! truck, multi-drone routing problem (STRPD). Search heuristics hand it a
//! candidate plan and get back whether the plan is feasible and, if so, the
//! sum of customer arrival times.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Instance, Plan, decoded trips, Violation, Schedule)
//! - [`distance`] — Travel and flight time matrices
//! - [`evaluation`] — Feasibility checker, schedule simulator, and the Oracle
//! - [`config`] — Oracle configuration (flight-range policy, objective scale)
//! - [`io`] — Plan text encoding and sectioned instance files
//! - [`generate`] — Seeded synthetic instances
//! - [`error`] — Error types
//! - `ffi` — C ABI (feature `ffi`)
//!
//! ## Example
//!
//! ```
//! use u_strpd::distance::DistanceMatrix;
//! use u_strpd::evaluation::Oracle;
//! use u_strpd::models::Instance;
//!
//! let truck = DistanceMatrix::from_rows(vec![
//!     vec![0.0, 10.0, 20.0, 30.0],
//!     vec![10.0, 0.0, 10.0, 20.0],
//!     vec![20.0, 10.0, 0.0, 10.0],
//!     vec![30.0, 20.0, 10.0, 0.0],
//! ]).unwrap();
//! let drone = DistanceMatrix::from_rows(vec![
//!     vec![0.0, 5.0, 10.0, 15.0],
//!     vec![5.0, 0.0, 5.0, 10.0],
//!     vec![10.0, 5.0, 0.0, 5.0],
//!     vec![15.0, 10.0, 5.0, 0.0],
//! ]).unwrap();
//! let instance = Instance::new(truck, drone, 2, 30.0).unwrap();
//! let oracle = Oracle::new(&instance);
//!
//! // Truck 0 → 1 → 3 → 0, drone 0 serves 2 between cells 2 and 3.
//! let result = oracle.evaluate_str("0,1,3,0|2,-1|2,-1|3,-1").unwrap();
//! assert!(result.feasible);
//! // Customer arrivals 10 + 30 (truck) + 15 (drone), in hundredths.
//! assert!((result.objective - 0.55).abs() < 1e-12);
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod evaluation;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod generate;
pub mod io;
pub mod models;
