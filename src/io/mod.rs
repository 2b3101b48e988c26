//! Text formats at the crate boundary.
//!
//! - [`plan_text`] — `truck | drones | launches | reconvenes` plan strings
//! - [`instance_file`] — `#`-sectioned problem-instance files

pub mod instance_file;
pub mod plan_text;

pub use instance_file::{load_instance, parse_instance, read_instance, write_instance};
pub use plan_text::parse_plan;
