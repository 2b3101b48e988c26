//! Travel and flight time matrices.
//!
//! Provides a dense matrix shared by the truck and drone time tables.

mod matrix;

pub use matrix::DistanceMatrix;
