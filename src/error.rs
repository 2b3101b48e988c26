//! Error types for instance construction, plan parsing, and decoding.
//!
//! Feasibility failures are not errors: a plan that breaks a routing rule is
//! reported through [`FeasibilityVerdict`](crate::evaluation::FeasibilityVerdict).
//! The types here cover malformed inputs and corrupt indices only.

use thiserror::Error;

/// Construction-time validation failure of an [`Instance`](crate::models::Instance).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    /// An instance needs at least the depot.
    #[error("instance must contain at least one node")]
    Empty,
    /// A matrix row has the wrong number of columns.
    #[error("{matrix} matrix row {row} has {found} entries, expected {expected}")]
    RaggedRow {
        /// Which matrix (`truck` or `drone`).
        matrix: &'static str,
        /// Zero-based row index.
        row: usize,
        /// Entries found in the row.
        found: usize,
        /// Entries expected (matrix size).
        expected: usize,
    },
    /// Flat matrix data is not `size * size` long.
    #[error("matrix data has {found} entries, expected {expected}")]
    DataLength {
        /// Entries provided.
        found: usize,
        /// `size * size`.
        expected: usize,
    },
    /// Truck and drone matrices cover a different number of nodes.
    #[error("truck matrix covers {truck} nodes but drone matrix covers {drone}")]
    SizeMismatch {
        /// Truck matrix size.
        truck: usize,
        /// Drone matrix size.
        drone: usize,
    },
    /// A travel or flight time is negative, NaN, or infinite.
    #[error("{matrix} time from {from} to {to} is invalid: {value}")]
    InvalidEntry {
        /// Which matrix (`truck` or `drone`).
        matrix: &'static str,
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
        /// Offending value.
        value: f64,
    },
    /// The fleet needs at least one drone.
    #[error("instance must have at least one drone")]
    NoDrones,
    /// The flight range is negative, NaN, or infinite.
    #[error("flight range must be finite and non-negative, got {0}")]
    InvalidFlightRange(f64),
    /// The depot index does not name a node.
    #[error("depot {depot} is out of range for {n_nodes} nodes")]
    DepotOutOfRange {
        /// Requested depot.
        depot: usize,
        /// Number of nodes.
        n_nodes: usize,
    },
}

/// Malformed plan text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanParseError {
    /// The text did not split into exactly four `|`-separated segments.
    #[error("expected 4 segments separated by '|', got {0}")]
    SegmentCount(usize),
    /// A token is not an integer.
    #[error("segment {segment}: invalid integer {token:?}")]
    InvalidToken {
        /// Zero-based segment index.
        segment: usize,
        /// Offending token.
        token: String,
    },
    /// The truck route segment holds a negative value.
    #[error("truck route may not contain negative value {0}")]
    NegativeTruckNode(i64),
}

/// Corrupt or inconsistent indices found while decoding a plan.
///
/// These are never clamped or truncated: decoding stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A truck route entry is not a node of the instance.
    #[error("truck route position {position} holds node {node}, instance has {n_nodes} nodes")]
    NodeOutOfRange {
        /// Zero-based route position.
        position: usize,
        /// Offending node.
        node: usize,
        /// Number of nodes.
        n_nodes: usize,
    },
    /// A drone customer is not a node of the instance.
    #[error("drone customer {customer} is out of range for {n_nodes} nodes")]
    CustomerOutOfRange {
        /// Offending value.
        customer: i64,
        /// Number of nodes.
        n_nodes: usize,
    },
    /// Separators imply more drone groups than the fleet has.
    #[error("drone group {group} exceeds fleet of {n_drones} drones")]
    DroneIndexOutOfRange {
        /// Zero-based group index reached.
        group: usize,
        /// Fleet size.
        n_drones: usize,
    },
    /// Drone customers and launch/reconvene pairs do not match one-to-one.
    #[error("{customers} drone customers but {launches} launch cells and {reconvenes} reconvene cells")]
    PairCountMismatch {
        /// Non-separator drone customers.
        customers: usize,
        /// Non-separator launch cells.
        launches: usize,
        /// Non-separator reconvene cells.
        reconvenes: usize,
    },
    /// A cell sequence uses separators that do not mirror the drone customers.
    #[error("{sequence} separators do not mirror drone customers at position {position}")]
    SeparatorMisaligned {
        /// `launch_cells` or `reconvene_cells`.
        sequence: &'static str,
        /// Zero-based position of the first mismatch.
        position: usize,
    },
    /// A launch or reconvene cell does not point into the truck route.
    #[error("customer {customer}: cell {cell} is outside truck route of length {route_len}")]
    CellOutOfRange {
        /// Drone customer of the trip.
        customer: usize,
        /// Offending 1-based cell.
        cell: i64,
        /// Truck route length.
        route_len: usize,
    },
}

/// Invalid [`OracleConfig`](crate::config::OracleConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The objective scale must be finite and strictly positive.
    #[error("objective scale must be finite and positive, got {0}")]
    InvalidObjectiveScale(f64),
}

/// Failure while reading a problem-instance file.
#[derive(Debug, Error)]
pub enum InstanceFileError {
    /// Underlying I/O failure.
    #[error("failed to read instance: {0}")]
    Io(#[from] std::io::Error),
    /// A `#` section ended before its data was complete.
    #[error("missing {0} section")]
    MissingSection(&'static str),
    /// A value could not be parsed as a number.
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A matrix section has the wrong number of rows.
    #[error("{section} section has {found} rows, expected {expected}")]
    RowCount {
        /// Section name.
        section: &'static str,
        /// Rows found.
        found: usize,
        /// `n_customers + 1`.
        expected: usize,
    },
    /// The data parsed but does not form a valid instance.
    #[error(transparent)]
    Instance(#[from] InstanceError),
}
