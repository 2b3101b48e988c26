//! Oracle configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the simulator compares a drone trip against the flight range.
///
/// The static feasibility check always compares pure flight time. During
/// simulation a drone may arrive at the reconvene node before the truck and
/// hover until it arrives; whether that hover time counts against the range
/// is selected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightRangePolicy {
    /// `flight_out + flight_back <= flight_range`.
    #[default]
    FlightOnly,
    /// `flight_out + flight_back + hover <= flight_range`, where `hover` is
    /// the time between the drone's return and the truck's arrival at the
    /// reconvene node. Hover at the depot is not counted.
    IncludeReconveneWait,
}

/// Tunable parameters of an [`Oracle`](crate::evaluation::Oracle).
///
/// # Examples
///
/// ```
/// use u_strpd::config::{FlightRangePolicy, OracleConfig};
///
/// let config = OracleConfig::default()
///     .with_flight_range_policy(FlightRangePolicy::IncludeReconveneWait)
///     .with_objective_scale(1.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(OracleConfig::default().objective_scale(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    flight_range_policy: FlightRangePolicy,
    objective_scale: f64,
}

impl OracleConfig {
    /// Default divisor applied to the summed arrival times.
    pub const DEFAULT_OBJECTIVE_SCALE: f64 = 100.0;

    /// Sets the dynamic flight-range policy.
    pub fn with_flight_range_policy(mut self, policy: FlightRangePolicy) -> Self {
        self.flight_range_policy = policy;
        self
    }

    /// Sets the divisor converting internal time units to reporting units.
    pub fn with_objective_scale(mut self, scale: f64) -> Self {
        self.objective_scale = scale;
        self
    }

    /// Dynamic flight-range policy.
    pub fn flight_range_policy(&self) -> FlightRangePolicy {
        self.flight_range_policy
    }

    /// Divisor applied to the summed arrival times.
    pub fn objective_scale(&self) -> f64 {
        self.objective_scale
    }

    /// Checks that the objective scale is finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.objective_scale.is_finite() || self.objective_scale <= 0.0 {
            return Err(ConfigError::InvalidObjectiveScale(self.objective_scale));
        }
        Ok(())
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            flight_range_policy: FlightRangePolicy::default(),
            objective_scale: Self::DEFAULT_OBJECTIVE_SCALE,
        }
    }
}
