//! Waypoint updater parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use util::params::{ensure_non_negative, ensure_positive, LoadError, Validate};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the waypoint updater
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Number of waypoints published ahead of the vehicle.
    pub lookahead_wps: usize,

    /// Deceleration used to shape the velocity profile into a stop.
    ///
    /// Units: meters/second^2
    pub max_decel_mss: f64,

    /// Number of waypoints before the stop index at which the vehicle should actually come to
    /// rest, so that it stops before the line rather than on it.
    pub stop_safety_offset_wps: usize,

    /// Any waypoint closer than this to the stop point gets a target velocity of zero.
    ///
    /// Units: meters
    pub stop_epsilon_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            lookahead_wps: 100,
            max_decel_mss: 3.0,
            stop_safety_offset_wps: 3,
            stop_epsilon_m: 1.0,
        }
    }
}

impl Validate for Params {
    fn validate(&self) -> Result<(), LoadError> {
        if self.lookahead_wps == 0 {
            return Err(LoadError::InvalidParam(
                "lookahead_wps",
                "expected at least one waypoint".into(),
            ));
        }
        ensure_positive("max_decel_mss", self.max_decel_mss)?;
        ensure_non_negative("stop_epsilon_m", self.stop_epsilon_m)
    }
}
