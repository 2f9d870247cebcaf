//! # Lane and waypoint definitions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single point of the reference lane.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Waypoint {
    /// Position of the waypoint in the map frame.
    ///
    /// Units: meters
    pub position_m: Vector3<f64>,

    /// Reference (target) longitudinal velocity at this waypoint. Never negative.
    ///
    /// Units: meters/second
    pub velocity_ms: f64,
}

/// An ordered sequence of waypoints.
///
/// Used both for the base (reference) lane and for the forward-looking slice published every
/// cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Lane {
    pub waypoints: Vec<Waypoint>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Waypoint {
    pub fn new(x: f64, y: f64, velocity_ms: f64) -> Self {
        Self {
            position_m: Vector3::new(x, y, 0.0),
            velocity_ms,
        }
    }

    /// The position projected onto the XY plane.
    pub fn position2(&self) -> Vector2<f64> {
        self.position_m.xy()
    }

    /// Straight line distance to another waypoint, including any height difference.
    pub fn dist_to(&self, other: &Waypoint) -> f64 {
        (other.position_m - self.position_m).norm()
    }
}

impl Lane {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Get the number of waypoints in the lane
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}
