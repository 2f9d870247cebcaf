//! # Vehicle state definitions
//!
//! Pose, measured velocity and commanded twist of the vehicle. All are produced outside the
//! control exec and only ever read by it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The current pose of the vehicle in the map frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VehPose {
    /// Position on the XY plane of the map frame.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Heading (angle to the +ve X axis), if the producer provides one.
    ///
    /// Units: radians
    #[serde(default)]
    pub heading_rad: Option<f64>,
}

/// Measured motion of the vehicle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VehState {
    /// Measured longitudinal velocity.
    ///
    /// Units: meters/second
    pub velocity_ms: f64,

    /// Measured yaw rate, if available.
    ///
    /// Units: radians/second
    #[serde(default)]
    pub angular_velocity_rads: Option<f64>,
}

/// The twist the vehicle is being asked to follow, typically produced by a path follower working
/// on the published forward trajectory.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TwistCmd {
    /// Target longitudinal velocity.
    ///
    /// Units: meters/second
    pub linear_ms: f64,

    /// Target yaw rate. Follows the right hand rule about Z+, positive turns left.
    ///
    /// Units: radians/second
    pub angular_rads: f64,
}

impl VehPose {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position_m: Vector2::new(x, y),
            heading_rad: None,
        }
    }
}
