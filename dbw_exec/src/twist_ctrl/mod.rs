//! # Twist controller module
//!
//! Turns the target twist and measured velocity into throttle, brake and steering demands.
//!
//! Throttle comes from a limited PID controller acting on the error between the target velocity
//! and a low pass filtered measurement. Braking is chosen from the following rules, in order:
//!
//!  1. Target velocity is zero and the vehicle is near rest: no throttle, hold with a fixed
//!     torque.
//!  1. Throttle demand is low and the vehicle is going too fast: no throttle, brake with the
//!     torque needed for the (limited) deceleration.
//!  1. Otherwise drive on the throttle demand with the brakes released.
//!
//! Steering is provided by the [`YawController`].
//!
//! Whenever drive-by-wire is disengaged the controller's history is discarded, so re-engaging
//! behaves exactly like starting fresh.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod lowpass;
pub mod params;
pub mod pid;
pub mod state;
pub mod yaw_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use lowpass::LowPassFilter;
pub use params::Params;
pub use pid::PidController;
pub use state::*;
pub use yaw_ctrl::YawController;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TwistCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum TwistCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Measured velocity is not a finite number ({0})")]
    InvalidMeasurement(f64),

    #[error("Target twist is not finite (linear {0}, angular {1})")]
    InvalidTarget(f64, f64),
}
