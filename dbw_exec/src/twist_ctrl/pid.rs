//! # PID controller
//!
//! Output limited PID controller used for throttle demand.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller with output limits
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// Output minimum
    min: f64,

    /// Output maximum
    max: f64,

    /// Previous error
    prev_error: f64,

    /// The integral accumulation
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given gains and output limits.
    pub fn new(k_p: f64, k_i: f64, k_d: f64, min: f64, max: f64) -> Self {
        Self {
            k_p, k_i, k_d,
            min, max,
            integral: 0f64,
            prev_error: 0f64
        }
    }

    /// Get the value of the controller for the given error and time since the last step.
    ///
    /// The output is always within `[min, max]`. The integral only accumulates on steps where
    /// the output is not saturated, so it cannot wind up while the limits are active.
    pub fn step(&mut self, error: f64, dt: f64) -> f64 {
        // With no time difference there's no integral or derivative contribution
        let (integral, deriv) = if dt > 0f64 {
            (
                self.integral + error * dt,
                (error - self.prev_error) / dt
            )
        }
        else {
            (self.integral, 0f64)
        };

        let out =
            self.k_p * error
            + self.k_i * integral
            + self.k_d * deriv;

        let limited = out.max(self.min).min(self.max);

        // Anti-windup: only commit the integral when the output is within limits
        if out >= self.min && out <= self.max {
            self.integral = integral;
        }

        self.prev_error = error;

        limited
    }

    /// Zero the integral accumulation and previous error.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = 0f64;
    }
}
