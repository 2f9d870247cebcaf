//! # Yaw controller
//!
//! Converts a linear and angular velocity demand into a steering wheel angle using a bicycle
//! model of the vehicle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::clamp_sym;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct YawController {
    wheel_base_m: f64,
    steer_ratio: f64,
    min_speed_ms: f64,
    max_lat_accel_mss: f64,
    max_steer_angle_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl YawController {
    pub fn new(
        wheel_base_m: f64,
        steer_ratio: f64,
        min_speed_ms: f64,
        max_lat_accel_mss: f64,
        max_steer_angle_rad: f64,
    ) -> Self {
        Self {
            wheel_base_m,
            steer_ratio,
            min_speed_ms,
            max_lat_accel_mss,
            max_steer_angle_rad,
        }
    }

    /// Get the steering wheel angle for the target twist at the current speed.
    ///
    /// The target angular velocity is scaled to the current speed so the demanded path curvature
    /// is kept, then limited so the lateral acceleration stays within bounds.
    ///
    /// Units: radians
    pub fn get_steering(&self, linear_ms: f64, angular_rads: f64, current_ms: f64) -> f64 {
        let mut angular_rads = if linear_ms.abs() > std::f64::EPSILON {
            angular_rads * current_ms / linear_ms
        } else {
            angular_rads
        };

        let speed_ms = current_ms.max(self.min_speed_ms);

        let max_yaw_rate_rads = self.max_lat_accel_mss / speed_ms;
        angular_rads = clamp_sym(angular_rads, max_yaw_rate_rads);

        let steer_rad = (self.wheel_base_m * angular_rads / speed_ms).atan() * self.steer_ratio;

        clamp_sym(steer_rad, self.max_steer_angle_rad)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ctrl() -> YawController {
        YawController::new(2.8498, 14.8, 0.1, 3.0, 8.0)
    }

    #[test]
    fn test_straight() {
        assert_eq!(ctrl().get_steering(10.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_curvature_kept() {
        let c = ctrl();

        // Same curvature at the same speed, ratio linear to current speed doesn't matter
        let a = c.get_steering(10.0, 0.1, 10.0);
        let b = c.get_steering(5.0, 0.05, 10.0);
        assert!((a - b).abs() < 1e-12);

        let expected = (2.8498 * 0.1 / 10.0f64).atan() * 14.8;
        assert!((a - expected).abs() < 1e-12);

        // Turning the other way gives the opposite steering angle
        assert!((c.get_steering(10.0, -0.1, 10.0) + a).abs() < 1e-12);
    }

    #[test]
    fn test_lateral_accel_limit() {
        let c = ctrl();

        // At 10 m/s the yaw rate is limited to 0.3 rad/s
        let limited = c.get_steering(10.0, 1.0, 10.0);
        let at_limit = c.get_steering(10.0, 0.3, 10.0);
        assert!((limited - at_limit).abs() < 1e-12);
    }

    #[test]
    fn test_steer_limit_and_stationary() {
        let c = ctrl();
        let steer = c.get_steering(0.0, 0.5, 0.0);
        assert!(steer.is_finite());
        assert!(steer.abs() <= 8.0);
    }
}
