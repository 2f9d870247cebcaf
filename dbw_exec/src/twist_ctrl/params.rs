//! Twist controller parameters

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

/// Parameters for the twist controller.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    // ---- VEHICLE ----
    /// Units: kilograms
    pub vehicle_mass_kg: f64,

    /// Units: gallons
    pub fuel_capacity_gal: f64,

    /// Brake torque below which the brakes have no effect.
    ///
    /// Units: newton meters
    pub brake_deadband_nm: f64,

    /// Largest deceleration the brakes will be asked for. Negative.
    ///
    /// Units: meters/second^2
    pub decel_limit_mss: f64,

    /// Units: meters/second^2
    pub accel_limit_mss: f64,

    /// Units: meters
    pub wheel_radius_m: f64,

    // ---- STEERING ----
    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub wheel_base_m: f64,

    /// Ratio of steering wheel angle to road wheel angle
    pub steer_ratio: f64,

    /// Units: meters/second^2
    pub max_lat_accel_mss: f64,

    /// Limit on the steering angle demand.
    ///
    /// Units: radians
    pub max_steer_angle_rad: f64,

    /// Floor on the speed used in the steering calculation, so the vehicle can still be steered
    /// at rest.
    ///
    /// Units: meters/second
    pub min_yaw_speed_ms: f64,

    // ---- VELOCITY FILTER ----
    /// Filter time constant.
    ///
    /// Units: seconds
    pub lpf_tau_s: f64,

    /// Nominal sample period of the filter.
    ///
    /// Units: seconds
    pub lpf_ts_s: f64,

    // ---- THROTTLE CONTROLLER ----
    /// Throttle controller proportional gain
    pub throttle_k_p: f64,

    /// Throttle controller integral gain
    pub throttle_k_i: f64,

    /// Throttle controller derivative gain
    pub throttle_k_d: f64,

    /// Throttle demand minimum limit
    pub min_throttle: f64,

    /// Throttle demand maximum limit
    pub max_throttle: f64,

    // ---- BRAKING ----
    /// Brake torque applied to hold the vehicle at rest.
    ///
    /// Units: newton meters
    pub hold_torque_nm: f64,

    /// Velocity below which the vehicle is considered at rest.
    ///
    /// Units: meters/second
    pub near_zero_vel_ms: f64,

    /// Throttle demand below which the brakes are used to slow the vehicle instead.
    pub low_throttle: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            vehicle_mass_kg: 1736.35,
            fuel_capacity_gal: 13.5,
            brake_deadband_nm: 0.1,
            decel_limit_mss: -5.0,
            accel_limit_mss: 1.0,
            wheel_radius_m: 0.2413,
            wheel_base_m: 2.8498,
            steer_ratio: 14.8,
            max_lat_accel_mss: 3.0,
            max_steer_angle_rad: 8.0,
            min_yaw_speed_ms: 0.1,
            lpf_tau_s: 0.5,
            lpf_ts_s: 0.02,
            throttle_k_p: 0.3,
            throttle_k_i: 0.1,
            throttle_k_d: 0.0,
            min_throttle: 0.0,
            max_throttle: 0.2,
            hold_torque_nm: 700.0,
            near_zero_vel_ms: 0.1,
            low_throttle: 0.1,
        }
    }
}

impl Validate for Params {
    fn validate(&self) -> Result<(), LoadError> {
        ensure_positive("vehicle_mass_kg", self.vehicle_mass_kg)?;
        ensure_non_negative("fuel_capacity_gal", self.fuel_capacity_gal)?;
        ensure_non_negative("brake_deadband_nm", self.brake_deadband_nm)?;
        ensure_positive("accel_limit_mss", self.accel_limit_mss)?;
        ensure_positive("wheel_radius_m", self.wheel_radius_m)?;
        ensure_positive("wheel_base_m", self.wheel_base_m)?;
        ensure_positive("steer_ratio", self.steer_ratio)?;
        ensure_positive("max_lat_accel_mss", self.max_lat_accel_mss)?;
        ensure_positive("max_steer_angle_rad", self.max_steer_angle_rad)?;
        ensure_positive("min_yaw_speed_ms", self.min_yaw_speed_ms)?;
        ensure_positive("lpf_tau_s", self.lpf_tau_s)?;
        ensure_positive("lpf_ts_s", self.lpf_ts_s)?;
        ensure_non_negative("throttle_k_p", self.throttle_k_p)?;
        ensure_non_negative("throttle_k_i", self.throttle_k_i)?;
        ensure_non_negative("throttle_k_d", self.throttle_k_d)?;
        ensure_non_negative("hold_torque_nm", self.hold_torque_nm)?;
        ensure_non_negative("near_zero_vel_ms", self.near_zero_vel_ms)?;
        ensure_non_negative("low_throttle", self.low_throttle)?;

        if !(self.decel_limit_mss.is_finite() && self.decel_limit_mss < 0.0) {
            return Err(LoadError::InvalidParam(
                "decel_limit_mss",
                format!("expected a negative value, found {}", self.decel_limit_mss),
            ));
        }

        // Throttle is a fraction of full throttle
        if !(0.0 <= self.min_throttle
            && self.min_throttle <= self.max_throttle
            && self.max_throttle <= 1.0)
        {
            return Err(LoadError::InvalidParam(
                "min_throttle/max_throttle",
                format!(
                    "expected 0 <= min <= max <= 1, found [{}, {}]",
                    self.min_throttle, self.max_throttle
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        let p = Params {
            vehicle_mass_kg: -1500.0,
            ..Params::default()
        };
        assert!(matches!(
            p.validate(),
            Err(LoadError::InvalidParam("vehicle_mass_kg", _))
        ));

        let p = Params {
            decel_limit_mss: 5.0,
            ..Params::default()
        };
        assert!(matches!(
            p.validate(),
            Err(LoadError::InvalidParam("decel_limit_mss", _))
        ));

        let p = Params {
            min_throttle: 0.5,
            max_throttle: 0.2,
            ..Params::default()
        };
        assert!(p.validate().is_err());
    }
}
