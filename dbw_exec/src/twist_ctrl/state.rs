//! Twist controller module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::Serialize;

// Internal
use super::{LowPassFilter, Params, PidController, TwistCtrlError, YawController};
use comms_if::eqpt::{
    dbw::DbwCmd,
    veh::{TwistCmd, VehState},
};
use util::{module::State, params::Validate};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Twist controller module state
pub struct TwistCtrl {
    params: Params,

    report: StatusReport,

    throttle_ctrl: PidController,

    vel_lpf: LowPassFilter,

    yaw_ctrl: YawController,

    /// Time of the last actuated cycle, `None` when the controller is starting fresh.
    ///
    /// Units: seconds
    last_time_s: Option<f64>,

    /// Whether the last cycle was actuated, used to log engagement changes
    engaged: bool,
}

/// Input data to the twist controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    pub dbw_enabled: bool,

    /// Latest measured state, if one has been received
    pub state: Option<VehState>,

    /// Latest target twist, if one has been received
    pub target: Option<TwistCmd>,

    /// Time of this cycle in a monotonic timebase.
    ///
    /// Units: seconds
    pub time_s: f64,
}

/// Which rule set the brake demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrakeMode {
    /// Drive-by-wire disengaged, zero command
    Disabled,

    /// Brakes released, throttle from the controller
    Released,

    /// Holding the vehicle at rest
    Hold,

    /// Braking to slow down
    Decel,
}

/// The status report containing monitoring quantities.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct StatusReport {
    pub brake_mode: BrakeMode,

    /// Whether a command was produced this cycle
    pub actuated: bool,

    pub filtered_vel_ms: f64,

    pub vel_error_ms: f64,

    pub dt_s: f64,

    /// Throttle controller output before braking rules are applied
    pub throttle_ctrl_out: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            brake_mode: BrakeMode::Disabled,
            actuated: false,
            filtered_vel_ms: 0.0,
            vel_error_ms: 0.0,
            dt_s: 0.0,
            throttle_ctrl_out: 0.0,
        }
    }
}

impl Default for TwistCtrl {
    fn default() -> Self {
        Self::build(Params::default())
    }
}

impl TwistCtrl {
    fn build(params: Params) -> Self {
        Self {
            throttle_ctrl: PidController::new(
                params.throttle_k_p,
                params.throttle_k_i,
                params.throttle_k_d,
                params.min_throttle,
                params.max_throttle,
            ),
            vel_lpf: LowPassFilter::new(params.lpf_tau_s, params.lpf_ts_s),
            yaw_ctrl: YawController::new(
                params.wheel_base_m,
                params.steer_ratio,
                params.min_yaw_speed_ms,
                params.max_lat_accel_mss,
                params.max_steer_angle_rad,
            ),
            report: StatusReport::default(),
            last_time_s: None,
            engaged: false,
            params,
        }
    }

    /// Discard all controller history.
    pub fn reset(&mut self) {
        self.throttle_ctrl.reset();
        self.vel_lpf.reset();
        self.last_time_s = None;
    }

    /// Compute the actuation command for an engaged cycle.
    fn control(&mut self, state: &VehState, target: &TwistCmd, time_s: f64) -> DbwCmd {
        let dt_s = match self.last_time_s {
            Some(t) => (time_s - t).max(0.0),
            None => 0.0,
        };
        self.last_time_s = Some(time_s);

        let filtered_vel_ms = self.vel_lpf.filt(state.velocity_ms);

        let steer_rad =
            self.yaw_ctrl
                .get_steering(target.linear_ms, target.angular_rads, filtered_vel_ms);

        let vel_error_ms = target.linear_ms - filtered_vel_ms;
        let mut throttle = self.throttle_ctrl.step(vel_error_ms, dt_s);
        let throttle_ctrl_out = throttle;

        let mut brake_nm = 0.0;
        let brake_mode;

        if target.linear_ms.abs() <= std::f64::EPSILON
            && filtered_vel_ms < self.params.near_zero_vel_ms
        {
            throttle = 0.0;
            brake_nm = self.params.hold_torque_nm;
            brake_mode = BrakeMode::Hold;
        } else if throttle < self.params.low_throttle && vel_error_ms < 0.0 {
            throttle = 0.0;
            let decel_mss = vel_error_ms.max(self.params.decel_limit_mss);
            brake_nm = decel_mss.abs() * self.params.vehicle_mass_kg * self.params.wheel_radius_m;
            brake_mode = BrakeMode::Decel;
        } else {
            brake_mode = BrakeMode::Released;
        }

        self.report = StatusReport {
            brake_mode,
            actuated: true,
            filtered_vel_ms,
            vel_error_ms,
            dt_s,
            throttle_ctrl_out,
        };

        DbwCmd {
            throttle,
            brake_nm,
            steer_rad,
        }
    }
}

impl State for TwistCtrl {
    type Params = Params;
    type InitError = TwistCtrlError;

    type InputData = InputData;
    type OutputData = Option<DbwCmd>;
    type StatusReport = StatusReport;
    type ProcError = TwistCtrlError;

    fn from_params(params: Params) -> Result<Self, TwistCtrlError> {
        params.validate()?;

        Ok(Self::build(params))
    }

    /// Compute the actuation command for this cycle.
    ///
    /// Returns the zero command when drive-by-wire is disengaged, and no command when engaged
    /// but the measured state or target twist hasn't been received yet.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // ---- DISENGAGED ----

        if !input_data.dbw_enabled {
            if self.engaged {
                info!("Drive-by-wire disengaged, controller reset");
                self.engaged = false;
            }
            self.reset();

            return Ok((Some(DbwCmd::zero()), self.report));
        }

        // ---- MISSING INPUTS ----

        let (state, target) = match (input_data.state, input_data.target) {
            (Some(s), Some(t)) => (s, t),
            _ => {
                trace!(
                    "TwistCtrl: waiting for inputs (state: {}, target: {})",
                    input_data.state.is_some(),
                    input_data.target.is_some()
                );
                self.reset();
                return Ok((None, self.report));
            }
        };

        if !state.velocity_ms.is_finite() {
            self.reset();
            return Err(TwistCtrlError::InvalidMeasurement(state.velocity_ms));
        }

        if !(target.linear_ms.is_finite() && target.angular_rads.is_finite()) {
            self.reset();
            return Err(TwistCtrlError::InvalidTarget(
                target.linear_ms,
                target.angular_rads,
            ));
        }

        if !self.engaged {
            info!("Drive-by-wire engaged");
            self.engaged = true;
        }

        // ---- CONTROL ----

        let cmd = self.control(&state, &target, input_data.time_s);

        trace!(
            "TwistCtrl: {:?} throttle {:.3}, brake {:.1} Nm, steer {:.3} rad",
            self.report.brake_mode, cmd.throttle, cmd.brake_nm, cmd.steer_rad
        );

        Ok((Some(cmd), self.report))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        Params {
            vehicle_mass_kg: 1500.0,
            wheel_radius_m: 0.3,
            decel_limit_mss: -5.0,
            ..Params::default()
        }
    }

    fn input(enabled: bool, vel: f64, target: f64, time_s: f64) -> InputData {
        InputData {
            dbw_enabled: enabled,
            state: Some(VehState {
                velocity_ms: vel,
                angular_velocity_rads: None,
            }),
            target: Some(TwistCmd {
                linear_ms: target,
                angular_rads: 0.0,
            }),
            time_s,
        }
    }

    #[test]
    fn test_decel_braking() {
        let mut tc = TwistCtrl::from_params(params()).unwrap();

        // Velocity error of -6 m/s is limited to the -5 m/s^2 deceleration limit
        let (cmd, report) = tc.proc(&input(true, 10.0, 4.0, 0.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(report.brake_mode, BrakeMode::Decel);
        assert_eq!(cmd.throttle, 0.0);
        assert!((cmd.brake_nm - 2250.0).abs() < 1e-9);

        // Within the limit the brake torque follows the error
        let mut tc = TwistCtrl::from_params(params()).unwrap();
        let (cmd, _) = tc.proc(&input(true, 6.0, 4.0, 0.0)).unwrap();
        assert!((cmd.unwrap().brake_nm - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_hold_at_rest() {
        let mut tc = TwistCtrl::from_params(params()).unwrap();

        let (cmd, report) = tc.proc(&input(true, 0.05, 0.0, 0.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(report.brake_mode, BrakeMode::Hold);
        assert_eq!(cmd.throttle, 0.0);
        assert_eq!(cmd.brake_nm, 700.0);
    }

    #[test]
    fn test_drive() {
        let mut tc = TwistCtrl::from_params(params()).unwrap();

        let (cmd, report) = tc.proc(&input(true, 5.0, 10.0, 0.0)).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(report.brake_mode, BrakeMode::Released);
        assert_eq!(cmd.throttle, 0.2);
        assert_eq!(cmd.brake_nm, 0.0);
        assert_eq!(report.dt_s, 0.0);

        let (_, report) = tc.proc(&input(true, 5.0, 10.0, 0.02)).unwrap();
        assert!((report.dt_s - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_steady_state() {
        let mut tc = TwistCtrl::from_params(params()).unwrap();

        for i in 0..100 {
            let (cmd, report) = tc.proc(&input(true, 8.0, 8.0, i as f64 * 0.02)).unwrap();
            let cmd = cmd.unwrap();
            assert!(report.vel_error_ms.abs() < 1e-9);
            assert!(cmd.throttle < 1e-9);
            assert!(cmd.brake_nm < 1e-6);
        }
    }

    #[test]
    fn test_disabled_outputs_zero() {
        let mut tc = TwistCtrl::from_params(params()).unwrap();

        let (cmd, report) = tc.proc(&input(false, 10.0, 4.0, 0.0)).unwrap();
        assert_eq!(cmd, Some(DbwCmd::zero()));
        assert_eq!(report.brake_mode, BrakeMode::Disabled);

        // Even with no inputs at all
        let (cmd, _) = tc.proc(&InputData::default()).unwrap();
        assert_eq!(cmd, Some(DbwCmd::zero()));
    }

    #[test]
    fn test_missing_inputs_skip() {
        let mut tc = TwistCtrl::from_params(params()).unwrap();

        let mut inp = input(true, 10.0, 4.0, 0.0);
        inp.target = None;
        let (cmd, report) = tc.proc(&inp).unwrap();
        assert!(cmd.is_none());
        assert!(!report.actuated);
    }

    #[test]
    fn test_invalid_measurement() {
        let mut tc = TwistCtrl::from_params(params()).unwrap();

        assert!(matches!(
            tc.proc(&input(true, std::f64::NAN, 4.0, 0.0)),
            Err(TwistCtrlError::InvalidMeasurement(_))
        ));
    }

    #[test]
    fn test_invalid_target() {
        let mut tc = TwistCtrl::from_params(params()).unwrap();

        // Build up some history first
        tc.proc(&input(true, 5.0, 10.0, 0.0)).unwrap();
        tc.proc(&input(true, 5.0, 10.0, 0.02)).unwrap();

        for (linear, angular) in &[
            (std::f64::NAN, std::f64::NAN),
            (4.0, std::f64::NAN),
            (std::f64::INFINITY, 0.0),
        ] {
            let mut inp = input(true, 10.0, 0.0, 0.04);
            inp.target = Some(TwistCmd {
                linear_ms: *linear,
                angular_rads: *angular,
            });
            assert!(matches!(
                tc.proc(&inp),
                Err(TwistCtrlError::InvalidTarget(_, _))
            ));
        }

        // History was discarded, so the next valid cycle starts fresh
        let (_, report) = tc.proc(&input(true, 5.0, 10.0, 0.06)).unwrap();
        assert_eq!(report.dt_s, 0.0);
        assert_eq!(report.filtered_vel_ms, 5.0);
    }

    #[test]
    fn test_reengage_matches_fresh() {
        let sequence: Vec<(f64, f64)> = (0..20)
            .map(|i| (3.0 + 0.1 * i as f64, 8.0 - 0.2 * i as f64))
            .collect();

        // Run for a while, disengage, then re-engage
        let mut used = TwistCtrl::from_params(params()).unwrap();
        for (i, (vel, target)) in sequence.iter().enumerate() {
            used.proc(&input(true, *vel, *target, i as f64 * 0.02)).unwrap();
        }
        used.proc(&input(false, 1.0, 1.0, 0.5)).unwrap();

        let mut fresh = TwistCtrl::from_params(params()).unwrap();

        for (i, (vel, target)) in sequence.iter().enumerate() {
            let t = 10.0 + i as f64 * 0.02;
            let (a, ra) = used.proc(&input(true, *vel, *target, t)).unwrap();
            let (b, rb) = fresh.proc(&input(true, *vel, *target, t)).unwrap();
            assert_eq!(a, b);
            assert_eq!(ra.brake_mode, rb.brake_mode);
            assert_eq!(ra.dt_s, rb.dt_s);
        }
    }
}
