//! Waypoint updater module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;
use std::sync::Arc;

// Internal
use super::{path_window, DecelProfile, Params, RefLane, WaypointUpdaterError};
use comms_if::eqpt::{dbw::StopSignal, lane::Lane, veh::VehPose};
use util::{module::State, params::Validate};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Waypoint updater module state
#[derive(Default)]
pub struct WaypointUpdater {
    params: Params,

    report: StatusReport,

    /// Stop index the current profile was shaped for, used to log changes only
    active_stop: Option<usize>,
}

/// Input data to the waypoint updater.
pub struct InputData {
    /// The base lane and its index
    pub lane: Arc<RefLane>,

    pub pose: VehPose,

    pub stop: StopSignal,
}

/// The status report containing monitoring quantities.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Index in the base lane of the first waypoint ahead of the vehicle
    pub forward_index: usize,

    /// Number of waypoints published
    pub window_len: usize,

    /// Index within the window at which the stop profile reaches zero, if one was applied
    pub stop_rel_index: Option<usize>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for WaypointUpdater {
    type Params = Params;
    type InitError = WaypointUpdaterError;

    type InputData = InputData;
    type OutputData = Lane;
    type StatusReport = StatusReport;
    type ProcError = WaypointUpdaterError;

    fn from_params(params: Params) -> Result<Self, WaypointUpdaterError> {
        params.validate()?;

        Ok(Self {
            params,
            ..Default::default()
        })
    }

    /// Produce the forward trajectory for the current pose and stop signal.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        let lane = &input_data.lane;

        let position_m = input_data.pose.position_m;
        if !(position_m[0].is_finite() && position_m[1].is_finite()) {
            self.active_stop = None;
            return Err(WaypointUpdaterError::InvalidPose(position_m[0], position_m[1]));
        }

        // ---- WINDOW ----

        let start = path_window::resolve_forward_index(&input_data.pose, lane);
        let window = path_window::slice(lane, start, self.params.lookahead_wps);

        self.report.forward_index = start;
        self.report.window_len = window.len();

        // ---- STOP PROFILE ----

        let waypoints = match input_data.stop.index() {
            Some(stop_abs) => {
                let (shaped, stop_rel) = DecelProfile::from_params(&self.params).shape(
                    window,
                    stop_abs,
                    start,
                    lane.len(),
                );
                self.report.stop_rel_index = stop_rel;

                let applied = stop_rel.map(|_| stop_abs);
                if applied != self.active_stop {
                    match applied {
                        Some(i) => debug!("Stopping at lane waypoint {}", i),
                        None => debug!("Stop at waypoint {} is outside the lookahead", stop_abs),
                    }
                    self.active_stop = applied;
                }

                shaped
            }
            None => {
                if self.active_stop.take().is_some() {
                    debug!("Stop cleared");
                }
                window
            }
        };

        trace!(
            "WaypointUpdater: forward index {}, {} waypoints, stop {:?}",
            start,
            waypoints.len(),
            self.report.stop_rel_index
        );

        Ok((Lane::new(waypoints), self.report))
    }
}
