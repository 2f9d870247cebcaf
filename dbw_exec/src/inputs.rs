//! # Input board
//!
//! Latest value of every externally produced input. Producers write into the board from their own
//! threads at whatever rate they run, and the control loop takes one [`InputSnapshot`] at the
//! start of each cycle. Every input is replaced whole, so a cycle never sees a partially updated
//! value.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

// Internal
use crate::waypoint_updater::RefLane;
use comms_if::{
    eqpt::{
        dbw::StopSignal,
        lane::Lane,
        veh::{TwistCmd, VehPose, VehState},
    },
    input::InputMsg,
};
use util::snapshot::SnapshotCell;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Shared store of the latest inputs.
#[derive(Debug, Default)]
pub struct InputBoard {
    lane: SnapshotCell<RefLane>,
    pose: SnapshotCell<VehPose>,
    state: SnapshotCell<VehState>,
    twist: SnapshotCell<TwistCmd>,
    stop: SnapshotCell<StopSignal>,

    /// Drive-by-wire engaged, disengaged until told otherwise
    dbw_enabled: AtomicBool,
}

/// The inputs seen by one control cycle.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pub lane: Option<Arc<RefLane>>,
    pub pose: Option<VehPose>,
    pub state: Option<VehState>,
    pub twist: Option<TwistCmd>,
    pub stop: StopSignal,
    pub dbw_enabled: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an input message to the board.
    pub fn apply(&self, msg: InputMsg) {
        match msg {
            InputMsg::Lane(lane) => self.set_lane(lane),
            InputMsg::Pose(pose) => self.pose.store(pose),
            InputMsg::State(state) => self.state.store(state),
            InputMsg::Twist(twist) => self.twist.store(twist),
            InputMsg::Stop(stop) => self.stop.store(stop),
            InputMsg::DbwEnabled(enabled) => self.set_dbw_enabled(enabled),
        }
    }

    /// Replace the base lane, building its index.
    ///
    /// An empty lane is rejected and the previous lane, if any, is kept.
    pub fn set_lane(&self, lane: Lane) {
        let num_wps = lane.len();

        match RefLane::new(lane) {
            Ok(l) => self.set_ref_lane(l),
            Err(e) => warn!("Rejected base lane with {} waypoints: {}", num_wps, e),
        }
    }

    /// Replace the base lane with one that has already been indexed.
    pub fn set_ref_lane(&self, lane: RefLane) {
        let num_wps = lane.len();
        self.lane.store(lane);
        info!("Base lane loaded with {} waypoints", num_wps);
    }

    pub fn set_dbw_enabled(&self, enabled: bool) {
        self.dbw_enabled.store(enabled, Ordering::Release);
    }

    /// Take a snapshot of every input.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            lane: self.lane.load(),
            pose: self.pose.load_copy(),
            state: self.state.load_copy(),
            twist: self.twist.load_copy(),
            stop: self.stop.load_copy().unwrap_or_default(),
            dbw_enabled: self.dbw_enabled.load(Ordering::Acquire),
        }
    }
}
