//! # Data Store

use comms_if::eqpt::{dbw::DbwCmd, lane::Lane};

use crate::{twist_ctrl, waypoint_updater};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// Time of the current cycle since the loop started
    pub time_s: f64,

    // WaypointUpdater
    pub waypoint_updater: waypoint_updater::WaypointUpdater,
    pub final_waypoints: Option<Lane>,
    pub waypoint_updater_status_rpt: Option<waypoint_updater::StatusReport>,

    // TwistCtrl
    pub twist_ctrl: twist_ctrl::TwistCtrl,
    pub dbw_cmd: Option<DbwCmd>,
    pub twist_ctrl_status_rpt: twist_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Create a data store around already initialised modules.
    pub fn new(
        waypoint_updater: waypoint_updater::WaypointUpdater,
        twist_ctrl: twist_ctrl::TwistCtrl,
    ) -> Self {
        Self {
            waypoint_updater,
            twist_ctrl,
            ..Default::default()
        }
    }

    /// Clear the outputs of the previous cycle.
    pub fn cycle_start(&mut self, time_s: f64) {
        self.time_s = time_s;

        self.final_waypoints = None;
        self.waypoint_updater_status_rpt = None;
        self.dbw_cmd = None;
        self.twist_ctrl_status_rpt = twist_ctrl::StatusReport::default();
    }
}
