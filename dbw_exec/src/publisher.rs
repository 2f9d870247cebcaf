//! # Output publishing
//!
//! The control loop hands its outputs to a [`Publisher`] once per cycle. The exec publishes to CSV
//! archives in the session directory.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::path::Path;

// Internal
use comms_if::eqpt::{dbw::DbwCmd, lane::Lane};
use util::{
    archive::{ArchiveError, Archiver},
    session::Session,
};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Destination for the outputs of each cycle.
pub trait Publisher {
    type Error: std::fmt::Display;

    /// Publish the forward trajectory.
    fn publish_trajectory(&mut self, time_s: f64, trajectory: &Lane) -> Result<(), Self::Error>;

    /// Publish the actuation command.
    fn publish_cmd(&mut self, time_s: f64, cmd: &DbwCmd) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Writes outputs to CSV archives.
pub struct ArchivePublisher {
    traj_arch: Archiver,
    cmd_arch: Archiver,
}

/// One row of the actuation command archive.
#[derive(Serialize)]
struct CmdRecord {
    time_s: f64,
    throttle: f64,
    brake_nm: f64,
    steer_rad: f64,
}

/// One row of the trajectory archive, summarising the published window.
#[derive(Serialize)]
struct TrajRecord {
    time_s: f64,
    num_wps: usize,
    first_x_m: f64,
    first_y_m: f64,
    first_velocity_ms: f64,
    min_velocity_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArchivePublisher {
    /// Archive into the session's archive directory.
    pub fn new(session: &Session) -> Result<Self, ArchiveError> {
        Self::in_dir(&session.arch_root)
    }

    /// Archive into the given directory.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ArchiveError> {
        let dir = dir.as_ref();

        Ok(Self {
            traj_arch: Archiver::from_abs_path(dir.join("final_waypoints.csv"))?,
            cmd_arch: Archiver::from_abs_path(dir.join("dbw_cmd.csv"))?,
        })
    }
}

impl Publisher for ArchivePublisher {
    type Error = ArchiveError;

    fn publish_trajectory(&mut self, time_s: f64, trajectory: &Lane) -> Result<(), Self::Error> {
        let (first_x_m, first_y_m, first_velocity_ms) = match trajectory.waypoints.first() {
            Some(wp) => (wp.position_m[0], wp.position_m[1], wp.velocity_ms),
            None => (0.0, 0.0, 0.0),
        };

        let min_velocity_ms = trajectory
            .waypoints
            .iter()
            .map(|wp| wp.velocity_ms)
            .fold(first_velocity_ms, f64::min);

        self.traj_arch.serialise(TrajRecord {
            time_s,
            num_wps: trajectory.len(),
            first_x_m,
            first_y_m,
            first_velocity_ms,
            min_velocity_ms,
        })
    }

    fn publish_cmd(&mut self, time_s: f64, cmd: &DbwCmd) -> Result<(), Self::Error> {
        self.cmd_arch.serialise(CmdRecord {
            time_s,
            throttle: cmd.throttle,
            brake_nm: cmd.brake_nm,
            steer_rad: cmd.steer_rad,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::lane::Waypoint;

    #[test]
    fn test_archive_publisher() {
        let dir = std::env::temp_dir().join("dbw_exec_publisher_test");
        let mut publisher = ArchivePublisher::in_dir(&dir).unwrap();

        publisher
            .publish_cmd(
                0.5,
                &DbwCmd {
                    throttle: 0.2,
                    brake_nm: 0.0,
                    steer_rad: 0.1,
                },
            )
            .unwrap();
        publisher
            .publish_trajectory(
                0.5,
                &Lane::new(vec![
                    Waypoint::new(1.0, 2.0, 4.0),
                    Waypoint::new(2.0, 2.0, 0.0),
                ]),
            )
            .unwrap();

        let cmd = std::fs::read_to_string(dir.join("dbw_cmd.csv")).unwrap();
        let cmd_lines: Vec<&str> = cmd.lines().collect();
        assert_eq!(
            cmd_lines,
            vec!["time_s,throttle,brake_nm,steer_rad", "0.5,0.2,0.0,0.1"]
        );

        let traj = std::fs::read_to_string(dir.join("final_waypoints.csv")).unwrap();
        let traj_lines: Vec<&str> = traj.lines().collect();
        assert_eq!(traj_lines[1], "0.5,2,1.0,2.0,4.0,0.0");

        std::fs::remove_dir_all(dir).ok();
    }
}
