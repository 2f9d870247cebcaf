//! # Control loop
//!
//! Runs the waypoint updater and twist controller once per cycle against a snapshot of the
//! inputs, then publishes their outputs.
//!
//! The forward trajectory is produced whenever both a pose and a lane are available, whether or
//! not drive-by-wire is engaged. Actuation is handled by the twist controller, which outputs the
//! zero command while disengaged.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use crate::{
    data_store::DataStore,
    inputs::{InputBoard, InputSnapshot},
    publisher::Publisher,
    twist_ctrl::{self, TwistCtrl},
    waypoint_updater::{self, WaypointUpdater},
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The fixed rate control loop.
pub struct ControlLoop {
    ds: DataStore,

    /// Target period of one cycle
    period: Duration,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControlLoop {
    pub fn new(
        waypoint_updater: WaypointUpdater,
        twist_ctrl: TwistCtrl,
        cycle_frequency_hz: f64,
    ) -> Self {
        Self {
            ds: DataStore::new(waypoint_updater, twist_ctrl),
            period: Duration::from_secs_f64(1.0 / cycle_frequency_hz),
        }
    }

    pub fn data_store(&self) -> &DataStore {
        &self.ds
    }

    /// Execute one cycle using the given inputs.
    ///
    /// `time_s` must come from a monotonic clock.
    pub fn cycle(&mut self, inputs: &InputSnapshot, time_s: f64) {
        let ds = &mut self.ds;

        ds.cycle_start(time_s);

        // ---- WAYPOINT UPDATER ----

        match (&inputs.lane, &inputs.pose) {
            (Some(lane), Some(pose)) => {
                let wu_input = waypoint_updater::InputData {
                    lane: lane.clone(),
                    pose: *pose,
                    stop: inputs.stop,
                };

                match ds.waypoint_updater.proc(&wu_input) {
                    Ok((o, r)) => {
                        ds.final_waypoints = Some(o);
                        ds.waypoint_updater_status_rpt = Some(r);
                    }
                    Err(e) => warn!("Error during WaypointUpdater processing: {}", e),
                }
            }
            _ => trace!(
                "Skipping trajectory, waiting for inputs (lane: {}, pose: {})",
                inputs.lane.is_some(),
                inputs.pose.is_some()
            ),
        }

        // ---- TWIST CONTROLLER ----

        let tc_input = twist_ctrl::InputData {
            dbw_enabled: inputs.dbw_enabled,
            state: inputs.state,
            target: inputs.twist,
            time_s,
        };

        match ds.twist_ctrl.proc(&tc_input) {
            Ok((o, r)) => {
                ds.dbw_cmd = o;
                ds.twist_ctrl_status_rpt = r;
            }
            Err(e) => warn!("Error during TwistCtrl processing: {}", e),
        }
    }

    /// Publish the outputs of the last cycle.
    pub fn publish<P: Publisher>(&self, publisher: &mut P) {
        if let Some(ref traj) = self.ds.final_waypoints {
            if let Err(e) = publisher.publish_trajectory(self.ds.time_s, traj) {
                warn!("Could not publish the trajectory: {}", e);
            }
        }

        if let Some(ref cmd) = self.ds.dbw_cmd {
            if let Err(e) = publisher.publish_cmd(self.ds.time_s, cmd) {
                warn!("Could not publish the DBW command: {}", e);
            }
        }
    }

    /// Run cycles until `shutdown` is set or `cycle_limit` cycles have been executed.
    ///
    /// The shutdown flag is checked between cycles, a cycle is never interrupted.
    pub fn run<P: Publisher>(
        &mut self,
        board: &InputBoard,
        publisher: &mut P,
        shutdown: &AtomicBool,
        cycle_limit: Option<u64>,
    ) {
        let loop_start_instant = Instant::now();

        loop {
            if shutdown.load(Ordering::Acquire) {
                info!("Shutdown requested, stopping");
                break;
            }

            if let Some(limit) = cycle_limit {
                if self.ds.num_cycles >= limit {
                    info!("Cycle limit of {} reached, stopping", limit);
                    break;
                }
            }

            // Get cycle start time
            let cycle_start_instant = Instant::now();
            let time_s = (cycle_start_instant - loop_start_instant).as_secs_f64();

            // ---- PROCESSING ----

            let inputs = board.snapshot();
            self.cycle(&inputs, time_s);
            self.publish(publisher);

            // ---- CYCLE MANAGEMENT ----

            let cycle_dur = Instant::now() - cycle_start_instant;

            // Get sleep duration
            match self.period.checked_sub(cycle_dur) {
                Some(d) => {
                    self.ds.num_consec_cycle_overruns = 0;
                    thread::sleep(d);
                }
                None => {
                    self.ds.num_consec_cycle_overruns += 1;
                    warn!(
                        "Cycle overran by {:.06} s ({} consecutive)",
                        cycle_dur.as_secs_f64() - self.period.as_secs_f64(),
                        self.ds.num_consec_cycle_overruns
                    );
                }
            }

            self.ds.num_cycles += 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::{
        dbw::{DbwCmd, StopSignal},
        lane::{Lane, Waypoint},
        veh::{TwistCmd, VehPose, VehState},
    };
    use comms_if::input::InputMsg;
    use std::convert::Infallible;

    /// Keeps everything it's given
    #[derive(Default)]
    struct VecPublisher {
        trajectories: Vec<Lane>,
        cmds: Vec<DbwCmd>,
    }

    impl Publisher for VecPublisher {
        type Error = Infallible;

        fn publish_trajectory(&mut self, _: f64, trajectory: &Lane) -> Result<(), Infallible> {
            self.trajectories.push(trajectory.clone());
            Ok(())
        }

        fn publish_cmd(&mut self, _: f64, cmd: &DbwCmd) -> Result<(), Infallible> {
            self.cmds.push(*cmd);
            Ok(())
        }
    }

    fn new_loop() -> ControlLoop {
        ControlLoop::new(
            WaypointUpdater::from_params(waypoint_updater::Params::default()).unwrap(),
            TwistCtrl::from_params(twist_ctrl::Params::default()).unwrap(),
            50.0,
        )
    }

    fn board() -> InputBoard {
        let board = InputBoard::new();
        board.apply(InputMsg::Lane(Lane::new(
            (0..300)
                .map(|i| Waypoint::new(i as f64, 0.0, 10.0))
                .collect(),
        )));
        board.apply(InputMsg::Pose(VehPose::new(20.3, 0.1)));
        board.apply(InputMsg::State(VehState {
            velocity_ms: 6.0,
            angular_velocity_rads: None,
        }));
        board.apply(InputMsg::Twist(TwistCmd {
            linear_ms: 10.0,
            angular_rads: 0.05,
        }));
        board
    }

    #[test]
    fn test_missing_inputs() {
        let mut cl = new_loop();

        // Nothing at all, disengaged: zero command but no trajectory
        cl.cycle(&InputSnapshot::default(), 0.0);
        assert!(cl.data_store().final_waypoints.is_none());
        assert_eq!(cl.data_store().dbw_cmd, Some(DbwCmd::zero()));

        // Engaged with no measurement: nothing to actuate
        let inputs = InputSnapshot {
            dbw_enabled: true,
            ..InputSnapshot::default()
        };
        cl.cycle(&inputs, 0.02);
        assert!(cl.data_store().dbw_cmd.is_none());
    }

    #[test]
    fn test_trajectory_while_disengaged() {
        let mut cl = new_loop();
        let board = board();
        board.apply(InputMsg::Stop(StopSignal::At(50)));

        cl.cycle(&board.snapshot(), 0.0);

        let ds = cl.data_store();
        let traj = ds.final_waypoints.as_ref().unwrap();
        assert_eq!(traj.len(), 100);
        assert_eq!(traj.waypoints[0].position_m[0], 21.0);
        assert_eq!(
            ds.waypoint_updater_status_rpt.and_then(|r| r.stop_rel_index),
            Some(26)
        );
        assert_eq!(ds.dbw_cmd, Some(DbwCmd::zero()));
    }

    #[test]
    fn test_disable_round_trip() {
        let board = board();
        board.apply(InputMsg::DbwEnabled(true));

        let mut fresh = new_loop();
        let mut used = new_loop();

        // Run, then disengage for a few cycles
        for i in 0..25 {
            used.cycle(&board.snapshot(), i as f64 * 0.02);
        }
        board.apply(InputMsg::DbwEnabled(false));
        for i in 25..30 {
            used.cycle(&board.snapshot(), i as f64 * 0.02);
            assert_eq!(used.data_store().dbw_cmd, Some(DbwCmd::zero()));
        }

        // Re-engage and compare with a controller that never ran
        board.apply(InputMsg::DbwEnabled(true));
        for i in 0..25 {
            let snap = board.snapshot();
            let t = 5.0 + i as f64 * 0.02;
            used.cycle(&snap, t);
            fresh.cycle(&snap, t);

            assert_eq!(used.data_store().dbw_cmd, fresh.data_store().dbw_cmd);
            assert!(used.data_store().dbw_cmd.is_some());
        }
    }

    #[test]
    fn test_run_until_limit() {
        let board = board();
        board.apply(InputMsg::DbwEnabled(true));

        let mut cl = new_loop();
        let mut publisher = VecPublisher::default();
        let shutdown = AtomicBool::new(false);

        cl.run(&board, &mut publisher, &shutdown, Some(5));

        assert_eq!(cl.data_store().num_cycles, 5);
        assert_eq!(publisher.trajectories.len(), 5);
        assert_eq!(publisher.cmds.len(), 5);

        // Below target speed, so driving
        assert!(publisher.cmds.iter().all(|c| c.throttle > 0.0 && c.brake_nm == 0.0));
    }

    #[test]
    fn test_run_shutdown() {
        let mut cl = new_loop();
        let mut publisher = VecPublisher::default();
        let shutdown = AtomicBool::new(true);

        cl.run(&InputBoard::new(), &mut publisher, &shutdown, None);
        assert_eq!(cl.data_store().num_cycles, 0);
        assert!(publisher.cmds.is_empty());
    }
}
