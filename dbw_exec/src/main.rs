//! Main drive-by-wire executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Load the base lane
//!     - Start the input producer, which writes into the input board
//!     - Main loop:
//!         - Take a snapshot of the inputs
//!         - Waypoint updater processing
//!         - Twist controller processing
//!         - Publish outputs
//!
//! # Modules
//!
//! All modules (e.g. `twist_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use dbw_lib::{
    control_loop::ControlLoop,
    inputs::InputBoard,
    params::DbwExecParams,
    publisher::ArchivePublisher,
    twist_ctrl::TwistCtrl,
    waypoint_loader,
    waypoint_updater::{RefLane, WaypointUpdater},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use util::{
    host,
    logger::logger_init,
    module::State,
    script_interpreter::{PendingInputs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period at which the script producer checks for due inputs.
const SCRIPT_POLL_PERIOD_S: f64 = 0.005;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive-by-wire control executable
#[derive(Debug, StructOpt)]
#[structopt(name = "dbw_exec")]
struct Opt {
    /// Input script to play into the exec
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Route file to use instead of the one given in dbw_exec.toml
    #[structopt(short, long, parse(from_os_str))]
    waypoints: Option<PathBuf>,

    /// Stop after this many cycles
    #[structopt(short = "n", long)]
    cycle_limit: Option<u64>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("dbw_exec", "sessions").wrap_err("Failed to create the session")?;

    // Exec params carry the log levels so are loaded before the logger
    let exec_params: DbwExecParams = util::params::load_validated("dbw_exec.toml")
        .wrap_err("Could not load exec params")?;

    // Initialise logger
    logger_init(&exec_params.log, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive-by-wire Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);
    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let waypoint_updater = WaypointUpdater::init("waypoint_updater.toml")
        .wrap_err("Failed to initialise WaypointUpdater")?;
    info!("WaypointUpdater init complete");

    let twist_ctrl =
        TwistCtrl::init("twist_ctrl.toml").wrap_err("Failed to initialise TwistCtrl")?;
    info!("TwistCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- LOAD BASE LANE ----

    let waypoints_path = match opt.waypoints {
        Some(p) => p,
        None => {
            let p = PathBuf::from(&exec_params.waypoints_path);
            if p.is_absolute() {
                p
            } else {
                host::get_sw_root()
                    .wrap_err("Could not find the software root")?
                    .join(p)
            }
        }
    };

    info!("Loading base lane from {:?}", waypoints_path);

    let lane = waypoint_loader::load_csv(&waypoints_path, exec_params.waypoint_speed_ms)
        .wrap_err("Failed to load the base lane")?;
    let lane = RefLane::new(lane).wrap_err("Failed to index the base lane")?;

    let board = Arc::new(InputBoard::new());
    board.set_ref_lane(lane);

    // ---- SHUTDOWN HANDLING ----

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.store(true, Ordering::Release))
            .wrap_err("Failed to set the Ctrl-C handler")?;
    }

    // ---- INPUT PRODUCER ----

    let producer = match opt.script {
        Some(ref script_path) => {
            info!("Loading script from {:?}", script_path);

            let si = ScriptInterpreter::new(script_path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} inputs\n",
                si.get_duration(),
                si.get_num_inputs()
            );

            Some(spawn_script_producer(si, board.clone(), shutdown.clone()))
        }
        None => {
            warn!("No script provided, the exec will run without inputs until stopped\n");
            None
        }
    };

    // ---- MAIN LOOP ----

    let mut publisher =
        ArchivePublisher::new(&session).wrap_err("Failed to create the output archives")?;

    let mut control_loop =
        ControlLoop::new(waypoint_updater, twist_ctrl, exec_params.cycle_frequency_hz);

    info!("Begining main loop\n");

    control_loop.run(&board, &mut publisher, &shutdown, opt.cycle_limit);

    // ---- SHUTDOWN ----

    // Stop the producer if the loop ended first
    shutdown.store(true, Ordering::Release);
    if let Some(p) = producer {
        if p.join().is_err() {
            warn!("Script producer thread panicked");
        }
    }

    info!(
        "End of execution after {} cycles",
        control_loop.data_store().num_cycles
    );

    Ok(())
}

/// Play the script into the input board on its own thread.
///
/// Sets `shutdown` once the end of the script is reached.
fn spawn_script_producer(
    mut si: ScriptInterpreter,
    board: Arc<InputBoard>,
    shutdown: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let start = Instant::now();

        while !shutdown.load(Ordering::Acquire) {
            match si.get_pending_inputs(start.elapsed().as_secs_f64()) {
                PendingInputs::None => (),
                PendingInputs::Some(msgs) => {
                    for msg in msgs {
                        debug!("Script input: {}", msg.type_str());
                        board.apply(msg);
                    }
                }
                PendingInputs::EndOfScript => {
                    info!("End of input script reached, stopping");
                    shutdown.store(true, Ordering::Release);
                    break;
                }
            }

            thread::sleep(Duration::from_secs_f64(SCRIPT_POLL_PERIOD_S));
        }
    })
}
