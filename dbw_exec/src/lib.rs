//! # Drive-by-wire library.
//!
//! This library allows other crates in the workspace to access items defined inside the
//! drive-by-wire crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Control loop - runs the modules at a fixed rate and publishes their outputs
pub mod control_loop;

/// Global data store for the executable
pub mod data_store;

/// Input board - latest snapshot of every external input
pub mod inputs;

/// Executable parameters
pub mod params;

/// Output publishing
pub mod publisher;

/// Twist controller - converts the target twist into throttle, brake and steering demands
pub mod twist_ctrl;

/// Waypoint loader - reads the base lane from a route file
pub mod waypoint_loader;

/// Waypoint updater - publishes the part of the lane ahead of the vehicle, shaped for stops
pub mod waypoint_updater;
