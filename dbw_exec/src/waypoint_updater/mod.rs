//! # Waypoint updater module
//!
//! The waypoint updater publishes the part of the base lane that lies ahead of the vehicle. Every
//! cycle it:
//!
//!  1. Finds the waypoint nearest to the vehicle using a spatial index built once per lane, then
//!     steps forward one waypoint if that nearest waypoint is already behind the vehicle.
//!  1. Slices a fixed number of waypoints from that index, wrapping round the end of the lane so
//!     that loop routes work.
//!  1. If a stop has been requested inside the slice, reshapes the slice's target velocities so
//!     the vehicle comes to rest a few waypoints before the stop index with a constant
//!     deceleration profile.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod decel;
pub mod params;
pub mod path_window;
pub mod spatial_index;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use decel::DecelProfile;
pub use params::Params;
pub use spatial_index::{RefLane, SpatialIndex};
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during WaypointUpdater operation.
#[derive(Debug, thiserror::Error)]
pub enum WaypointUpdaterError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    /// The reference lane must contain at least one waypoint before an index can be built for it.
    #[error("Attempted to load an empty lane")]
    EmptyLane,

    #[error("Could not build the spatial index for the lane: {0}")]
    IndexError(util::quadtree::QuadTreeError),

    #[error("Vehicle position is not finite ({0}, {1})")]
    InvalidPose(f64, f64),
}
