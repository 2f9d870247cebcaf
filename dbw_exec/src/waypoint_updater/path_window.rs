//! # Path window
//!
//! Resolves which waypoint of the lane is the next one ahead of the vehicle, and slices the
//! lookahead window from the lane.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::RefLane;
use comms_if::eqpt::{lane::Waypoint, veh::VehPose};
use util::maths::wrap_index;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the index of the first lane waypoint ahead of the vehicle.
///
/// The nearest waypoint may be behind the vehicle. To tell, take the plane through the nearest
/// waypoint which is normal to the segment arriving at it from the previous waypoint. If the
/// vehicle is on the far side of that plane the nearest waypoint is behind it, and the next one
/// is used instead.
pub fn resolve_forward_index(pose: &VehPose, lane: &RefLane) -> usize {
    let wps = lane.waypoints();
    let len = wps.len();

    let closest = lane.index().query(&pose.position_m);

    // The lane is circular, so the waypoint before the first is the last
    let prev_m = wps[wrap_index(closest as i64 - 1, len)].position2();
    let closest_m = wps[closest].position2();

    let seg_vec = closest_m - prev_m;
    let pos_vec = pose.position_m - closest_m;

    if seg_vec.dot(&pos_vec) > 0.0 {
        (closest + 1) % len
    } else {
        closest
    }
}

/// Number of waypoints in the lookahead window for a lane of the given length.
///
/// The window never holds the same waypoint twice, so on lanes shorter than the lookahead it is
/// the whole lane.
pub fn window_len(lane_len: usize, lookahead_wps: usize) -> usize {
    lookahead_wps.min(lane_len)
}

/// Slice `lookahead_wps` waypoints starting at `start`, wrapping around the end of the lane.
pub fn slice(lane: &RefLane, start: usize, lookahead_wps: usize) -> Vec<Waypoint> {
    let wps = lane.waypoints();
    let len = wps.len();

    wps.iter()
        .cycle()
        .skip(start % len)
        .take(window_len(len, lookahead_wps))
        .copied()
        .collect()
}
