//! # Waypoint loader
//!
//! Loads the base lane from a route file. Route files are headerless CSV with one waypoint per
//! row in `x,y,z,yaw` order, positions in meters and yaw in radians. Every waypoint is given the
//! same target velocity.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use comms_if::eqpt::lane::{Lane, Waypoint};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RouteRow {
    x: f64,
    y: f64,
    z: f64,

    // Heading is implied by the order of the waypoints
    #[allow(dead_code)]
    yaw: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WaypointLoadError {
    #[error("Could not open the route file {0:?}: {1}")]
    FileError(PathBuf, std::io::Error),

    #[error("Invalid route row {0}: {1}")]
    InvalidRow(usize, csv::Error),

    #[error("The route contains no waypoints")]
    NoWaypoints,

    #[error("Waypoint speed must be finite and non-negative, found {0}")]
    InvalidSpeed(f64),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Load the route file at `path`, giving each waypoint a target velocity of `speed_ms`.
pub fn load_csv<P: AsRef<Path>>(path: P, speed_ms: f64) -> Result<Lane, WaypointLoadError> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| WaypointLoadError::FileError(path.as_ref().to_path_buf(), e))?;

    from_reader(file, speed_ms)
}

/// Load a route from any reader.
pub fn from_reader<R: Read>(reader: R, speed_ms: f64) -> Result<Lane, WaypointLoadError> {
    if !(speed_ms.is_finite() && speed_ms >= 0.0) {
        return Err(WaypointLoadError::InvalidSpeed(speed_ms));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut waypoints = Vec::new();

    for (i, row) in rdr.deserialize::<RouteRow>().enumerate() {
        let row = row.map_err(|e| WaypointLoadError::InvalidRow(i + 1, e))?;

        waypoints.push(Waypoint {
            position_m: Vector3::new(row.x, row.y, row.z),
            velocity_ms: speed_ms,
        });
    }

    if waypoints.is_empty() {
        return Err(WaypointLoadError::NoWaypoints);
    }

    Ok(Lane::new(waypoints))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_route() {
        let route = "909.48,1128.67,0.0,0.0\n\
                     910.43, 1128.67, 0.0, 0.0\n\
                     911.38,1128.67,0.0,0.0\n";

        let lane = from_reader(route.as_bytes(), 11.11).unwrap();
        assert_eq!(lane.len(), 3);
        assert_eq!(lane.waypoints[1].position_m, Vector3::new(910.43, 1128.67, 0.0));
        assert!(lane.waypoints.iter().all(|wp| wp.velocity_ms == 11.11));
    }

    #[test]
    fn test_invalid_routes() {
        assert!(matches!(
            from_reader("".as_bytes(), 10.0),
            Err(WaypointLoadError::NoWaypoints)
        ));
        assert!(matches!(
            from_reader("1.0,2.0,0.0,0.0\n1.0,abc,0.0,0.0\n".as_bytes(), 10.0),
            Err(WaypointLoadError::InvalidRow(2, _))
        ));
        assert!(matches!(
            from_reader("1.0,2.0,0.0,0.0\n".as_bytes(), -1.0),
            Err(WaypointLoadError::InvalidSpeed(_))
        ));
        assert!(matches!(
            load_csv("/this/route/does/not/exist.csv", 10.0),
            Err(WaypointLoadError::FileError(_, _))
        ));
    }
}
