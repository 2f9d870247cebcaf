//! # Spatial index
//!
//! Nearest waypoint lookup over the XY positions of the base lane. The index is built once when a
//! lane is loaded and then queried every cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use super::WaypointUpdaterError;
use comms_if::eqpt::lane::{Lane, Waypoint};
use util::quadtree::QuadTree;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Nearest-point index over a non-empty set of 2D positions.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: QuadTree,
}

/// A reference lane together with the index built over it.
///
/// The lane can never be empty, so every query against the index has an answer.
#[derive(Debug, Clone)]
pub struct RefLane {
    lane: Lane,
    index: SpatialIndex,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SpatialIndex {
    /// Build the index over the XY positions of the given waypoints.
    pub fn build(waypoints: &[Waypoint]) -> Result<Self, WaypointUpdaterError> {
        if waypoints.is_empty() {
            return Err(WaypointUpdaterError::EmptyLane);
        }

        let points: Vec<Vector2<f64>> = waypoints.iter().map(|wp| wp.position2()).collect();

        let tree = QuadTree::from_points(&points).map_err(WaypointUpdaterError::IndexError)?;

        Ok(Self { tree })
    }

    /// Index of the waypoint nearest to `point`.
    ///
    /// Equidistant waypoints resolve to the lowest index.
    pub fn query(&self, point: &Vector2<f64>) -> usize {
        // The tree was built from a non-empty set, so it always has a nearest point
        self.tree.nearest(point).map(|(i, _)| i).unwrap_or(0)
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl RefLane {
    /// Validate the lane and build its index.
    pub fn new(lane: Lane) -> Result<Self, WaypointUpdaterError> {
        let index = SpatialIndex::build(&lane.waypoints)?;
        Ok(Self { lane, index })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.lane.waypoints
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Number of waypoints in the lane, never zero.
    pub fn len(&self) -> usize {
        self.lane.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
