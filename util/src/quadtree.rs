//! # Quadtree Implementation
//!
//! This is an implementation of a point quadtree, as described in [the wikipedia
//! article](https://en.wikipedia.org/wiki/Quadtree), storing indexed points and answering nearest
//! neighbour queries.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use nalgebra::Vector2;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Number of points per QuadTree node before it is subdivided
pub const CAPACITY: usize = 4;

/// Maximum depth of the tree. Nodes at this depth hold any number of points, which stops
/// coincident points from subdividing forever.
pub const MAX_DEPTH: usize = 24;

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Represents a square quad with a centre and half-width.
///
/// A quad covers the half-open range `[centre - half_width, centre + half_width)` on both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quad {
    centre: Vector2<f64>,
    half_width: f64,
}

/// An implementation of a QuadTree
#[derive(Clone, Debug)]
pub struct QuadTree {
    /// The bounds of this node
    boundary: Quad,

    /// Depth of this node, the root is at 0
    depth: usize,

    /// Points stored in this node, with the id they were inserted with
    points: Vec<(Vector2<f64>, usize)>,

    /// Children of the node, in the order north west, north east, south west, south east.
    children: Option<Box<[QuadTree; 4]>>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum QuadTreeError {
    #[error("The given point {0} was not in the bounds of the quadtree {1:?}")]
    PointNotInBounds(Vector2<f64>, Quad),

    #[error("Cannot build a quadtree from an empty set of points")]
    NoPoints,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Quad {
    /// Creates a new quad with the given `centre` and `half_width`.
    pub fn new(centre: Vector2<f64>, half_width: f64) -> Self {
        Self {
            centre,
            half_width,
        }
    }

    /// Create the smallest quad (plus a margin) which contains all of `points`.
    ///
    /// Returns `None` if there are no finite points.
    pub fn bounding<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vector2<f64>>,
    {
        let mut min = Vector2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

        for p in points.into_iter().filter(|p| p[0].is_finite() && p[1].is_finite()) {
            min = min.inf(p);
            max = max.sup(p);
        }

        if min[0] > max[0] {
            return None;
        }

        // The margin keeps the maximum point strictly inside the half-open bounds
        let extent = max - min;
        Some(Self::new(
            (min + max) * 0.5,
            0.5 * extent[0].max(extent[1]) + 1.0,
        ))
    }

    /// Returns `true` if `point` is inside this [`Quad`]
    pub fn contains(&self, point: &Vector2<f64>) -> bool {
        (self.centre[0] - self.half_width) <= point[0]
            && (self.centre[0] + self.half_width) > point[0]
            && (self.centre[1] - self.half_width) <= point[1]
            && (self.centre[1] + self.half_width) > point[1]
    }

    /// Squared distance from `point` to the closest part of this quad, zero if the point is inside.
    pub fn dist_sq_to(&self, point: &Vector2<f64>) -> f64 {
        let dx = ((point[0] - self.centre[0]).abs() - self.half_width).max(0.0);
        let dy = ((point[1] - self.centre[1]).abs() - self.half_width).max(0.0);
        dx * dx + dy * dy
    }
}

impl QuadTree {
    pub fn new(boundary: Quad) -> Self {
        Self::new_at_depth(boundary, 0)
    }

    /// Build a tree over `points`, each point's id being its position in the iterator.
    pub fn from_points(points: &[Vector2<f64>]) -> Result<Self, QuadTreeError> {
        let boundary = Quad::bounding(points.iter()).ok_or(QuadTreeError::NoPoints)?;

        let mut tree = Self::new(boundary);
        for (id, point) in points.iter().enumerate() {
            tree.insert(*point, id)?;
        }

        Ok(tree)
    }

    /// Insert a point into the QuadTree.
    pub fn insert(&mut self, point: Vector2<f64>, id: usize) -> Result<(), QuadTreeError> {
        // Check if it's in the tree
        if !self.boundary.contains(&point) {
            return Err(QuadTreeError::PointNotInBounds(point, self.boundary));
        }

        self.insert_unchecked(point, id);
        Ok(())
    }

    /// Return the id and squared distance of the point nearest to `point`.
    ///
    /// If several points are equally near the lowest id is returned. Returns `None` only if the
    /// tree is empty.
    pub fn nearest(&self, point: &Vector2<f64>) -> Option<(usize, f64)> {
        let mut best = None;
        self.nearest_in(point, &mut best);
        best.map(|(d, id)| (id, d))
    }

    /// Number of points stored in the tree
    pub fn len(&self) -> usize {
        self.points.len()
            + match self.children {
                Some(ref c) => c.iter().map(|qt| qt.len()).sum(),
                None => 0,
            }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn new_at_depth(boundary: Quad, depth: usize) -> Self {
        Self {
            boundary,
            depth,
            points: Vec::new(),
            children: None,
        }
    }

    fn insert_unchecked(&mut self, point: Vector2<f64>, id: usize) {
        // Leaf nodes take the point while they have space, or if they cannot be divided any more
        if self.children.is_none() {
            if self.points.len() < CAPACITY || self.depth >= MAX_DEPTH {
                self.points.push((point, id));
                return;
            }

            self.subdivide();
        }

        let child = self.child_index(&point);
        if let Some(ref mut children) = self.children {
            children[child].insert_unchecked(point, id);
        }
    }

    /// Index of the child quad covering `point`. The comparison is the same one used to split the
    /// parent, so a point on a split line always lands in exactly one child.
    fn child_index(&self, point: &Vector2<f64>) -> usize {
        let east = point[0] >= self.boundary.centre[0];
        let north = point[1] >= self.boundary.centre[1];

        match (north, east) {
            (true, false) => 0,
            (true, true) => 1,
            (false, false) => 2,
            (false, true) => 3,
        }
    }

    fn subdivide(&mut self) {
        let hw = self.boundary.half_width / 2.0;
        let c = self.boundary.centre;
        let d = self.depth + 1;

        self.children = Some(Box::new([
            QuadTree::new_at_depth(Quad::new(c + Vector2::new(-hw, hw), hw), d),
            QuadTree::new_at_depth(Quad::new(c + Vector2::new(hw, hw), hw), d),
            QuadTree::new_at_depth(Quad::new(c + Vector2::new(-hw, -hw), hw), d),
            QuadTree::new_at_depth(Quad::new(c + Vector2::new(hw, -hw), hw), d),
        ]));

        // Push this node's points down into the new children
        for (point, id) in std::mem::take(&mut self.points) {
            let child = self.child_index(&point);
            if let Some(ref mut children) = self.children {
                children[child].insert_unchecked(point, id);
            }
        }
    }

    fn nearest_in(&self, point: &Vector2<f64>, best: &mut Option<(f64, usize)>) {
        // Nothing in this node can beat the current best
        if let Some((best_d, _)) = *best {
            if self.boundary.dist_sq_to(point) > best_d {
                return;
            }
        }

        for (p, id) in self.points.iter() {
            let d = (p - point).norm_squared();
            let better = match *best {
                None => true,
                Some((best_d, best_id)) => d < best_d || (d == best_d && *id < best_id),
            };
            if better {
                *best = Some((d, *id));
            }
        }

        // Search the children closest first so the bound tightens quickly
        if let Some(ref children) = self.children {
            let mut order: [(f64, usize); 4] = [(0.0, 0); 4];
            for (i, qt) in children.iter().enumerate() {
                order[i] = (qt.boundary.dist_sq_to(point), i);
            }
            order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            for (_, i) in order.iter() {
                children[*i].nearest_in(point, best);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn brute_nearest(points: &[Vector2<f64>], q: &Vector2<f64>) -> usize {
        let mut best = 0;
        for (i, p) in points.iter().enumerate() {
            if (p - q).norm_squared() < (points[best] - q).norm_squared() {
                best = i;
            }
        }
        best
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        // A spiral gives points at a spread of scales
        let points: Vec<Vector2<f64>> = (0..500)
            .map(|i| {
                let t = i as f64 * 0.1;
                Vector2::new(t * t.cos(), t * t.sin())
            })
            .collect();

        let tree = QuadTree::from_points(&points).unwrap();
        assert_eq!(tree.len(), 500);

        for j in 0..100 {
            let q = Vector2::new((j as f64 * 0.77).sin() * 40.0, (j as f64 * 1.3).cos() * 40.0);
            let (id, d) = tree.nearest(&q).unwrap();
            assert_eq!(id, brute_nearest(&points, &q));
            assert!((d - (points[id] - q).norm_squared()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_coincident_points_prefer_lowest_id() {
        let points = vec![Vector2::new(1.0, 1.0); 40];
        let tree = QuadTree::from_points(&points).unwrap();
        assert_eq!(tree.nearest(&Vector2::new(5.0, 5.0)).unwrap().0, 0);
    }

    #[test]
    fn test_bounds() {
        assert!(matches!(
            QuadTree::from_points(&[]),
            Err(QuadTreeError::NoPoints)
        ));

        let mut tree = QuadTree::new(Quad::new(Vector2::new(0.0, 0.0), 1.0));
        assert!(tree.insert(Vector2::new(0.5, -0.5), 0).is_ok());
        assert!(matches!(
            tree.insert(Vector2::new(1.0, 0.0), 1),
            Err(QuadTreeError::PointNotInBounds(_, _))
        ));
    }

    #[test]
    fn test_quad_dist() {
        let q = Quad::new(Vector2::new(0.0, 0.0), 1.0);
        assert_eq!(q.dist_sq_to(&Vector2::new(0.5, 0.5)), 0.0);
        assert_eq!(q.dist_sq_to(&Vector2::new(3.0, 0.0)), 4.0);
        assert_eq!(q.dist_sq_to(&Vector2::new(4.0, 5.0)), 9.0 + 16.0);
    }
}
