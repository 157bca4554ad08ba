//! 3D segment/box intersection by separating axes.
//!
//! A segment is blocked by a box only when it passes through the box
//! interior. Boxes are shrunk slightly before testing, and an axis on which
//! the projections merely meet at an extreme does not count as overlap, so a
//! segment that runs along a face or touches an edge is not blocked.

use crate::config::GeometryTolerances;
use crate::models::{Obstacle, Point3};

type Vec3 = [f64; 3];

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

fn as_vec(p: Point3) -> Vec3 {
    [p.x, p.y, p.z]
}

const BOX_NORMALS: [Vec3; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Segment/box test with configurable tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBoxIntersector {
    /// Inward shrink applied to every box face
    pub box_shrink: f64,
    /// Axes shorter than this are skipped
    pub axis_epsilon: f64,
}

impl Default for SegmentBoxIntersector {
    fn default() -> Self {
        Self::from(&GeometryTolerances::default())
    }
}

impl From<&GeometryTolerances> for SegmentBoxIntersector {
    fn from(t: &GeometryTolerances) -> Self {
        Self {
            box_shrink: t.box_shrink,
            axis_epsilon: t.axis_epsilon,
        }
    }
}

impl SegmentBoxIntersector {
    /// Candidate separating axes for a segment with direction `d`.
    fn axes(&self, d: Vec3) -> ([Vec3; 7], usize) {
        let mut axes = [[0.0; 3]; 7];
        axes[0] = d;
        axes[1..4].copy_from_slice(&BOX_NORMALS);
        let mut len = 4;
        for n in BOX_NORMALS {
            let c = cross(d, n);
            if norm(c) > self.axis_epsilon {
                axes[len] = c;
                len += 1;
            }
        }
        (axes, len)
    }

    /// Projections overlap on `axis` by more than a shared extreme.
    fn overlaps_on(&self, p1: Vec3, p2: Vec3, corners: &[Point3; 8], axis: Vec3) -> bool {
        let length = norm(axis);
        if length < self.axis_epsilon {
            return true;
        }
        let axis = [axis[0] / length, axis[1] / length, axis[2] / length];

        let (a, b) = (dot(p1, axis), dot(p2, axis));
        let (line_min, line_max) = (a.min(b), a.max(b));

        let mut box_min = f64::INFINITY;
        let mut box_max = f64::NEG_INFINITY;
        for corner in corners {
            let proj = dot(as_vec(*corner), axis);
            box_min = box_min.min(proj);
            box_max = box_max.max(proj);
        }

        if line_max < box_min || box_max < line_min {
            return false;
        }
        !(line_min == box_min || line_max == box_max)
    }

    /// Whether segment `p1`–`p2` passes through the interior of `obstacle`.
    pub fn intersects(&self, p1: Point3, p2: Point3, obstacle: &Obstacle) -> bool {
        let (a, b) = (as_vec(p1), as_vec(p2));
        let d = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let (axes, len) = self.axes(d);
        let corners = obstacle.shrunk_vertices(self.box_shrink);
        axes[..len]
            .iter()
            .all(|&axis| self.overlaps_on(a, b, &corners, axis))
    }

    /// Whether any obstacle blocks the segment.
    pub fn blocked(&self, p1: Point3, p2: Point3, obstacles: &[Obstacle]) -> bool {
        obstacles.iter().any(|o| self.intersects(p1, p2, o))
    }
}

/// [`SegmentBoxIntersector::intersects`] with default tolerances.
pub fn segment_intersects_box(p1: Point3, p2: Point3, obstacle: &Obstacle) -> bool {
    SegmentBoxIntersector::default().intersects(p1, p2, obstacle)
}

/// [`SegmentBoxIntersector::blocked`] with default tolerances.
pub fn segment_blocked(p1: Point3, p2: Point3, obstacles: &[Obstacle]) -> bool {
    SegmentBoxIntersector::default().blocked(p1, p2, obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cube() -> Obstacle {
        Obstacle::new(10.0, 10.0, 0.0, 20.0, 20.0, 15.0).unwrap()
    }

    #[test]
    fn segment_through_box_is_blocked() {
        let o = cube();
        assert!(segment_intersects_box(
            Point3::new(0.0, 15.0, 5.0),
            Point3::new(30.0, 15.0, 5.0),
            &o
        ));
        // Diagonal through the interior.
        assert!(segment_intersects_box(
            Point3::new(5.0, 5.0, 1.0),
            Point3::new(25.0, 25.0, 14.0),
            &o
        ));
    }

    #[test]
    fn segment_inside_box_is_blocked() {
        assert!(segment_intersects_box(
            Point3::new(12.0, 12.0, 2.0),
            Point3::new(18.0, 18.0, 8.0),
            &cube()
        ));
    }

    #[test]
    fn segment_clear_of_box_is_free() {
        let o = cube();
        assert!(!segment_intersects_box(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(30.0, 0.0, 5.0),
            &o
        ));
        // Passes over the top.
        assert!(!segment_intersects_box(
            Point3::new(0.0, 15.0, 20.0),
            Point3::new(30.0, 15.0, 20.0),
            &o
        ));
        // Passes diagonally beside the box.
        assert!(!segment_intersects_box(
            Point3::new(0.0, 25.0, 5.0),
            Point3::new(15.0, 40.0, 5.0),
            &o
        ));
    }

    #[test]
    fn flush_segments_are_not_blocked() {
        let o = cube();
        // Along the y = 10 face.
        assert!(!segment_intersects_box(
            Point3::new(0.0, 10.0, 10.0),
            Point3::new(30.0, 10.0, 10.0),
            &o
        ));
        // Along the top edge.
        assert!(!segment_intersects_box(
            Point3::new(10.0, 10.0, 15.0),
            Point3::new(20.0, 10.0, 15.0),
            &o
        ));
        // Corner to corner along a face.
        assert!(!segment_intersects_box(
            Point3::new(10.0, 10.0, 10.0),
            Point3::new(20.0, 10.0, 10.0),
            &o
        ));
    }

    #[test]
    fn degenerate_segment_outside_box_is_free() {
        let p = Point3::new(0.0, 0.0, 0.0);
        assert!(!segment_intersects_box(p, p, &cube()));
    }

    #[test]
    fn blocked_checks_every_obstacle() {
        let obstacles = vec![
            Obstacle::new(100.0, 100.0, 0.0, 110.0, 110.0, 10.0).unwrap(),
            cube(),
        ];
        let a = Point3::new(0.0, 15.0, 5.0);
        let b = Point3::new(30.0, 15.0, 5.0);
        assert!(segment_blocked(a, b, &obstacles));
        assert!(!segment_blocked(a, b, &obstacles[..1]));
        assert!(!segment_blocked(a, b, &[]));
    }

    #[test]
    fn result_does_not_depend_on_endpoint_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let tester = SegmentBoxIntersector::default();
        let o = cube();
        for _ in 0..2000 {
            let mut point = || {
                Point3::new(
                    rng.random_range(0.0..30.0),
                    rng.random_range(0.0..30.0),
                    rng.random_range(-5.0..20.0),
                )
            };
            let a = point();
            let b = point();
            assert_eq!(tester.intersects(a, b, &o), tester.intersects(b, a, &o));
        }
    }
}
