//! Planar geometry on obstacle footprints: segment crossings, rectangle
//! occlusion and the convex hull used for obstacle selection.

use crate::models::Footprint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Absorbs rounding in orientation tests. Coordinates are meters.
const EPS_M: f64 = 1e-9;

fn orient(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> f64 {
    (q.0 - p.0) * (r.1 - p.1) - (q.1 - p.1) * (r.0 - p.0)
}

/// Closed segment/segment intersection (touching and collinear overlap count).
pub fn segments_intersect_2d(
    a1: (f64, f64),
    a2: (f64, f64),
    b1: (f64, f64),
    b2: (f64, f64),
) -> bool {
    fn within(a: f64, b: f64, value: f64) -> bool {
        let min = a.min(b) - EPS_M;
        let max = a.max(b) + EPS_M;
        value >= min && value <= max
    }

    fn on_segment(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> bool {
        within(p.0, q.0, r.0) && within(p.1, q.1, r.1)
    }

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if o1.abs() <= EPS_M && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() <= EPS_M && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() <= EPS_M && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() <= EPS_M && on_segment(b1, b2, a2) {
        return true;
    }

    let a_crosses = (o1 > EPS_M && o2 < -EPS_M) || (o1 < -EPS_M && o2 > EPS_M);
    let b_crosses = (o3 > EPS_M && o4 < -EPS_M) || (o3 < -EPS_M && o4 > EPS_M);
    a_crosses && b_crosses
}

/// Closed test: does segment `a`–`b` touch the rectangle (boundary or interior)?
pub fn segment_intersects_rect(a: (f64, f64), b: (f64, f64), rect: &Footprint) -> bool {
    if rect.is_empty() {
        return false;
    }
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    rect.edges()
        .iter()
        .any(|&(e1, e2)| segments_intersect_2d(a, b, e1, e2))
}

/// Move `to` further along `from -> to` by `ratio` of the 2D delta.
///
/// A zero-length delta returns `to` unchanged.
pub fn extend_past(from: (f64, f64), to: (f64, f64), ratio: f64) -> (f64, f64) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    if (dx * dx + dy * dy).sqrt() == 0.0 {
        return to;
    }
    (to.0 + ratio * dx, to.1 + ratio * dy)
}

/// Occlusion of a corner by its own footprint.
///
/// Extends `from -> to` slightly past `to` and reports whether that segment
/// enters `footprint` once shrunk by `shrink`. A segment that merely grazes the
/// corner stays outside; one that would continue into the obstacle does not.
pub fn footprint_occludes(
    from: (f64, f64),
    to: (f64, f64),
    footprint: &Footprint,
    extension_ratio: f64,
    shrink: f64,
) -> bool {
    let extended = extend_past(from, to, extension_ratio);
    segment_intersects_rect(from, extended, &footprint.shrunk(shrink))
}

/// Convex hull of a planar point set, counter-clockwise, collinear points dropped.
///
/// Degenerate inputs give a hull of one (a point) or two (a segment) vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvexHull {
    pub vertices: Vec<(f64, f64)>,
}

impl ConvexHull {
    /// Andrew's monotone chain.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut pts: Vec<(f64, f64)> = points
            .iter()
            .copied()
            .filter(|p| p.0.is_finite() && p.1.is_finite())
            .collect();
        pts.sort_by(|a, b| match a.0.total_cmp(&b.0) {
            Ordering::Equal => a.1.total_cmp(&b.1),
            other => other,
        });
        pts.dedup();

        if pts.len() < 3 {
            return Self { vertices: pts };
        }

        let mut lower: Vec<(f64, f64)> = Vec::with_capacity(pts.len());
        for &p in &pts {
            while lower.len() >= 2 && orient(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
                lower.pop();
            }
            lower.push(p);
        }

        let mut upper: Vec<(f64, f64)> = Vec::with_capacity(pts.len());
        for &p in pts.iter().rev() {
            while upper.len() >= 2 && orient(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
                upper.pop();
            }
            upper.push(p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);
        Self { vertices: lower }
    }

    /// Hull of every corner of the given footprints.
    pub fn of_footprints<'a, I>(footprints: I) -> Self
    where
        I: IntoIterator<Item = &'a Footprint>,
    {
        let points: Vec<(f64, f64)> = footprints
            .into_iter()
            .flat_map(|fp| fp.corners())
            .collect();
        Self::from_points(&points)
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Closed point containment.
    pub fn contains(&self, p: (f64, f64)) -> bool {
        match self.vertices.as_slice() {
            [] => false,
            [only] => *only == p,
            [a, b] => segments_intersect_2d(*a, *b, p, p),
            vertices => {
                let n = vertices.len();
                (0..n).all(|i| orient(vertices[i], vertices[(i + 1) % n], p) >= -EPS_M)
            }
        }
    }

    /// Closed hull/rectangle intersection.
    pub fn intersects_rect(&self, rect: &Footprint) -> bool {
        match self.vertices.as_slice() {
            [] => false,
            [only] => rect.contains(*only),
            [a, b] => segment_intersects_rect(*a, *b, rect),
            vertices => {
                if rect.corners().iter().any(|&c| self.contains(c)) {
                    return true;
                }
                let n = vertices.len();
                (0..n).any(|i| segment_intersects_rect(vertices[i], vertices[(i + 1) % n], rect))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Footprint {
        Footprint {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect_2d((0.0, 0.0), (10.0, 10.0), (0.0, 10.0), (10.0, 0.0)));
        assert!(!segments_intersect_2d((0.0, 0.0), (10.0, 0.0), (0.0, 1.0), (10.0, 1.0)));
        // Touching at an endpoint counts.
        assert!(segments_intersect_2d((0.0, 0.0), (5.0, 5.0), (5.0, 5.0), (9.0, 0.0)));
    }

    #[test]
    fn segment_rect_closed_semantics() {
        let r = rect(10.0, 10.0, 20.0, 20.0);
        assert!(segment_intersects_rect((0.0, 15.0), (30.0, 15.0), &r));
        assert!(segment_intersects_rect((12.0, 12.0), (13.0, 13.0), &r));
        // Runs along the bottom edge.
        assert!(segment_intersects_rect((0.0, 10.0), (30.0, 10.0), &r));
        assert!(!segment_intersects_rect((0.0, 0.0), (60.0, 0.0), &r));
        assert!(!segment_intersects_rect((0.0, 0.0), (30.0, 9.0), &r));
    }

    #[test]
    fn extension_is_proportional_and_degenerate_safe() {
        assert_eq!(extend_past((0.0, 0.0), (10.0, 20.0), 0.01), (10.1, 20.2));
        assert_eq!(extend_past((3.0, 4.0), (3.0, 4.0), 0.01), (3.0, 4.0));
    }

    #[test]
    fn corner_approached_from_outside_is_not_occluded() {
        let fp = rect(40.0, 10.0, 50.0, 20.0);
        // Grazing the bottom-right corner, heading away from the box.
        assert!(!footprint_occludes((0.0, 0.0), (50.0, 10.0), &fp, 0.01, 1e-4));
        // Heading into the box through the bottom-left corner.
        assert!(footprint_occludes((0.0, 0.0), (40.0, 10.0), &fp, 0.01, 1e-4));
        // Sliding along the bottom edge.
        assert!(!footprint_occludes((10.0, 10.0), (40.0, 10.0), &fp, 0.01, 1e-4));
    }

    #[test]
    fn hull_of_two_rectangles() {
        let hull = ConvexHull::of_footprints(&[rect(10.0, 10.0, 20.0, 20.0), rect(40.0, 10.0, 50.0, 20.0)]);
        assert_eq!(
            hull.vertices,
            vec![(10.0, 10.0), (50.0, 10.0), (50.0, 20.0), (10.0, 20.0)]
        );
        assert!(hull.contains((30.0, 15.0)));
        assert!(hull.contains((10.0, 15.0)));
        assert!(!hull.contains((30.0, 25.0)));
        assert!(hull.intersects_rect(&rect(25.0, 18.0, 35.0, 40.0)));
        assert!(hull.intersects_rect(&rect(0.0, 0.0, 100.0, 100.0)));
        assert!(!hull.intersects_rect(&rect(25.0, 21.0, 35.0, 40.0)));
    }

    #[test]
    fn degenerate_hulls() {
        assert!(ConvexHull::from_points(&[]).is_empty());
        assert!(!ConvexHull::default().intersects_rect(&rect(0.0, 0.0, 1.0, 1.0)));

        let point = ConvexHull::from_points(&[(1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(point.vertices.len(), 1);
        assert!(point.intersects_rect(&rect(0.0, 0.0, 2.0, 2.0)));

        let line = ConvexHull::from_points(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
        assert_eq!(line.vertices, vec![(0.0, 0.0), (10.0, 10.0)]);
        assert!(line.intersects_rect(&rect(4.0, 4.0, 6.0, 6.0)));
        assert!(!line.intersects_rect(&rect(6.0, 0.0, 8.0, 2.0)));
    }
}
