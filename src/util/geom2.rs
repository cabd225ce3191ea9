//! 2D distance, containment and intersection queries.
//!
//! Polygons are slices of points, implicitly closed: the last point connects back to the first.
//! Rectangles are anything implementing [`AxisAlignedExtent`]. "No intersection" is reported as
//! `false` or `None`, never as an error.

use itertools::Itertools;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::PARALLEL_LINE_TOLERANCE;
use crate::util::bbox::AxisAlignedExtent;
use crate::util::linalg::Vec2;

/// A line segment between two points. Zero-length segments are allowed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment2 {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment2 {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
    pub fn from_xyxy(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(Vec2 { x: x1, y: y1 }, Vec2 { x: x2, y: y2 })
    }

    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }
    pub fn len(&self) -> f32 {
        self.delta().len()
    }
    pub fn at(&self, t: f32) -> Vec2 {
        self.start + self.delta() * t
    }
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }
}

/// Closest point on a segment, with the clamped parameter along it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NearestPoint {
    pub dist: f32,
    pub point: Vec2,
    pub t: f32,
}

/// Closest edge of a polygon; `edge_index` is the index of the edge's start point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PolygonNearest {
    pub dist: f32,
    pub edge_index: usize,
    pub edge: Segment2,
    pub point: Vec2,
}

/// Crossing point of two segments; `ta` and `tb` are its parameters along each segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentIntersection {
    pub point: Vec2,
    pub ta: f32,
    pub tb: f32,
}

pub fn distance_point_to_point(p1: Vec2, p2: Vec2) -> f32 {
    p1.dist(p2)
}

/// Distance from `p` to the infinite line through `line`'s endpoints.
///
/// A zero-length `line` has no direction; the distance to its single point is returned instead.
pub fn distance_point_to_line(p: Vec2, line: &Segment2) -> f32 {
    let a = line.end.y - line.start.y;
    let b = line.start.x - line.end.x;
    let c = line.end.x * line.start.y - line.start.x * line.end.y;
    let norm = (a * a + b * b).sqrt();
    if norm.is_zero() {
        warn!("distance_point_to_line(): zero-length line at {}", line.start);
        return p.dist(line.start);
    }
    (a * p.x + b * p.y + c).abs() / norm
}

/// Projects `p` onto `segment`, clamping the projection to the segment's endpoints.
pub fn nearest_point_to_line_segment(p: Vec2, segment: &Segment2) -> NearestPoint {
    let delta = segment.delta();
    let len_sq = delta.len_squared();
    let param = if len_sq.is_zero() {
        -1.0
    } else {
        (p - segment.start).dot(delta) / len_sq
    };

    let (point, t) = if param < 0.0 {
        (segment.start, 0.0)
    } else if param > 1.0 {
        (segment.end, 1.0)
    } else {
        (segment.start + delta * param, param)
    };
    NearestPoint {
        dist: p.dist(point),
        point,
        t,
    }
}

pub fn distance_point_to_line_segment(p: Vec2, segment: &Segment2) -> f32 {
    nearest_point_to_line_segment(p, segment).dist
}

/// Distance from `p` to the nearest edge of `rect`. Points inside the rectangle still measure to
/// its boundary.
pub fn distance_point_to_rect(p: Vec2, rect: &impl AxisAlignedExtent) -> f32 {
    rect.edges()
        .iter()
        .map(|edge| distance_point_to_line_segment(p, edge))
        .fold(f32::INFINITY, f32::min)
}

fn polygon_edges(polygon: &[Vec2]) -> impl Iterator<Item = Segment2> + '_ {
    polygon
        .iter()
        .copied()
        .circular_tuple_windows()
        .map(|(start, end)| Segment2::new(start, end))
}

/// Nearest edge of `polygon` to `p`. Ties go to the edge that comes first. Returns `None` for an
/// empty polygon.
pub fn point_to_nearest_polygon(p: Vec2, polygon: &[Vec2]) -> Option<PolygonNearest> {
    let mut best: Option<PolygonNearest> = None;
    for (edge_index, edge) in polygon_edges(polygon).enumerate() {
        let nearest = nearest_point_to_line_segment(p, &edge);
        if best.map_or(true, |b| nearest.dist < b.dist) {
            best = Some(PolygonNearest {
                dist: nearest.dist,
                edge_index,
                edge,
                point: nearest.point,
            });
        }
    }
    best
}

/// Minimum distance from `p` to any edge of `polygon`; infinite if the polygon is empty.
pub fn distance_point_to_polygon(p: Vec2, polygon: &[Vec2]) -> f32 {
    if polygon.is_empty() {
        warn!("distance_point_to_polygon(): empty polygon");
        return f32::INFINITY;
    }
    polygon_edges(polygon)
        .map(|edge| distance_point_to_line_segment(p, &edge))
        .fold(f32::INFINITY, f32::min)
}

/// Inclusive: points on the boundary are contained.
pub fn rect_contains_point(rect: &impl AxisAlignedExtent, p: Vec2) -> bool {
    rect.contains_point(p)
}

/// Sign test against the three directed edges. The winding of the triangle does not matter.
pub fn triangle_contains_point(v1: Vec2, v2: Vec2, v3: Vec2, p: Vec2) -> bool {
    fn sign(pt: Vec2, p2: Vec2, p3: Vec2) -> f32 {
        (pt.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (pt.y - p3.y)
    }

    let b1 = sign(p, v1, v2) < 0.0;
    let b2 = sign(p, v2, v3) < 0.0;
    let b3 = sign(p, v3, v1) < 0.0;
    b1 == b2 && b2 == b3
}

/// Even-odd rule: casts a horizontal ray from `p` and counts edge crossings.
pub fn polygon_contains_point(polygon: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    for edge in polygon_edges(polygon) {
        let (p1, p2) = (edge.start, edge.end);
        // Half-open in y, so a ray through a shared vertex crosses exactly one of its edges.
        if (p1.y > p.y) != (p2.y > p.y)
            && p.x < (p2.x - p1.x) * (p.y - p1.y) / (p2.y - p1.y) + p1.x
        {
            inside = !inside;
        }
    }
    inside
}

pub fn polygon_contains_rect(polygon: &[Vec2], rect: &impl AxisAlignedExtent) -> bool {
    rect.corners()
        .into_iter()
        .all(|corner| polygon_contains_point(polygon, corner))
}

/// Shoelace formula. Positive for counterclockwise winding.
pub fn polygon_signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let twice_area: f32 = polygon_edges(points)
        .map(|edge| edge.start.cross(edge.end))
        .sum();
    twice_area * 0.5
}

/// Unsigned area enclosed by `points`.
pub fn calc_polygon_area(points: &[Vec2]) -> f32 {
    polygon_signed_area(points).abs()
}

/// Solves for the crossing point of two segments. Returns `None` if they are parallel (exactly
/// zero determinant) or the crossing lies outside either segment.
pub fn line_intersects_line_point(l1: &Segment2, l2: &Segment2) -> Option<SegmentIntersection> {
    let d1 = l1.delta();
    let d2 = l2.delta();
    let denominator = d1.cross(d2);
    if denominator.is_zero() {
        return None;
    }

    let offset = l1.start - l2.start;
    let ta = d2.cross(offset) / denominator;
    let tb = d1.cross(offset) / denominator;
    if !(0.0..=1.0).contains(&ta) || !(0.0..=1.0).contains(&tb) {
        return None;
    }
    Some(SegmentIntersection {
        point: l1.at(ta),
        ta,
        tb,
    })
}

/// Whether two segments cross or touch.
///
/// ```
/// use graphics_mathlib::core::prelude::*;
/// let a = Segment2::from_xyxy(0.0, 0.0, 2.0, 2.0);
/// let b = Segment2::from_xyxy(0.0, 2.0, 2.0, 0.0);
/// assert!(geom2::line_intersects_line(&a, &b));
/// assert!(!geom2::line_intersects_line(&a, &Segment2::from_xyxy(3.0, 0.0, 3.0, 5.0)));
/// ```
pub fn line_intersects_line(l1: &Segment2, l2: &Segment2) -> bool {
    line_intersects_line_point(l1, l2).is_some()
}

pub fn check_parallel_lines(l1: &Segment2, l2: &Segment2) -> bool {
    l1.delta().cross(l2.delta()).abs() < PARALLEL_LINE_TOLERANCE
}

/// Rectangles that only touch along an edge or corner intersect.
pub fn rect_intersects_rect(r1: &impl AxisAlignedExtent, r2: &impl AxisAlignedExtent) -> bool {
    !(r1.right() < r2.left()
        || r1.left() > r2.right()
        || r1.top() < r2.bottom()
        || r1.bottom() > r2.top())
}

/// True if either endpoint lies inside `rect` or the segment crosses one of its edges.
pub fn line_intersects_rect(line: &Segment2, rect: &impl AxisAlignedExtent) -> bool {
    if rect.contains_point(line.start) || rect.contains_point(line.end) {
        return true;
    }
    rect.edges()
        .iter()
        .any(|edge| line_intersects_line(edge, line))
}

/// True if any edge of `polygon`, including the closing edge, touches `rect`.
///
/// A rectangle lying strictly inside the polygon does not touch any edge; combine with
/// [`polygon_contains_rect`] to detect that case.
pub fn rect_intersects_polygon(rect: &impl AxisAlignedExtent, polygon: &[Vec2]) -> bool {
    polygon_edges(polygon).any(|edge| line_intersects_rect(&edge, rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::bbox::Rect;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2 { x: 0.0, y: 0.0 },
            Vec2 { x: 20.0, y: 0.0 },
            Vec2 { x: 20.0, y: 20.0 },
            Vec2 { x: 0.0, y: 20.0 },
        ]
    }

    // ==================== Segment Distance Tests ====================

    #[test]
    fn segment_projection_is_clamped() {
        let seg = Segment2::from_xyxy(0.0, 0.0, 10.0, 0.0);
        let mid = nearest_point_to_line_segment(Vec2 { x: 4.0, y: 3.0 }, &seg);
        assert_eq!(mid.point, Vec2 { x: 4.0, y: 0.0 });
        assert_eq!(mid.dist, 3.0);
        assert_eq!(mid.t, 0.4);

        let before = nearest_point_to_line_segment(Vec2 { x: -3.0, y: 4.0 }, &seg);
        assert_eq!(before.point, seg.start);
        assert_eq!(before.dist, 5.0);
        assert_eq!(before.t, 0.0);

        let after = nearest_point_to_line_segment(Vec2 { x: 13.0, y: -4.0 }, &seg);
        assert_eq!(after.point, seg.end);
        assert_eq!(after.dist, 5.0);

        // The infinite line would give 4 here.
        assert_eq!(distance_point_to_line(Vec2 { x: 13.0, y: -4.0 }, &seg), 4.0);
    }

    #[test]
    fn zero_length_segment() {
        let seg = Segment2::from_xyxy(1.0, 1.0, 1.0, 1.0);
        let p = Vec2 { x: 4.0, y: 5.0 };
        let nearest = nearest_point_to_line_segment(p, &seg);
        assert_eq!(nearest.point, seg.start);
        assert_eq!(nearest.dist, 5.0);
        assert_eq!(distance_point_to_line(p, &seg), 5.0);
    }

    #[test]
    fn distance_to_infinite_line() {
        let line = Segment2::from_xyxy(0.0, 0.0, 1.0, 1.0);
        let d = distance_point_to_line(Vec2 { x: 0.0, y: 2.0 }, &line);
        assert!((d - std::f32::consts::SQRT_2).abs() < 1e-6);
    }

    // ==================== Polygon Tests ====================

    #[test]
    fn nearest_polygon_edge() {
        let nearest = point_to_nearest_polygon(Vec2 { x: 15.0, y: 19.0 }, &square()).unwrap();
        assert_eq!(nearest.dist, 1.0);
        assert_eq!(nearest.edge_index, 2);
        assert_eq!(nearest.point, Vec2 { x: 15.0, y: 20.0 });
        assert_eq!(nearest.edge, Segment2::from_xyxy(20.0, 20.0, 0.0, 20.0));

        // Equidistant from edges 0 and 3: the first wins.
        let corner = point_to_nearest_polygon(Vec2 { x: -1.0, y: -1.0 }, &square()).unwrap();
        assert_eq!(corner.edge_index, 0);

        // The closing edge is considered.
        let closing = point_to_nearest_polygon(Vec2 { x: -2.0, y: 10.0 }, &square()).unwrap();
        assert_eq!(closing.edge_index, 3);
        assert_eq!(closing.dist, 2.0);

        assert!(point_to_nearest_polygon(Vec2::zero(), &[]).is_none());
    }

    #[test]
    fn distance_to_polygon() {
        assert_eq!(distance_point_to_polygon(Vec2 { x: 15.0, y: 15.0 }, &square()), 5.0);
        assert_eq!(distance_point_to_polygon(Vec2 { x: 25.0, y: 10.0 }, &square()), 5.0);
        assert_eq!(distance_point_to_polygon(Vec2::zero(), &[]), f32::INFINITY);
    }

    #[test]
    fn polygon_containment() {
        let square = square();
        assert!(polygon_contains_point(&square, Vec2 { x: 5.0, y: 5.0 }));
        assert!(!polygon_contains_point(&square, Vec2 { x: 25.0, y: 5.0 }));
        assert!(!polygon_contains_point(&square, Vec2 { x: -5.0, y: 5.0 }));
        // Ray passes exactly through a vertex level.
        assert!(polygon_contains_point(&square, Vec2 { x: 5.0, y: 0.0 }));
        assert!(!polygon_contains_point(&square, Vec2 { x: 5.0, y: 20.0 }));

        // Concave "U" shape: the notch is outside.
        let u = vec![
            Vec2 { x: 0.0, y: 0.0 },
            Vec2 { x: 30.0, y: 0.0 },
            Vec2 { x: 30.0, y: 30.0 },
            Vec2 { x: 20.0, y: 30.0 },
            Vec2 { x: 20.0, y: 10.0 },
            Vec2 { x: 10.0, y: 10.0 },
            Vec2 { x: 10.0, y: 30.0 },
            Vec2 { x: 0.0, y: 30.0 },
        ];
        assert!(polygon_contains_point(&u, Vec2 { x: 5.0, y: 20.0 }));
        assert!(!polygon_contains_point(&u, Vec2 { x: 15.0, y: 20.0 }));
        assert!(polygon_contains_point(&u, Vec2 { x: 15.0, y: 5.0 }));

        assert!(polygon_contains_rect(&square, &Rect::from_xywh(5.0, 5.0, 2.0, 2.0)));
        assert!(!polygon_contains_rect(&u, &Rect::from_xywh(5.0, 15.0, 10.0, 2.0)));
        assert!(!polygon_contains_point(&[], Vec2::zero()));
    }

    #[test]
    fn triangle_containment() {
        let (a, b, c) = (
            Vec2 { x: 0.0, y: 0.0 },
            Vec2 { x: 10.0, y: 0.0 },
            Vec2 { x: 0.0, y: 10.0 },
        );
        let inside = Vec2 { x: 2.0, y: 3.0 };
        let outside = Vec2 { x: 8.0, y: 8.0 };
        assert!(triangle_contains_point(a, b, c, inside));
        assert!(triangle_contains_point(c, b, a, inside));
        assert!(!triangle_contains_point(a, b, c, outside));
        assert!(!triangle_contains_point(c, b, a, outside));
    }

    #[test]
    fn polygon_area() {
        assert_eq!(calc_polygon_area(&square()), 400.0);
        let mut clockwise = square();
        clockwise.reverse();
        assert_eq!(calc_polygon_area(&clockwise), 400.0);
        assert_eq!(polygon_signed_area(&square()), 400.0);
        assert_eq!(polygon_signed_area(&clockwise), -400.0);

        let triangle = [
            Vec2 { x: 0.0, y: 0.0 },
            Vec2 { x: 4.0, y: 0.0 },
            Vec2 { x: 0.0, y: 3.0 },
        ];
        assert_eq!(calc_polygon_area(&triangle), 6.0);
        assert_eq!(calc_polygon_area(&triangle[..2]), 0.0);
        assert_eq!(calc_polygon_area(&triangle[..1]), 0.0);
    }

    // ==================== Intersection Tests ====================

    #[test]
    fn segment_intersection_point() {
        let a = Segment2::from_xyxy(0.0, 0.0, 4.0, 0.0);
        let b = Segment2::from_xyxy(1.0, -1.0, 1.0, 3.0);
        let hit = line_intersects_line_point(&a, &b).unwrap();
        assert_eq!(hit.point, Vec2 { x: 1.0, y: 0.0 });
        assert_eq!(hit.ta, 0.25);
        assert_eq!(hit.tb, 0.25);
        assert!(line_intersects_line(&a, &b));
        assert!(line_intersects_line(&b, &a));

        // Crossing beyond the end of `a` only.
        let c = Segment2::from_xyxy(5.0, -1.0, 5.0, 1.0);
        assert!(line_intersects_line_point(&a, &c).is_none());
        // Crossing beyond the end of `c` only.
        let d = Segment2::from_xyxy(2.0, 1.0, 2.0, 3.0);
        assert!(line_intersects_line_point(&a, &d).is_none());

        // Touching at an endpoint counts.
        let e = Segment2::from_xyxy(4.0, 0.0, 4.0, 2.0);
        assert!(line_intersects_line(&a, &e));
    }

    #[test]
    fn parallel_segments() {
        let a = Segment2::from_xyxy(0.0, 0.0, 4.0, 0.0);
        let b = Segment2::from_xyxy(0.0, 1.0, 4.0, 1.0);
        assert!(line_intersects_line_point(&a, &b).is_none());
        assert!(!line_intersects_line(&a, &a));
        assert!(check_parallel_lines(&a, &b));
        assert!(check_parallel_lines(&a, &b.reversed()));
        assert!(!check_parallel_lines(&a, &Segment2::from_xyxy(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn rect_queries() {
        let r1 = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(rect_contains_point(&r1, Vec2 { x: 10.0, y: 0.0 }));
        assert!(!rect_contains_point(&r1, Vec2 { x: 10.5, y: 0.0 }));

        assert!(rect_intersects_rect(&r1, &Rect::from_xywh(5.0, 5.0, 10.0, 10.0)));
        assert!(rect_intersects_rect(&r1, &Rect::from_xywh(10.0, 0.0, 1.0, 1.0)));
        assert!(!rect_intersects_rect(&r1, &Rect::from_xywh(11.0, 0.0, 1.0, 1.0)));
        assert!(!rect_intersects_rect(&r1, &Rect::from_xywh(0.0, -5.0, 1.0, 1.0)));

        assert_eq!(distance_point_to_rect(Vec2 { x: 13.0, y: 14.0 }, &r1), 5.0);
        assert_eq!(distance_point_to_rect(Vec2 { x: 2.0, y: 5.0 }, &r1), 2.0);
    }

    #[test]
    fn segment_against_rect() {
        let r = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        // Fully inside.
        assert!(line_intersects_rect(&Segment2::from_xyxy(1.0, 1.0, 2.0, 2.0), &r));
        // Passes straight through.
        assert!(line_intersects_rect(&Segment2::from_xyxy(-5.0, 5.0, 15.0, 5.0), &r));
        // Misses.
        assert!(!line_intersects_rect(&Segment2::from_xyxy(-5.0, 11.0, 15.0, 11.0), &r));
    }

    #[test]
    fn rect_against_polygon() {
        let r = Rect::from_xywh(0.0, 0.0, 2.0, 2.0);
        // Only the closing edge (from the last point back to the first) crosses the rectangle.
        let polygon = [
            Vec2 { x: 1.0, y: -5.0 },
            Vec2 { x: 10.0, y: -5.0 },
            Vec2 { x: 10.0, y: 5.0 },
            Vec2 { x: 1.0, y: 5.0 },
        ];
        assert!(rect_intersects_polygon(&r, &polygon));
        assert!(!rect_intersects_polygon(&r, &polygon[..3]));
        assert!(!rect_intersects_polygon(&Rect::from_xywh(5.0, 5.0, 1.0, 1.0), &square()));
        assert!(!rect_intersects_polygon(&r, &[]));
    }
}
