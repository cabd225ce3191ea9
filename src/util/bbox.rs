use std::{fmt, fmt::Formatter};

use serde::{Deserialize, Serialize};

use crate::core::error::{GeomError, Result};
use crate::util::geom2::Segment2;
use crate::util::geom3;
use crate::util::geom3::{Ray, SlabInterval, Triangle};
use crate::util::linalg::{Vec2, Vec3};
use crate::util::matrix::Mat4x4;

/// Anything with a 2D axis-aligned extent. `y` points up, so `bottom() <= top()`.
#[allow(dead_code)]
pub trait AxisAlignedExtent {
    fn extent(&self) -> Vec2;
    fn centre(&self) -> Vec2;

    fn half_widths(&self) -> Vec2 {
        self.extent() / 2.0
    }

    fn left(&self) -> f32 {
        self.centre().x - self.half_widths().x
    }
    fn right(&self) -> f32 {
        self.centre().x + self.half_widths().x
    }
    fn bottom(&self) -> f32 {
        self.centre().y - self.half_widths().y
    }
    fn top(&self) -> f32 {
        self.centre().y + self.half_widths().y
    }

    fn bottom_left(&self) -> Vec2 {
        Vec2 {
            x: self.left(),
            y: self.bottom(),
        }
    }
    fn bottom_right(&self) -> Vec2 {
        Vec2 {
            x: self.right(),
            y: self.bottom(),
        }
    }
    fn top_right(&self) -> Vec2 {
        Vec2 {
            x: self.right(),
            y: self.top(),
        }
    }
    fn top_left(&self) -> Vec2 {
        Vec2 {
            x: self.left(),
            y: self.top(),
        }
    }
    /// Counterclockwise from the bottom-left corner.
    fn corners(&self) -> [Vec2; 4] {
        [
            self.bottom_left(),
            self.bottom_right(),
            self.top_right(),
            self.top_left(),
        ]
    }
    /// Bottom, right, top and left edges, each running counterclockwise.
    fn edges(&self) -> [Segment2; 4] {
        let [bl, br, tr, tl] = self.corners();
        [
            Segment2::new(bl, br),
            Segment2::new(br, tr),
            Segment2::new(tr, tl),
            Segment2::new(tl, bl),
        ]
    }

    fn as_rect(&self) -> Rect {
        Rect::new(self.centre(), self.half_widths())
    }
    /// Inclusive of the boundary.
    fn contains_point(&self, pos: Vec2) -> bool {
        (self.left()..=self.right()).contains(&pos.x) && (self.bottom()..=self.top()).contains(&pos.y)
    }
    fn contains_rect(&self, rect: &Rect) -> bool {
        self.left() <= rect.left()
            && self.right() >= rect.right()
            && self.bottom() <= rect.bottom()
            && self.top() >= rect.top()
    }
}

/// A rectangle stored as its centre and half-widths.
///
/// ```
/// use graphics_mathlib::core::prelude::*;
///
/// let rect = Rect::from_xywh(-1.0, -2.0, 4.0, 6.0);
/// assert_eq!(rect.centre(), Vec2 { x: 1.0, y: 1.0 });
/// assert_eq!(rect.extent(), Vec2 { x: 4.0, y: 6.0 });
/// assert!(rect.contains_point(Vec2 { x: 3.0, y: 4.0 }));
/// assert!(!rect.contains_point(Vec2 { x: 3.5, y: 0.0 }));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub(crate) centre: Vec2,
    pub(crate) half_widths: Vec2,
}

impl Rect {
    pub fn new(centre: Vec2, half_widths: Vec2) -> Self {
        Self {
            centre,
            half_widths: half_widths.abs(),
        }
    }
    /// From the minimum corner `(x, y)` and a size. Negative sizes extend towards `-x`/`-y`.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_coords(
            Vec2 { x, y },
            Vec2 {
                x: x + width,
                y: y + height,
            },
        )
    }
    /// From any two opposite corners.
    pub fn from_coords(a: Vec2, b: Vec2) -> Self {
        Self::new((a + b) / 2.0, (b - a).abs() / 2.0)
    }
    pub fn empty() -> Self {
        Self {
            centre: Vec2::zero(),
            half_widths: Vec2::zero(),
        }
    }
}

impl AxisAlignedExtent for Rect {
    fn extent(&self) -> Vec2 {
        self.half_widths * 2.0
    }
    fn centre(&self) -> Vec2 {
        self.centre
    }
    fn half_widths(&self) -> Vec2 {
        self.half_widths
    }
}

/// 2D axis-aligned bounding box. `min <= max` component-wise after every update.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub(crate) min: Vec2,
    pub(crate) max: Vec2,
}

impl Aabb2 {
    /// The box spanned by two opposite corners, in either order.
    pub fn from_two_points(p1: Vec2, p2: Vec2) -> Self {
        Self {
            min: Vec2 {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
            },
            max: Vec2 {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
            },
        }
    }
    pub fn from_points(points: &[Vec2]) -> Result<Self> {
        let (first, rest) = points.split_first().ok_or_else(|| {
            GeomError::InvalidArgument("Aabb2::from_points(): need at least one point".to_string())
        })?;
        let mut rv = Self::from_two_points(*first, *first);
        for p in rest {
            rv.expand_to(*p);
        }
        Ok(rv)
    }
    pub fn from_boxes(a: &Aabb2, b: &Aabb2) -> Self {
        let mut rv = *a;
        rv.expand_to_box(b);
        rv
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }
    pub fn max(&self) -> Vec2 {
        self.max
    }
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
    pub fn origin(&self) -> Vec2 {
        self.min + self.size() * 0.5
    }
    pub fn vertices(&self) -> [Vec2; 4] {
        self.corners()
    }

    pub fn expand_to(&mut self, p: Vec2) -> &mut Self {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self
    }
    pub fn expand_to_box(&mut self, other: &Aabb2) -> &mut Self {
        self.expand_to(other.min).expand_to(other.max)
    }
    pub fn offset(&mut self, by: Vec2) -> &mut Self {
        self.min += by;
        self.max += by;
        self
    }

    pub fn contains_box(&self, other: &Aabb2) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }
    /// Boxes that only touch intersect.
    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }
}

impl AxisAlignedExtent for Aabb2 {
    fn extent(&self) -> Vec2 {
        self.size()
    }
    fn centre(&self) -> Vec2 {
        self.origin()
    }

    fn left(&self) -> f32 {
        self.min.x
    }
    fn right(&self) -> f32 {
        self.max.x
    }
    fn bottom(&self) -> f32 {
        self.min.y
    }
    fn top(&self) -> f32 {
        self.max.y
    }
}

impl fmt::Display for Aabb2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] - [{}, {}]", self.min.x, self.min.y, self.max.x, self.max.y)
    }
}

/// 3D axis-aligned bounding box. `min <= max` component-wise after every update; size and origin
/// are derived on demand.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    pub(crate) min: Vec3,
    pub(crate) max: Vec3,
}

impl Aabb3 {
    pub fn from_two_points(p1: Vec3, p2: Vec3) -> Self {
        Self {
            min: Vec3 {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
                z: p1.z.min(p2.z),
            },
            max: Vec3 {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
                z: p1.z.max(p2.z),
            },
        }
    }
    pub fn from_points(points: &[Vec3]) -> Result<Self> {
        let (first, rest) = points.split_first().ok_or_else(|| {
            GeomError::InvalidArgument("Aabb3::from_points(): need at least one point".to_string())
        })?;
        let mut rv = Self::from_two_points(*first, *first);
        for p in rest {
            rv.expand_to(*p);
        }
        Ok(rv)
    }
    pub fn from_boxes(a: &Aabb3, b: &Aabb3) -> Self {
        let mut rv = *a;
        rv.expand_to_box(b);
        rv
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }
    pub fn max(&self) -> Vec3 {
        self.max
    }
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
    pub fn half_size(&self) -> Vec3 {
        self.size() * 0.5
    }
    pub fn origin(&self) -> Vec3 {
        self.min + self.half_size()
    }

    /// The eight corners, `max` first and `min` last, with `z` varying fastest.
    pub fn vertices(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3 { x: hi.x, y: hi.y, z: hi.z },
            Vec3 { x: hi.x, y: hi.y, z: lo.z },
            Vec3 { x: hi.x, y: lo.y, z: hi.z },
            Vec3 { x: hi.x, y: lo.y, z: lo.z },
            Vec3 { x: lo.x, y: hi.y, z: hi.z },
            Vec3 { x: lo.x, y: hi.y, z: lo.z },
            Vec3 { x: lo.x, y: lo.y, z: hi.z },
            Vec3 { x: lo.x, y: lo.y, z: lo.z },
        ]
    }

    pub fn expand_to(&mut self, p: Vec3) -> &mut Self {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
        self
    }
    pub fn expand_to_box(&mut self, other: &Aabb3) -> &mut Self {
        self.expand_to(other.min).expand_to(other.max)
    }
    pub fn offset(&mut self, by: Vec3) -> &mut Self {
        self.min += by;
        self.max += by;
        self
    }

    /// Box around all eight corners after transforming them by `m`.
    pub fn transformed(&self, m: &Mat4x4) -> Aabb3 {
        let [first, rest @ ..] = self.vertices().map(|v| v * *m);
        let mut rv = Self::from_two_points(first, first);
        for v in rest {
            rv.expand_to(v);
        }
        rv
    }

    /// Inclusive of the boundary.
    pub fn contains_point(&self, p: Vec3) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
    pub fn contains_box(&self, other: &Aabb3) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }
    pub fn contains_triangle(&self, triangle: &Triangle) -> bool {
        triangle.vertices().into_iter().all(|v| self.contains_point(v))
    }
    pub fn intersects(&self, other: &Aabb3) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
            && self.max.z >= other.min.z
            && self.min.z <= other.max.z
    }
    pub fn intersects_triangle(&self, triangle: &Triangle) -> bool {
        geom3::triangle_intersects_box(triangle, self.origin(), self.half_size())
    }
    pub fn intersects_ray(&self, ray: &Ray) -> Option<SlabInterval> {
        geom3::ray_intersects_box(ray, self)
    }
}

impl fmt::Display for Aabb3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] - [{}]", self.min, self.max)
    }
}
