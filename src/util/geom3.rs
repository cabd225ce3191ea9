//! Ray casts, triangle-box overlap and barycentric interpolation.
//!
//! Ray directions need not be unit length; every `t` is measured in multiples of the direction.
//! Misses are `None` or `false`. Degenerate inputs (collinear plane points, zero-area triangles)
//! log a warning and produce the documented sentinel instead of NaN.

use std::ops::RangeInclusive;

use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{GeomError, Result};
use crate::util::bbox::Aabb3;
use crate::util::gg_range;
use crate::util::linalg::{Vec3, Vec4};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// A plane through three points.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
}

impl Plane {
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self { v1, v2, v3 }
    }

    /// Unnormalised normal, `(v2 - v1) × (v3 - v2)`.
    pub fn normal(&self) -> Vec3 {
        (self.v2 - self.v1).cross(self.v3 - self.v2)
    }

    /// Normalised implicit equation `(n, d)` with `n·p + d = 0` on the plane.
    pub fn equation(&self) -> Result<Vec4> {
        let normal = self.normal();
        let len = normal.len();
        if len.is_zero() {
            return Err(GeomError::DegenerateGeometry(format!(
                "plane points are collinear: {}, {}, {}",
                self.v1, self.v2, self.v3
            )));
        }
        Ok(normal.extend(-normal.dot(self.v1)) / len)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub centre: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(centre: Vec3, radius: f32) -> Self {
        Self { centre, radius }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
}

impl Triangle {
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self { v1, v2, v3 }
    }
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v1, self.v2, self.v3]
    }
    pub fn as_plane(&self) -> Plane {
        Plane::new(self.v1, self.v2, self.v3)
    }
    /// Unnormalised; its length is twice the area.
    pub fn normal(&self) -> Vec3 {
        self.as_plane().normal()
    }
    pub fn area(&self) -> f32 {
        self.normal().len() * 0.5
    }
}

/// Per-vertex normals matching a [`Triangle`]'s vertex order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleNormals {
    pub n1: Vec3,
    pub n2: Vec3,
    pub n3: Vec3,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    pub t: f32,
    pub point: Vec3,
}

/// Parameter range over which a ray is inside a box. `t_min` is negative when the ray starts
/// inside.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlabInterval {
    pub t_min: f32,
    pub t_max: f32,
}

impl SlabInterval {
    /// Where the ray first touches the box, never before its origin.
    pub fn entry(&self) -> f32 {
        self.t_min.max(0.0)
    }
    pub fn as_range(&self) -> RangeInclusive<f32> {
        self.t_min..=self.t_max
    }
}

/// Weights of the three vertices of a triangle at some point, from sub-triangle areas.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Barycentric {
    pub a1: f32,
    pub a2: f32,
    pub a3: f32,
}

impl Barycentric {
    pub fn sum(&self) -> f32 {
        self.a1 + self.a2 + self.a3
    }
}

fn distance_along_ray(ray: &Ray, equation: Vec4) -> f32 {
    -equation.dot(ray.origin.extend(1.0)) / equation.dot(ray.dir.extend(0.0))
}

fn accept_distance(t: f32, max_t: f32) -> bool {
    t.is_finite() && t >= 0.0 && t <= max_t
}

/// Intersects `ray` with `plane`, ignoring hits behind the origin or beyond `max_t`.
///
/// Rays parallel to the plane miss. Pass `f32::INFINITY` for no distance limit.
pub fn ray_intersects_plane(ray: &Ray, plane: &Plane, max_t: f32) -> Option<RayHit> {
    let equation = match plane.equation() {
        Ok(equation) => equation,
        Err(e) => {
            warn!("ray_intersects_plane(): {e}");
            return None;
        }
    };
    let t = distance_along_ray(ray, equation);
    accept_distance(t, max_t).then(|| RayHit {
        t,
        point: ray.at(t),
    })
}

/// Intersects `ray` with `triangle` from either side, within `max_t`.
///
/// ```
/// use graphics_mathlib::core::prelude::*;
/// let triangle = Triangle::new(Vec3::zero(), Vec3::right(), Vec3::up());
/// let ray = Ray::new(Vec3 { x: 0.25, y: 0.25, z: 2.0 }, Vec3::forward());
/// let hit = geom3::ray_intersects_triangle(&ray, &triangle, f32::INFINITY).unwrap();
/// assert_eq!(hit.t, 2.0);
/// assert!(geom3::ray_intersects_triangle(&ray, &triangle, 1.0).is_none());
/// ```
pub fn ray_intersects_triangle(ray: &Ray, triangle: &Triangle, max_t: f32) -> Option<RayHit> {
    let equation = match triangle.as_plane().equation() {
        Ok(equation) => equation,
        Err(e) => {
            warn!("ray_intersects_triangle(): {e}");
            return None;
        }
    };
    let t = distance_along_ray(ray, equation);
    if !accept_distance(t, max_t) {
        return None;
    }

    let hit = ray.at(t);
    let normal = triangle.normal();
    let [v1, v2, v3] = triangle.vertices();
    for (from, to) in [(v1, v2), (v2, v3), (v3, v1)] {
        if normal.dot((to - from).cross(hit - from)) < 0.0 {
            return None;
        }
    }
    Some(RayHit { t, point: hit })
}

/// Nearest intersection of `ray` with `sphere`. A ray starting inside the sphere hits at `t = 0`.
pub fn ray_intersects_sphere(ray: &Ray, sphere: &Sphere) -> Option<RayHit> {
    let m = ray.origin - sphere.centre;
    let a = ray.dir.len_squared();
    let b = m.dot(ray.dir);
    let c = m.len_squared() - sphere.radius * sphere.radius;

    // Origin outside and pointing away.
    if c > 0.0 && b > 0.0 {
        return None;
    }
    if a.is_zero() {
        warn!("ray_intersects_sphere(): zero-length ray direction");
        return (c <= 0.0).then_some(RayHit {
            t: 0.0,
            point: ray.origin,
        });
    }

    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let t = ((-b - discriminant.sqrt()) / a).max(0.0);
    Some(RayHit { t, point: ray.at(t) })
}

/// Parametric interval of `ray` between the planes `lo` and `hi` on one axis. A zero direction
/// component (of either sign) gives an unbounded interval when the origin lies within the slab,
/// faces included, and an empty one otherwise.
fn slab_interval(lo: f32, hi: f32, origin: f32, dir: f32) -> (f32, f32) {
    if dir == 0.0 {
        return if (lo..=hi).contains(&origin) {
            (f32::NEG_INFINITY, f32::INFINITY)
        } else {
            (f32::INFINITY, f32::NEG_INFINITY)
        };
    }
    let inv = 1.0 / dir;
    let (t1, t2) = ((lo - origin) * inv, (hi - origin) * inv);
    (t1.min(t2), t1.max(t2))
}

/// Slab test. Rays with zero direction components are accepted, including rays running along a
/// face of the box, which count as hits.
pub fn ray_intersects_box(ray: &Ray, aabb: &Aabb3) -> Option<SlabInterval> {
    let (lo, hi, origin) = (aabb.min(), aabb.max(), ray.origin);
    let (x_near, x_far) = slab_interval(lo.x, hi.x, origin.x, ray.dir.x);
    let (y_near, y_far) = slab_interval(lo.y, hi.y, origin.y, ray.dir.y);
    let (z_near, z_far) = slab_interval(lo.z, hi.z, origin.z, ray.dir.z);

    let t_max = x_far.min(y_far).min(z_far);
    // The whole box is behind the ray.
    if t_max < 0.0 {
        return None;
    }
    let t_min = x_near.max(y_near).max(z_near);
    if t_min > t_max {
        return None;
    }
    Some(SlabInterval { t_min, t_max })
}

/// Whether the projections of the triangle and the box onto `axis` are disjoint. A zero axis
/// never separates.
fn separated_on_axis(axis: Vec3, vertices: &[Vec3; 3], box_half_size: Vec3) -> bool {
    let triangle = gg_range::span_f32(vertices.iter().map(|v| v.dot(axis)));
    let radius = box_half_size.dot(axis.abs());
    !gg_range::overlaps_f32(&triangle, &(-radius..=radius))
}

/// Separating-axis test between a triangle and the box with the given centre and half-size.
///
/// Touching counts as overlapping.
pub fn triangle_intersects_box(triangle: &Triangle, box_centre: Vec3, box_half_size: Vec3) -> bool {
    let vertices = triangle.vertices().map(|v| v - box_centre);
    let [v0, v1, v2] = vertices;
    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;
    let (x, y, z) = (Vec3::right(), Vec3::up(), Vec3::back());

    // Edges crossed with the box axes.
    if separated_on_axis(x.cross(e0), &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(y.cross(e0), &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(z.cross(e0), &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(x.cross(e1), &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(y.cross(e1), &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(z.cross(e1), &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(x.cross(e2), &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(y.cross(e2), &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(z.cross(e2), &vertices, box_half_size) {
        return false;
    }

    // Box face normals: equivalent to comparing the triangle's bounding box with the box.
    if separated_on_axis(x, &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(y, &vertices, box_half_size) {
        return false;
    }
    if separated_on_axis(z, &vertices, box_half_size) {
        return false;
    }

    // Triangle plane.
    !separated_on_axis(e0.cross(e1), &vertices, box_half_size)
}

/// Vertex weights of `p` relative to `triangle`.
///
/// Weights come from unsigned sub-triangle areas, so they sum to 1 only for points inside the
/// triangle. A zero-area triangle gives all-zero weights.
pub fn calc_vertex_interpolation(triangle: &Triangle, p: Vec3) -> Barycentric {
    let Triangle { v1, v2, v3 } = *triangle;
    let area = (v1 - v2).cross(v1 - v3).len();
    if area.is_zero() {
        warn!("calc_vertex_interpolation(): zero-area triangle {v1}, {v2}, {v3}");
        return Barycentric::default();
    }

    let f1 = v1 - p;
    let f2 = v2 - p;
    let f3 = v3 - p;
    Barycentric {
        a1: f2.cross(f3).len() / area,
        a2: f3.cross(f1).len() / area,
        a3: f1.cross(f2).len() / area,
    }
}

/// Interpolated normal at `hit`. Not renormalised.
pub fn calc_hit_interpolation(triangle: &Triangle, normals: &TriangleNormals, hit: Vec3) -> Vec3 {
    let weights = calc_vertex_interpolation(triangle, hit);
    normals.n1 * weights.a1 + normals.n2 * weights.a2 + normals.n3 * weights.a3
}
