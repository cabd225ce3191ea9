use std::{
    fmt,
    fmt::Formatter,
    ops::{Add, Mul, Neg, Sub},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::{EPSILON, SLERP_LINEAR_THRESHOLD};
use crate::util::linalg::{approx_eq, lerp, Vec3};
use crate::util::matrix::Mat4x4;

/// Quaternion with vector part `(x, y, z)` and scalar part `w`.
///
/// Rotations use unit quaternions. Anything that normalises treats a (near) zero-length
/// quaternion as the identity rather than producing NaN.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Rotation of `radians` counterclockwise about `axis`.
    ///
    /// Returns the identity when the axis length is at most [`EPSILON`].
    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let len = axis.len();
        if len <= EPSILON {
            warn!("Quat::from_axis_angle(): degenerate axis {axis}, returning identity");
            return Self::identity();
        }
        let (sin_half, cos_half) = (radians * 0.5).sin_cos();
        let v = axis * (sin_half / len);
        Self::new(v.x, v.y, v.z, cos_half)
    }

    /// Shortest-arc rotation taking the direction of `from` onto the direction of `to`.
    ///
    /// Anti-parallel inputs give a half turn about an axis perpendicular to `from`; a zero-length
    /// input gives the identity.
    pub fn from_vectors(from: Vec3, to: Vec3) -> Self {
        let len_product = (from.len_squared() * to.len_squared()).sqrt();
        if len_product <= EPSILON {
            warn!("Quat::from_vectors(): zero-length input {from} -> {to}, returning identity");
            return Self::identity();
        }
        let w = len_product + from.dot(to);
        if w <= EPSILON * len_product {
            let axis = if from.x.abs() > from.z.abs() {
                Vec3 {
                    x: -from.y,
                    y: from.x,
                    z: 0.0,
                }
            } else {
                Vec3 {
                    x: 0.0,
                    y: -from.z,
                    z: from.y,
                }
            }
            .normed();
            return Self::new(axis.x, axis.y, axis.z, 0.0);
        }
        let v = from.cross(to);
        Self::new(v.x, v.y, v.z, w).normalize()
    }

    /// Extracts the rotation from the upper-left 3x3 block of `m`, which should be a pure
    /// rotation.
    pub fn from_rotation_matrix(m: &Mat4x4) -> Self {
        // Column-vector element names: `mij` is row i, column j of the transpose of `m`.
        let (m11, m12, m13) = (m.a1, m.a2, m.a3);
        let (m21, m22, m23) = (m.b1, m.b2, m.b3);
        let (m31, m32, m33) = (m.c1, m.c2, m.c3);

        let trace = m11 + m22 + m33;
        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new((m32 - m23) * s, (m13 - m31) * s, (m21 - m12) * s, 0.25 / s)
        } else if m11 > m22 && m11 > m33 {
            let s = 2.0 * (1.0 + m11 - m22 - m33).sqrt();
            Self::new(0.25 * s, (m12 + m21) / s, (m13 + m31) / s, (m32 - m23) / s)
        } else if m22 > m33 {
            let s = 2.0 * (1.0 + m22 - m11 - m33).sqrt();
            Self::new((m12 + m21) / s, 0.25 * s, (m23 + m32) / s, (m13 - m31) / s)
        } else {
            let s = 2.0 * (1.0 + m33 - m11 - m22).sqrt();
            Self::new((m13 + m31) / s, (m23 + m32) / s, 0.25 * s, (m21 - m12) / s)
        }
    }

    pub fn dot(&self, rhs: Quat) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }
    pub fn len_squared(&self) -> f32 {
        self.dot(*self)
    }
    pub fn len(&self) -> f32 {
        self.len_squared().sqrt()
    }

    /// Unit quaternion in the same direction, or the identity if the length is at most
    /// [`EPSILON`].
    pub fn normalize(&self) -> Self {
        let len = self.len();
        if len <= EPSILON {
            warn!("Quat::normalize(): length {len} is degenerate, returning identity");
            return Self::identity();
        }
        *self * (1.0 / len)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Spherical linear interpolation along the shorter arc.
    ///
    /// ```
    /// use graphics_mathlib::core::prelude::*;
    /// let a = Quat::identity();
    /// let b = Quat::from_axis_angle(Vec3::back(), std::f32::consts::FRAC_PI_2);
    /// let half = Quat::slerp(a, b, 0.5);
    /// let expected = Quat::from_axis_angle(Vec3::back(), std::f32::consts::FRAC_PI_4);
    /// assert!(half.almost_eq(expected));
    /// ```
    pub fn slerp(q1: Quat, q2: Quat, t: f32) -> Quat {
        let mut q2 = q2;
        let mut cos_half_theta = q1.dot(q2);
        if cos_half_theta < 0.0 {
            q2 = -q2;
            cos_half_theta = -cos_half_theta;
        }
        if cos_half_theta >= 1.0 {
            return q1;
        }

        let sin_half_theta = (1.0 - cos_half_theta * cos_half_theta).sqrt();
        if sin_half_theta.abs() < SLERP_LINEAR_THRESHOLD {
            return lerp(q1, q2, t).normalize();
        }

        let half_theta = sin_half_theta.atan2(cos_half_theta);
        let ratio_a = ((1.0 - t) * half_theta).sin() / sin_half_theta;
        let ratio_b = (t * half_theta).sin() / sin_half_theta;
        q1 * ratio_a + q2 * ratio_b
    }

    /// Rotation matrix in the row-vector convention, so `v * q.to_matrix()` rotates `v` by `q`.
    ///
    /// Non-unit input is tolerated: terms are scaled by `2 / |q|²`.
    pub fn to_matrix(&self) -> Mat4x4 {
        let len_squared = self.len_squared();
        if len_squared <= EPSILON * EPSILON {
            warn!("Quat::to_matrix(): zero-length quaternion, returning identity");
            return Mat4x4::identity();
        }
        let s = 2.0 / len_squared;
        let Quat { x, y, z, w } = *self;

        let (xx, yy, zz) = (x * x * s, y * y * s, z * z * s);
        let (xy, xz, yz) = (x * y * s, x * z * s, y * z * s);
        let (wx, wy, wz) = (w * x * s, w * y * s, w * z * s);

        Mat4x4::from_array([
            1.0 - (yy + zz),
            xy + wz,
            xz - wy,
            0.0,
            xy - wz,
            1.0 - (xx + zz),
            yz + wx,
            0.0,
            xz + wy,
            yz - wx,
            1.0 - (xx + yy),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    pub fn rotate(&self, v: Vec3) -> Vec3 {
        v * self.to_matrix()
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn almost_eq(&self, rhs: Quat) -> bool {
        self.almost_eq_within(rhs, EPSILON)
    }
    pub fn almost_eq_within(&self, rhs: Quat, tolerance: f32) -> bool {
        self.to_array()
            .into_iter()
            .zip(rhs.to_array())
            .all(|(a, b)| approx_eq(a, b, tolerance))
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f32; 4]> for Quat {
    fn from(value: [f32; 4]) -> Self {
        let [x, y, z, w] = value;
        Self::new(x, y, z, w)
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "quat({}, {}, {}; {})", self.x, self.y, self.z, self.w)
    }
}

/// Hamilton product. `(a * b).rotate(v) == a.rotate(b.rotate(v))`: `b` is applied first.
impl Mul<Quat> for Quat {
    type Output = Quat;

    fn mul(self, rhs: Quat) -> Self::Output {
        let (ax, ay, az, aw) = (self.x, self.y, self.z, self.w);
        let (bx, by, bz, bw) = (rhs.x, rhs.y, rhs.z, rhs.w);
        Quat::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }
}

impl Mul<f32> for Quat {
    type Output = Quat;

    fn mul(self, rhs: f32) -> Self::Output {
        Quat::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Add<Quat> for Quat {
    type Output = Quat;

    fn add(self, rhs: Quat) -> Self::Output {
        Quat::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub<Quat> for Quat {
    type Output = Quat;

    fn sub(self, rhs: Quat) -> Self::Output {
        self + -rhs
    }
}

impl Neg for Quat {
    type Output = Quat;

    fn neg(self) -> Self::Output {
        Quat::new(-self.x, -self.y, -self.z, -self.w)
    }
}
