//! 3x3 and 4x4 matrices in the row-vector convention.
//!
//! Fields are named by column letter and row number, so `a1, b1, c1` is the first row. A vector
//! is transformed as `v * M`: for a 3x3 matrix `x' = x * a1 + y * a2 + a3` (the third row holds
//! the 2D translation) and for a 4x4 matrix the fourth row holds the 3D translation.
//!
//! Methods taking `&mut self` (such as [`Mat4x4::rotate_x`] or [`Mat4x4::translate`]) change the
//! matrix in place and return `&mut Self` for chaining. They compose the new transform *before*
//! the existing one, expressed in the matrix's current local frame. Everything else is pure.

use std::{
    fmt,
    fmt::Formatter,
    ops::{Mul, MulAssign},
    str::FromStr,
};

use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::core::config::{EPSILON, GIMBAL_LOCK_THRESHOLD};
use crate::core::error::{length_mismatch, GeomError, Result};
use crate::util::linalg::{approx_eq, Vec2, Vec3, Vec4};

fn sin_cos_degrees(degrees: f32) -> (f32, f32) {
    degrees.to_radians().sin_cos()
}

/// The sequence in which [`Mat4x4::rotate`] applies its three single-axis rotations.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EulerOrder {
    #[default]
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl EulerOrder {
    pub fn all() -> [EulerOrder; 6] {
        [
            EulerOrder::Xyz,
            EulerOrder::Xzy,
            EulerOrder::Yxz,
            EulerOrder::Yzx,
            EulerOrder::Zxy,
            EulerOrder::Zyx,
        ]
    }
}

impl FromStr for EulerOrder {
    type Err = GeomError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "XYZ" => Ok(EulerOrder::Xyz),
            "XZY" => Ok(EulerOrder::Xzy),
            "YXZ" => Ok(EulerOrder::Yxz),
            "YZX" => Ok(EulerOrder::Yzx),
            "ZXY" => Ok(EulerOrder::Zxy),
            "ZYX" => Ok(EulerOrder::Zyx),
            _ => Err(GeomError::InvalidArgument(format!(
                "unknown Euler order: {s:?}"
            ))),
        }
    }
}

impl fmt::Display for EulerOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            EulerOrder::Xyz => "XYZ",
            EulerOrder::Xzy => "XZY",
            EulerOrder::Yxz => "YXZ",
            EulerOrder::Yzx => "YZX",
            EulerOrder::Zxy => "ZXY",
            EulerOrder::Zyx => "ZYX",
        };
        write!(f, "{name}")
    }
}

/// A 3x3 matrix: a 2D affine transform, or a 3D linear one.
///
/// ```text
/// | a1 b1 c1 |
/// | a2 b2 c2 |
/// | a3 b3 c3 |
/// ```
/// Applied to a [`Vec2`] the third row is the translation; applied to a [`Vec3`] the matrix is
/// purely linear.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Mat3x3 {
    pub a1: f32,
    pub b1: f32,
    pub c1: f32,
    pub a2: f32,
    pub b2: f32,
    pub c2: f32,
    pub a3: f32,
    pub b3: f32,
    pub c3: f32,
}

impl Mat3x3 {
    pub fn identity() -> Mat3x3 {
        Mat3x3::from_array([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    pub fn zero() -> Mat3x3 {
        Mat3x3::from_array([0.0; 9])
    }

    /// Builds a matrix from nine values in row-major order.
    pub fn from_array(values: [f32; 9]) -> Mat3x3 {
        let [a1, b1, c1, a2, b2, c2, a3, b3, c3] = values;
        Mat3x3 {
            a1,
            b1,
            c1,
            a2,
            b2,
            c2,
            a3,
            b3,
            c3,
        }
    }

    pub fn from_slice(values: &[f32]) -> Result<Mat3x3> {
        <[f32; 9]>::try_from(values)
            .map(Mat3x3::from_array)
            .map_err(|_| length_mismatch("Mat3x3", 9, values.len()))
    }

    /// The nine values in row-major order.
    pub fn to_array(&self) -> [f32; 9] {
        [
            self.a1, self.b1, self.c1, self.a2, self.b2, self.c2, self.a3, self.b3, self.c3,
        ]
    }

    pub fn translation(x: f32, y: f32) -> Mat3x3 {
        Mat3x3 {
            a3: x,
            b3: y,
            ..Mat3x3::identity()
        }
    }

    /// Counterclockwise rotation by `degrees` about the origin.
    ///
    /// ```text
    /// |  cos(θ)  sin(θ)  0 |
    /// | -sin(θ)  cos(θ)  0 |
    /// |  0       0       1 |
    /// ```
    pub fn rotation(degrees: f32) -> Mat3x3 {
        Mat3x3::rotation_about(degrees, 0.0, 0.0)
    }

    /// Rotation by `degrees` followed by a translation of `(x, y)`.
    pub fn rotation_about(degrees: f32, x: f32, y: f32) -> Mat3x3 {
        let (sin, cos) = sin_cos_degrees(degrees);
        Mat3x3::from_array([cos, sin, 0.0, -sin, cos, 0.0, x, y, 1.0])
    }

    pub fn scaling(x: f32, y: f32) -> Mat3x3 {
        Mat3x3 {
            a1: x,
            b2: y,
            ..Mat3x3::identity()
        }
    }

    pub fn load_identity(&mut self) -> &mut Self {
        *self = Mat3x3::identity();
        self
    }

    /// Composes a rotation by `degrees` in place. Exactly zero is a no-op.
    pub fn rotate(&mut self, degrees: f32) -> &mut Self {
        if degrees == 0.0 {
            return self;
        }
        *self = Mat3x3::rotation(degrees) * *self;
        self
    }

    pub fn translate(&mut self, x: f32, y: f32) -> &mut Self {
        self.a3 += self.a1 * x + self.a2 * y;
        self.b3 += self.b1 * x + self.b2 * y;
        self.c3 += self.c1 * x + self.c2 * y;
        self
    }

    /// Scales the first two rows in place. Scaling by `(1, 1)` is a no-op.
    pub fn scale(&mut self, x: f32, y: f32) -> &mut Self {
        if x == 1.0 && y == 1.0 {
            return self;
        }
        self.a1 *= x;
        self.b1 *= x;
        self.c1 *= x;
        self.a2 *= y;
        self.b2 *= y;
        self.c2 *= y;
        self
    }

    pub fn transpose(&mut self) -> &mut Self {
        std::mem::swap(&mut self.b1, &mut self.a2);
        std::mem::swap(&mut self.c1, &mut self.a3);
        std::mem::swap(&mut self.c2, &mut self.b3);
        self
    }

    pub fn transposed(&self) -> Mat3x3 {
        let mut rv = *self;
        rv.transpose();
        rv
    }

    pub fn det(&self) -> f32 {
        self.a1 * self.b2 * self.c3 + self.b1 * self.c2 * self.a3 + self.c1 * self.a2 * self.b3
            - self.c1 * self.b2 * self.a3
            - self.b1 * self.a2 * self.c3
            - self.a1 * self.c2 * self.b3
    }

    pub fn is_invertible(&self) -> bool {
        self.det() != 0.0
    }

    /// Inverse via the adjugate (transposed cofactor matrix) divided by the determinant.
    ///
    /// # Errors
    /// [`GeomError::SingularMatrix`] if the determinant is exactly zero.
    pub fn inverse(&self) -> Result<Mat3x3> {
        let det = self.det();
        if det == 0.0 {
            return Err(GeomError::SingularMatrix);
        }

        let ka1 = self.b2 * self.c3 - self.c2 * self.b3;
        let ka2 = self.a2 * self.c3 - self.c2 * self.a3;
        let ka3 = self.a2 * self.b3 - self.b2 * self.a3;

        let kb1 = self.b1 * self.c3 - self.c1 * self.b3;
        let kb2 = self.a1 * self.c3 - self.c1 * self.a3;
        let kb3 = self.a1 * self.b3 - self.b1 * self.a3;

        let kc1 = self.b1 * self.c2 - self.c1 * self.b2;
        let kc2 = self.a1 * self.c2 - self.c1 * self.a2;
        let kc3 = self.a1 * self.b2 - self.b1 * self.a2;

        let q = 1.0 / det;
        Ok(Mat3x3::from_array([
            q * ka1,
            -q * kb1,
            q * kc1,
            -q * ka2,
            q * kb2,
            -q * kc2,
            q * ka3,
            -q * kb3,
            q * kc3,
        ]))
    }

    /// Inverts in place; on error the matrix is left unchanged.
    pub fn invert(&mut self) -> Result<()> {
        *self = self.inverse()?;
        Ok(())
    }

    /// `lhs * self`, the reversed-operand product.
    pub fn mul_inv(&self, lhs: &Mat3x3) -> Mat3x3 {
        *lhs * *self
    }

    /// Recovers rotation angles in degrees, treating this as a 3D rotation matrix.
    ///
    /// The result inverts a rotation built with [`Mat4x4::rotate`] in [`EulerOrder::Xzy`]:
    /// rotating the identity by `x`, then `z`, then `y` and extracting gives `(x, y, z)` back for
    /// `z` strictly inside `(-90°, 90°)`. Near `z = ±90°` the x and y rotations share an axis, so
    /// `x` is reported as zero and the combined angle is folded into `y`.
    pub fn extract_euler_angles(&self) -> Vec3 {
        if self.a2.abs() > GIMBAL_LOCK_THRESHOLD {
            Vec3 {
                x: 0.0,
                y: (-self.c1).atan2(self.c3).to_degrees(),
                z: -self.a2.signum() * 90.0,
            }
        } else {
            Vec3 {
                x: self.c2.atan2(self.b2).to_degrees(),
                y: self.a3.atan2(self.a1).to_degrees(),
                z: (-self.a2).asin().to_degrees(),
            }
        }
    }

    pub fn almost_eq(&self, rhs: Mat3x3) -> bool {
        self.almost_eq_within(rhs, EPSILON)
    }
    pub fn almost_eq_within(&self, rhs: Mat3x3, tolerance: f32) -> bool {
        self.to_array()
            .into_iter()
            .zip(rhs.to_array())
            .all(|(a, b)| approx_eq(a, b, tolerance))
    }
}

impl Default for Mat3x3 {
    fn default() -> Self {
        Mat3x3::identity()
    }
}

impl One for Mat3x3 {
    fn one() -> Self {
        Mat3x3::identity()
    }
}

/// `self * rhs`: applies `self` first, then `rhs`.
impl Mul<Mat3x3> for Mat3x3 {
    type Output = Mat3x3;

    fn mul(self, rhs: Mat3x3) -> Self::Output {
        Mat3x3 {
            a1: self.a1 * rhs.a1 + self.b1 * rhs.a2 + self.c1 * rhs.a3,
            b1: self.a1 * rhs.b1 + self.b1 * rhs.b2 + self.c1 * rhs.b3,
            c1: self.a1 * rhs.c1 + self.b1 * rhs.c2 + self.c1 * rhs.c3,
            a2: self.a2 * rhs.a1 + self.b2 * rhs.a2 + self.c2 * rhs.a3,
            b2: self.a2 * rhs.b1 + self.b2 * rhs.b2 + self.c2 * rhs.b3,
            c2: self.a2 * rhs.c1 + self.b2 * rhs.c2 + self.c2 * rhs.c3,
            a3: self.a3 * rhs.a1 + self.b3 * rhs.a2 + self.c3 * rhs.a3,
            b3: self.a3 * rhs.b1 + self.b3 * rhs.b2 + self.c3 * rhs.b3,
            c3: self.a3 * rhs.c1 + self.b3 * rhs.c2 + self.c3 * rhs.c3,
        }
    }
}
impl MulAssign<Mat3x3> for Mat3x3 {
    fn mul_assign(&mut self, rhs: Mat3x3) {
        *self = *self * rhs;
    }
}

/// Affine: the third row is added as a translation.
impl Mul<Mat3x3> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: Mat3x3) -> Self::Output {
        Vec2 {
            x: self.x * rhs.a1 + self.y * rhs.a2 + rhs.a3,
            y: self.x * rhs.b1 + self.y * rhs.b2 + rhs.b3,
        }
    }
}
impl MulAssign<Mat3x3> for Vec2 {
    fn mul_assign(&mut self, rhs: Mat3x3) {
        *self = *self * rhs;
    }
}

/// Linear: no translation is applied.
impl Mul<Mat3x3> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: Mat3x3) -> Self::Output {
        Vec3 {
            x: self.x * rhs.a1 + self.y * rhs.a2 + self.z * rhs.a3,
            y: self.x * rhs.b1 + self.y * rhs.b2 + self.z * rhs.b3,
            z: self.x * rhs.c1 + self.y * rhs.c2 + self.z * rhs.c3,
        }
    }
}

/// Direction and up vectors recovered from a view matrix.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookAtVectors {
    pub dir: Vec3,
    pub up: Vec3,
}

/// A 4x4 matrix: a 3D affine or projective transform.
///
/// ```text
/// | a1 b1 c1 d1 |
/// | a2 b2 c2 d2 |
/// | a3 b3 c3 d3 |
/// | a4 b4 c4 d4 |
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Mat4x4 {
    pub a1: f32,
    pub b1: f32,
    pub c1: f32,
    pub d1: f32,
    pub a2: f32,
    pub b2: f32,
    pub c2: f32,
    pub d2: f32,
    pub a3: f32,
    pub b3: f32,
    pub c3: f32,
    pub d3: f32,
    pub a4: f32,
    pub b4: f32,
    pub c4: f32,
    pub d4: f32,
}

impl Mat4x4 {
    pub fn identity() -> Mat4x4 {
        Mat4x4::from_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn zero() -> Mat4x4 {
        Mat4x4::from_array([0.0; 16])
    }

    /// Builds a matrix from sixteen values in row-major order.
    pub fn from_array(values: [f32; 16]) -> Mat4x4 {
        let [a1, b1, c1, d1, a2, b2, c2, d2, a3, b3, c3, d3, a4, b4, c4, d4] = values;
        Mat4x4 {
            a1,
            b1,
            c1,
            d1,
            a2,
            b2,
            c2,
            d2,
            a3,
            b3,
            c3,
            d3,
            a4,
            b4,
            c4,
            d4,
        }
    }

    pub fn from_slice(values: &[f32]) -> Result<Mat4x4> {
        <[f32; 16]>::try_from(values)
            .map(Mat4x4::from_array)
            .map_err(|_| length_mismatch("Mat4x4", 16, values.len()))
    }

    /// The sixteen values in row-major order, as expected by most graphics buffer APIs.
    pub fn to_array(&self) -> [f32; 16] {
        [
            self.a1, self.b1, self.c1, self.d1, //
            self.a2, self.b2, self.c2, self.d2, //
            self.a3, self.b3, self.c3, self.d3, //
            self.a4, self.b4, self.c4, self.d4,
        ]
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Mat4x4 {
        Mat4x4 {
            a4: x,
            b4: y,
            c4: z,
            ..Mat4x4::identity()
        }
    }

    pub fn scaling(x: f32, y: f32, z: f32) -> Mat4x4 {
        Mat4x4 {
            a1: x,
            b2: y,
            c3: z,
            ..Mat4x4::identity()
        }
    }

    /// Rotation by the given angles in degrees, applied in [`EulerOrder::Xyz`].
    pub fn make_rotation(x: f32, y: f32, z: f32) -> Mat4x4 {
        let mut rv = Mat4x4::identity();
        rv.rotate(Vec3 { x, y, z }, EulerOrder::Xyz);
        rv
    }

    pub fn load_identity(&mut self) -> &mut Self {
        *self = Mat4x4::identity();
        self
    }

    /// Composes a rotation of `degrees` about the x-axis. Exactly zero is a no-op.
    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = sin_cos_degrees(degrees);

        let a2 = self.a2 * cos + self.a3 * sin;
        let b2 = self.b2 * cos + self.b3 * sin;
        let c2 = self.c2 * cos + self.c3 * sin;
        let d2 = self.d2 * cos + self.d3 * sin;

        let a3 = self.a3 * cos - self.a2 * sin;
        let b3 = self.b3 * cos - self.b2 * sin;
        let c3 = self.c3 * cos - self.c2 * sin;
        let d3 = self.d3 * cos - self.d2 * sin;

        (self.a2, self.b2, self.c2, self.d2) = (a2, b2, c2, d2);
        (self.a3, self.b3, self.c3, self.d3) = (a3, b3, c3, d3);
        self
    }

    /// Composes a rotation of `degrees` about the y-axis. Exactly zero is a no-op.
    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = sin_cos_degrees(degrees);

        let a1 = self.a1 * cos - self.a3 * sin;
        let b1 = self.b1 * cos - self.b3 * sin;
        let c1 = self.c1 * cos - self.c3 * sin;
        let d1 = self.d1 * cos - self.d3 * sin;

        let a3 = self.a1 * sin + self.a3 * cos;
        let b3 = self.b1 * sin + self.b3 * cos;
        let c3 = self.c1 * sin + self.c3 * cos;
        let d3 = self.d1 * sin + self.d3 * cos;

        (self.a1, self.b1, self.c1, self.d1) = (a1, b1, c1, d1);
        (self.a3, self.b3, self.c3, self.d3) = (a3, b3, c3, d3);
        self
    }

    /// Composes a rotation of `degrees` about the z-axis. Exactly zero is a no-op.
    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = sin_cos_degrees(degrees);

        let a1 = self.a1 * cos + self.a2 * sin;
        let b1 = self.b1 * cos + self.b2 * sin;
        let c1 = self.c1 * cos + self.c2 * sin;
        let d1 = self.d1 * cos + self.d2 * sin;

        let a2 = self.a2 * cos - self.a1 * sin;
        let b2 = self.b2 * cos - self.b1 * sin;
        let c2 = self.c2 * cos - self.c1 * sin;
        let d2 = self.d2 * cos - self.d1 * sin;

        (self.a1, self.b1, self.c1, self.d1) = (a1, b1, c1, d1);
        (self.a2, self.b2, self.c2, self.d2) = (a2, b2, c2, d2);
        self
    }

    /// Applies the three single-axis rotations of `degrees` in the sequence named by `order`.
    pub fn rotate(&mut self, degrees: Vec3, order: EulerOrder) -> &mut Self {
        let Vec3 { x, y, z } = degrees;
        match order {
            EulerOrder::Xyz => self.rotate_x(x).rotate_y(y).rotate_z(z),
            EulerOrder::Xzy => self.rotate_x(x).rotate_z(z).rotate_y(y),
            EulerOrder::Yxz => self.rotate_y(y).rotate_x(x).rotate_z(z),
            EulerOrder::Yzx => self.rotate_y(y).rotate_z(z).rotate_x(x),
            EulerOrder::Zxy => self.rotate_z(z).rotate_x(x).rotate_y(y),
            EulerOrder::Zyx => self.rotate_z(z).rotate_y(y).rotate_x(x),
        }
    }

    /// Composes a translation expressed in the matrix's current local frame.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.a4 += self.a1 * x + self.a2 * y + self.a3 * z;
        self.b4 += self.b1 * x + self.b2 * y + self.b3 * z;
        self.c4 += self.c1 * x + self.c2 * y + self.c3 * z;
        self.d4 += self.d1 * x + self.d2 * y + self.d3 * z;
        self
    }

    pub fn translate_z(&mut self, z: f32) -> &mut Self {
        self.translate(0.0, 0.0, z)
    }

    /// Scales the first three rows in place. Scaling by `(1, 1, 1)` is a no-op.
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        if x == 1.0 && y == 1.0 && z == 1.0 {
            return self;
        }
        self.a1 *= x;
        self.b1 *= x;
        self.c1 *= x;
        self.d1 *= x;
        self.a2 *= y;
        self.b2 *= y;
        self.c2 *= y;
        self.d2 *= y;
        self.a3 *= z;
        self.b3 *= z;
        self.c3 *= z;
        self.d3 *= z;
        self
    }

    pub fn transpose(&mut self) -> &mut Self {
        std::mem::swap(&mut self.b1, &mut self.a2);
        std::mem::swap(&mut self.c1, &mut self.a3);
        std::mem::swap(&mut self.d1, &mut self.a4);
        std::mem::swap(&mut self.c2, &mut self.b3);
        std::mem::swap(&mut self.d2, &mut self.b4);
        std::mem::swap(&mut self.d3, &mut self.c4);
        self
    }

    pub fn transposed(&self) -> Mat4x4 {
        let mut rv = *self;
        rv.transpose();
        rv
    }

    // Minors of the first row, shared by `det` and `inverse`.
    fn first_row_minors(&self) -> [f32; 4] {
        let (e, f, g, h) = (self.a2, self.b2, self.c2, self.d2);
        let (i, j, k, l) = (self.a3, self.b3, self.c3, self.d3);
        let (m, n, o, p) = (self.a4, self.b4, self.c4, self.d4);
        [
            f * k * p + j * o * h + n * g * l - f * l * o - g * j * p - h * k * n,
            e * k * p + i * o * h + m * g * l - e * l * o - g * i * p - h * k * m,
            e * j * p + i * n * h + m * f * l - e * l * n - f * i * p - h * j * m,
            e * j * o + i * n * g + m * f * k - e * k * n - f * i * o - g * j * m,
        ]
    }

    pub fn det(&self) -> f32 {
        let [q, r, s, t] = self.first_row_minors();
        self.a1 * q - self.b1 * r + self.c1 * s - self.d1 * t
    }

    pub fn is_invertible(&self) -> bool {
        self.det() != 0.0
    }

    /// Inverse via cofactor expansion over 3x3 minors, then the transposed adjugate scaled by
    /// the reciprocal determinant.
    ///
    /// # Errors
    /// [`GeomError::SingularMatrix`] if the determinant is exactly zero; check
    /// [`Mat4x4::is_invertible`] first to avoid it.
    pub fn inverse(&self) -> Result<Mat4x4> {
        let [q, r, s, t] = self.first_row_minors();
        let (a, b, c, d) = (self.a1, self.b1, self.c1, self.d1);
        let delta = a * q - b * r + c * s - d * t;
        if delta == 0.0 {
            return Err(GeomError::SingularMatrix);
        }

        let (e, f, g, h) = (self.a2, self.b2, self.c2, self.d2);
        let (i, j, k, l) = (self.a3, self.b3, self.c3, self.d3);
        let (m, n, o, p) = (self.a4, self.b4, self.c4, self.d4);

        // Cofactors, named by the element they belong to.
        let (ca1, cb1, cc1, cd1) = (q, -r, s, -t);

        let ca2 = -(b * k * p + j * o * d + n * c * l - b * l * o - c * j * p - d * k * n);
        let cb2 = a * k * p + i * o * d + m * c * l - a * l * o - c * i * p - d * k * m;
        let cc2 = -(a * j * p + i * n * d + m * b * l - a * l * n - b * i * p - d * j * m);
        let cd2 = a * j * o + i * n * c + m * b * k - a * k * n - b * i * o - c * j * m;

        let ca3 = b * g * p + f * o * d + n * c * h - b * h * o - c * f * p - d * g * n;
        let cb3 = -(a * g * p + e * o * d + m * c * h - a * h * o - c * e * p - d * g * m);
        let cc3 = a * f * p + e * n * d + m * b * h - a * h * n - b * e * p - d * f * m;
        let cd3 = -(a * f * o + e * n * c + m * b * g - a * g * n - b * e * o - c * f * m);

        let ca4 = -(b * g * l + f * k * d + j * c * h - b * h * k - c * f * l - d * g * j);
        let cb4 = a * g * l + e * k * d + i * c * h - a * h * k - c * e * l - d * g * i;
        let cc4 = -(a * f * l + e * j * d + i * b * h - a * h * j - b * e * l - d * f * i);
        let cd4 = a * f * k + e * j * c + i * b * g - a * g * j - b * e * k - c * f * i;

        let inv = 1.0 / delta;
        Ok(Mat4x4::from_array([
            ca1 * inv,
            ca2 * inv,
            ca3 * inv,
            ca4 * inv,
            cb1 * inv,
            cb2 * inv,
            cb3 * inv,
            cb4 * inv,
            cc1 * inv,
            cc2 * inv,
            cc3 * inv,
            cc4 * inv,
            cd1 * inv,
            cd2 * inv,
            cd3 * inv,
            cd4 * inv,
        ]))
    }

    /// Inverts in place; on error the matrix is left unchanged.
    pub fn invert(&mut self) -> Result<()> {
        *self = self.inverse()?;
        Ok(())
    }

    /// `lhs * self`, the reversed-operand product.
    pub fn mul_inv(&self, lhs: &Mat4x4) -> Mat4x4 {
        *lhs * *self
    }

    /// The linear 3x3 block in the top-left corner.
    pub fn upper_left(&self) -> Mat3x3 {
        Mat3x3::from_array([
            self.a1, self.b1, self.c1, self.a2, self.b2, self.c2, self.a3, self.b3, self.c3,
        ])
    }

    /// Perspective projection from explicit clipping planes.
    pub fn frustum(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4x4 {
        let x = right - left;
        let y = bottom - top;
        let z = far - near;
        Mat4x4::from_array([
            near * 2.0 / x,
            0.0,
            0.0,
            0.0,
            0.0,
            near * 2.0 / y,
            0.0,
            0.0,
            (right + left) / x,
            (bottom + top) / y,
            -(far + near) / z,
            -1.0,
            0.0,
            0.0,
            -(far * near * 2.0) / z,
            0.0,
        ])
    }

    /// Perspective projection from a vertical field of view in degrees.
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4x4 {
        let top = near * (fov_degrees.to_radians() / 2.0).tan();
        let right = top * aspect;
        Mat4x4::frustum(-right, right, -top, top, near, far)
    }

    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4x4 {
        let x = right - left;
        let y = top - bottom;
        let z = far - near;
        Mat4x4::from_array([
            2.0 / x,
            0.0,
            0.0,
            0.0,
            0.0,
            2.0 / y,
            0.0,
            0.0,
            0.0,
            0.0,
            -2.0 / z,
            0.0,
            -(left + right) / x,
            -(top + bottom) / y,
            -(far + near) / z,
            1.0,
        ])
    }

    /// View rotation looking from `eye` towards `target`.
    ///
    /// Only the rotation block is populated; the translation row is left zero so callers can
    /// compose the eye offset separately.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4x4 {
        let zaxis = (eye - target).normed();
        let xaxis = up.cross(zaxis).normed();
        let yaxis = zaxis.cross(xaxis);
        Mat4x4::from_array([
            xaxis.x, yaxis.x, zaxis.x, 0.0, //
            xaxis.y, yaxis.y, zaxis.y, 0.0, //
            xaxis.z, yaxis.z, zaxis.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// See [`Mat3x3::extract_euler_angles`]; only the upper-left block is read.
    pub fn extract_euler_angles(&self) -> Vec3 {
        self.upper_left().extract_euler_angles()
    }

    pub fn extract_look_at_vectors(&self) -> LookAtVectors {
        LookAtVectors {
            dir: Vec3 {
                x: self.c1,
                y: self.c2,
                z: -self.c3,
            }
            .normed(),
            up: Vec3 {
                x: self.b1,
                y: self.b2,
                z: -self.b3,
            }
            .normed(),
        }
    }

    pub fn almost_eq(&self, rhs: Mat4x4) -> bool {
        self.almost_eq_within(rhs, EPSILON)
    }
    pub fn almost_eq_within(&self, rhs: Mat4x4, tolerance: f32) -> bool {
        self.to_array()
            .into_iter()
            .zip(rhs.to_array())
            .all(|(a, b)| approx_eq(a, b, tolerance))
    }
}

impl Default for Mat4x4 {
    fn default() -> Self {
        Mat4x4::identity()
    }
}

impl One for Mat4x4 {
    fn one() -> Self {
        Mat4x4::identity()
    }
}

/// `self * rhs`: applies `self` first, then `rhs`.
impl Mul<Mat4x4> for Mat4x4 {
    type Output = Mat4x4;

    fn mul(self, rhs: Mat4x4) -> Self::Output {
        Mat4x4 {
            a1: self.a1 * rhs.a1 + self.b1 * rhs.a2 + self.c1 * rhs.a3 + self.d1 * rhs.a4,
            b1: self.a1 * rhs.b1 + self.b1 * rhs.b2 + self.c1 * rhs.b3 + self.d1 * rhs.b4,
            c1: self.a1 * rhs.c1 + self.b1 * rhs.c2 + self.c1 * rhs.c3 + self.d1 * rhs.c4,
            d1: self.a1 * rhs.d1 + self.b1 * rhs.d2 + self.c1 * rhs.d3 + self.d1 * rhs.d4,
            a2: self.a2 * rhs.a1 + self.b2 * rhs.a2 + self.c2 * rhs.a3 + self.d2 * rhs.a4,
            b2: self.a2 * rhs.b1 + self.b2 * rhs.b2 + self.c2 * rhs.b3 + self.d2 * rhs.b4,
            c2: self.a2 * rhs.c1 + self.b2 * rhs.c2 + self.c2 * rhs.c3 + self.d2 * rhs.c4,
            d2: self.a2 * rhs.d1 + self.b2 * rhs.d2 + self.c2 * rhs.d3 + self.d2 * rhs.d4,
            a3: self.a3 * rhs.a1 + self.b3 * rhs.a2 + self.c3 * rhs.a3 + self.d3 * rhs.a4,
            b3: self.a3 * rhs.b1 + self.b3 * rhs.b2 + self.c3 * rhs.b3 + self.d3 * rhs.b4,
            c3: self.a3 * rhs.c1 + self.b3 * rhs.c2 + self.c3 * rhs.c3 + self.d3 * rhs.c4,
            d3: self.a3 * rhs.d1 + self.b3 * rhs.d2 + self.c3 * rhs.d3 + self.d3 * rhs.d4,
            a4: self.a4 * rhs.a1 + self.b4 * rhs.a2 + self.c4 * rhs.a3 + self.d4 * rhs.a4,
            b4: self.a4 * rhs.b1 + self.b4 * rhs.b2 + self.c4 * rhs.b3 + self.d4 * rhs.b4,
            c4: self.a4 * rhs.c1 + self.b4 * rhs.c2 + self.c4 * rhs.c3 + self.d4 * rhs.c4,
            d4: self.a4 * rhs.d1 + self.b4 * rhs.d2 + self.c4 * rhs.d3 + self.d4 * rhs.d4,
        }
    }
}
impl MulAssign<Mat4x4> for Mat4x4 {
    fn mul_assign(&mut self, rhs: Mat4x4) {
        *self = *self * rhs;
    }
}

/// Affine: the point is treated as `(x, y, z, 1)` and the fourth row adds the translation.
impl Mul<Mat4x4> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: Mat4x4) -> Self::Output {
        Vec3 {
            x: self.x * rhs.a1 + self.y * rhs.a2 + self.z * rhs.a3 + rhs.a4,
            y: self.x * rhs.b1 + self.y * rhs.b2 + self.z * rhs.b3 + rhs.b4,
            z: self.x * rhs.c1 + self.y * rhs.c2 + self.z * rhs.c3 + rhs.c4,
        }
    }
}
impl MulAssign<Mat4x4> for Vec3 {
    fn mul_assign(&mut self, rhs: Mat4x4) {
        *self = *self * rhs;
    }
}

impl Mul<Mat4x4> for Vec4 {
    type Output = Vec4;

    fn mul(self, rhs: Mat4x4) -> Self::Output {
        Vec4 {
            x: self.x * rhs.a1 + self.y * rhs.a2 + self.z * rhs.a3 + self.w * rhs.a4,
            y: self.x * rhs.b1 + self.y * rhs.b2 + self.z * rhs.b3 + self.w * rhs.b4,
            z: self.x * rhs.c1 + self.y * rhs.c2 + self.z * rhs.c3 + self.w * rhs.c4,
            w: self.x * rhs.d1 + self.y * rhs.d2 + self.z * rhs.d3 + self.w * rhs.d4,
        }
    }
}
