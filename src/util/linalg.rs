use std::{
    fmt,
    fmt::Formatter,
    iter::Sum,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::EPSILON;
use crate::core::error::{length_mismatch, Result};
use crate::util::gg_float;
use crate::util::gg_float::GgFloat;
use crate::util::matrix::Mat3x3;

/// Linear interpolation `a + (b - a) * t`.
///
/// Not clamped: values of `t` outside `[0, 1]` extrapolate.
///
/// ```
/// use graphics_mathlib::util::linalg::lerp;
/// assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
/// assert_eq!(lerp(2.0, 4.0, 2.0), 6.0);
/// ```
pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    a + (b - a) * t
}

/// Hermite interpolation between 0 and 1 as `x` moves from `edge0` to `edge1`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp01();
    t * t * (3.0 - 2.0 * t)
}

/// Wraps an angle in degrees into `[0, 360]`.
pub fn fix_angle(degrees: f32) -> f32 {
    if (0.0..=360.0).contains(&degrees) || !degrees.is_finite() {
        degrees
    } else {
        degrees.rem_euclid(360.0)
    }
}

pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    a == b || (a - b).abs() < epsilon
}

/// Component-wise clamping for scalars and vectors. NaN components are passed through unchanged.
pub trait Clamp: Sized {
    #[must_use]
    fn clamp_to(self, min: f32, max: f32) -> Self;
    #[must_use]
    fn clamp01(self) -> Self {
        self.clamp_to(0.0, 1.0)
    }
}

impl Clamp for f32 {
    fn clamp_to(self, min: f32, max: f32) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }
}

macro_rules! impl_vector {
    ($name:ident, $n:literal, { $($f:ident),+ }) => {
        impl $name {
            #[must_use]
            pub fn splat(value: f32) -> $name {
                $name { $($f: value),+ }
            }
            #[must_use]
            pub fn zero() -> $name {
                $name::splat(0.0)
            }
            #[must_use]
            pub fn one() -> $name {
                $name::splat(1.0)
            }

            pub fn dot(&self, rhs: $name) -> f32 {
                0.0 $(+ self.$f * rhs.$f)+
            }
            pub fn len_squared(&self) -> f32 {
                self.dot(*self)
            }
            pub fn len(&self) -> f32 {
                self.len_squared().sqrt()
            }
            pub fn dist(&self, other: $name) -> f32 {
                (other - *self).len()
            }
            pub fn dist_squared(&self, other: $name) -> f32 {
                (other - *self).len_squared()
            }

            /// Returns the unit vector in the same direction, or the zero vector if the length
            /// has no finite reciprocal.
            #[must_use]
            pub fn normed(&self) -> $name {
                let inv = 1.0 / self.len();
                if inv.is_finite() {
                    $name { $($f: gg_float::force_positive_zero(self.$f * inv)),+ }
                } else {
                    warn!(
                        "{}::normed(): length {} has no finite reciprocal, returning zero",
                        stringify!($name),
                        self.len()
                    );
                    $name::zero()
                }
            }

            #[must_use]
            pub fn abs(&self) -> $name {
                $name { $($f: self.$f.abs()),+ }
            }
            #[must_use]
            pub fn component_wise(&self, rhs: $name) -> $name {
                $name { $($f: self.$f * rhs.$f),+ }
            }
            #[must_use]
            pub fn lerp(&self, to: $name, t: f32) -> $name {
                lerp(*self, to, t)
            }

            pub fn almost_eq(&self, rhs: $name) -> bool {
                self.almost_eq_within(rhs, EPSILON)
            }
            pub fn almost_eq_within(&self, rhs: $name, tolerance: f32) -> bool {
                true $(&& approx_eq(self.$f, rhs.$f, tolerance))+
            }

            pub fn to_array(&self) -> [f32; $n] {
                [$(self.$f),+]
            }
            pub fn from_slice(values: &[f32]) -> Result<$name> {
                <[f32; $n]>::try_from(values)
                    .map($name::from)
                    .map_err(|_| length_mismatch(stringify!($name), $n, values.len()))
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                if self.is_finite() || other.is_finite() {
                    true $(&& (self.$f - other.$f).abs() < EPSILON)+
                } else {
                    true $(&& self.$f == other.$f)+
                }
            }
        }

        impl Zero for $name {
            fn zero() -> Self {
                $name { $($f: 0.0),+ }
            }
            fn is_zero(&self) -> bool {
                *self == $name { $($f: 0.0),+ }
            }
        }

        impl Clamp for $name {
            fn clamp_to(self, min: f32, max: f32) -> Self {
                $name { $($f: self.$f.clamp_to(min, max)),+ }
            }
        }

        impl From<[f32; $n]> for $name {
            fn from(value: [f32; $n]) -> Self {
                let [$($f),+] = value;
                $name { $($f),+ }
            }
        }
        impl From<$name> for [f32; $n] {
            fn from(value: $name) -> Self {
                value.to_array()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                let precision = f.precision();
                write!(f, "vec(")?;
                let mut first = true;
                for value in self.to_array() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    if let Some(p) = precision {
                        write!(f, "{value:.p$}")?;
                    } else {
                        write!(f, "{value}")?;
                    }
                }
                write!(f, ")")
            }
        }

        impl Add<$name> for $name {
            type Output = $name;

            fn add(self, rhs: $name) -> Self::Output {
                $name { $($f: self.$f + rhs.$f),+ }
            }
        }
        impl AddAssign<$name> for $name {
            fn add_assign(&mut self, rhs: $name) {
                $(self.$f += rhs.$f;)+
            }
        }

        impl Sub<$name> for $name {
            type Output = $name;

            fn sub(self, rhs: $name) -> Self::Output {
                $name { $($f: self.$f - rhs.$f),+ }
            }
        }
        impl SubAssign<$name> for $name {
            fn sub_assign(&mut self, rhs: $name) {
                $(self.$f -= rhs.$f;)+
            }
        }

        impl Sum<$name> for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> Self {
                iter.fold($name::zero(), |acc, v| acc + v)
            }
        }

        impl Mul<f32> for $name {
            type Output = $name;

            fn mul(self, rhs: f32) -> Self::Output {
                $name { $($f: self.$f * rhs),+ }
            }
        }
        impl Mul<$name> for f32 {
            type Output = $name;

            fn mul(self, rhs: $name) -> Self::Output {
                rhs * self
            }
        }
        impl MulAssign<f32> for $name {
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$f *= rhs;)+
            }
        }

        impl Div<f32> for $name {
            type Output = $name;

            fn div(self, rhs: f32) -> Self::Output {
                $name { $($f: self.$f / rhs),+ }
            }
        }
        impl DivAssign<f32> for $name {
            fn div_assign(&mut self, rhs: f32) {
                $(self.$f /= rhs;)+
            }
        }

        impl Neg for $name {
            type Output = $name;

            fn neg(self) -> Self::Output {
                $name { $($f: -self.$f),+ }
            }
        }
    };
}

/// A 2D vector. `PartialEq` compares within [`EPSILON`] per component.
///
/// Directions follow the usual mathematical convention: `up()` is `+y`.
#[derive(Default, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl_vector!(Vec2, 2, { x, y });

impl Vec2 {
    pub fn right() -> Vec2 {
        Vec2 { x: 1.0, y: 0.0 }
    }
    pub fn up() -> Vec2 {
        Vec2 { x: 0.0, y: 1.0 }
    }
    pub fn left() -> Vec2 {
        Vec2 { x: -1.0, y: 0.0 }
    }
    pub fn down() -> Vec2 {
        Vec2 { x: 0.0, y: -1.0 }
    }

    /// The z-component of the 3D cross product of the two vectors embedded in the xy-plane.
    pub fn cross(&self, rhs: Vec2) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Perpendicular vector, rotated a quarter turn counterclockwise.
    #[must_use]
    pub fn orthog(&self) -> Vec2 {
        Vec2 {
            x: -self.y,
            y: self.x,
        }
    }

    /// Rotates counterclockwise by `radians` about the origin.
    ///
    /// ```
    /// use graphics_mathlib::core::prelude::*;
    /// let v = Vec2 { x: 1.0, y: 0.0 }.rotated(std::f32::consts::FRAC_PI_2);
    /// assert_eq!(v, Vec2 { x: 0.0, y: 1.0 });
    /// ```
    #[must_use]
    pub fn rotated(&self, radians: f32) -> Vec2 {
        *self * Mat3x3::rotation(radians.to_degrees())
    }

    /// Angle of this vector from the positive x-axis, in radians.
    pub fn angle_radians(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Angle in degrees of the direction pointing from `from` to `to`.
    pub fn angle_of(from: Vec2, to: Vec2) -> f32 {
        (to - from).angle_radians().to_degrees()
    }

    /// Projection of this vector onto `axis`.
    #[must_use]
    pub fn project(&self, axis: Vec2) -> Vec2 {
        let axis = axis.normed();
        self.dot(axis) * axis
    }

    pub fn extend(&self, z: f32) -> Vec3 {
        Vec3 {
            x: self.x,
            y: self.y,
            z,
        }
    }
}

/// A 3D vector. `PartialEq` compares within [`EPSILON`] per component.
///
/// Right-handed: `up()` is `+y` and `forward()` is `-z`.
#[derive(Default, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl_vector!(Vec3, 3, { x, y, z });

impl Vec3 {
    pub fn right() -> Vec3 {
        Vec3 {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        }
    }
    pub fn left() -> Vec3 {
        -Vec3::right()
    }
    pub fn up() -> Vec3 {
        Vec3 {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        }
    }
    pub fn down() -> Vec3 {
        -Vec3::up()
    }
    pub fn back() -> Vec3 {
        Vec3 {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        }
    }
    pub fn forward() -> Vec3 {
        -Vec3::back()
    }

    #[must_use]
    pub fn cross(&self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    pub fn xy(&self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y,
        }
    }

    pub fn extend(&self, w: f32) -> Vec4 {
        Vec4 {
            x: self.x,
            y: self.y,
            z: self.z,
            w,
        }
    }
}

/// A 4D vector, mostly used for homogeneous coordinates and plane equations.
#[derive(Default, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl_vector!(Vec4, 4, { x, y, z, w });

impl Vec4 {
    pub fn xyz(&self) -> Vec3 {
        Vec3 {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    // ==================== Scalar Helper Tests ====================

    #[test]
    fn lerp_extrapolates() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
        assert_eq!(lerp(0.0, 10.0, -1.0), -10.0);
        assert_eq!(lerp(0.0, 10.0, 1.5), 15.0);
        let v = lerp(Vec3::zero(), Vec3::one(), 2.0);
        assert_eq!(v, Vec3::splat(2.0));
    }

    #[test]
    fn smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(10.0, 20.0, 12.5) - 0.15625).abs() < EPSILON);
    }

    #[test]
    fn fix_angle_wraps() {
        assert_eq!(fix_angle(45.0), 45.0);
        assert_eq!(fix_angle(360.0), 360.0);
        assert_eq!(fix_angle(-30.0), 330.0);
        assert_eq!(fix_angle(370.0), 10.0);
        assert_eq!(fix_angle(-720.0), 0.0);
    }

    #[test]
    fn clamp_scalars_and_vectors() {
        assert_eq!(5.0_f32.clamp_to(0.0, 1.0), 1.0);
        assert_eq!((-5.0_f32).clamp01(), 0.0);
        assert!(f32::NAN.clamp01().is_nan());
        let v = Vec4 {
            x: -1.0,
            y: 0.5,
            z: 2.0,
            w: 1.0,
        };
        assert_eq!(
            v.clamp01(),
            Vec4 {
                x: 0.0,
                y: 0.5,
                z: 1.0,
                w: 1.0
            }
        );
    }

    #[test]
    fn approx_eq_tolerance() {
        assert!(approx_eq(1.0, 1.0 + 1e-6, EPSILON));
        assert!(!approx_eq(1.0, 1.1, EPSILON));
        assert!(approx_eq(f32::INFINITY, f32::INFINITY, EPSILON));
    }

    // ==================== Vector Tests ====================

    #[test]
    fn normed_has_unit_length() {
        let v = Vec3 {
            x: 3.0,
            y: -4.0,
            z: 12.0,
        };
        let n = v.normed();
        assert!((n.len() - 1.0).abs() < EPSILON);
        assert_eq!(n * v.len(), v);
        assert_eq!(Vec2 { x: 0.0, y: -2.0 }.normed(), Vec2 { x: 0.0, y: -1.0 });
    }

    #[test]
    fn normed_zero_is_zero() {
        assert_eq!(Vec2::zero().normed(), Vec2::zero());
        assert_eq!(Vec3::zero().normed(), Vec3::zero());
        let n = Vec4::zero().normed();
        assert!(n.to_array().iter().all(|c| *c == 0.0 && c.is_sign_positive()));
    }

    #[test]
    fn approximate_equality() {
        let a = Vec2 { x: 1.0, y: 2.0 };
        assert_eq!(a, Vec2 { x: 1.0 + 1e-6, y: 2.0 });
        assert_ne!(a, Vec2 { x: 1.1, y: 2.0 });
        let inf = Vec2 {
            x: f32::INFINITY,
            y: 0.0,
        };
        assert_eq!(inf, inf);
        assert!(a.almost_eq_within(Vec2 { x: 1.05, y: 2.0 }, 0.1));
        assert!(!a.almost_eq(Vec2 { x: 1.05, y: 2.0 }));
    }

    #[test]
    fn dot_and_cross() {
        let x = Vec3::right();
        let y = Vec3::up();
        assert_eq!(x.dot(y), 0.0);
        assert_eq!(x.cross(y), Vec3::back());
        assert_eq!(y.cross(x), Vec3::forward());
        assert_eq!(Vec2::right().cross(Vec2::up()), 1.0);
        assert_eq!(Vec2 { x: 3.0, y: 4.0 }.len(), 5.0);
        assert_eq!(Vec2::zero().dist(Vec2 { x: 3.0, y: 4.0 }), 5.0);
        assert_eq!(Vec3::zero().dist_squared(Vec3::one()), 3.0);
    }

    #[test]
    fn arithmetic() {
        let mut v = Vec3 {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        v += Vec3::one();
        v *= 2.0;
        assert_eq!(v.to_array(), [4.0, 6.0, 8.0]);
        v -= Vec3::splat(4.0);
        v /= 2.0;
        assert_eq!(v.to_array(), [0.0, 1.0, 2.0]);
        assert_eq!((-v).to_array(), [0.0, -1.0, -2.0]);
        assert_eq!((-v).abs(), v);
        assert_eq!(2.0 * v, v + v);
        assert_eq!(
            v.component_wise(Vec3::splat(3.0)),
            Vec3 {
                x: 0.0,
                y: 3.0,
                z: 6.0
            }
        );
        let total: Vec2 = [Vec2::one(), Vec2::right(), Vec2::up()].into_iter().sum();
        assert_eq!(total, Vec2::splat(2.0));
        assert!(Vec4::zero().is_zero());
    }

    #[test]
    fn rotated_and_angles() {
        let v = Vec2 { x: 3.0, y: -10.0 };
        assert_eq!(v.rotated(FRAC_PI_2), Vec2 { x: 10.0, y: 3.0 });
        assert_eq!(Vec2::right().orthog(), Vec2::up());
        assert!((Vec2::up().angle_radians() - FRAC_PI_2).abs() < EPSILON);
        assert!((Vec2::angle_of(Vec2::one(), Vec2 { x: 1.0, y: 3.0 }) - 90.0).abs() < EPSILON);
        assert_eq!(
            Vec2 { x: 2.0, y: 3.0 }.project(Vec2 { x: 5.0, y: 0.0 }),
            Vec2 { x: 2.0, y: 0.0 }
        );
    }

    #[test]
    fn conversions() {
        let v: Vec3 = [1.0, 2.0, 3.0].into();
        assert_eq!(v.xy(), Vec2 { x: 1.0, y: 2.0 });
        assert_eq!(v.extend(4.0).xyz(), v);
        assert_eq!(Vec2 { x: 1.0, y: 2.0 }.extend(3.0), v);
        let arr: [f32; 3] = v.into();
        assert_eq!(arr, [1.0, 2.0, 3.0]);
        assert_eq!(Vec4::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap().w, 4.0);
        assert!(Vec4::from_slice(&[1.0, 2.0, 3.0]).is_err());
        assert!(Vec2::from_slice(&[]).is_err());
    }

    #[test]
    fn display() {
        let v = Vec3 {
            x: 1.5,
            y: -2.0,
            z: 0.75,
        };
        assert_eq!(format!("{v}"), "vec(1.5, -2, 0.75)");
        assert_eq!(format!("{v:.2}"), "vec(1.50, -2.00, 0.75)");
    }
}
