use std::{
    fmt,
    fmt::Formatter,
    ops::{Add, Mul, Sub},
};

use serde::{Deserialize, Serialize};

use crate::core::config::EPSILON;
use crate::util::linalg::{approx_eq, lerp};

/// RGBA colour with `f32` channels, nominally in `[0, 1]`.
///
/// Arithmetic does not clamp; use [`Colour::scaled`] or [`Colour::clamped`] when the result must
/// stay displayable.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub fn from_bytes(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    pub fn red() -> Self {
        Self::from_rgb(1.0, 0.0, 0.0)
    }
    pub fn green() -> Self {
        Self::from_rgb(0.0, 1.0, 0.0)
    }
    pub fn blue() -> Self {
        Self::from_rgb(0.0, 0.0, 1.0)
    }
    pub fn yellow() -> Self {
        Self::from_rgb(1.0, 1.0, 0.0)
    }
    pub fn magenta() -> Self {
        Self::from_rgb(1.0, 0.0, 1.0)
    }
    pub fn cyan() -> Self {
        Self::from_rgb(0.0, 1.0, 1.0)
    }
    pub fn black() -> Self {
        Self::default()
    }
    pub fn white() -> Self {
        Self::from_rgb(1.0, 1.0, 1.0)
    }
    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Multiplies the colour channels (not alpha) by `ratio`, clamping to `[0, 1]`.
    #[must_use]
    pub fn scaled(mut self, ratio: f32) -> Self {
        self.r = (self.r * ratio).clamp(0.0, 1.0);
        self.g = (self.g * ratio).clamp(0.0, 1.0);
        self.b = (self.b * ratio).clamp(0.0, 1.0);
        self
    }
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }
    #[must_use]
    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }
    #[must_use]
    pub fn lerp(self, to: Colour, t: f32) -> Self {
        lerp(self, to, t)
    }

    pub fn rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
    /// Channels as bytes; out-of-range channels saturate.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn as_bytes(&self) -> [u8; 4] {
        self.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    pub fn almost_eq(&self, rhs: Colour) -> bool {
        self.to_array()
            .into_iter()
            .zip(rhs.to_array())
            .all(|(a, b)| approx_eq(a, b, EPSILON))
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::from_rgb(0.0, 0.0, 0.0)
    }
}

impl From<Colour> for [f32; 4] {
    fn from(value: Colour) -> Self {
        value.to_array()
    }
}
impl From<[f32; 4]> for Colour {
    fn from(value: [f32; 4]) -> Self {
        let [r, g, b, a] = value;
        Self { r, g, b, a }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Add<Colour> for Colour {
    type Output = Colour;

    fn add(self, rhs: Colour) -> Self::Output {
        Colour::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl Sub<Colour> for Colour {
    type Output = Colour;

    fn sub(self, rhs: Colour) -> Self::Output {
        Colour::new(
            self.r - rhs.r,
            self.g - rhs.g,
            self.b - rhs.b,
            self.a - rhs.a,
        )
    }
}

impl Mul<f32> for Colour {
    type Output = Colour;

    fn mul(self, rhs: f32) -> Self::Output {
        Colour::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}
