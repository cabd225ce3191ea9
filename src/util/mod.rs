pub mod assert;
pub mod bbox;
pub mod colour;
pub mod geom2;
pub mod geom3;
pub mod linalg;
pub mod log;
pub mod matrix;
pub mod quat;

pub mod gg_float {
    use crate::util::linalg::{Vec2, Vec3, Vec4};
    use num_traits::Zero;

    pub trait GgFloat {
        fn is_finite(&self) -> bool;
    }

    impl GgFloat for Vec2 {
        fn is_finite(&self) -> bool {
            self.x.is_finite() && self.y.is_finite()
        }
    }

    impl GgFloat for Vec3 {
        fn is_finite(&self) -> bool {
            self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
        }
    }

    impl GgFloat for Vec4 {
        fn is_finite(&self) -> bool {
            self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
        }
    }

    pub fn force_positive_zero(x: f32) -> f32 {
        if x.is_zero() { 0.0 } else { x }
    }
}

pub mod gg_range {
    use std::ops::RangeInclusive;

    /// Closed-interval overlap test; intervals that only touch at an endpoint overlap.
    pub fn overlaps_f32(r1: &RangeInclusive<f32>, r2: &RangeInclusive<f32>) -> bool {
        r1.start() <= r2.end() && r2.start() <= r1.end()
    }

    /// Builds the interval spanned by `values`, in any order.
    pub fn span_f32(values: impl IntoIterator<Item = f32>) -> RangeInclusive<f32> {
        let (lo, hi) = values
            .into_iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        lo..=hi
    }
}
