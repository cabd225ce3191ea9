//! Startup checks that report failure as an error value instead of panicking.
//!
//! Each `check*!` macro expands to an early `return Err(..)` carrying a [`CheckFailed`], so it
//! can be used in any function whose error type implements `From<CheckFailed>`, such as
//! `anyhow::Result`.

use thiserror::Error;

pub fn assert_ord<T: PartialOrd>(_: &T) {}
pub fn assert_partial_eq<T: PartialEq>(_: &T) {}
pub fn assert_same_type<T, U>(_: &T, _: &U) {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("check failed: {location}: {message}")]
pub struct CheckFailed {
    pub location: String,
    pub message: String,
}

impl CheckFailed {
    pub fn new(location: String, message: String) -> Self {
        Self { location, message }
    }
}

#[allow(unused_macros)]
#[macro_export]
macro_rules! current_location {
    () => {
        format!("{}:{}", file!(), line!())
    };
}
#[allow(unused_imports)]
pub use current_location;

#[allow(unused_macros)]
#[macro_export]
macro_rules! check {
    ($lhs:expr) => {{
        let value: bool = $lhs;
        if !value {
            return Err($crate::util::assert::CheckFailed::new(
                $crate::util::assert::current_location!(),
                stringify!($lhs).to_string(),
            )
            .into());
        }
    }};
}
#[allow(unused_imports)]
pub use check;

#[allow(unused_macros)]
#[macro_export]
macro_rules! check_false {
    ($lhs:expr) => {{
        let value: bool = $lhs;
        if value {
            return Err($crate::util::assert::CheckFailed::new(
                $crate::util::assert::current_location!(),
                format!("!{}", stringify!($lhs)),
            )
            .into());
        }
    }};
}
#[allow(unused_imports)]
pub use check_false;

#[allow(unused_macros)]
#[macro_export]
macro_rules! check_lt {
    ($lhs:expr, $rhs:expr) => {{
        let (lhs, rhs) = ($lhs, $rhs);
        $crate::util::assert::assert_same_type(&lhs, &rhs);
        $crate::util::assert::assert_ord(&lhs);
        if !(lhs < rhs) {
            return Err($crate::util::assert::CheckFailed::new(
                $crate::util::assert::current_location!(),
                format!(
                    "{} < {}: {:?} vs. {:?}",
                    stringify!($lhs),
                    stringify!($rhs),
                    lhs,
                    rhs
                ),
            )
            .into());
        }
    }};
}
#[allow(unused_imports)]
pub use check_lt;

#[allow(unused_macros)]
#[macro_export]
macro_rules! check_le {
    ($lhs:expr, $rhs:expr) => {{
        let (lhs, rhs) = ($lhs, $rhs);
        $crate::util::assert::assert_same_type(&lhs, &rhs);
        $crate::util::assert::assert_ord(&lhs);
        if !(lhs <= rhs) {
            return Err($crate::util::assert::CheckFailed::new(
                $crate::util::assert::current_location!(),
                format!(
                    "{} <= {}: {:?} vs. {:?}",
                    stringify!($lhs),
                    stringify!($rhs),
                    lhs,
                    rhs
                ),
            )
            .into());
        }
    }};
}
#[allow(unused_imports)]
pub use check_le;

#[allow(unused_macros)]
#[macro_export]
macro_rules! check_eq {
    ($lhs:expr, $rhs:expr) => {{
        let (lhs, rhs) = ($lhs, $rhs);
        $crate::util::assert::assert_same_type(&lhs, &rhs);
        $crate::util::assert::assert_partial_eq(&lhs);
        if !(lhs == rhs) {
            return Err($crate::util::assert::CheckFailed::new(
                $crate::util::assert::current_location!(),
                format!(
                    "{} == {}: {:?} vs. {:?}",
                    stringify!($lhs),
                    stringify!($rhs),
                    lhs,
                    rhs
                ),
            )
            .into());
        }
    }};
}
#[allow(unused_imports)]
pub use check_eq;

/// Compares with the type's own `almost_eq`, so matrices and quaternions can be checked too.
#[allow(unused_macros)]
#[macro_export]
macro_rules! check_almost_eq {
    ($lhs:expr, $rhs:expr) => {{
        let (lhs, rhs) = ($lhs, $rhs);
        $crate::util::assert::assert_same_type(&lhs, &rhs);
        if !lhs.almost_eq(rhs) {
            return Err($crate::util::assert::CheckFailed::new(
                $crate::util::assert::current_location!(),
                format!(
                    "{} ~= {}: {:?} vs. {:?}",
                    stringify!($lhs),
                    stringify!($rhs),
                    lhs,
                    rhs
                ),
            )
            .into());
        }
    }};
}
#[allow(unused_imports)]
pub use check_almost_eq;
