#[allow(unused_imports)]
pub use itertools::Itertools;
#[allow(unused_imports)]
pub use num_traits;

#[allow(unused_imports)]
pub use tracing::{error, info, warn};

#[allow(unused_imports)]
pub use crate::{
    core::{config::*, error::GeomError},
    util::{
        assert::*,
        bbox::{Aabb2, Aabb3, AxisAlignedExtent, Rect},
        colour::Colour,
        geom2,
        geom2::Segment2,
        geom3,
        geom3::{Plane, Ray, RayHit, SlabInterval, Sphere, Triangle},
        linalg,
        linalg::{Clamp, Vec2, Vec3, Vec4},
        matrix::{EulerOrder, Mat3x3, Mat4x4},
        quat::Quat,
    },
};
