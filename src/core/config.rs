pub const EPSILON: f32 = 1e-5;
/// Above this magnitude of `a2`, Euler extraction treats the pitch as locked at ±90°.
pub const GIMBAL_LOCK_THRESHOLD: f32 = 0.99999;
/// Below this value of `sin(θ/2)`, slerp falls back to normalised linear interpolation.
pub const SLERP_LINEAR_THRESHOLD: f32 = 0.001;
pub const PARALLEL_LINE_TOLERANCE: f32 = 1e-5;
