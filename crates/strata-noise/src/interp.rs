//! Scalar interpolation kernels shared by the noise samplers.

use std::f32::consts::PI;

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
#[inline]
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

/// Cosine-eased interpolation.
#[inline]
pub fn corp(t: f32, a: f32, b: f32) -> f32 {
    lerp((1.0 - (t * PI).cos()) * 0.5, a, b)
}

/// Catmull-Rom interpolation between `p[1]` and `p[2]`.
#[inline]
pub fn curp(t: f32, p: [f32; 4]) -> f32 {
    p[1] + 0.5
        * t
        * (p[2] - p[0]
            + t * (2.0 * p[0] - 5.0 * p[1] + 4.0 * p[2] - p[3]
                + t * (3.0 * (p[1] - p[2]) + p[3] - p[0])))
}

/// Smoothstep fade curve `3t^2 - 2t^3`.
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}
