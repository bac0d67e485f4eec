//! Scalar math primitives
//!
//! Thin wrappers around `libm` that report invalid arguments instead of
//! silently producing NaN, so batch routines can fold the per-element
//! status into one result.

use crate::error::{ArgumentSnafu, Result};
use core::f32::consts::FRAC_PI_2;

#[inline]
pub fn sin(x: f32) -> f32 {
    libm::sinf(x)
}

#[inline]
pub fn cos(x: f32) -> f32 {
    libm::cosf(x)
}

/// Square root, failing for negative or NaN input
pub fn sqrt(x: f32) -> Result<f32> {
    if x >= 0.0 {
        Ok(libm::sqrtf(x))
    } else {
        ArgumentSnafu { failures: 1usize }.fail()
    }
}

/// Four-quadrant arctangent of `y / x`
///
/// The angle is undefined when both arguments are zero or either is NaN;
/// those cases are reported as an argument error.
pub fn atan2(y: f32, x: f32) -> Result<f32> {
    if x.is_nan() || y.is_nan() || (x == 0.0 && y == 0.0) {
        return ArgumentSnafu { failures: 1usize }.fail();
    }
    Ok(libm::atan2f(y, x))
}

/// Arcus sine in radians, computed as `atan2(x, sqrt(1 - x²))`
///
/// Inputs with magnitude of at least one saturate to ±π/2.
pub fn arcsin(x: f32) -> Result<f32> {
    if x >= 1.0 {
        return Ok(FRAC_PI_2);
    }
    if x <= -1.0 {
        return Ok(-FRAC_PI_2);
    }
    let y = sqrt(1.0 - x * x)?;
    atan2(x, y)
}
