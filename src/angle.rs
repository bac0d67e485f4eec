//! Angle-of-arrival estimation
//!
//! * Digital beamforming: a precomputed steering matrix multiplied against
//!   per-antenna range or Doppler data.
//! * Monopulse: angle from the phase difference of two antenna channels.

use core::f32::consts::{FRAC_PI_2, PI};

use rustfft::num_complex::Complex32;
use tracing::{instrument, warn};

use crate::error::{ArgumentSnafu, Result};
use crate::math::{arcsin, atan2, cos, sin};
use crate::matrix::{cmplx_mult, ComplexMatrix};

const TWO_PI: f32 = 2.0 * PI;

/// Generate a `[num_angles][num_ant]` conjugate steering matrix
///
/// Beams span `-ang_est_range..=ang_est_range` in equal steps. Element
/// `(k, j)` is `exp(iφ)` with `φ = -2π d/λ · j · sin(θ_k)`. The matrix is
/// computed once per antenna geometry and reused for every frame.
///
/// # Arguments
/// * `ang_est_range` - One-sided field of view in radians, in `(0, π/2]`
/// * `num_angles` - Number of beams, at least 2
/// * `antenna_spacing` - Antenna spacing, same unit as `lambda`
/// * `lambda` - Carrier wavelength
/// * `num_ant` - Number of receive antennas, at least 2
pub fn steering_matrix(
    ang_est_range: f32,
    num_angles: usize,
    antenna_spacing: f32,
    lambda: f32,
    num_ant: usize,
) -> ComplexMatrix {
    assert!(
        ang_est_range > 0.0 && ang_est_range <= FRAC_PI_2,
        "angle range must lie in (0, pi/2], got {}",
        ang_est_range
    );
    assert!(num_angles > 1, "need at least two beams");
    assert!(num_ant > 1, "need at least two antennas");
    assert!(antenna_spacing > 0.0 && lambda > 0.0, "spacing and wavelength must be positive");

    let resolution = 2.0 * ang_est_range / (num_angles as f32 - 1.0);
    let coefficient = -PI * (2.0 * antenna_spacing / lambda);

    let mut steering = ComplexMatrix::zeros(num_angles, num_ant);
    for k in 0..num_angles {
        let angle = -ang_est_range + k as f32 * resolution;
        let sin_angle = sin(angle);
        for j in 0..num_ant {
            let phase = coefficient * j as f32 * sin_angle;
            steering.set(k, j, Complex32::new(cos(phase), sin(phase)));
        }
    }
    steering
}

/// Phase-shift beamforming: `output = steering × input`
///
/// `input` is `[num_ant][num_samples]`, `steering` is `[num_angles][num_ant]`
/// and `output` is `[num_angles][num_samples]`.
pub fn angle_dbf(input: &ComplexMatrix, steering: &ComplexMatrix, output: &mut ComplexMatrix) {
    assert_eq!(steering.cols(), input.rows(), "steering columns must equal antenna count");
    assert_eq!(input.cols(), output.cols(), "output columns must equal sample count");
    assert_eq!(steering.rows(), output.rows(), "output rows must equal angle count");

    cmplx_mult(steering, input, output);
}

/// Wrap a phase difference of at most one turn outside `(-π, π]` back into it
fn wrap_phase(delta: f32) -> f32 {
    if delta <= -PI {
        delta + TWO_PI
    } else if delta > PI {
        delta - TWO_PI
    } else {
        delta
    }
}

/// Monopulse direction of arrival for every sample pair
///
/// For each index the phase difference `arg(rx1) - arg(rx2)` is wrapped into
/// `(-π, π]` and converted to `asin(Δφ · λ / (2π d))`, saturating at ±π/2.
/// Failing primitives (a zero sample has no phase) do not stop the loop:
/// the affected angle is computed with a zero phase and the failures are
/// reported together once all samples are processed.
///
/// # Arguments
/// * `rx1`, `rx2` - Samples of antenna 1 and 2, same length as `angle`
/// * `wavelength` - Carrier wavelength in meters
/// * `antenna_spacing` - Antenna spacing in meters
/// * `angle` - Output angles in radians
#[instrument(skip(rx1, rx2, angle), fields(size = angle.len()))]
pub fn angle_monopulse(
    rx1: &[Complex32],
    rx2: &[Complex32],
    wavelength: f32,
    antenna_spacing: f32,
    angle: &mut [f32],
) -> Result<()> {
    assert!(!angle.is_empty(), "monopulse needs at least one sample");
    assert_eq!(rx1.len(), angle.len(), "rx1 length mismatch");
    assert_eq!(rx2.len(), angle.len(), "rx2 length mismatch");
    assert!(wavelength > 0.0, "wavelength must be positive");
    assert!(antenna_spacing > 0.0, "antenna spacing must be positive");

    let ratio = wavelength / antenna_spacing / TWO_PI;

    let failures = rx1
        .iter()
        .zip(rx2)
        .zip(angle.iter_mut())
        .fold(0usize, |failures, ((a, b), out)| {
            let mut failed = 0;
            let mut phase = |z: &Complex32| {
                atan2(z.im, z.re).unwrap_or_else(|_| {
                    failed += 1;
                    0.0
                })
            };
            let delta_phi = wrap_phase(phase(a) - phase(b));

            *out = arcsin(delta_phi * ratio).unwrap_or_else(|_| {
                failed += 1;
                0.0
            });
            failures + usize::from(failed > 0)
        });

    if failures > 0 {
        warn!(failures, "monopulse primitives failed");
        return ArgumentSnafu { failures }.fail();
    }
    Ok(())
}
