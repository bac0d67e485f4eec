//! Range transform stages
//!
//! Operate on a frame of `num_chirps_per_frame` rows by
//! `num_samples_per_chirp` columns. Each chirp is independently (optionally)
//! mean-removed, (optionally) windowed and transformed into range bins.
//!
//! The transform plan is configured before the first row is touched, so an
//! unsupported chirp length is reported with every buffer left unmodified.

use rustfft::num_complex::Complex32;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::fft::{ComplexFft, RealFft};
use crate::matrix::Shape;
use crate::ops::{self, cmplx_mean_removal};

/// Number of range bins produced by [`RangeFft`] for a chirp length
pub const fn num_range_bins(num_samples_per_chirp: usize) -> usize {
    num_samples_per_chirp / 2
}

/// Range transform of real-valued ADC frames
pub struct RangeFft {
    rfft: RealFft,
}

impl RangeFft {
    pub fn new() -> Self {
        Self { rfft: RealFft::new() }
    }

    /// Plan the transform for `num_samples_per_chirp` without touching any data
    pub fn prepare(&mut self, num_samples_per_chirp: usize) -> Result<()> {
        self.rfft.configure(num_samples_per_chirp)
    }

    /// Transform `frame` into `range`
    ///
    /// # Arguments
    /// * `frame` - Raw samples `[num_chirps_per_frame][num_samples_per_chirp]`,
    ///   modified in place when mean removal or windowing is requested
    /// * `range` - Output `[num_chirps_per_frame][num_samples_per_chirp / 2]`
    /// * `mean_removal` - Remove each chirp's mean before the transform
    /// * `win` - Optional window of `num_samples_per_chirp` coefficients
    ///
    /// # Returns
    /// * `Err(UnsupportedLength)` when `num_samples_per_chirp` cannot be transformed
    #[instrument(skip(self, frame, range, win), fields(windowed = win.is_some()))]
    pub fn process(
        &mut self,
        frame: &mut [f32],
        range: &mut [Complex32],
        mean_removal: bool,
        win: Option<&[f32]>,
        num_samples_per_chirp: usize,
        num_chirps_per_frame: usize,
    ) -> Result<()> {
        let frame_shape = Shape::new(num_chirps_per_frame, num_samples_per_chirp);
        let range_shape = Shape::new(num_chirps_per_frame, num_range_bins(num_samples_per_chirp));
        frame_shape.check(frame.len(), "range frame");
        range_shape.check(range.len(), "range output");
        if let Some(w) = win {
            assert_eq!(w.len(), num_samples_per_chirp, "range window length mismatch");
        }

        self.rfft.configure(num_samples_per_chirp)?;

        for (chirp, bins) in frame
            .chunks_exact_mut(num_samples_per_chirp)
            .zip(range.chunks_exact_mut(range_shape.cols))
        {
            if mean_removal {
                ops::mean_removal(chirp);
            }
            if let Some(w) = win {
                for (x, &c) in chirp.iter_mut().zip(w) {
                    *x *= c;
                }
            }
            self.rfft.process(chirp, bins);
        }

        debug!(chirps = num_chirps_per_frame, bins = range_shape.cols, "range transform done");
        Ok(())
    }
}

impl Default for RangeFft {
    fn default() -> Self {
        Self::new()
    }
}

/// In-place range transform of complex (IQ) frames
///
/// Produces `num_samples_per_chirp` bins per chirp.
pub struct RangeCfft {
    cfft: ComplexFft,
}

impl RangeCfft {
    pub fn new() -> Self {
        Self { cfft: ComplexFft::new() }
    }

    /// Replace each chirp of `frame` by its range spectrum
    #[instrument(skip(self, frame, win), fields(windowed = win.is_some()))]
    pub fn process(
        &mut self,
        frame: &mut [Complex32],
        mean_removal: bool,
        win: Option<&[f32]>,
        num_samples_per_chirp: usize,
        num_chirps_per_frame: usize,
    ) -> Result<()> {
        Shape::new(num_chirps_per_frame, num_samples_per_chirp).check(frame.len(), "range frame");
        if let Some(w) = win {
            assert_eq!(w.len(), num_samples_per_chirp, "range window length mismatch");
        }

        self.cfft.configure(num_samples_per_chirp)?;

        for chirp in frame.chunks_exact_mut(num_samples_per_chirp) {
            if mean_removal {
                cmplx_mean_removal(chirp);
            }
            if let Some(w) = win {
                for (x, &c) in chirp.iter_mut().zip(w) {
                    *x *= c;
                }
            }
            self.cfft.process(chirp);
        }

        debug!(chirps = num_chirps_per_frame, bins = num_samples_per_chirp, "complex range transform done");
        Ok(())
    }
}

impl Default for RangeCfft {
    fn default() -> Self {
        Self::new()
    }
}
