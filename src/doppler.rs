//! Doppler transform stage
//!
//! Takes the range buffer `[num_chirps_per_frame][num_range_bins]`,
//! transposes it into caller-owned memory `[num_range_bins][num_chirps_per_frame]`
//! and transforms every range bin's chirp sequence in place.

use rustfft::num_complex::Complex32;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::fft::ComplexFft;
use crate::matrix::{cmplx_transpose, Shape};
use crate::ops::cmplx_mean_removal;

pub struct DopplerFft {
    cfft: ComplexFft,
}

impl DopplerFft {
    pub fn new() -> Self {
        Self { cfft: ComplexFft::new() }
    }

    /// Plan the transform for `num_chirps_per_frame` without touching any data
    pub fn prepare(&mut self, num_chirps_per_frame: usize) -> Result<()> {
        self.cfft.configure(num_chirps_per_frame)
    }

    /// Compute the range-Doppler map of `range` into `doppler`
    ///
    /// # Arguments
    /// * `range` - Range spectra `[num_chirps_per_frame][num_range_bins]`
    /// * `doppler` - Output `[num_range_bins][num_chirps_per_frame]`, separate memory
    /// * `mean_removal` - Remove the mean of each range bin's chirp sequence
    /// * `win` - Optional window of `num_chirps_per_frame` coefficients
    ///
    /// # Returns
    /// * `Err(UnsupportedLength)` when `num_chirps_per_frame` cannot be transformed
    #[instrument(skip(self, range, doppler, win), fields(windowed = win.is_some()))]
    pub fn process(
        &mut self,
        range: &[Complex32],
        doppler: &mut [Complex32],
        mean_removal: bool,
        win: Option<&[f32]>,
        num_range_bins: usize,
        num_chirps_per_frame: usize,
    ) -> Result<()> {
        let range_shape = Shape::new(num_chirps_per_frame, num_range_bins);
        range_shape.check(range.len(), "range input");
        range_shape.transposed().check(doppler.len(), "doppler output");
        if let Some(w) = win {
            assert_eq!(w.len(), num_chirps_per_frame, "doppler window length mismatch");
        }

        self.cfft.configure(num_chirps_per_frame)?;

        cmplx_transpose(range, range_shape, doppler);

        for bin in doppler.chunks_exact_mut(num_chirps_per_frame) {
            if mean_removal {
                cmplx_mean_removal(bin);
            }
            if let Some(w) = win {
                for (x, &c) in bin.iter_mut().zip(w) {
                    *x *= c;
                }
            }
            self.cfft.process(bin);
        }

        debug!(range_bins = num_range_bins, doppler_bins = num_chirps_per_frame, "doppler transform done");
        Ok(())
    }
}

impl Default for DopplerFft {
    fn default() -> Self {
        Self::new()
    }
}
