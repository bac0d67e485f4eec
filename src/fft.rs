//! Forward transform resources
//!
//! Each stage owns its transform plan and re-plans only when the requested
//! length changes. Supported lengths follow the embedded math library the
//! pipeline was designed against: powers of two from 16 (complex) or 32
//! (real) up to 4096.

use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use snafu::ensure;
use tracing::{debug, warn};

use crate::error::{Result, UnsupportedLengthSnafu};

/// Smallest supported complex transform length
pub const MIN_CFFT_LEN: usize = 16;

/// Smallest supported real transform length
pub const MIN_RFFT_LEN: usize = 32;

/// Largest supported transform length
pub const MAX_FFT_LEN: usize = 4096;

fn check_len(len: usize, min: usize) -> Result<()> {
    let supported = len.is_power_of_two() && (min..=MAX_FFT_LEN).contains(&len);
    if !supported {
        warn!(len, "unsupported transform length");
    }
    ensure!(supported, UnsupportedLengthSnafu { len });
    Ok(())
}

/// In-place forward complex transform of a configurable length
pub struct ComplexFft {
    planner: FftPlanner<f32>,
    plan: Option<Arc<dyn Fft<f32>>>,
    len: usize,
}

impl ComplexFft {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            plan: None,
            len: 0,
        }
    }

    /// Configured length, 0 before the first successful `configure`
    pub fn len(&self) -> usize {
        self.len
    }

    /// Prepare the plan for `len`; a no-op when already configured for it
    pub fn configure(&mut self, len: usize) -> Result<()> {
        if self.plan.is_some() && self.len == len {
            return Ok(());
        }
        check_len(len, MIN_CFFT_LEN)?;
        debug!(len, "planning complex transform");
        self.plan = Some(self.planner.plan_fft_forward(len));
        self.len = len;
        Ok(())
    }

    /// Transform one block of exactly `len()` elements in place
    pub fn process(&self, buffer: &mut [Complex32]) {
        let plan = self.plan.as_ref().expect("transform used before configure");
        assert_eq!(buffer.len(), self.len, "transform block length mismatch");
        plan.process(buffer);
    }
}

impl Default for ComplexFft {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward real-to-complex transform producing the lower half spectrum
///
/// A length `n` input yields `n/2` bins. The DC bin is purely real; its
/// imaginary part is forced to zero rather than carrying the Nyquist term.
pub struct RealFft {
    inner: ComplexFft,
    scratch: Vec<Complex32>,
}

impl RealFft {
    pub fn new() -> Self {
        Self {
            inner: ComplexFft::new(),
            scratch: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn configure(&mut self, len: usize) -> Result<()> {
        if self.inner.plan.is_some() && self.inner.len == len {
            return Ok(());
        }
        check_len(len, MIN_RFFT_LEN)?;
        self.inner.configure(len)?;
        self.scratch = vec![Complex32::new(0.0, 0.0); len];
        Ok(())
    }

    /// Transform `input` (length `len()`) into `output` (length `len()/2`)
    pub fn process(&mut self, input: &[f32], output: &mut [Complex32]) {
        let n = self.inner.len;
        assert_eq!(input.len(), n, "real transform input length mismatch");
        assert_eq!(output.len(), n / 2, "real transform output length mismatch");

        for (s, &x) in self.scratch.iter_mut().zip(input) {
            *s = Complex32::new(x, 0.0);
        }
        self.inner.process(&mut self.scratch);

        output.copy_from_slice(&self.scratch[..n / 2]);
        output[0].im = 0.0;
    }
}

impl Default for RealFft {
    fn default() -> Self {
        Self::new()
    }
}
