//! (M)oving (T)arget (I)ndication
//!
//! Exponential moving average clutter canceller. The history buffer belongs
//! to the caller and is borrowed for the filter's lifetime, so it can live
//! in static or preallocated memory.
//!
//! Per element:
//! ```text
//! out[i]     = in[i] - history[i]
//! history[i] = history[i] + alpha * out[i]      // == (1 - alpha) * h + alpha * x
//! ```
//!
//! `alpha` close to 0 gives history the highest influence, 1 the lowest.

use tracing::trace;

pub struct Mti<'a> {
    alpha: f32,
    history: &'a mut [f32],
}

impl<'a> Mti<'a> {
    /// Bind `history` to a new filter and zero it
    pub fn new(alpha: f32, history: &'a mut [f32]) -> Self {
        assert!(
            (0.0..=1.0).contains(&alpha),
            "MTI alpha must lie in [0, 1], got {}",
            alpha
        );
        history.fill(0.0);
        Self { alpha, history }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn history(&self) -> &[f32] {
        self.history
    }

    /// Filter one block of `len()` samples into `output`
    pub fn apply(&mut self, input: &[f32], output: &mut [f32]) {
        assert_eq!(input.len(), self.history.len(), "MTI input length mismatch");
        assert_eq!(output.len(), self.history.len(), "MTI output length mismatch");

        for ((out, &x), h) in output.iter_mut().zip(input).zip(self.history.iter_mut()) {
            *out = x - *h;
            *h += self.alpha * *out;
        }
        trace!(len = input.len(), alpha = self.alpha, "MTI block applied");
    }
}
