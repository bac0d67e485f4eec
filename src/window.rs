//! Symmetric window generators
//!
//! All windows follow the `N - 1` denominator convention, so `w[n] ==
//! w[N-1-n]` and both end points are included. Generating a table costs a
//! trigonometric evaluation per coefficient; stages keep one in a
//! [`WindowCache`] and regenerate only when the length changes.

use core::f32::consts::PI;

use crate::math::cos;

const BLACKMANHARRIS_A0: f32 = 0.35875;
const BLACKMANHARRIS_A1: f32 = 0.48829;
const BLACKMANHARRIS_A2: f32 = 0.14128;
const BLACKMANHARRIS_A3: f32 = 0.01168;

/// Supported window shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Hamming,
    Blackman,
    BlackmanHarris,
    Hann,
}

impl WindowKind {
    /// Fill `win` with this window's coefficients
    pub fn fill(self, win: &mut [f32]) {
        match self {
            WindowKind::Hamming => hamming(win),
            WindowKind::Blackman => blackman(win),
            WindowKind::BlackmanHarris => blackman_harris(win),
            WindowKind::Hann => hann(win),
        }
    }

    /// Allocate and generate a window of `len` coefficients
    pub fn generate(self, len: usize) -> Vec<f32> {
        let mut win = vec![0.0f32; len];
        self.fill(&mut win);
        win
    }
}

/// Evaluate `f(2πn/(N-1))` for each coefficient
fn generate_with(win: &mut [f32], f: impl Fn(f32) -> f32) {
    assert!(win.len() > 1, "window length must be at least 2, got {}", win.len());

    let m = 1.0 / (win.len() as f32 - 1.0);
    for (n, w) in win.iter_mut().enumerate() {
        *w = f(2.0 * PI * n as f32 * m);
    }
}

/// `w[n] = 0.54 - 0.46 cos(2πn/(N-1))`
pub fn hamming(win: &mut [f32]) {
    generate_with(win, |x| 0.54 - 0.46 * cos(x));
}

/// `w[n] = 0.42 - 0.5 cos(2πn/(N-1)) + 0.08 cos(4πn/(N-1))`
pub fn blackman(win: &mut [f32]) {
    generate_with(win, |x| 0.42 - 0.5 * cos(x) + 0.08 * cos(2.0 * x));
}

/// Four-term Blackman-Harris window
pub fn blackman_harris(win: &mut [f32]) {
    generate_with(win, |x| {
        BLACKMANHARRIS_A0 - BLACKMANHARRIS_A1 * cos(x) + BLACKMANHARRIS_A2 * cos(2.0 * x)
            - BLACKMANHARRIS_A3 * cos(3.0 * x)
    });
}

/// `w[n] = 0.5 (1 - cos(2πn/(N-1)))`
pub fn hann(win: &mut [f32]) {
    generate_with(win, |x| 0.5 * (1.0 - cos(x)));
}

/// A generated window kept across frames
///
/// Returns the cached table while the requested length is unchanged.
#[derive(Debug, Clone)]
pub struct WindowCache {
    kind: WindowKind,
    table: Vec<f32>,
}

impl WindowCache {
    pub fn new(kind: WindowKind) -> Self {
        Self {
            kind,
            table: Vec::new(),
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Window of `len` coefficients, regenerated only on a length change
    pub fn get(&mut self, len: usize) -> &[f32] {
        if self.table.len() != len {
            self.table.resize(len, 0.0);
            self.kind.fill(&mut self.table);
        }
        &self.table
    }
}
