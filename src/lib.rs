//! Radar signal front end
//!
//! Turns raw chirp samples into range, Doppler and angle-of-arrival
//! estimates and locates candidate targets in the resulting spectra.
//!
//! **Frame chain** (all buffers owned by the caller, row-major):
//! 1. [`range`] - optional mean removal, optional window, range transform per chirp
//! 2. [`doppler`] - transpose, then optional mean removal, optional window,
//!    Doppler transform per range bin
//! 3. [`angle`] - beamforming against a steering matrix, or two-channel monopulse
//! 4. [`peak`] - peak search on a range, Doppler or angle profile
//!
//! [`pipeline::FramePipeline`] runs steps 1 and 2 with cached windows.
//! [`mti`], [`ops`] and [`window`] are the supporting utilities.

pub mod angle;
pub mod doppler;
pub mod error;
pub mod fft;
pub mod math;
pub mod matrix;
pub mod mti;
pub mod ops;
pub mod peak;
pub mod pipeline;
pub mod radar;
pub mod range;
pub mod tracing_init;
pub mod window;

pub use rustfft::num_complex::Complex32;

pub use error::{DspError, Result};
pub use matrix::{ComplexMatrix, Shape};
pub use mti::Mti;
pub use peak::{find_peaks, peak_search, PeakSearchOptions};
pub use pipeline::{FramePipeline, PipelineConfig};
pub use window::{WindowCache, WindowKind};
