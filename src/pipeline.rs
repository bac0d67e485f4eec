//! Per-frame range/Doppler processing chain
//!
//! Composes the range stage, the transpose and the Doppler stage with the
//! windows they need, keeping window tables and the intermediate range
//! buffer across frames.

use rustfft::num_complex::Complex32;
use tracing::{debug, instrument};

use crate::doppler::DopplerFft;
use crate::error::Result;
use crate::matrix::Shape;
use crate::range::{num_range_bins, RangeFft};
use crate::window::{WindowCache, WindowKind};

/// Options applied to every frame
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Remove each chirp's mean before the range transform
    pub range_mean_removal: bool,
    /// Window applied along fast time
    pub range_window: Option<WindowKind>,
    /// Remove each range bin's mean across chirps before the Doppler transform
    pub doppler_mean_removal: bool,
    /// Window applied along slow time
    pub doppler_window: Option<WindowKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            range_mean_removal: true,
            range_window: Some(WindowKind::BlackmanHarris),
            doppler_mean_removal: false,
            doppler_window: Some(WindowKind::Hann),
        }
    }
}

pub struct FramePipeline {
    config: PipelineConfig,
    range_stage: RangeFft,
    doppler_stage: DopplerFft,
    range_window: Option<WindowCache>,
    doppler_window: Option<WindowCache>,
    range: Vec<Complex32>,
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            range_window: config.range_window.map(WindowCache::new),
            doppler_window: config.doppler_window.map(WindowCache::new),
            config,
            range_stage: RangeFft::new(),
            doppler_stage: DopplerFft::new(),
            range: Vec::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Shape of the range-Doppler map produced for a frame shape
    pub fn output_shape(num_samples_per_chirp: usize, num_chirps_per_frame: usize) -> Shape {
        Shape::new(num_range_bins(num_samples_per_chirp), num_chirps_per_frame)
    }

    /// Range spectra of the last processed frame, `[chirp][range_bin]`
    pub fn range_spectra(&self) -> &[Complex32] {
        &self.range
    }

    /// Turn one real-valued frame into a range-Doppler map
    ///
    /// # Arguments
    /// * `frame` - `[num_chirps_per_frame][num_samples_per_chirp]` samples,
    ///   mean-removed and windowed in place as configured
    /// * `doppler` - Output `[num_range_bins][num_chirps_per_frame]`, see
    ///   [`FramePipeline::output_shape`]
    #[instrument(skip(self, frame, doppler))]
    pub fn process(
        &mut self,
        frame: &mut [f32],
        num_samples_per_chirp: usize,
        num_chirps_per_frame: usize,
        doppler: &mut [Complex32],
    ) -> Result<()> {
        // Both plans exist before the frame is touched
        self.range_stage.prepare(num_samples_per_chirp)?;
        self.doppler_stage.prepare(num_chirps_per_frame)?;

        let range_bins = num_range_bins(num_samples_per_chirp);
        self.range
            .resize(range_bins * num_chirps_per_frame, Complex32::new(0.0, 0.0));

        let range_win = self.range_window.as_mut().map(|w| w.get(num_samples_per_chirp));
        self.range_stage.process(
            frame,
            &mut self.range,
            self.config.range_mean_removal,
            range_win,
            num_samples_per_chirp,
            num_chirps_per_frame,
        )?;

        let doppler_win = self.doppler_window.as_mut().map(|w| w.get(num_chirps_per_frame));
        self.doppler_stage.process(
            &self.range,
            doppler,
            self.config.doppler_mean_removal,
            doppler_win,
            range_bins,
            num_chirps_per_frame,
        )?;

        debug!(range_bins, doppler_bins = num_chirps_per_frame, "frame processed");
        Ok(())
    }
}

/// Non-coherent sum of magnitudes over all Doppler bins of each range bin
pub fn range_profile(rd: &[Complex32], shape: Shape) -> Vec<f32> {
    shape.check(rd.len(), "range-Doppler map");
    if shape.cols == 0 {
        return vec![0.0; shape.rows];
    }
    rd.chunks_exact(shape.cols)
        .map(|row| row.iter().map(|v| v.norm()).sum())
        .collect()
}

/// Doppler magnitude spectrum of one range bin
pub fn doppler_profile(rd: &[Complex32], shape: Shape, range_bin: usize) -> Vec<f32> {
    shape.check(rd.len(), "range-Doppler map");
    assert!(range_bin < shape.rows, "range bin {} out of {}", range_bin, shape.rows);

    let start = shape.index(range_bin, 0);
    rd[start..start + shape.cols].iter().map(|v| v.norm()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peak::{find_peaks, PeakSearchOptions};
    use crate::tracing_init::init_test_tracing;
    use crate::DspError;
    use core::f32::consts::PI;

    /// Real beat signal of a point target moving `doppler_bin` cycles per frame
    fn target_frame(n: usize, chirps: usize, range_bin: f32, doppler_bin: f32) -> Vec<f32> {
        let mut frame = vec![0.0f32; n * chirps];
        for (c, chirp) in frame.chunks_exact_mut(n).enumerate() {
            let slow = 2.0 * PI * doppler_bin * c as f32 / chirps as f32;
            for (i, x) in chirp.iter_mut().enumerate() {
                *x = 1.0 + (2.0 * PI * range_bin * i as f32 / n as f32 + slow).cos();
            }
        }
        frame
    }

    #[test]
    fn test_target_lands_in_range_doppler_cell() {
        init_test_tracing();
        let (n, chirps) = (64, 16);
        let mut frame = target_frame(n, chirps, 10.0, 3.0);
        let shape = FramePipeline::output_shape(n, chirps);
        let mut rd = vec![Complex32::new(0.0, 0.0); shape.len()];

        let mut pipeline = FramePipeline::new(PipelineConfig::default());
        pipeline.process(&mut frame, n, chirps, &mut rd).unwrap();

        let (best, _) = rd
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
            .unwrap();
        assert_eq!(best / shape.cols, 10, "range bin");
        assert_eq!(best % shape.cols, 3, "doppler bin");
        assert_eq!(pipeline.range_spectra().len(), chirps * n / 2);
    }

    #[test]
    fn test_range_profile_peak_search() {
        let (n, chirps) = (128, 16);
        let mut frame = target_frame(n, chirps, 20.0, 0.0);
        for (c, chirp) in frame.chunks_exact_mut(n).enumerate() {
            let slow = 2.0 * PI * 5.0 * c as f32 / chirps as f32;
            for (i, x) in chirp.iter_mut().enumerate() {
                *x += 0.5 * (2.0 * PI * 45.0 * i as f32 / n as f32 + slow).cos();
            }
        }

        let shape = FramePipeline::output_shape(n, chirps);
        let mut rd = vec![Complex32::new(0.0, 0.0); shape.len()];
        let mut pipeline = FramePipeline::new(PipelineConfig::default());
        pipeline.process(&mut frame, n, chirps, &mut rd).unwrap();

        let profile = range_profile(&rd, shape);
        let max = profile.iter().cloned().fold(0.0f32, f32::max);
        let opts = PeakSearchOptions {
            height: 0.2 * max,
            distance: 3,
            ..Default::default()
        };
        assert_eq!(find_peaks(&profile, 4, &opts), vec![20, 45]);

        let doppler = doppler_profile(&rd, shape, 45);
        let best = doppler
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(best, 5);
    }

    #[test]
    fn test_windows_cached_across_frames() {
        let (n, chirps) = (32, 16);
        let shape = FramePipeline::output_shape(n, chirps);
        let mut pipeline = FramePipeline::new(PipelineConfig::default());

        let mut first = vec![Complex32::new(0.0, 0.0); shape.len()];
        let mut frame = target_frame(n, chirps, 6.0, 2.0);
        pipeline.process(&mut frame, n, chirps, &mut first).unwrap();

        let mut second = vec![Complex32::new(0.0, 0.0); shape.len()];
        let mut frame = target_frame(n, chirps, 6.0, 2.0);
        pipeline.process(&mut frame, n, chirps, &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unsupported_chirp_count_reported() {
        let (n, chirps) = (32, 12);
        let mut frame = target_frame(n, chirps, 4.0, 1.0);
        let shape = FramePipeline::output_shape(n, chirps);
        let mut rd = vec![Complex32::new(0.0, 0.0); shape.len()];

        let original = frame.clone();

        let mut pipeline = FramePipeline::new(PipelineConfig::default());
        let result = pipeline.process(&mut frame, n, chirps, &mut rd);
        assert_eq!(result, Err(DspError::UnsupportedLength { len: 12 }));

        // Frame, range spectra and output are all left as they were
        assert_eq!(frame, original);
        assert!(pipeline.range_spectra().is_empty());
        assert!(rd.iter().all(|v| *v == Complex32::new(0.0, 0.0)));
    }

    #[test]
    fn test_unsupported_chirp_length_reported() {
        let (n, chirps) = (48, 16);
        let mut frame = target_frame(n, chirps, 4.0, 1.0);
        let mut rd = vec![Complex32::new(0.0, 0.0); FramePipeline::output_shape(n, chirps).len()];
        let original = frame.clone();

        let mut pipeline = FramePipeline::new(PipelineConfig::default());
        let result = pipeline.process(&mut frame, n, chirps, &mut rd);
        assert_eq!(result, Err(DspError::UnsupportedLength { len: 48 }));
        assert_eq!(frame, original);
        assert_eq!(pipeline.config(), &PipelineConfig::default());
    }
}
