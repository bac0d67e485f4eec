//! FMCW radar equations
//!
//! Resolution and unambiguous-limit helpers used to turn bin indices into
//! physical units.

/// The speed of light in vacuum, in meters per second
pub const LIGHT_SPEED_M_S: f32 = 299_792_458.0;

/// Range resolution in meters for a swept bandwidth
pub fn range_resolution(bandwidth_hz: f32) -> f32 {
    LIGHT_SPEED_M_S / (2.0 * bandwidth_hz)
}

/// Range resolution from the sampled part of the chirp
///
/// Only `num_samples` samples of a chirp with slope `freq_slope_hz_s` are
/// acquired, so the effective bandwidth is `slope / fs * num_samples`.
pub fn range_resolution_ex(num_samples: usize, sample_rate_hz: f32, freq_slope_hz_s: f32) -> f32 {
    let bandwidth = (freq_slope_hz_s / sample_rate_hz) * num_samples as f32;
    range_resolution(bandwidth)
}

/// Maximum unambiguous range in meters
pub fn max_range(sample_rate_hz: f32, freq_slope_hz_s: f32) -> f32 {
    (sample_rate_hz * LIGHT_SPEED_M_S) / (2.0 * freq_slope_hz_s)
}

/// Doppler (velocity) resolution
pub fn doppler_resolution(bandwidth_hz: f32, frame_time_s: f32) -> f32 {
    LIGHT_SPEED_M_S / (bandwidth_hz * frame_time_s)
}

/// Maximum unambiguous Doppler
pub fn max_doppler(bandwidth_hz: f32, chirp_time_s: f32) -> f32 {
    LIGHT_SPEED_M_S / (2.0 * bandwidth_hz * chirp_time_s)
}

/// Chirp and frame parameters of an FMCW sensor
#[derive(Debug, Clone)]
pub struct RadarConfig {
    /// Swept bandwidth in Hz
    pub bandwidth_hz: f32,
    /// ADC sample rate in Hz
    pub sample_rate_hz: f32,
    /// ADC samples per chirp
    pub num_samples_per_chirp: usize,
    /// Chirps per frame
    pub num_chirps_per_frame: usize,
    /// Time between chirp starts in seconds
    pub chirp_repetition_time_s: f32,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            bandwidth_hz: 1.0e9,
            sample_rate_hz: 1.0e6,
            num_samples_per_chirp: 128,
            num_chirps_per_frame: 64,
            chirp_repetition_time_s: 300.0e-6,
        }
    }
}

impl RadarConfig {
    /// Chirp slope in Hz/s assuming the ADC window spans the whole sweep
    pub fn freq_slope_hz_s(&self) -> f32 {
        self.bandwidth_hz * self.sample_rate_hz / self.num_samples_per_chirp as f32
    }

    pub fn frame_time_s(&self) -> f32 {
        self.chirp_repetition_time_s * self.num_chirps_per_frame as f32
    }

    pub fn range_resolution(&self) -> f32 {
        range_resolution_ex(self.num_samples_per_chirp, self.sample_rate_hz, self.freq_slope_hz_s())
    }

    pub fn max_range(&self) -> f32 {
        max_range(self.sample_rate_hz, self.freq_slope_hz_s())
    }

    pub fn doppler_resolution(&self) -> f32 {
        doppler_resolution(self.bandwidth_hz, self.frame_time_s())
    }

    pub fn max_doppler(&self) -> f32 {
        max_doppler(self.bandwidth_hz, self.chirp_repetition_time_s)
    }
}
