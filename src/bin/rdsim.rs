//! FMCW Frame Simulator
//!
//! Synthesizes real-valued FMCW beat frames containing point targets and
//! white Gaussian noise, runs them through the range/Doppler chain and
//! prints the detected targets.
//!
//! Usage:
//!   cargo run --bin rdsim -- [OPTIONS]
//!
//! Options:
//!   -t, --target <R:V:A>  Target at R meters, V m/s radial velocity, amplitude A
//!                         (repeatable, default: 2.0:1.0:1.0)
//!   -n, --noise <sigma>   Noise standard deviation (default: 0.05)
//!   -f, --frames <N>      Number of frames to simulate (default: 1)
//!   -m, --mti <alpha>     Apply MTI clutter suppression across frames
//!   -s, --seed <N>        Noise seed (default: 42)
//!   -h, --help            Show this help message
//!
//! Examples:
//!   rdsim -t 1.5:0.0:2.0 -t 3.2:-1.2:0.5
//!   rdsim -f 8 -m 0.5 -t 1.5:0.0:2.0 -t 3.2:-1.2:0.5

use core::f32::consts::PI;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::info;

use sensor_dsp::pipeline::{doppler_profile, range_profile};
use sensor_dsp::radar::{RadarConfig, LIGHT_SPEED_M_S};
use sensor_dsp::tracing_init::init_tracing;
use sensor_dsp::{find_peaks, Complex32, FramePipeline, Mti, PeakSearchOptions, PipelineConfig};

/// Carrier frequency of the simulated sensor
const CENTER_FREQUENCY_HZ: f32 = 60.0e9;

#[derive(Debug, Clone)]
struct Target {
    range_m: f32,
    velocity_mps: f32,
    amplitude: f32,
}

impl Target {
    fn parse(spec: &str) -> Result<Self, String> {
        let fields: Vec<&str> = spec.split(':').collect();
        if fields.len() != 3 {
            return Err(format!("Target must be R:V:A, got {}", spec));
        }
        let value = |s: &str| {
            s.parse::<f32>()
                .map_err(|_| format!("Invalid number '{}' in target {}", s, spec))
        };
        Ok(Self {
            range_m: value(fields[0])?,
            velocity_mps: value(fields[1])?,
            amplitude: value(fields[2])?,
        })
    }
}

struct SimConfig {
    targets: Vec<Target>,
    noise_sigma: f32,
    frames: usize,
    mti_alpha: Option<f32>,
    seed: u64,
}

impl SimConfig {
    fn parse_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();

        let mut targets = Vec::new();
        let mut noise_sigma = 0.05;
        let mut frames = 1;
        let mut mti_alpha = None;
        let mut seed = 42;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-t" | "--target" => targets.push(Target::parse(&take_value(&args, &mut i, "--target")?)?),
                "-n" | "--noise" => {
                    let v = take_value(&args, &mut i, "--noise")?;
                    noise_sigma = v.parse().map_err(|_| format!("Invalid noise value: {}", v))?;
                }
                "-f" | "--frames" => {
                    let v = take_value(&args, &mut i, "--frames")?;
                    frames = v.parse().map_err(|_| format!("Invalid frame count: {}", v))?;
                }
                "-m" | "--mti" => {
                    let v = take_value(&args, &mut i, "--mti")?;
                    let alpha: f32 = v.parse().map_err(|_| format!("Invalid MTI alpha: {}", v))?;
                    if !(0.0..=1.0).contains(&alpha) {
                        return Err(format!("MTI alpha must lie in [0, 1], got {}", alpha));
                    }
                    mti_alpha = Some(alpha);
                }
                "-s" | "--seed" => {
                    let v = take_value(&args, &mut i, "--seed")?;
                    seed = v.parse().map_err(|_| format!("Invalid seed: {}", v))?;
                }
                "-h" | "--help" => {
                    print_help(&args[0]);
                    std::process::exit(0);
                }
                arg => return Err(format!("Unknown option: {}", arg)),
            }
            i += 1;
        }

        if targets.is_empty() {
            targets.push(Target {
                range_m: 2.0,
                velocity_mps: 1.0,
                amplitude: 1.0,
            });
        }
        if frames == 0 {
            return Err("At least one frame is required".to_string());
        }

        Ok(SimConfig {
            targets,
            noise_sigma,
            frames,
            mti_alpha,
            seed,
        })
    }
}

/// Advance past an option and return its value
fn take_value(args: &[String], i: &mut usize, name: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("Missing value for {}", name))
}

fn print_help(program: &str) {
    eprintln!("FMCW Frame Simulator");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --target <R:V:A>  Target range (m), velocity (m/s), amplitude (repeatable)");
    eprintln!("  -n, --noise <sigma>   Noise standard deviation (default: 0.05)");
    eprintln!("  -f, --frames <N>      Number of frames to simulate (default: 1)");
    eprintln!("  -m, --mti <alpha>     Apply MTI clutter suppression across frames");
    eprintln!("  -s, --seed <N>        Noise seed (default: 42)");
    eprintln!("  -h, --help            Show this help message");
}

/// Beat signal of all targets for one frame
fn synthesize_frame(radar: &RadarConfig, targets: &[Target], frame_index: usize, frame: &mut [f32]) {
    let n = radar.num_samples_per_chirp;
    let slope = radar.freq_slope_hz_s();
    let lambda = LIGHT_SPEED_M_S / CENTER_FREQUENCY_HZ;
    let chirps_before = frame_index * radar.num_chirps_per_frame;

    frame.fill(0.0);
    for target in targets {
        let beat_hz = 2.0 * target.range_m * slope / LIGHT_SPEED_M_S;
        let phase_per_chirp = 4.0 * PI * target.velocity_mps * radar.chirp_repetition_time_s / lambda;

        for (c, chirp) in frame.chunks_exact_mut(n).enumerate() {
            let slow = phase_per_chirp * (chirps_before + c) as f32;
            for (i, x) in chirp.iter_mut().enumerate() {
                let t = i as f32 / radar.sample_rate_hz;
                *x += target.amplitude * (2.0 * PI * beat_hz * t + slow).cos();
            }
        }
    }
}

fn main() -> Result<(), String> {
    init_tracing();
    let config = SimConfig::parse_args()?;

    let radar = RadarConfig::default();
    let (n, chirps) = (radar.num_samples_per_chirp, radar.num_chirps_per_frame);
    let lambda = LIGHT_SPEED_M_S / CENTER_FREQUENCY_HZ;
    let velocity_resolution = lambda / (2.0 * radar.frame_time_s());

    println!("FMCW Frame Simulator");
    println!("====================");
    println!("Frame:            {} chirps x {} samples", chirps, n);
    println!("Range resolution: {:.3} m", radar.range_resolution());
    println!("Max range:        {:.2} m", radar.max_range());
    println!("Velocity res.:    {:.3} m/s", velocity_resolution);
    for t in &config.targets {
        println!(
            "Target:           {:.2} m, {:+.2} m/s, amplitude {:.2}",
            t.range_m, t.velocity_mps, t.amplitude
        );
    }
    println!();

    let noise = Normal::new(0.0f32, config.noise_sigma)
        .map_err(|e| format!("Invalid noise sigma: {}", e))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut history = vec![0.0f32; n * chirps];
    let mut mti = config.mti_alpha.map(|alpha| Mti::new(alpha, &mut history));

    let shape = FramePipeline::output_shape(n, chirps);
    let mut pipeline = FramePipeline::new(PipelineConfig::default());
    let mut raw = vec![0.0f32; n * chirps];
    let mut frame = vec![0.0f32; n * chirps];
    let mut rd = vec![Complex32::new(0.0, 0.0); shape.len()];

    for frame_index in 0..config.frames {
        synthesize_frame(&radar, &config.targets, frame_index, &mut raw);
        for x in raw.iter_mut() {
            *x += noise.sample(&mut rng);
        }

        match mti.as_mut() {
            Some(filter) => filter.apply(&raw, &mut frame),
            None => frame.copy_from_slice(&raw),
        }

        pipeline
            .process(&mut frame, n, chirps, &mut rd)
            .map_err(|e| format!("Frame {} failed: {}", frame_index, e))?;
        info!(frame_index, "frame processed");
    }

    let profile = range_profile(&rd, shape);
    let max = profile.iter().cloned().fold(0.0f32, f32::max);
    let opts = PeakSearchOptions {
        height: 0.1 * max,
        distance: 3,
        ..Default::default()
    };
    let peaks = find_peaks(&profile, 8, &opts);

    println!("Detections (last frame):");
    if peaks.is_empty() {
        println!("  none");
    }
    for &range_bin in &peaks {
        let doppler = doppler_profile(&rd, shape, range_bin);
        let doppler_bin = doppler
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        // Upper half of the Doppler spectrum holds negative velocities
        let signed_bin = if doppler_bin >= chirps / 2 {
            doppler_bin as isize - chirps as isize
        } else {
            doppler_bin as isize
        };

        println!(
            "  range bin {:3} ({:.2} m), doppler bin {:+3} ({:+.2} m/s), level {:.1}",
            range_bin,
            range_bin as f32 * radar.range_resolution(),
            signed_bin,
            signed_bin as f32 * velocity_resolution,
            profile[range_bin]
        );
    }

    Ok(())
}
