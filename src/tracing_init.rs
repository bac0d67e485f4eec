//! Subscriber setup for the simulator and the test suites
//!
//! `RUST_LOG` always wins over the built-in filters below.

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

/// Stage reconfiguration and unsupported lengths, without per-frame chatter
const TEST_FILTER: &str = "sensor_dsp=warn,sensor_dsp::fft=debug";

/// Frame summaries from the library and the simulator
const BINARY_FILTER: &str = "sensor_dsp=info,sensor_dsp::fft=warn,rdsim=info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install a test-writer subscriber once per test binary
///
/// Useful overrides:
/// - `RUST_LOG=sensor_dsp=debug` - stage summaries per frame
/// - `RUST_LOG=sensor_dsp::peak=trace` - peak replacement and width rejections
/// - `RUST_LOG=sensor_dsp::mti=trace` - MTI blocks
pub fn init_test_tracing() {
    static TRACING: Lazy<()> = Lazy::new(|| {
        // Another harness may already own the global subscriber
        let _ = fmt()
            .with_env_filter(env_filter(TEST_FILTER))
            .with_target(true)
            .with_line_number(true)
            .with_test_writer()
            .try_init();
    });

    Lazy::force(&TRACING);
}

/// Install the subscriber for `rdsim`; call early in main()
pub fn init_tracing() {
    fmt()
        .with_env_filter(env_filter(BINARY_FILTER))
        .with_target(false)
        .init();
}
