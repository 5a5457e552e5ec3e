//! Ring-tone synthesis
//!
//! Renders the ring burst played while a call is in the calling state: a
//! short 800 Hz sine with an exponential fade-out, as 16-bit PCM.

use std::f64::consts::PI;

pub const RING_FREQUENCY_HZ: f64 = 800.0;
pub const RING_BURST_MS: u64 = 500;
pub const RING_SAMPLE_RATE: u32 = 8_000;

const START_GAIN: f64 = 0.3;
const END_GAIN: f64 = 0.01;

/// The standard ring burst
pub fn ring_burst() -> Vec<i16> {
    render(RING_FREQUENCY_HZ, RING_BURST_MS, RING_SAMPLE_RATE)
}

/// Render a sine burst with an exponential decay envelope
pub fn render(frequency_hz: f64, duration_ms: u64, sample_rate: u32) -> Vec<i16> {
    let total = (sample_rate as u64 * duration_ms / 1000) as usize;
    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        let t = i as f64 / sample_rate as f64;
        let progress = i as f64 / total.max(1) as f64;
        let gain = START_GAIN * (END_GAIN / START_GAIN).powf(progress);
        let value = gain * (2.0 * PI * frequency_hz * t).sin();
        samples.push((value * i16::MAX as f64) as i16);
    }
    samples
}
