//! # Parameter Resolution
//!
//! The host hands us knob values in the units the user sees (dB, ms, %).
//! Once per block these are turned into the numbers the engine works with
//! (linear gain, samples, fractions). The result, [`EngineConfig`], stays
//! constant for the whole block.

use super::delay_line::buffer_size_for;

/// Hard upper bound on the voice count per channel.
pub const MAX_VOICES: usize = 200;

/// Knob values for one block, in host units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    /// Output gain in dB.
    pub gain_db: f32,
    /// Delay range in milliseconds. Voices spread over `[0, delay_ms)`.
    pub delay_ms: f32,
    /// Voices per channel. Values of zero or below mean no voices.
    pub voices: i32,
    /// Magnitude decay over the delay range, 0..=10.
    pub damper: f32,
    /// Wet/dry balance in percent.
    pub mix_percent: f32,
    /// Per-voice lowpass opening in percent.
    pub high_cut_percent: f32,
    /// Maximum voice speed, in milliseconds of delay change per second.
    pub rate_range_ms: f32,
    /// Interval between rate re-randomizations in milliseconds.
    pub rate_update_ms: f32,
}

/// Engine-side quantities derived from [`Controls`] for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Linear output gain, `2^(dB / 6)`.
    pub gain: f32,
    /// Delay range in milliseconds, kept for the magnitude decay formula.
    pub delay_ms: f32,
    /// Delay range in whole samples. Zero selects the degenerate
    /// pass-through voices.
    pub delay_in_samples: usize,
    /// Voices per channel, already clamped to `0..=MAX_VOICES`.
    pub voice_count: usize,
    /// Magnitude decay factor.
    pub damper: f32,
    /// Wet share of the output, 0..=1.
    pub mix: f32,
    /// Normalized high cut, 0..=1.
    pub high_cut: f32,
    /// Maximum |rate| in samples of delay change per sample.
    pub max_rate: f32,
    /// Rate re-randomization interval in milliseconds.
    pub update_ms: f32,
    /// Duration of this block in milliseconds.
    pub block_ms: f32,
    /// Ring length per channel for this delay range.
    pub buffer_size: usize,
}

impl EngineConfig {
    /// Resolve `controls` for a block of `frames` samples at `sample_rate`.
    pub fn resolve(controls: &Controls, sample_rate: f32, frames: usize) -> Self {
        let delay_in_samples = delay_in_samples(controls.delay_ms, sample_rate);

        Self {
            gain: db_to_gain(controls.gain_db),
            delay_ms: controls.delay_ms,
            delay_in_samples,
            voice_count: clamp_voice_count(controls.voices),
            damper: controls.damper,
            mix: (controls.mix_percent / 100.0).clamp(0.0, 1.0),
            high_cut: (controls.high_cut_percent / 100.0).clamp(0.0, 1.0),
            max_rate: controls.rate_range_ms / 1000.0,
            update_ms: controls.rate_update_ms,
            block_ms: block_duration_ms(frames, sample_rate),
            buffer_size: buffer_size_for(delay_in_samples),
        }
    }
}

/// `2^(dB / 6)`: every 6 dB doubles the amplitude.
pub fn db_to_gain(gain_db: f32) -> f32 {
    2.0_f32.powf(gain_db / 6.0)
}

/// Whole samples covered by `delay_ms`, truncated. Negative or NaN delays
/// collapse to zero.
pub fn delay_in_samples(delay_ms: f32, sample_rate: f32) -> usize {
    let samples = sample_rate * delay_ms / 1000.0;
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Clamp a host voice count into `0..=MAX_VOICES`.
pub fn clamp_voice_count(voices: i32) -> usize {
    usize::try_from(voices).unwrap_or(0).min(MAX_VOICES)
}

fn block_duration_ms(frames: usize, sample_rate: f32) -> f32 {
    if sample_rate > 0.0 {
        frames as f32 / sample_rate * 1000.0
    } else {
        0.0
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
