//! # Voice Bank
//!
//! A voice is one read head on the delay line. It has:
//!
//! - a **delay offset**: how far behind the write head it reads, in samples
//! - a **rate**: how many samples the offset moves per sample
//! - a **magnitude**: its gain, fixed when the voice is drawn
//! - its own **lowpass** state
//!
//! Voices for all channels are stored in one `Vec`, channel-major:
//! voice `j` of channel `c` lives at `c * voice_count + j`.
//!
//! ## Reprovisioning
//!
//! Whenever the voice total, the delay range or the damper changes, every
//! voice is drawn again. Damper and delay range both feed into the drawn
//! magnitudes, so old draws are meaningless after either one changes. The
//! `Vec` is only reallocated when the voice total changes, but all lowpass
//! states are zeroed every time.
//!
//! ## Magnitudes
//!
//! ```text
//! magnitude = U(0, 1] / 2^(offset / delay_ms * damper)
//! ```
//!
//! Voices reading further back are quieter, like the energy loss of a real
//! room. With `damper = 0` every voice just gets a random gain. The
//! magnitude is not updated as the voice moves afterwards.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::boundary::contain;
use super::config::EngineConfig;
use super::filter::OnePoleLowPass;

/// Gain of every voice when the delay range is zero. The reverb collapses
/// to a half-gain copy of the input.
pub const DEGENERATE_MAGNITUDE: f32 = 0.5;

/// One modulated read head.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Voice {
    /// Samples behind the write head, in `[0, delay_in_samples)`.
    pub delay_offset: f32,
    /// Change of `delay_offset` per sample.
    pub rate: f32,
    /// Gain applied to the tap.
    pub magnitude: f32,
    /// Per-voice lowpass state.
    pub low_pass: OnePoleLowPass,
}

/// What the bank was last provisioned for.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Provisioned {
    delay_in_samples: usize,
    damper: f32,
}

/// Owns every voice plus the random generator that draws them.
pub struct VoiceBank {
    voices: Vec<Voice>,
    /// Voices per channel for the current layout.
    voice_count: usize,
    last: Option<Provisioned>,
    rng: SmallRng,
}

impl VoiceBank {
    /// A bank with a generator seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_os_rng())
    }

    /// A bank whose draws are reproducible for a given `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            voices: Vec::new(),
            voice_count: 0,
            last: None,
            rng,
        }
    }

    /// Reserve space for `total` voices so later reprovisions up to that
    /// size don't allocate.
    pub fn reserve(&mut self, total: usize) {
        if total > self.voices.len() {
            self.voices.reserve(total - self.voices.len());
        }
    }

    /// Whether `reprovision` has to run before processing a block with this
    /// layout and configuration.
    pub fn needs_reprovision(&self, channels: usize, config: &EngineConfig) -> bool {
        let total = channels * config.voice_count;
        match self.last {
            None => true,
            Some(last) => {
                // Same total with a different split (1×20 vs 2×10) still
                // changes which voices belong to which channel.
                total != self.voices.len()
                    || config.voice_count != self.voice_count
                    || last.delay_in_samples != config.delay_in_samples
                    || last.damper != config.damper
            }
        }
    }

    /// Resize (if the voice total changed) and redraw every voice.
    ///
    /// Every lowpass state is zeroed whether or not storage was reallocated.
    pub fn reprovision(&mut self, channels: usize, config: &EngineConfig) {
        let total = channels * config.voice_count;
        if total != self.voices.len() {
            self.voices.resize(total, Voice::default());
        }
        self.voice_count = config.voice_count;
        self.last = Some(Provisioned {
            delay_in_samples: config.delay_in_samples,
            damper: config.damper,
        });

        for voice in &mut self.voices {
            *voice = draw_voice(&mut self.rng, config);
        }
    }

    /// Give every voice a new random rate. Positions are left alone, so the
    /// sweep only changes speed/direction and never jumps.
    pub fn redraw_rates(&mut self, config: &EngineConfig) {
        for voice in &mut self.voices {
            voice.rate = draw_rate(&mut self.rng, config);
        }
    }

    /// Zero every voice's lowpass state without redrawing anything.
    pub fn reset_filters(&mut self) {
        for voice in &mut self.voices {
            voice.low_pass.reset();
        }
    }

    /// Voices per channel.
    pub fn voice_count(&self) -> usize {
        self.voice_count
    }

    /// All voices, channel-major.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// The voices belonging to `channel`.
    pub fn channel_voices(&self, channel: usize) -> &[Voice] {
        let start = channel * self.voice_count;
        &self.voices[start..start + self.voice_count]
    }

    /// Mutable access to the voices belonging to `channel`.
    pub fn channel_voices_mut(&mut self, channel: usize) -> &mut [Voice] {
        let start = channel * self.voice_count;
        &mut self.voices[start..start + self.voice_count]
    }
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_voice(rng: &mut SmallRng, config: &EngineConfig) -> Voice {
    if config.delay_in_samples == 0 {
        return Voice {
            delay_offset: 0.0,
            rate: 0.0,
            magnitude: DEGENERATE_MAGNITUDE,
            low_pass: OnePoleLowPass::new(),
        };
    }

    let range = config.delay_in_samples as f32;
    let delay_offset = contain(rng.random::<f32>() * range, range);
    let rate = draw_rate(rng, config);

    // `random` is in [0, 1); flipping it gives (0, 1] so no voice is silent.
    let gain = 1.0 - rng.random::<f32>();
    let decay = 2.0_f32.powf(delay_offset / config.delay_ms * config.damper);

    Voice {
        delay_offset,
        rate,
        magnitude: gain / decay,
        low_pass: OnePoleLowPass::new(),
    }
}

fn draw_rate(rng: &mut SmallRng, config: &EngineConfig) -> f32 {
    if config.delay_in_samples == 0 {
        0.0
    } else {
        rng.random_range(-1.0_f32..1.0) * config.max_rate
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::config::Controls;

    fn config(delay_ms: f32, voices: i32, damper: f32) -> EngineConfig {
        let controls = Controls {
            gain_db: 0.0,
            delay_ms,
            voices,
            damper,
            mix_percent: 100.0,
            high_cut_percent: 100.0,
            rate_range_ms: 330.0,
            rate_update_ms: 1000.0,
        };
        EngineConfig::resolve(&controls, 48_000.0, 480)
    }

    #[test]
    fn test_first_block_always_provisions() {
        let bank = VoiceBank::with_seed(1);
        assert!(bank.needs_reprovision(2, &config(20.0, 0, 0.0)));
    }

    #[test]
    fn test_reprovision_triggers() {
        let mut bank = VoiceBank::with_seed(1);
        let base = config(20.0, 10, 0.0);
        bank.reprovision(2, &base);
        assert_eq!(bank.voices().len(), 20);
        assert!(!bank.needs_reprovision(2, &base));

        // Channel layout, voice count, delay and damper all trigger.
        assert!(bank.needs_reprovision(1, &base));
        assert!(bank.needs_reprovision(2, &config(20.0, 11, 0.0)));
        assert!(bank.needs_reprovision(2, &config(30.0, 10, 0.0)));
        assert!(bank.needs_reprovision(2, &config(20.0, 10, 1.5)));
        // Same total, different split.
        assert!(bank.needs_reprovision(1, &config(20.0, 20, 0.0)));

        // Rate range and mix don't.
        let mut other = base;
        other.max_rate = 0.9;
        other.mix = 0.2;
        assert!(!bank.needs_reprovision(2, &other));
    }

    #[test]
    fn test_voices_respect_ranges() {
        let mut bank = VoiceBank::with_seed(7);
        let cfg = config(20.0, 200, 0.0);
        bank.reprovision(2, &cfg);

        let range = cfg.delay_in_samples as f32;
        for voice in bank.voices() {
            assert!((0.0..range).contains(&voice.delay_offset));
            assert!(voice.rate.abs() <= cfg.max_rate);
            assert!(
                voice.magnitude > 0.0 && voice.magnitude <= 1.0,
                "magnitude {} outside (0, 1]",
                voice.magnitude
            );
            assert_eq!(voice.low_pass.state(), 0.0);
        }
    }

    /// Filter state is zeroed on every reprovision, even when the storage
    /// is reused.
    #[test]
    fn test_reprovision_resets_filters_without_realloc() {
        let mut bank = VoiceBank::with_seed(3);
        bank.reprovision(1, &config(20.0, 4, 0.0));
        for voice in bank.channel_voices_mut(0) {
            voice.low_pass.process(1.0, 0.5);
        }

        let damped = config(20.0, 4, 2.0);
        assert!(bank.needs_reprovision(1, &damped));
        bank.reprovision(1, &damped);

        assert_eq!(bank.voices().len(), 4);
        assert!(bank.voices().iter().all(|v| v.low_pass.state() == 0.0));
    }

    /// Later voices are quieter on average when the damper is up.
    #[test]
    fn test_damper_attenuates_late_voices() {
        let mut bank = VoiceBank::with_seed(11);
        let cfg = config(100.0, 200, 10.0);
        bank.reprovision(1, &cfg);

        for voice in bank.voices() {
            let bound = 1.0 / 2.0_f32.powf(voice.delay_offset / cfg.delay_ms * cfg.damper);
            assert!(voice.magnitude <= bound * 1.0001);
        }
    }

    #[test]
    fn test_zero_delay_is_degenerate() {
        let mut bank = VoiceBank::with_seed(5);
        let cfg = config(0.0, 3, 4.0);
        bank.reprovision(2, &cfg);

        for voice in bank.voices() {
            assert_eq!(voice.delay_offset, 0.0);
            assert_eq!(voice.rate, 0.0);
            assert_eq!(voice.magnitude, DEGENERATE_MAGNITUDE);
        }

        bank.redraw_rates(&cfg);
        assert!(bank.voices().iter().all(|v| v.rate == 0.0));
    }

    #[test]
    fn test_zero_voices() {
        let mut bank = VoiceBank::with_seed(5);
        let cfg = config(20.0, -3, 0.0);
        bank.reprovision(2, &cfg);

        assert!(bank.voices().is_empty());
        assert!(bank.channel_voices(0).is_empty());
        assert!(bank.channel_voices(1).is_empty());
    }

    #[test]
    fn test_redraw_rates_keeps_positions() {
        let mut bank = VoiceBank::with_seed(9);
        let cfg = config(20.0, 8, 0.0);
        bank.reprovision(1, &cfg);
        let before: Vec<Voice> = bank.voices().to_vec();

        bank.redraw_rates(&cfg);

        for (old, new) in before.iter().zip(bank.voices()) {
            assert_eq!(old.delay_offset, new.delay_offset);
            assert_eq!(old.magnitude, new.magnitude);
            assert!(new.rate.abs() <= cfg.max_rate);
        }
        assert!(before
            .iter()
            .zip(bank.voices())
            .any(|(old, new)| old.rate != new.rate));
    }

    #[test]
    fn test_same_seed_same_draws() {
        let cfg = config(20.0, 16, 1.0);
        let mut a = VoiceBank::with_seed(42);
        let mut b = VoiceBank::with_seed(42);
        a.reprovision(2, &cfg);
        b.reprovision(2, &cfg);
        assert_eq!(a.voices(), b.voices());
    }

    #[test]
    fn test_channel_slices() {
        let mut bank = VoiceBank::with_seed(2);
        bank.reprovision(2, &config(20.0, 5, 0.0));

        assert_eq!(bank.voice_count(), 5);
        assert_eq!(bank.channel_voices(0), &bank.voices()[0..5]);
        assert_eq!(bank.channel_voices(1), &bank.voices()[5..10]);
    }
}
