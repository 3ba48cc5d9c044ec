//! # Multi-Voice Delay Engine
//!
//! The engine is a pure block transform over persistent state:
//!
//! ```text
//! Controls ──► EngineConfig ──► prepare ──► rate timer ──► per-sample loop
//!                               (reprovision                │
//!                                voices, resize             ▼
//!                                ring)                 output samples
//! ```
//!
//! ## The per-sample loop
//!
//! For every frame, and every channel in that frame:
//!
//! 1. write the input sample into the channel's ring
//! 2. for every voice of the channel: move it one step (wrap or bounce),
//!    read the ring `floor(offset)` samples back, scale by the voice
//!    magnitude, run it through the voice's lowpass, add to the wet sum
//! 3. `output = gain * (wet * mix + input * (1 - mix))`
//!
//! and then advance the shared write position once.
//!
//! ## Allocation
//!
//! Only [`VoiceEngine::prepare`] may allocate, and only when the channel
//! layout, voice count or buffer size changed beyond what was reserved.
//! [`VoiceEngine::render`] never allocates.

use nih_plug::nih_debug_assert;

use super::boundary::BoundaryPolicy;
use super::config::{EngineConfig, MAX_VOICES};
use super::delay_line::{buffer_size_for, DelayLine};
use super::filter::smoothing_amount;
use super::scheduler::RateScheduler;
use super::telemetry::DotSnapshot;
use super::voices::{Voice, VoiceBank};

/// All state of one effect instance.
pub struct VoiceEngine {
    policy: BoundaryPolicy,
    delay_line: DelayLine,
    voices: VoiceBank,
    scheduler: RateScheduler,
}

impl VoiceEngine {
    /// A new engine whose random draws are seeded from the OS.
    pub fn new(policy: BoundaryPolicy) -> Self {
        Self::with_bank(policy, VoiceBank::new())
    }

    /// A new engine with reproducible random draws.
    pub fn with_seed(policy: BoundaryPolicy, seed: u64) -> Self {
        Self::with_bank(policy, VoiceBank::with_seed(seed))
    }

    fn with_bank(policy: BoundaryPolicy, voices: VoiceBank) -> Self {
        Self {
            policy,
            delay_line: DelayLine::new(),
            voices,
            scheduler: RateScheduler::new(),
        }
    }

    /// Reserve storage for the largest configuration the host can ask for,
    /// so parameter changes within it never hit the allocator.
    pub fn reserve(&mut self, channels: usize, max_delay_in_samples: usize) {
        self.voices.reserve(channels * MAX_VOICES);
        self.delay_line
            .reserve(channels, buffer_size_for(max_delay_in_samples));
    }

    /// Bring voices and ring in line with `config` for `channels` channels.
    ///
    /// Voices are redrawn when the voice total, delay range or damper
    /// changed; the ring is rebuilt when its shape changed. This is the only
    /// step that may allocate.
    pub fn prepare(&mut self, channels: usize, config: &EngineConfig) {
        if self.voices.needs_reprovision(channels, config) {
            self.voices.reprovision(channels, config);
        }
        self.delay_line.resize(channels, config.buffer_size);
    }

    /// Process one block in place. `channels` holds one slice per channel;
    /// every slice is read as input and overwritten with output.
    pub fn process_block(&mut self, config: &EngineConfig, channels: &mut [&mut [f32]]) {
        self.prepare(channels.len(), config);
        self.process_prepared(config, channels);
    }

    /// Everything after [`prepare`](Self::prepare): tick the rate timer,
    /// then run the per-sample loop. Never allocates.
    pub fn process_prepared(&mut self, config: &EngineConfig, channels: &mut [&mut [f32]]) {
        if self.scheduler.advance(config.block_ms, config.update_ms) {
            self.voices.redraw_rates(config);
        }

        self.render(config, channels);
    }

    /// The per-sample loop. Expects [`prepare`](Self::prepare) to have run
    /// for this channel count and configuration.
    pub fn render(&mut self, config: &EngineConfig, channels: &mut [&mut [f32]]) {
        let num_channels = channels.len().min(self.delay_line.channels());
        let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);

        nih_debug_assert!(
            num_channels == channels.len(),
            "engine prepared for {} channels, got {}",
            self.delay_line.channels(),
            channels.len()
        );
        nih_debug_assert!(self.delay_line.buffer_len().is_power_of_two());

        let policy = self.policy;
        let range = config.delay_in_samples as f32;
        let amount = smoothing_amount(config.high_cut);
        let dry = 1.0 - config.mix;

        for frame in 0..frames {
            self.delay_line.wrap_write_pos();

            for (channel, samples) in channels.iter_mut().take(num_channels).enumerate() {
                let input = samples[frame];
                self.delay_line.write(channel, input);

                let mut wet = 0.0;
                for voice in self.voices.channel_voices_mut(channel) {
                    let (delta, rate) = policy.step(voice.delay_offset, voice.rate, range);
                    nih_debug_assert!(delta >= 0.0 && (delta < range || range == 0.0));

                    let tap = self.delay_line.read(channel, delta) * voice.magnitude;
                    wet += voice.low_pass.process(tap, amount);

                    voice.delay_offset = delta;
                    voice.rate = rate;
                }

                samples[frame] = config.gain * (wet * config.mix + input * dry);
            }

            self.delay_line.advance();
        }
    }

    /// Voice positions as a byte snapshot for the visualization.
    ///
    /// Channel 0 goes left, channel 1 goes right. Each position is scaled
    /// to `0..=255` over the delay range; at most 200 voices per side are
    /// recorded.
    pub fn dot_snapshot(&self, config: &EngineConfig) -> DotSnapshot {
        let mut snapshot = DotSnapshot::default();
        let channels = self.delay_line.channels().min(2);

        for channel in 0..channels {
            snapshot.record(
                channel,
                self.voices.channel_voices(channel),
                config.delay_in_samples,
            );
        }
        snapshot
    }

    /// Silence the ring, zero every voice filter and restart the timer.
    /// Voice positions and magnitudes are kept.
    pub fn reset(&mut self) {
        self.delay_line.clear();
        self.voices.reset_filters();
        self.scheduler.reset();
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// All voices, channel-major.
    pub fn voices(&self) -> &[Voice] {
        self.voices.voices()
    }

    /// The voices belonging to `channel`.
    pub fn channel_voices(&self, channel: usize) -> &[Voice] {
        self.voices.channel_voices(channel)
    }

    /// Ring length per channel.
    pub fn buffer_len(&self) -> usize {
        self.delay_line.buffer_len()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
