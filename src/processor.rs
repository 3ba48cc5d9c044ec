//! The host-facing half of a voice plugin: sample rate bookkeeping,
//! capacity reservation in `initialize()`, and one engine call per
//! `process()`. The reverb and the chorus both wrap one of these.

use nih_plug::prelude::*;
use nih_plug::util::permit_alloc;

use crate::dsp::config::delay_in_samples;
use crate::dsp::{BoundaryPolicy, EngineConfig, VoiceEngine};
use crate::params::VoicesParams;

/// Longest delay the Delay knob can reach, in ms.
const MAX_DELAY_MS: f32 = 1000.0;

pub struct VoicesProcessor {
    engine: VoiceEngine,

    /// Set in `initialize()`. Needed to turn ms into samples.
    sample_rate: f32,
}

impl VoicesProcessor {
    pub fn new(policy: BoundaryPolicy) -> Self {
        Self {
            engine: VoiceEngine::new(policy),
            // Placeholder until the host tells us the real rate.
            sample_rate: 44100.0,
        }
    }

    /// Reserve voice and ring storage for the largest settings so that
    /// turning knobs during playback doesn't allocate.
    pub fn initialize(&mut self, audio_io_layout: &AudioIOLayout, buffer_config: &BufferConfig) {
        self.sample_rate = buffer_config.sample_rate;

        let num_channels = audio_io_layout
            .main_output_channels
            .map(|c| c.get() as usize)
            .unwrap_or(2);
        let max_delay = delay_in_samples(MAX_DELAY_MS, self.sample_rate);
        self.engine.reserve(num_channels, max_delay);

        nih_log!(
            "{:?} engine ready: {} channels at {} Hz, up to {} delay samples",
            self.engine.policy(),
            num_channels,
            self.sample_rate,
            max_delay
        );
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Run one block in place and return the configuration it ran with.
    pub fn process(&mut self, params: &VoicesParams, buffer: &mut Buffer) -> EngineConfig {
        let config = EngineConfig::resolve(&params.controls(), self.sample_rate, buffer.samples());
        let channels = buffer.as_slice();
        let num_channels = channels.len();

        // Redrawing voices or resizing the ring past the reserved capacity
        // is the one place allowed to allocate.
        permit_alloc(|| self.engine.prepare(num_channels, &config));
        self.engine.process_prepared(&config, channels);

        config
    }

    pub fn engine(&self) -> &VoiceEngine {
        &self.engine
    }
}

/// Keep the host feeding us silence until the longest voice has played out.
pub fn tail(config: &EngineConfig) -> ProcessStatus {
    ProcessStatus::Tail(config.delay_in_samples as u32)
}
