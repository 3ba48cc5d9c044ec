//! # Loveless Chorus
//!
//! Same voice engine as the reverb, but voices bounce off the ends of the
//! delay range instead of wrapping around. Every voice sweeps back and
//! forth like a triangle LFO with its own random speed, which gives the
//! pitch wobble of a chorus.
//!
//! After each block the voice positions are published for a dot display
//! (see [`crate::dsp::telemetry`]).

use std::sync::Arc;

use nih_plug::prelude::*;

use crate::dsp::telemetry::{dot_channel, DotPublisher, DotReceiver};
use crate::dsp::BoundaryPolicy;
use crate::params::VoicesParams;
use crate::processor::{tail, VoicesProcessor};
use crate::STEREO_AND_MONO;

pub struct LovelessChorus {
    params: Arc<VoicesParams>,
    processor: VoicesProcessor,
    dots: DotPublisher,
    dots_rx: DotReceiver,
}

impl LovelessChorus {
    /// Receiving end of the voice position snapshots. Each call hands out
    /// a new handle on the same channel.
    pub fn dot_receiver(&self) -> DotReceiver {
        self.dots_rx.clone()
    }
}

impl Default for LovelessChorus {
    fn default() -> Self {
        let (dots, dots_rx) = dot_channel();
        Self {
            params: Arc::new(VoicesParams::chorus()),
            processor: VoicesProcessor::new(BoundaryPolicy::Bounce),
            dots,
            dots_rx,
        }
    }
}

impl Plugin for LovelessChorus {
    const NAME: &'static str = "Loveless Chorus";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = STEREO_AND_MONO;

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        self.processor.initialize(audio_io_layout, buffer_config);
        true
    }

    fn reset(&mut self) {
        self.processor.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let config = self.processor.process(&self.params, buffer);

        // Dropped when nobody is listening or the display is behind.
        let _ = self
            .dots
            .publish(self.processor.engine().dot_snapshot(&config));

        tail(&config)
    }
}

impl ClapPlugin for LovelessChorus {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-chorus";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A chorus made of many bouncing delay voices");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Chorus,
    ];
}

impl Vst3Plugin for LovelessChorus {
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssChorus_v001";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Modulation];
}
