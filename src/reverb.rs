//! # Loveless Reverb
//!
//! Up to 200 voices per channel spread over the delay range. Each voice
//! sweeps at its own random speed and re-enters from the other end when it
//! runs off the range (wrap policy). The sum is a dense, constantly
//! refreshing diffuse tail.

use std::sync::Arc;

use nih_plug::prelude::*;

use crate::dsp::BoundaryPolicy;
use crate::params::VoicesParams;
use crate::processor::{tail, VoicesProcessor};
use crate::STEREO_AND_MONO;

pub struct LovelessReverb {
    params: Arc<VoicesParams>,
    processor: VoicesProcessor,
}

impl Default for LovelessReverb {
    fn default() -> Self {
        Self {
            params: Arc::new(VoicesParams::reverb()),
            processor: VoicesProcessor::new(BoundaryPolicy::Wrap),
        }
    }
}

impl Plugin for LovelessReverb {
    const NAME: &'static str = "Loveless Reverb";
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
        tail(&config)
    }
}

impl ClapPlugin for LovelessReverb {
    const CLAP_ID: &'static str = "com.loveless-audio.loveless-reverb";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A reverb made of many randomly sweeping delay voices");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Reverb,
    ];
}

impl Vst3Plugin for LovelessReverb {
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssReverb_v001";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Reverb];
}
