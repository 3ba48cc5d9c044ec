//! # Plugin Parameters
//!
//! Both plugins expose the same eight knobs. They differ in a few labels
//! and in the default rate update interval, so the parameter struct is
//! built by a per-variant constructor instead of `Default`.
//!
//! The engine works on one parameter snapshot per block (see
//! [`VoicesParams::controls`]). Voice positions are redrawn whenever the
//! delay or damper changes, so smoothing those per sample would only
//! trigger a reprovision on every block of the ramp.

use nih_plug::prelude::*;

use crate::dsp::config::{Controls, MAX_VOICES};

/// Labels and defaults that differ between the reverb and the chorus.
struct Flavor {
    delay_name: &'static str,
    high_cut_name: &'static str,
    rate_range_name: &'static str,
    rate_update_default: f32,
}

const REVERB: Flavor = Flavor {
    delay_name: "Delay",
    high_cut_name: "High cut",
    rate_range_name: "MaxRate",
    rate_update_default: 1000.0,
};

const CHORUS: Flavor = Flavor {
    delay_name: "Delay Range",
    high_cut_name: "Low-Pass",
    rate_range_name: "Rate Range",
    rate_update_default: 500.0,
};

/// All user-facing parameters of one plugin instance.
#[derive(Params)]
pub struct VoicesParams {
    /// **Gain** — output level in dB. Every 6 dB doubles the amplitude.
    #[id = "gain"]
    pub gain: FloatParam,

    /// **Delay** — the range voices spread over, in ms. Longer ranges give
    /// a bigger room (reverb) or a deeper sweep (chorus).
    #[id = "delay"]
    pub delay: FloatParam,

    /// **Voices** — read heads per channel.
    #[id = "voices"]
    pub voices: IntParam,

    /// **Damper** — how much quieter voices get toward the end of the
    /// delay range. 0 = no decay.
    #[id = "damper"]
    pub damper: FloatParam,

    /// **Mix** — wet/dry balance.
    #[id = "mix"]
    pub mix: FloatParam,

    /// **High cut** — per-voice lowpass opening. 100% is nearly
    /// transparent, 0% freezes the wet signal.
    #[id = "hfcut"]
    pub high_cut: FloatParam,

    /// **Rate range** — maximum voice speed. 1000 means a voice can move
    /// one sample of delay per sample.
    #[id = "maxrate"]
    pub rate_range: FloatParam,

    /// **Rate update** — how often every voice picks a new random speed.
    #[id = "rateupd"]
    pub rate_update: FloatParam,
}

impl VoicesParams {
    /// Parameters for the reverb variant.
    pub fn reverb() -> Self {
        Self::with_flavor(&REVERB)
    }

    /// Parameters for the chorus variant.
    pub fn chorus() -> Self {
        Self::with_flavor(&CHORUS)
    }

    fn with_flavor(flavor: &Flavor) -> Self {
        Self {
            gain: FloatParam::new(
                "Gain",
                0.0,
                FloatRange::Linear {
                    min: -70.0,
                    max: 24.0,
                },
            )
            .with_unit(" dB")
            .with_step_size(0.5),

            delay: FloatParam::new(
                flavor.delay_name,
                20.0,
                FloatRange::Skewed {
                    min: 1.0,
                    max: 1000.0,
                    // Exponential-feeling taper: most of the knob travel
                    // covers the short delays.
                    factor: FloatRange::skew_factor(-2.0),
                },
            )
            .with_unit(" ms")
            .with_step_size(0.1),

            voices: IntParam::new(
                "Voices",
                50,
                IntRange::Linear {
                    min: 1,
                    max: MAX_VOICES as i32,
                },
            ),

            damper: FloatParam::new(
                "Damper",
                0.0,
                FloatRange::Linear {
                    min: 0.0,
                    max: 10.0,
                },
            )
            .with_step_size(0.1),

            mix: FloatParam::new(
                "Mix",
                100.0,
                FloatRange::Linear {
                    min: 0.0,
                    max: 100.0,
                },
            )
            .with_unit("%")
            .with_step_size(0.1),

            high_cut: FloatParam::new(
                flavor.high_cut_name,
                100.0,
                FloatRange::Linear {
                    min: 0.0,
                    max: 100.0,
                },
            )
            .with_unit("%")
            .with_step_size(0.1),

            rate_range: FloatParam::new(
                flavor.rate_range_name,
                330.0,
                FloatRange::Linear {
                    min: 0.0,
                    max: 1000.0,
                },
            )
            .with_unit(" ms")
            .with_step_size(0.1),

            rate_update: FloatParam::new(
                "Rate Update",
                flavor.rate_update_default,
                FloatRange::Linear {
                    min: 0.0,
                    max: 2000.0,
                },
            )
            .with_unit(" ms")
            .with_step_size(0.1),
        }
    }

    /// Snapshot of the current knob values for one block.
    pub fn controls(&self) -> Controls {
        Controls {
            gain_db: self.gain.value(),
            delay_ms: self.delay.value(),
            voices: self.voices.value(),
            damper: self.damper.value(),
            mix_percent: self.mix.value(),
            high_cut_percent: self.high_cut.value(),
            rate_range_ms: self.rate_range.value(),
            rate_update_ms: self.rate_update.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_to_expected_controls() {
        let controls = VoicesParams::reverb().controls();

        assert_eq!(controls.gain_db, 0.0);
        assert_eq!(controls.delay_ms, 20.0);
        assert_eq!(controls.voices, 50);
        assert_eq!(controls.damper, 0.0);
        assert_eq!(controls.mix_percent, 100.0);
        assert_eq!(controls.high_cut_percent, 100.0);
        assert_eq!(controls.rate_range_ms, 330.0);
        assert_eq!(controls.rate_update_ms, 1000.0);
    }

    #[test]
    fn test_chorus_flavor() {
        let params = VoicesParams::chorus();

        assert_eq!(params.rate_update.value(), 500.0);
        assert_eq!(params.delay.name(), "Delay Range");
        assert_eq!(params.high_cut.name(), "Low-Pass");
        assert_eq!(params.rate_range.name(), "Rate Range");
    }
}
