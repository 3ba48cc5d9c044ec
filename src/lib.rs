//! # Loveless Voices — Multi-Voice Delay Reverb & Chorus (AU/VST3/CLAP)
//!
//! Two effect plugins built with [nih-plug](https://github.com/robbert-vdh/nih-plug)
//! on top of one engine: a delay line read by many independently moving
//! voices.
//!
//! - **Loveless Reverb**: voices wrap around the delay range.
//! - **Loveless Chorus**: voices bounce back and forth inside it.
//!
//! ## Signal Flow
//!
//! ```text
//! Input ──┬──────────────────────────────────────────── × (1 - mix) ──┐
//!         │                                                           │
//!         └──► [Ring Buffer] ──┬──► voice 1: × mag ──► [Lowpass] ──┐  │
//!               (one per       ├──► voice 2: × mag ──► [Lowpass] ──┤  │
//!                channel)      │        ...                        (+) │
//!                              └──► voice N: × mag ──► [Lowpass] ──┘  │
//!                                                                  │  │
//!                                                     × mix ◄──────┘  │
//!                                                       │             │
//!                                                      (+)◄───────────┘
//!                                                       │
//!                                                     × gain ──► Output
//! ```
//!
//! Every voice reads the ring at its own offset. The offset moves by the
//! voice's rate each sample, and all rates get re-randomized every
//! "Rate Update" milliseconds.

pub mod dsp;
mod params;
mod processor;

pub mod chorus;
pub mod reverb;

use std::num::NonZeroU32;

use nih_plug::prelude::*;

pub use chorus::LovelessChorus;
pub use reverb::LovelessReverb;

/// Stereo first (most DAW tracks), mono as a fallback. Processing is
/// in-place, so inputs and outputs always match.
pub(crate) const STEREO_AND_MONO: &[AudioIOLayout] = &[
    AudioIOLayout {
        main_input_channels: NonZeroU32::new(2),
        main_output_channels: NonZeroU32::new(2),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    },
    AudioIOLayout {
        main_input_channels: NonZeroU32::new(1),
        main_output_channels: NonZeroU32::new(1),
        aux_input_ports: &[],
        aux_output_ports: &[],
        names: PortNames::const_default(),
    },
];

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// Both plugins are exported from the same library. Hosts list them as two
// separate effects.

nih_export_clap!(LovelessReverb, LovelessChorus);
nih_export_vst3!(LovelessReverb, LovelessChorus);

// AUv2 entry point generated from the CLAP exports, for Logic Pro.
clap_wrapper::export_auv2!();
