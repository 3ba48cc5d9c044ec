//! # DSP (Digital Signal Processing) Engine
//!
//! Everything the two plugins share. Nothing in here knows about the host.
//!
//! - **`config`**: turns knob values into per-block engine numbers.
//! - **`delay_line`**: the multi-channel ring buffer and its power-of-two
//!   sizing.
//! - **`voices`**: the voice bank, drawn from a seedable random generator.
//! - **`boundary`**: what a voice does at the edge of the delay range
//!   (wrap for the reverb, bounce for the chorus).
//! - **`scheduler`**: the timer that periodically redraws voice rates.
//! - **`filter`**: the per-voice one-pole lowpass.
//! - **`engine`**: the block/sample loop tying it all together.
//! - **`telemetry`**: voice position snapshots for the chorus display.

pub mod boundary;
pub mod config;
pub mod delay_line;
pub mod engine;
pub mod filter;
pub mod scheduler;
pub mod telemetry;
pub mod voices;

pub use boundary::BoundaryPolicy;
pub use config::{Controls, EngineConfig};
pub use engine::VoiceEngine;
