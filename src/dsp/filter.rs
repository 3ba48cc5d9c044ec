//! # Per-Voice One-Pole Lowpass
//!
//! Every voice runs its tap through its own one-pole lowpass before it is
//! summed into the wet signal:
//!
//! ```text
//! y[n] = y[n-1] * (1 - a) + x[n] * a
//! ```
//!
//! Here `a` is the *smoothing amount* (not the feedback coefficient used by
//! the classic RC form). `a = 1` would be a straight wire; `a → 0` freezes
//! the output. The "High cut" knob maps onto `a` linearly and is scaled by
//! 0.99, so even with the knob fully open every voice is smoothed a little.
//!
//! The coefficient is shared by all voices for a block, so it is passed
//! into [`OnePoleLowPass::process`] instead of being stored per voice. The
//! only per-voice state is the previous output.

/// Upper bound of the smoothing amount. Keeps the filter from ever turning
/// into a plain pass-through.
pub const MAX_SMOOTHING: f32 = 0.99;

/// Map the normalized high-cut control (0..=1) to a smoothing amount.
///
/// ```text
/// 0.0 → 0.0   (output frozen at its previous value)
/// 1.0 → 0.99  (almost transparent)
/// ```
pub fn smoothing_amount(high_cut: f32) -> f32 {
    high_cut.clamp(0.0, 1.0) * MAX_SMOOTHING
}

/// A one-pole (6 dB/octave) lowpass filter with externally supplied
/// smoothing amount.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OnePoleLowPass {
    /// The previous output sample, the filter's only state.
    prev_output: f32,
}

impl OnePoleLowPass {
    /// Create a filter at rest (previous output 0.0).
    pub fn new() -> Self {
        Self { prev_output: 0.0 }
    }

    /// Process one sample with smoothing amount `amount` (see
    /// [`smoothing_amount`]).
    #[inline]
    pub fn process(&mut self, input: f32, amount: f32) -> f32 {
        let output = self.prev_output * (1.0 - amount) + input * amount;
        self.prev_output = output;
        output
    }

    /// The last output, i.e. the filter state carried into the next sample.
    pub fn state(&self) -> f32 {
        self.prev_output
    }

    /// Reset the filter state to zero.
    pub fn reset(&mut self) {
        self.prev_output = 0.0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
