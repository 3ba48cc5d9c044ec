//! # Voice Boundary Policies
//!
//! Each voice moves its delay offset by `rate` samples per sample. When the
//! offset leaves `[0, range)` one of two rules brings it back:
//!
//! ```text
//! Wrap (reverb)                     Bounce (chorus)
//!
//! range ┤   /|   /|   /             range ┤   /\      /\
//!       │  / |  / |  /                    │  /  \    /  \
//!       │ /  | /  | /                     │ /    \  /    \
//!     0 ┤/   |/   |/                    0 ┤/      \/      \
//! ```
//!
//! Wrap re-enters from the opposite edge and keeps the rate, so the voice
//! sweeps like a sawtooth and the tail keeps refreshing. Bounce reflects
//! the position and flips the rate, a triangle sweep without position jumps
//! that gives the smooth pitch wobble of a chorus.

/// How a voice's delay offset is brought back into `[0, range)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Re-enter from the opposite edge, keep the rate.
    Wrap,
    /// Reflect off the edge and negate the rate.
    Bounce,
}

impl BoundaryPolicy {
    /// Move `delay_offset` by `rate` and apply the policy for `range`.
    ///
    /// Returns the new offset and the (possibly negated) rate. The offset is
    /// always in `[0, range)` when `range > 0`. A zero range pins the offset
    /// to zero.
    #[inline]
    pub fn step(self, delay_offset: f32, rate: f32, range: f32) -> (f32, f32) {
        if range <= 0.0 {
            return (0.0, rate);
        }

        let mut delta = delay_offset + rate;
        let mut rate = rate;

        match self {
            BoundaryPolicy::Wrap => {
                if delta < 0.0 {
                    delta += range;
                } else if delta >= range {
                    delta -= range;
                }
                // `-tiny + range` can round up to exactly `range`, which is
                // the same point on the circle as zero.
                if delta >= range {
                    delta = 0.0;
                }
            }
            BoundaryPolicy::Bounce => {
                if delta < 0.0 {
                    delta = -delta;
                    rate = -rate;
                } else if delta >= range {
                    delta = 2.0 * range - delta;
                    rate = -rate;
                }
            }
        }

        (contain(delta, range), rate)
    }
}

/// Clamp `value` into `[0, range)` for a positive `range`.
///
/// Only kicks in for edge cases: float rounding landing exactly on `range`,
/// or a rate larger than the whole range.
#[inline]
pub fn contain(value: f32, range: f32) -> f32 {
    if value >= range {
        below(range)
    } else if value < 0.0 || value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Largest `f32` strictly below a positive, finite `value`.
fn below(value: f32) -> f32 {
    f32::from_bits(value.to_bits() - 1)
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
