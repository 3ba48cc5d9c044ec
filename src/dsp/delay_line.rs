//! # Multi-Channel Delay Line (Ring Buffer)
//!
//! A delay line stores audio samples and lets many read heads ("voices")
//! play them back from different positions behind a single write head.
//!
//! ## Layout
//!
//! All channels live in one flat `Vec<f32>`, one ring of `buffer_len`
//! samples after another:
//!
//! ```text
//! [ ch0: 0 .. buffer_len | ch1: 0 .. buffer_len | ... ]
//! ```
//!
//! There is a single write position shared by every channel. Per frame the
//! engine wraps it, writes one sample into every channel's ring, lets the
//! voices read, and then advances it once.
//!
//! ## Power-of-two sizing
//!
//! The ring length is the smallest power of two that holds the longest
//! delay plus 1024 samples of headroom (see [`buffer_size_for`]). The
//! headroom means small delay changes usually keep the same size, so the
//! ring is only reallocated when the size really changes.

/// Extra samples on top of the maximum delay so that modulated read heads
/// never catch up with the write head.
pub const BUFFER_HEADROOM: usize = 1024;

/// Smallest power of two that is at least `delay_in_samples + 1024`.
///
/// Never returns zero: the headroom keeps the argument at 1024 or above.
pub fn buffer_size_for(delay_in_samples: usize) -> usize {
    (delay_in_samples + BUFFER_HEADROOM).next_power_of_two()
}

/// Modulo that always lands in `[0, modulus)`, also for negative operands.
///
/// `%` in Rust keeps the sign of the left operand (`-3 % 8 == -3`), which is
/// exactly the wrong thing for ring buffer addressing.
pub fn floor_mod(value: i64, modulus: usize) -> usize {
    debug_assert!(modulus > 0, "modulus must be positive");
    value.rem_euclid(modulus as i64) as usize
}

/// A set of per-channel ring buffers sharing one write position.
///
/// Storage is only (re)allocated by [`resize`](Self::resize). Reads and
/// writes never allocate.
pub struct DelayLine {
    /// Ring storage for all channels, `channels * buffer_len` samples.
    buffer: Vec<f32>,

    /// Write head, shared across channels. Kept wrapped into
    /// `[0, buffer_len)` by [`wrap_write_pos`](Self::wrap_write_pos).
    write_pos: usize,

    /// Length of one channel's ring. Always a power of two once sized.
    buffer_len: usize,

    /// Number of channel rings stored in `buffer`.
    channels: usize,
}

impl DelayLine {
    /// Create an empty delay line. Call [`resize`](Self::resize) before use.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            write_pos: 0,
            buffer_len: 0,
            channels: 0,
        }
    }

    /// Reserve room for `channels` rings of `buffer_len` samples without
    /// changing the current size. Later resizes up to this size reuse the
    /// allocation.
    pub fn reserve(&mut self, channels: usize, buffer_len: usize) {
        let wanted = channels * buffer_len;
        if wanted > self.buffer.len() {
            self.buffer.reserve(wanted - self.buffer.len());
        }
    }

    /// Make room for `channels` rings of `buffer_len` samples.
    ///
    /// Does nothing when the shape is unchanged. Otherwise every ring is
    /// zeroed, since the old contents no longer line up with the new
    /// addressing. The write position is kept and gets wrapped on the next
    /// frame.
    ///
    /// Returns `true` if the storage was rebuilt.
    pub fn resize(&mut self, channels: usize, buffer_len: usize) -> bool {
        if channels == self.channels && buffer_len == self.buffer_len {
            return false;
        }

        self.buffer.clear();
        self.buffer.resize(channels * buffer_len, 0.0);
        self.channels = channels;
        self.buffer_len = buffer_len;
        true
    }

    /// Length of one channel's ring in samples.
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    /// Number of channel rings.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Current (wrapped) write position.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Bring the write position back into `[0, buffer_len)`.
    ///
    /// Called at the start of every frame, so a ring that shrank since the
    /// last block is handled before the first write.
    pub fn wrap_write_pos(&mut self) {
        if self.buffer_len > 0 {
            self.write_pos %= self.buffer_len;
        }
    }

    /// Write `sample` into `channel`'s ring at the write position.
    pub fn write(&mut self, channel: usize, sample: f32) {
        let index = channel * self.buffer_len + self.write_pos;
        self.buffer[index] = sample;
    }

    /// Read the sample written `delay` frames ago on `channel`.
    ///
    /// The fractional part of `delay` is dropped (no interpolation): the
    /// voices move continuously anyway and the low-pass after every tap
    /// smooths out the steps. `delay == 0.0` returns the sample written in
    /// the current frame.
    pub fn read(&self, channel: usize, delay: f32) -> f32 {
        let delay_int = delay.floor() as i64;
        let index = floor_mod(self.write_pos as i64 - delay_int, self.buffer_len);
        self.buffer[channel * self.buffer_len + index]
    }

    /// Advance the shared write position by one frame.
    ///
    /// Wrapping happens lazily in [`wrap_write_pos`](Self::wrap_write_pos).
    pub fn advance(&mut self) {
        self.write_pos += 1;
    }

    /// Clear every ring to silence and reset the write position.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Helper: write one frame to every channel and advance.
    fn push_frame(dl: &mut DelayLine, values: &[f32]) {
        dl.wrap_write_pos();
        for (channel, &value) in values.iter().enumerate() {
            dl.write(channel, value);
        }
        dl.advance();
    }

    #[test]
    fn test_buffer_size_for_known_delays() {
        assert_eq!(buffer_size_for(0), 1024);
        assert_eq!(buffer_size_for(1), 2048);
        // 48 kHz, 20 ms
        assert_eq!(buffer_size_for(960), 2048);
        assert_eq!(buffer_size_for(1024), 2048);
        assert_eq!(buffer_size_for(1025), 4096);
        // 48 kHz, 1000 ms
        assert_eq!(buffer_size_for(48_000), 65_536);
    }

    #[test]
    fn test_floor_mod_negative_operands() {
        assert_eq!(floor_mod(-1, 8), 7);
        assert_eq!(floor_mod(-8, 8), 0);
        assert_eq!(floor_mod(-9, 8), 7);
        assert_eq!(floor_mod(13, 8), 5);
    }

    /// Reading zero frames back returns the sample written this frame.
    #[test]
    fn test_zero_delay_reads_current_frame() {
        let mut dl = DelayLine::new();
        dl.resize(1, 16);

        dl.wrap_write_pos();
        dl.write(0, 0.75);
        let result = dl.read(0, 0.0);
        assert!((result - 0.75).abs() < 1e-6, "Expected 0.75, got {result}");
    }

    /// Fractional delays truncate toward the newer sample.
    #[test]
    fn test_fractional_delay_truncates() {
        let mut dl = DelayLine::new();
        dl.resize(1, 16);

        for value in [1.0, 2.0, 3.0] {
            push_frame(&mut dl, &[value]);
        }
        dl.wrap_write_pos();
        dl.write(0, 4.0);

        assert!((dl.read(0, 1.9) - 3.0).abs() < 1e-6);
        assert!((dl.read(0, 2.0) - 2.0).abs() < 1e-6);
        assert!((dl.read(0, 3.5) - 1.0).abs() < 1e-6);
    }

    /// Channels share the write head but never see each other's samples.
    #[test]
    fn test_channels_are_independent() {
        let mut dl = DelayLine::new();
        dl.resize(2, 8);

        for i in 1..=3 {
            push_frame(&mut dl, &[i as f32, -(i as f32)]);
        }

        assert!((dl.read(0, 1.0) - 3.0).abs() < 1e-6);
        assert!((dl.read(1, 1.0) + 3.0).abs() < 1e-6);
        assert!((dl.read(0, 3.0) - 1.0).abs() < 1e-6);
        assert!((dl.read(1, 3.0) + 1.0).abs() < 1e-6);
    }

    /// Verify the buffer wraps correctly past its boundaries.
    #[test]
    fn test_wrapping() {
        let mut dl = DelayLine::new();
        dl.resize(1, 4);

        for i in 0..6 {
            push_frame(&mut dl, &[i as f32]);
        }

        // write_pos has been advanced to 6 and wraps to 2 on the next frame.
        dl.wrap_write_pos();
        assert_eq!(dl.write_pos(), 2);
        // One frame back from position 2 is position 1, holding 5.0.
        let result = dl.read(0, 1.0);
        assert!((result - 5.0).abs() < 1e-6, "Expected 5.0, got {result}");
    }

    #[test]
    fn test_resize_is_lazy_and_zeroes() {
        let mut dl = DelayLine::new();
        assert!(dl.resize(1, 8));
        push_frame(&mut dl, &[0.5]);

        // Same shape: contents survive.
        assert!(!dl.resize(1, 8));
        assert!((dl.read(0, 1.0) - 0.5).abs() < 1e-6);

        // New shape: everything is silence again.
        assert!(dl.resize(2, 8));
        assert_eq!(dl.channels(), 2);
        for delay in 0..8 {
            assert!(dl.read(0, delay as f32).abs() < 1e-6);
            assert!(dl.read(1, delay as f32).abs() < 1e-6);
        }
    }

    /// Shrinking the ring below the write position is fine: the next frame
    /// wraps before writing.
    #[test]
    fn test_shrink_wraps_write_pos() {
        let mut dl = DelayLine::new();
        dl.resize(1, 16);
        for i in 0..12 {
            push_frame(&mut dl, &[i as f32]);
        }

        dl.resize(1, 8);
        push_frame(&mut dl, &[1.0]);
        assert!((dl.read(0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clear() {
        let mut dl = DelayLine::new();
        dl.resize(1, 10);

        push_frame(&mut dl, &[0.5]);
        dl.clear();

        assert_eq!(dl.write_pos(), 0);
        let result = dl.read(0, 1.0);
        assert!(
            result.abs() < 1e-6,
            "Expected 0.0 after clear, got {result}"
        );
    }

    proptest! {
        #[test]
        fn buffer_size_is_power_of_two_with_headroom(delay in 0usize..2_000_000) {
            let size = buffer_size_for(delay);
            prop_assert!(size.is_power_of_two());
            prop_assert!(size >= delay + BUFFER_HEADROOM);
            // Smallest such power of two.
            prop_assert!(size / 2 < delay + BUFFER_HEADROOM);
        }

        #[test]
        fn buffer_size_is_monotonic(a in 0usize..2_000_000, b in 0usize..2_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(buffer_size_for(lo) <= buffer_size_for(hi));
        }

        #[test]
        fn floor_mod_stays_in_range(value in any::<i32>(), shift in 0u32..20) {
            let modulus = 1usize << shift;
            let result = floor_mod(value as i64, modulus);
            prop_assert!(result < modulus);
            prop_assert_eq!((result as i64 - value as i64).rem_euclid(modulus as i64), 0);
        }
    }
}
