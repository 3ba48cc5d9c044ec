//! # Rate Re-randomization Timer
//!
//! Voices keep their speed for a while and then all pick a new random one.
//! The timer runs on processed audio time rather than wall-clock time:
//! every block adds its own duration, so offline rendering and realtime
//! playback sound the same.

/// Accumulates block durations and fires once the update interval has been
/// exceeded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateScheduler {
    elapsed_ms: f32,
}

impl RateScheduler {
    pub fn new() -> Self {
        Self { elapsed_ms: 0.0 }
    }

    /// Add one block's duration. Returns `true` when the accumulated time is
    /// strictly greater than `update_ms`; the timer is then back at zero and
    /// the caller should redraw every voice rate.
    pub fn advance(&mut self, block_ms: f32, update_ms: f32) -> bool {
        self.elapsed_ms += block_ms;

        if self.elapsed_ms > update_ms {
            self.elapsed_ms = 0.0;
            true
        } else {
            false
        }
    }

    /// Time accumulated since the last redraw, in milliseconds.
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 100 ms interval with 10 ms blocks: ten blocks reach exactly 100 ms,
    /// which is not *more* than the interval. The eleventh block fires.
    #[test]
    fn test_fires_after_exceeding_interval() {
        let mut scheduler = RateScheduler::new();

        let fired: Vec<bool> = (0..11).map(|_| scheduler.advance(10.0, 100.0)).collect();

        assert!(fired[..10].iter().all(|&f| !f), "fired too early: {fired:?}");
        assert!(fired[10]);
        assert_eq!(fired.iter().filter(|&&f| f).count(), 1);
        assert_eq!(scheduler.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_restarts_from_zero_after_firing() {
        let mut scheduler = RateScheduler::new();

        let fired: Vec<usize> = (1..=33)
            .filter(|_| scheduler.advance(10.0, 100.0))
            .collect();

        assert_eq!(fired, vec![11, 22, 33]);
    }

    /// A zero interval fires on every block that has any duration.
    #[test]
    fn test_zero_interval_fires_every_block() {
        let mut scheduler = RateScheduler::new();
        for _ in 0..5 {
            assert!(scheduler.advance(1.0, 0.0));
        }
        assert!(!scheduler.advance(0.0, 0.0));
    }

    #[test]
    fn test_reset() {
        let mut scheduler = RateScheduler::new();
        scheduler.advance(50.0, 100.0);
        scheduler.reset();
        assert_eq!(scheduler.elapsed_ms(), 0.0);
    }
}
