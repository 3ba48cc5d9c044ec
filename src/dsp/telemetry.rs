//! # Voice Position Telemetry
//!
//! The chorus shows its voices as dots: one dot per voice, its horizontal
//! position being the voice's place in the delay range. Once per block the
//! audio thread packs the positions into a fixed-size [`DotSnapshot`] and
//! pushes it through a bounded channel.
//!
//! The audio side never waits: if the channel is full (nobody is drawing,
//! or the editor is slow) the oldest queued snapshot is thrown away to
//! make room, so whoever reads next always sees recent positions. The
//! receiving side drains the channel and only keeps the newest snapshot.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::voices::Voice;

/// Dots recorded per side at most.
pub const MAX_DOTS: usize = 200;

/// Snapshots kept in the channel; older ones are evicted past this.
const CHANNEL_CAPACITY: usize = 4;

/// Voice positions of one block, scaled to bytes.
///
/// `Copy` and fixed-size, so sending one through the channel never
/// allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotSnapshot {
    /// Valid entries in `left`.
    pub left_count: u8,
    /// Valid entries in `right`.
    pub right_count: u8,
    /// Channel 0 voice positions, `0..=255` over the delay range.
    pub left: [u8; MAX_DOTS],
    /// Channel 1 voice positions.
    pub right: [u8; MAX_DOTS],
}

impl Default for DotSnapshot {
    fn default() -> Self {
        Self {
            left_count: 0,
            right_count: 0,
            left: [0; MAX_DOTS],
            right: [0; MAX_DOTS],
        }
    }
}

impl DotSnapshot {
    /// Record the positions of `voices` on side `channel` (0 = left,
    /// 1 = right; anything else is ignored). Voices past [`MAX_DOTS`] are
    /// dropped.
    pub fn record(&mut self, channel: usize, voices: &[Voice], delay_in_samples: usize) {
        let (dots, count) = match channel {
            0 => (&mut self.left, &mut self.left_count),
            1 => (&mut self.right, &mut self.right_count),
            _ => return,
        };

        let range = delay_in_samples as f32;
        let written = voices.len().min(MAX_DOTS);
        for (dot, voice) in dots.iter_mut().zip(&voices[..written]) {
            *dot = if delay_in_samples == 0 {
                0
            } else {
                (voice.delay_offset * 255.0 / range) as u8
            };
        }
        *count = written as u8;
    }

    /// The valid left positions.
    pub fn left_dots(&self) -> &[u8] {
        &self.left[..self.left_count as usize]
    }

    /// The valid right positions.
    pub fn right_dots(&self) -> &[u8] {
        &self.right[..self.right_count as usize]
    }
}

/// Audio-thread end of the telemetry channel.
#[derive(Clone)]
pub struct DotPublisher {
    tx: Sender<DotSnapshot>,
    /// Lets the publisher evict the oldest snapshot when the channel is full.
    evict: Receiver<DotSnapshot>,
}

impl DotPublisher {
    /// Push a snapshot without blocking, evicting the oldest queued one if
    /// the channel is full. Returns `false` only if the snapshot could not
    /// be queued (another sender took the freed slot in between).
    pub fn publish(&self, snapshot: DotSnapshot) -> bool {
        match self.tx.try_send(snapshot) {
            Ok(()) => true,
            Err(TrySendError::Full(snapshot)) => {
                let _ = self.evict.try_recv();
                self.tx.try_send(snapshot).is_ok()
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Editor end of the telemetry channel.
#[derive(Clone)]
pub struct DotReceiver {
    rx: Receiver<DotSnapshot>,
}

impl DotReceiver {
    /// The most recent snapshot, discarding any older queued ones.
    pub fn latest(&self) -> Option<DotSnapshot> {
        let mut latest = None;
        while let Ok(snapshot) = self.rx.try_recv() {
            latest = Some(snapshot);
        }
        latest
    }
}

/// Create a connected publisher/receiver pair.
pub fn dot_channel() -> (DotPublisher, DotReceiver) {
    let (tx, rx) = bounded(CHANNEL_CAPACITY);
    let publisher = DotPublisher {
        tx,
        evict: rx.clone(),
    };
    (publisher, DotReceiver { rx })
}
