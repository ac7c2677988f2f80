//! Duration helpers for centisecond-precision timing.
//!
//! Lyric tags carry at most two meaningful fraction digits, so every timing
//! comparison in the core happens on a whole-centisecond grid. Media clocks
//! report positions with float drift; snapping both sides to the grid keeps
//! lookups stable at line boundaries.

use std::time::Duration;

/// Extension trait for centisecond-grid Duration conversions.
pub trait DurationExt {
    /// Total whole centiseconds, rounding to nearest.
    ///
    /// Saturates at `u64::MAX`, which would represent ~5.8 billion years.
    fn as_centis(&self) -> u64;

    /// Snap to the nearest whole centisecond.
    fn round_to_centis(&self) -> Duration;
}

impl DurationExt for Duration {
    fn as_centis(&self) -> u64 {
        let centis = (self.as_micros() + 5_000) / 10_000;
        u64::try_from(centis).unwrap_or(u64::MAX)
    }

    fn round_to_centis(&self) -> Duration {
        Duration::from_millis(self.as_centis().saturating_mul(10))
    }
}

/// Build a Duration from whole centiseconds.
#[must_use]
pub fn duration_from_centis(centis: u64) -> Duration {
    Duration::from_millis(centis.saturating_mul(10))
}
