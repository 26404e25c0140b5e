use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeriesError};

/// Half-open `[start, end)` interval in nanoseconds since the Unix epoch.
///
/// A series without a time range carries [`TimeRange::ZERO`].
///
/// Only [`TimeRange::new`] rejects `start > end`. The fields are public, and
/// series and the codec carry whatever range they are given, inverted or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    /// The zero range `(0, 0)`.
    pub const ZERO: TimeRange = TimeRange { start: 0, end: 0 };

    /// Create a time range, rejecting `start > end`.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(SeriesError::InvertedTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Length of the interval in nanoseconds.
    pub fn span(&self) -> u64 {
        self.end.abs_diff(self.start)
    }

    /// Returns true if `ts` falls inside `[start, end)`.
    pub fn contains(&self, ts: i64) -> bool {
        self.start <= ts && ts < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
