//! Display status derived from an election window and the clock.

use serde::{Deserialize, Serialize};
use std::fmt;
use votechain_types::Timestamp;

/// Where an election sits relative to `now`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionStatus {
    /// `now < start`.
    Pending,
    /// `start <= now < end`.
    Active,
    /// `now >= end`.
    Ended,
}

impl ElectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ElectionStatus::Pending => "Upcoming",
            ElectionStatus::Active => "Ongoing",
            ElectionStatus::Ended => "Ended",
        }
    }

    pub fn accepts_votes(&self) -> bool {
        *self == ElectionStatus::Active
    }
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derive the status of the window `[start, end)` at `now`.
///
/// Depends on wall-clock time, so callers evaluate it per query with a fresh
/// clock read rather than storing the result.
pub fn resolve(start: Timestamp, end: Timestamp, now: Timestamp) -> ElectionStatus {
    if now >= end {
        ElectionStatus::Ended
    } else if now >= start {
        ElectionStatus::Active
    } else {
        ElectionStatus::Pending
    }
}
