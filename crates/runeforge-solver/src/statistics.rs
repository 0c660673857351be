//! Search statistics.
//!
//! [`SearchStatistics`] is the snapshot a finished search reports through
//! its [`ResultSet`](crate::ResultSet).

use std::fmt;
use std::time::Duration;

/// Why a search stopped enumerating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StopReason {
    /// Every combination was evaluated.
    #[default]
    Exhausted,
    /// The wall-clock budget ran out.
    TimeLimit,
    /// Enough loadouts were retained.
    ResultLimit,
    /// The caller cancelled the search.
    Cancelled,
}

impl StopReason {
    pub(crate) const fn to_u8(self) -> u8 {
        match self {
            StopReason::Exhausted => 0,
            StopReason::TimeLimit => 1,
            StopReason::ResultLimit => 2,
            StopReason::Cancelled => 3,
        }
    }

    pub(crate) const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StopReason::Exhausted),
            1 => Some(StopReason::TimeLimit),
            2 => Some(StopReason::ResultLimit),
            3 => Some(StopReason::Cancelled),
            _ => None,
        }
    }

    /// True unless the whole space was enumerated.
    pub fn is_early(&self) -> bool {
        *self != StopReason::Exhausted
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Exhausted => "exhausted",
            StopReason::TimeLimit => "time limit",
            StopReason::ResultLimit => "result limit",
            StopReason::Cancelled => "cancelled",
        })
    }
}

/// Counters and timing for one search run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchStatistics {
    /// Size of the Cartesian product.
    pub total: u64,
    /// Combinations evaluated, passing or not.
    pub evaluated: u64,
    /// Combinations that passed every constraint.
    pub passed: u64,
    /// Passing combinations the retention policy kept.
    pub retained: u64,
    pub rejected_below_minimum: u64,
    pub rejected_broken_set: u64,
    pub rejected_missing_set: u64,
    /// Combinations the stat engine could not evaluate.
    pub engine_failures: u64,
    pub duration: Duration,
    pub stop_reason: StopReason,
}

impl SearchStatistics {
    /// Combinations discarded for any reason.
    pub fn discarded(&self) -> u64 {
        self.rejected_below_minimum
            + self.rejected_broken_set
            + self.rejected_missing_set
            + self.engine_failures
    }

    /// Fraction of the space evaluated, 0..=1.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.evaluated as f64 / self.total as f64).min(1.0)
        }
    }

    /// Evaluations per second.
    pub fn speed(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.evaluated as f64 / secs
        } else {
            0.0
        }
    }
}
