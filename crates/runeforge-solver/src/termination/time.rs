//! Time-based termination.

use std::time::Duration;

use super::Termination;
use crate::scope::SearchScope;
use crate::statistics::StopReason;

/// Terminates after a wall-clock limit.
///
/// The limit is soft: it is noticed at the next flush point.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use runeforge_solver::termination::TimeTermination;
///
/// let term = TimeTermination::new(Duration::from_secs(30));
/// let term = TimeTermination::seconds(30);
/// let term = TimeTermination::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.elapsed() >= self.limit
    }

    fn stop_reason(&self) -> StopReason {
        StopReason::TimeLimit
    }
}
