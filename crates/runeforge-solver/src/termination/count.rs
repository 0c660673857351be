//! Retained-result budget.

use super::Termination;
use crate::scope::SearchScope;
use crate::statistics::StopReason;

/// Terminates once `limit` loadouts have been retained.
#[derive(Debug, Clone)]
pub struct ResultCountTermination {
    limit: u64,
}

impl ResultCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for ResultCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.retained() >= self.limit
    }

    fn stop_reason(&self) -> StopReason {
        StopReason::ResultLimit
    }
}
