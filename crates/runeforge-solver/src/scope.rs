//! Shared state of one search run.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

use crate::scoring::RejectReason;
use crate::statistics::{SearchStatistics, StopReason};
use crate::termination::CancellationToken;

const NOT_STOPPED: u8 = u8::MAX;

/// Counters a worker accumulates privately between flushes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub evaluated: u64,
    pub passed: u64,
    pub retained: u64,
    pub rejected: [u64; RejectReason::COUNT],
    pub engine_failures: u64,
}

impl Tally {
    pub fn reject(&mut self, reason: RejectReason) {
        self.rejected[reason.index()] += 1;
    }

    pub fn is_empty(&self) -> bool {
        *self == Tally::default()
    }
}

/// Progress counters, run flag and stop bookkeeping shared by all workers.
///
/// Workers never touch the counters per combination; they flush a
/// [`Tally`] after each pass over the two innermost slots.
#[derive(Debug)]
pub struct SearchScope {
    total: u64,
    start: Instant,
    token: CancellationToken,
    evaluated: AtomicU64,
    passed: AtomicU64,
    retained: AtomicU64,
    rejected: [AtomicU64; RejectReason::COUNT],
    engine_failures: AtomicU64,
    stopped: AtomicBool,
    stop_reason: AtomicU8,
    engine_error_reported: AtomicBool,
}

impl SearchScope {
    /// Starts the clock for a run over `total` combinations.
    pub fn new(total: u64, token: CancellationToken) -> Self {
        Self {
            total,
            start: Instant::now(),
            token,
            evaluated: AtomicU64::new(0),
            passed: AtomicU64::new(0),
            retained: AtomicU64::new(0),
            rejected: Default::default(),
            engine_failures: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
            stop_reason: AtomicU8::new(NOT_STOPPED),
            engine_error_reported: AtomicBool::new(false),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The run flag: false once the token is cancelled or a termination
    /// fired.
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire) && !self.token.is_cancelled()
    }

    pub fn evaluated(&self) -> u64 {
        self.evaluated.load(Ordering::Relaxed)
    }

    pub fn passed(&self) -> u64 {
        self.passed.load(Ordering::Relaxed)
    }

    pub fn retained(&self) -> u64 {
        self.retained.load(Ordering::Relaxed)
    }

    /// Evaluated fraction of the space, 0..=1.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.evaluated() as f64 / self.total as f64).min(1.0)
        }
    }

    pub(crate) fn flush(&self, tally: &mut Tally) {
        if tally.is_empty() {
            return;
        }
        self.evaluated.fetch_add(tally.evaluated, Ordering::Relaxed);
        self.passed.fetch_add(tally.passed, Ordering::Relaxed);
        self.retained.fetch_add(tally.retained, Ordering::Relaxed);
        for (counter, n) in self.rejected.iter().zip(tally.rejected) {
            if n > 0 {
                counter.fetch_add(n, Ordering::Relaxed);
            }
        }
        if tally.engine_failures > 0 {
            self.engine_failures
                .fetch_add(tally.engine_failures, Ordering::Relaxed);
        }
        *tally = Tally::default();
    }

    /// Stops the run. The first recorded reason wins.
    ///
    /// Only this scope's flag is set; the caller's token is left as is so
    /// it can drive later runs.
    pub fn stop(&self, reason: StopReason) {
        let _ = self.stop_reason.compare_exchange(
            NOT_STOPPED,
            reason.to_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        self.stopped.store(true, Ordering::Release);
    }

    /// Why the run stopped. A cancelled token without a recorded reason
    /// means the caller cancelled.
    pub fn stop_reason(&self) -> StopReason {
        match StopReason::from_u8(self.stop_reason.load(Ordering::Acquire)) {
            Some(reason) => reason,
            None if self.token.is_cancelled() => StopReason::Cancelled,
            None => StopReason::Exhausted,
        }
    }

    /// True exactly once per run, for the first engine failure.
    pub(crate) fn first_engine_failure(&self) -> bool {
        !self.engine_error_reported.swap(true, Ordering::AcqRel)
    }

    pub fn statistics(&self) -> SearchStatistics {
        let rejected = |reason: RejectReason| self.rejected[reason.index()].load(Ordering::Relaxed);
        SearchStatistics {
            total: self.total,
            evaluated: self.evaluated(),
            passed: self.passed(),
            retained: self.retained(),
            rejected_below_minimum: rejected(RejectReason::BelowMinimum),
            rejected_broken_set: rejected(RejectReason::BrokenSet),
            rejected_missing_set: rejected(RejectReason::MissingRequiredSet),
            engine_failures: self.engine_failures.load(Ordering::Relaxed),
            duration: self.elapsed(),
            stop_reason: self.stop_reason(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_resets_tally() {
        let scope = SearchScope::new(100, CancellationToken::new());
        let mut tally = Tally {
            evaluated: 10,
            passed: 4,
            retained: 2,
            ..Default::default()
        };
        tally.reject(RejectReason::BrokenSet);
        tally.engine_failures = 1;

        scope.flush(&mut tally);
        assert!(tally.is_empty());

        let stats = scope.statistics();
        assert_eq!(stats.evaluated, 10);
        assert_eq!(stats.passed, 4);
        assert_eq!(stats.retained, 2);
        assert_eq!(stats.rejected_broken_set, 1);
        assert_eq!(stats.engine_failures, 1);
        assert_eq!(scope.progress(), 0.1);
    }

    #[test]
    fn test_first_stop_reason_wins() {
        let token = CancellationToken::new();
        let scope = SearchScope::new(1, token.clone());
        assert!(scope.is_running());
        assert_eq!(scope.stop_reason(), StopReason::Exhausted);

        scope.stop(StopReason::TimeLimit);
        scope.stop(StopReason::ResultLimit);
        assert!(!scope.is_running());
        assert!(!token.is_cancelled());
        assert_eq!(scope.stop_reason(), StopReason::TimeLimit);
    }

    #[test]
    fn test_external_cancel_reported() {
        let token = CancellationToken::new();
        let scope = SearchScope::new(1, token.clone());
        token.cancel();
        assert_eq!(scope.stop_reason(), StopReason::Cancelled);
    }

    #[test]
    fn test_engine_failure_reported_once() {
        let scope = SearchScope::new(1, CancellationToken::new());
        assert!(scope.first_engine_failure());
        assert!(!scope.first_engine_failure());
    }
}
