//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, level-triggered stop signal.
///
/// Clones observe the same flag. Cancelling is idempotent; a search polls
/// the token after every combination and before every outer value.
///
/// # Example
///
/// ```
/// use runeforge_solver::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// handle.cancel();
/// assert!(token.is_cancelled());
///
/// token.reset();
/// assert!(!handle.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop. Does not wait for workers to notice.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Re-arms the token for a new run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}
