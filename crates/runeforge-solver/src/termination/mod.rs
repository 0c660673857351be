//! Termination conditions for a search.
//!
//! Terminations are checked by workers at flush points. When one fires the
//! search records its [`StopReason`] and cancels the run's
//! [`CancellationToken`], which every worker polls after each combination.

mod composite;
mod count;
mod token;
mod time;

use std::fmt::Debug;

use crate::scope::SearchScope;
use crate::statistics::StopReason;

pub use composite::OrTermination;
pub use count::ResultCountTermination;
pub use time::TimeTermination;
pub use token::CancellationToken;

/// Trait for determining when to stop searching.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if the search should stop.
    fn is_terminated(&self, scope: &SearchScope) -> bool;

    /// Reason recorded when this termination fires.
    fn stop_reason(&self) -> StopReason;

    /// The reason to stop, if the search should stop now.
    fn triggered(&self, scope: &SearchScope) -> Option<StopReason> {
        self.is_terminated(scope).then(|| self.stop_reason())
    }
}

/// An absent termination never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }

    fn stop_reason(&self) -> StopReason {
        self.as_ref()
            .map_or(StopReason::Exhausted, Termination::stop_reason)
    }
}

impl<T: Termination + ?Sized> Termination for Box<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        (**self).is_terminated(scope)
    }

    fn stop_reason(&self) -> StopReason {
        (**self).stop_reason()
    }

    fn triggered(&self, scope: &SearchScope) -> Option<StopReason> {
        (**self).triggered(scope)
    }
}
