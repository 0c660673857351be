//! Composite termination.
//!
//! Uses macro-generated tuple implementations for zero type erasure.

use super::Termination;
use crate::scope::SearchScope;
use crate::statistics::StopReason;

/// Combines terminations with OR logic: stops when any child stops.
///
/// The reported reason is the first child, in tuple order, that fires.
///
/// # Examples
///
/// ```
/// use runeforge_solver::termination::{OrTermination, ResultCountTermination, TimeTermination};
///
/// // Stop after 30 seconds OR 100 retained loadouts
/// let termination = OrTermination::new((
///     TimeTermination::seconds(30),
///     ResultCountTermination::new(100),
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for OrTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn is_terminated(&self, scope: &SearchScope) -> bool {
                $((self.0).$idx.is_terminated(scope))||+
            }

            fn stop_reason(&self) -> StopReason {
                (self.0).0.stop_reason()
            }

            fn triggered(&self, scope: &SearchScope) -> Option<StopReason> {
                $(
                    if let Some(reason) = (self.0).$idx.triggered(scope) {
                        return Some(reason);
                    }
                )+
                None
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
