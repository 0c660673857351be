//! Candidate threshold filtering.
//!
//! Each slot resolves its tiered filter configuration into a single
//! [`FilterOp`] before the pool is built. One interpreter then decides
//! every rune, whatever operator the tiers selected.

mod resolve;

pub use resolve::{effective_filter, resolve_operator, resolve_prediction, slot_filter};

use runeforge_core::{Attribute, RuneAmounts, RuneFilter};

/// One attribute test: weighted rune amount against the filter's `test`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeTest {
    pub attribute: Attribute,
    pub filter: RuneFilter,
}

impl AttributeTest {
    pub fn new(attribute: Attribute, filter: RuneFilter) -> Self {
        Self { attribute, filter }
    }

    /// Weighted amount of the attribute on a rune.
    #[inline]
    pub fn value(&self, amounts: &RuneAmounts) -> f64 {
        amounts.filter_value(self.attribute, &self.filter)
    }

    #[inline]
    pub fn passes(&self, amounts: &RuneAmounts) -> bool {
        self.value(amounts) >= self.filter.test
    }
}

/// A resolved per-slot filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterOp {
    /// No filter data: every rune is kept.
    #[default]
    AcceptAll,
    /// Kept if at least one test passes.
    Any(Vec<AttributeTest>),
    /// Kept if every test passes.
    All(Vec<AttributeTest>),
    /// Kept if the summed weighted amounts reach `target`.
    SumAtLeast {
        target: f64,
        terms: Vec<AttributeTest>,
    },
}

impl FilterOp {
    /// Decides a single rune.
    ///
    /// ```
    /// use runeforge_core::{Attribute, RuneAmounts, RuneFilter};
    /// use runeforge_solver::filter::{AttributeTest, FilterOp};
    ///
    /// let mut amounts = RuneAmounts::default();
    /// amounts.flat.set(Attribute::Spd, 12.0);
    ///
    /// let op = FilterOp::Any(vec![AttributeTest::new(
    ///     Attribute::Spd,
    ///     RuneFilter::new(0.0, 0.0, 10.0),
    /// )]);
    /// assert!(op.accepts(&amounts));
    /// assert!(FilterOp::AcceptAll.accepts(&RuneAmounts::default()));
    /// ```
    pub fn accepts(&self, amounts: &RuneAmounts) -> bool {
        match self {
            FilterOp::AcceptAll => true,
            FilterOp::Any(tests) => tests.iter().any(|t| t.passes(amounts)),
            FilterOp::All(tests) => tests.iter().all(|t| t.passes(amounts)),
            FilterOp::SumAtLeast { target, terms } => {
                terms.iter().map(|t| t.value(amounts)).sum::<f64>() >= *target
            }
        }
    }

    pub fn is_accept_all(&self) -> bool {
        matches!(self, FilterOp::AcceptAll)
    }
}

#[cfg(test)]
mod tests;
