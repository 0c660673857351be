//! Threshold filter data types.
//!
//! Filters are organized in three tiers, from least to most specific:
//! global, parity group (odd or even slots) and exact slot.

use std::fmt;
use std::str::FromStr;

use crate::error::RuneForgeError;

/// Scope of a threshold filter, scoring operator or prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Applies to every slot (`g`).
    Global,
    /// Slots 1, 3 and 5 (`o`).
    Odd,
    /// Slots 2, 4 and 6 (`e`).
    Even,
    /// A single slot, 1..=6.
    Slot(u8),
}

impl Tier {
    /// Parity tier for a 1-based slot.
    pub const fn parity(slot: u8) -> Tier {
        if slot % 2 == 1 {
            Tier::Odd
        } else {
            Tier::Even
        }
    }

    /// The tiers that cover `slot`, least specific first.
    pub const fn chain(slot: u8) -> [Tier; 3] {
        [Tier::Global, Tier::parity(slot), Tier::Slot(slot)]
    }

    /// True if this tier covers the 1-based `slot`.
    pub const fn covers(self, slot: u8) -> bool {
        match self {
            Tier::Global => true,
            Tier::Odd => slot % 2 == 1,
            Tier::Even => slot % 2 == 0,
            Tier::Slot(s) => s == slot,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Global => f.write_str("g"),
            Tier::Odd => f.write_str("o"),
            Tier::Even => f.write_str("e"),
            Tier::Slot(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for Tier {
    type Err = RuneForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(Tier::Global),
            "o" => Ok(Tier::Odd),
            "e" => Ok(Tier::Even),
            _ => match s.parse::<u8>() {
                Ok(slot @ 1..=6) => Ok(Tier::Slot(slot)),
                _ => Err(RuneForgeError::UnknownTier(s.to_string())),
            },
        }
    }
}

/// Thresholds for one attribute within one tier.
///
/// `flat` and `percent` weigh the rune's flat and percent amounts of the
/// attribute; `test` is the value the weighted amount must reach.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuneFilter {
    pub flat: f64,
    pub percent: f64,
    pub test: f64,
}

impl RuneFilter {
    pub const fn new(flat: f64, percent: f64, test: f64) -> Self {
        Self {
            flat,
            percent,
            test,
        }
    }

    pub fn is_non_zero(&self) -> bool {
        self.flat != 0.0 || self.percent != 0.0 || self.test != 0.0
    }

    /// Component-wise minimum where zero means "unset".
    ///
    /// ```
    /// use runeforge_core::RuneFilter;
    ///
    /// let a = RuneFilter::new(10.0, 0.0, 5.0);
    /// let b = RuneFilter::new(20.0, 3.0, 2.0);
    /// assert_eq!(a.min(&b), RuneFilter::new(10.0, 3.0, 2.0));
    /// ```
    pub fn min(&self, other: &RuneFilter) -> RuneFilter {
        fn min_set(a: f64, b: f64) -> f64 {
            match (a == 0.0, b == 0.0) {
                (true, _) => b,
                (_, true) => a,
                _ => a.min(b),
            }
        }
        RuneFilter {
            flat: min_set(self.flat, other.flat),
            percent: min_set(self.percent, other.percent),
            test: min_set(self.test, other.test),
        }
    }
}

/// How the per-attribute tests of a tier combine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterOperator {
    /// Any attribute meeting its test keeps the rune.
    #[default]
    Or,
    /// Every attribute with a test must meet it.
    And,
    /// The summed weighted amounts must reach the target.
    Sum(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse() {
        assert_eq!("g".parse::<Tier>().unwrap(), Tier::Global);
        assert_eq!("e".parse::<Tier>().unwrap(), Tier::Even);
        assert_eq!("4".parse::<Tier>().unwrap(), Tier::Slot(4));
        assert!("7".parse::<Tier>().is_err());
        assert!("x".parse::<Tier>().is_err());
    }

    #[test]
    fn test_tier_chain() {
        assert_eq!(Tier::chain(1), [Tier::Global, Tier::Odd, Tier::Slot(1)]);
        assert_eq!(Tier::chain(6), [Tier::Global, Tier::Even, Tier::Slot(6)]);
    }

    #[test]
    fn test_tier_display_round_trip() {
        for tier in [Tier::Global, Tier::Odd, Tier::Even, Tier::Slot(3)] {
            assert_eq!(tier.to_string().parse::<Tier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_filter_min_keeps_set_values() {
        let a = RuneFilter::new(0.0, 0.0, 0.0);
        let b = RuneFilter::new(4.0, 2.0, 1.0);
        assert_eq!(a.min(&b), b);
        assert_eq!(b.min(&a), b);
        assert!(!a.is_non_zero());
    }
}
