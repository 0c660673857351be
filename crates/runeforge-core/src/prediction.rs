//! Hypothetical-upgrade overlay.

/// Simulated upgrade applied to a rune while it is valued.
///
/// A prediction never mutates the rune it applies to; it travels next to
/// the rune into [`StatEngine`](crate::StatEngine) calls instead.
///
/// # Example
///
/// ```
/// use runeforge_core::Prediction;
///
/// let global = Prediction::new(12, false);
/// let slot = Prediction::new(9, true);
/// let merged = global.merge(slot);
///
/// assert_eq!(merged.level, 12);
/// assert!(merged.predict_subs);
/// assert!(Prediction::NEUTRAL.is_neutral());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Prediction {
    /// Level the rune is valued at. Zero keeps the rune's own level.
    pub level: u8,
    /// Whether sub-stat rolls up to `level` are simulated.
    pub predict_subs: bool,
}

impl Prediction {
    pub const NEUTRAL: Prediction = Prediction {
        level: 0,
        predict_subs: false,
    };

    pub const fn new(level: u8, predict_subs: bool) -> Self {
        Self {
            level,
            predict_subs,
        }
    }

    /// Highest requested level wins; sub-stat prediction is OR-combined.
    pub fn merge(self, other: Prediction) -> Prediction {
        Prediction {
            level: self.level.max(other.level),
            predict_subs: self.predict_subs || other.predict_subs,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Effective level for a rune currently at `current`.
    pub fn level_for(&self, current: u8) -> u8 {
        self.level.max(current)
    }
}
