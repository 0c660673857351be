//! Attribute identifiers and fixed-size attribute vectors.
//!
//! The attribute set is closed: eight primary combat stats plus five
//! derived metrics computed by the stat engine. Every map keyed by an
//! attribute (weights, minimums, maximums, filters) is validated against
//! this set when it is parsed, never at lookup time.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::RuneForgeError;

/// A resolved character attribute.
///
/// # Example
///
/// ```
/// use runeforge_core::Attribute;
///
/// let spd: Attribute = "SPD".parse().unwrap();
/// assert_eq!(spd, Attribute::Spd);
/// assert!(!spd.is_derived());
/// assert!("Speed".parse::<Attribute>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Hp,
    Atk,
    Def,
    Spd,
    CritRate,
    CritDamage,
    Resistance,
    Accuracy,
    /// Effective health.
    EffectiveHp,
    /// Effective health under defense break.
    EffectiveHpDefBreak,
    /// Damage per second.
    Dps,
    /// Average damage per hit.
    AverageDamage,
    /// Maximum damage per hit.
    MaxDamage,
}

impl Attribute {
    /// Number of attributes in the closed set.
    pub const COUNT: usize = 13;

    /// All attributes, in vector order.
    pub const ALL: [Attribute; Self::COUNT] = [
        Attribute::Hp,
        Attribute::Atk,
        Attribute::Def,
        Attribute::Spd,
        Attribute::CritRate,
        Attribute::CritDamage,
        Attribute::Resistance,
        Attribute::Accuracy,
        Attribute::EffectiveHp,
        Attribute::EffectiveHpDefBreak,
        Attribute::Dps,
        Attribute::AverageDamage,
        Attribute::MaxDamage,
    ];

    /// The eight stats a rune can carry directly.
    pub const PRIMARY: [Attribute; 8] = [
        Attribute::Hp,
        Attribute::Atk,
        Attribute::Def,
        Attribute::Spd,
        Attribute::CritRate,
        Attribute::CritDamage,
        Attribute::Resistance,
        Attribute::Accuracy,
    ];

    /// Metrics only the stat engine can derive.
    pub const DERIVED: [Attribute; 5] = [
        Attribute::EffectiveHp,
        Attribute::EffectiveHpDefBreak,
        Attribute::Dps,
        Attribute::AverageDamage,
        Attribute::MaxDamage,
    ];

    /// Position of this attribute inside an [`AttributeVector`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical short name, as used in configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Hp => "HP",
            Attribute::Atk => "ATK",
            Attribute::Def => "DEF",
            Attribute::Spd => "SPD",
            Attribute::CritRate => "CR",
            Attribute::CritDamage => "CD",
            Attribute::Resistance => "RES",
            Attribute::Accuracy => "ACC",
            Attribute::EffectiveHp => "EHP",
            Attribute::EffectiveHpDefBreak => "EHPDB",
            Attribute::Dps => "DPS",
            Attribute::AverageDamage => "AvD",
            Attribute::MaxDamage => "MxD",
        }
    }

    pub const fn is_derived(self) -> bool {
        self.index() >= Attribute::EffectiveHp.index()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = RuneForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| RuneForgeError::UnknownAttribute(s.to_string()))
    }
}

/// Dense vector of attribute values indexed by [`Attribute`].
///
/// Used both for stat-engine output and for sparse configuration maps
/// (weights, minimums, maximums) where zero means "not configured".
///
/// # Example
///
/// ```
/// use runeforge_core::{Attribute, AttributeVector};
///
/// let stats = AttributeVector::new()
///     .with(Attribute::Spd, 120.0)
///     .with(Attribute::Hp, 15_000.0);
/// let minimum = AttributeVector::new().with(Attribute::Spd, 100.0);
///
/// assert_eq!(stats[Attribute::Spd], 120.0);
/// assert!(stats.meets_minimum(&minimum));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttributeVector([f64; Attribute::COUNT]);

impl AttributeVector {
    /// Creates an all-zero vector.
    pub const fn new() -> Self {
        Self([0.0; Attribute::COUNT])
    }

    /// Returns the vector with `attribute` set to `value`.
    pub fn with(mut self, attribute: Attribute, value: f64) -> Self {
        self[attribute] = value;
        self
    }

    pub fn get(&self, attribute: Attribute) -> f64 {
        self.0[attribute.index()]
    }

    pub fn set(&mut self, attribute: Attribute, value: f64) {
        self.0[attribute.index()] = value;
    }

    /// Adds `value` onto the current value of `attribute`.
    pub fn add(&mut self, attribute: Attribute, value: f64) {
        self.0[attribute.index()] += value;
    }

    /// True if every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    /// Iterates over `(attribute, value)` pairs in vector order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    /// Iterates over the non-zero entries only.
    pub fn non_zero(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        self.iter().filter(|(_, v)| *v != 0.0)
    }

    /// Not-less-than comparison against a sparse minimum vector.
    ///
    /// Attributes whose minimum is zero are unconstrained.
    pub fn meets_minimum(&self, minimum: &AttributeVector) -> bool {
        minimum.non_zero().all(|(a, min)| self.get(a) >= min)
    }
}

impl Index<Attribute> for AttributeVector {
    type Output = f64;

    fn index(&self, attribute: Attribute) -> &f64 {
        &self.0[attribute.index()]
    }
}

impl IndexMut<Attribute> for AttributeVector {
    fn index_mut(&mut self, attribute: Attribute) -> &mut f64 {
        &mut self.0[attribute.index()]
    }
}

impl FromIterator<(Attribute, f64)> for AttributeVector {
    fn from_iter<I: IntoIterator<Item = (Attribute, f64)>>(iter: I) -> Self {
        let mut v = AttributeVector::new();
        for (a, value) in iter {
            v[a] = value;
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for a in Attribute::ALL {
            assert_eq!(a.name().parse::<Attribute>().unwrap(), a);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "WIS".parse::<Attribute>().unwrap_err();
        assert_eq!(err, RuneForgeError::UnknownAttribute("WIS".into()));
    }

    #[test]
    fn test_derived_split() {
        assert!(Attribute::PRIMARY.iter().all(|a| !a.is_derived()));
        assert!(Attribute::DERIVED.iter().all(|a| a.is_derived()));
    }

    #[test]
    fn test_meets_minimum_ignores_zero_entries() {
        let stats = AttributeVector::new().with(Attribute::Spd, 99.0);
        let min = AttributeVector::new().with(Attribute::Hp, 0.0);
        assert!(stats.meets_minimum(&min));

        let min = AttributeVector::new().with(Attribute::Spd, 100.0);
        assert!(!stats.meets_minimum(&min));
    }

    #[test]
    fn test_meets_minimum_covers_derived() {
        let stats = AttributeVector::new().with(Attribute::EffectiveHp, 40_000.0);
        let min = AttributeVector::new().with(Attribute::EffectiveHp, 50_000.0);
        assert!(!stats.meets_minimum(&min));
    }
}
