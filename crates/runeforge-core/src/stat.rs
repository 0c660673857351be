//! Rune stat kinds.

use std::fmt;
use std::str::FromStr;

use crate::attribute::Attribute;
use crate::error::RuneForgeError;

/// The kind of a rune main stat or sub-stat.
///
/// HP, ATK and DEF come in flat and percent forms; the remaining stats
/// have a single form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKind {
    HpFlat,
    HpPercent,
    AtkFlat,
    AtkPercent,
    DefFlat,
    DefPercent,
    Spd,
    CritRate,
    CritDamage,
    Resistance,
    Accuracy,
}

impl StatKind {
    pub const ALL: [StatKind; 11] = [
        StatKind::HpFlat,
        StatKind::HpPercent,
        StatKind::AtkFlat,
        StatKind::AtkPercent,
        StatKind::DefFlat,
        StatKind::DefPercent,
        StatKind::Spd,
        StatKind::CritRate,
        StatKind::CritDamage,
        StatKind::Resistance,
        StatKind::Accuracy,
    ];

    /// The attribute this stat contributes to.
    pub const fn attribute(self) -> Attribute {
        match self {
            StatKind::HpFlat | StatKind::HpPercent => Attribute::Hp,
            StatKind::AtkFlat | StatKind::AtkPercent => Attribute::Atk,
            StatKind::DefFlat | StatKind::DefPercent => Attribute::Def,
            StatKind::Spd => Attribute::Spd,
            StatKind::CritRate => Attribute::CritRate,
            StatKind::CritDamage => Attribute::CritDamage,
            StatKind::Resistance => Attribute::Resistance,
            StatKind::Accuracy => Attribute::Accuracy,
        }
    }

    /// Percent-valued stats count towards the percent part of a filter.
    pub const fn is_percent(self) -> bool {
        !matches!(
            self,
            StatKind::HpFlat | StatKind::AtkFlat | StatKind::DefFlat | StatKind::Spd
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            StatKind::HpFlat => "HPflat",
            StatKind::HpPercent => "HPperc",
            StatKind::AtkFlat => "ATKflat",
            StatKind::AtkPercent => "ATKperc",
            StatKind::DefFlat => "DEFflat",
            StatKind::DefPercent => "DEFperc",
            StatKind::Spd => "SPD",
            StatKind::CritRate => "CR",
            StatKind::CritDamage => "CD",
            StatKind::Resistance => "RES",
            StatKind::Accuracy => "ACC",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = RuneForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| RuneForgeError::UnknownStatKind(s.to_string()))
    }
}

/// A stat kind paired with its value on a rune.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatValue {
    pub kind: StatKind,
    pub value: f64,
}

impl StatValue {
    pub const fn new(kind: StatKind, value: f64) -> Self {
        Self { kind, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_forms() {
        assert!(!StatKind::HpFlat.is_percent());
        assert!(StatKind::HpPercent.is_percent());
        assert!(!StatKind::Spd.is_percent());
        assert!(StatKind::CritDamage.is_percent());
    }

    #[test]
    fn test_parse() {
        assert_eq!("ATKperc".parse::<StatKind>().unwrap(), StatKind::AtkPercent);
        assert!("ATK%".parse::<StatKind>().is_err());
    }
}
