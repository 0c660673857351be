//! Runes and rune sets.

use std::fmt;
use std::str::FromStr;

use crate::attribute::{Attribute, AttributeVector};
use crate::error::RuneForgeError;
use crate::filter::RuneFilter;
use crate::stat::{StatKind, StatValue};

/// A rune set. Equipping enough pieces of one set grants its bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuneSet {
    Energy,
    Guard,
    Swift,
    Blade,
    Rage,
    Focus,
    Endure,
    Fatal,
    Despair,
    Vampire,
    Violent,
    Nemesis,
    Will,
    Shield,
    Revenge,
    Destroy,
    Fight,
    Determination,
    Enhance,
    Accuracy,
    Tolerance,
}

impl RuneSet {
    pub const ALL: [RuneSet; 21] = [
        RuneSet::Energy,
        RuneSet::Guard,
        RuneSet::Swift,
        RuneSet::Blade,
        RuneSet::Rage,
        RuneSet::Focus,
        RuneSet::Endure,
        RuneSet::Fatal,
        RuneSet::Despair,
        RuneSet::Vampire,
        RuneSet::Violent,
        RuneSet::Nemesis,
        RuneSet::Will,
        RuneSet::Shield,
        RuneSet::Revenge,
        RuneSet::Destroy,
        RuneSet::Fight,
        RuneSet::Determination,
        RuneSet::Enhance,
        RuneSet::Accuracy,
        RuneSet::Tolerance,
    ];

    /// Number of equipped pieces needed to complete the set.
    pub const fn required_pieces(self) -> usize {
        match self {
            RuneSet::Swift
            | RuneSet::Rage
            | RuneSet::Fatal
            | RuneSet::Despair
            | RuneSet::Vampire
            | RuneSet::Violent => 4,
            _ => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            RuneSet::Energy => "Energy",
            RuneSet::Guard => "Guard",
            RuneSet::Swift => "Swift",
            RuneSet::Blade => "Blade",
            RuneSet::Rage => "Rage",
            RuneSet::Focus => "Focus",
            RuneSet::Endure => "Endure",
            RuneSet::Fatal => "Fatal",
            RuneSet::Despair => "Despair",
            RuneSet::Vampire => "Vampire",
            RuneSet::Violent => "Violent",
            RuneSet::Nemesis => "Nemesis",
            RuneSet::Will => "Will",
            RuneSet::Shield => "Shield",
            RuneSet::Revenge => "Revenge",
            RuneSet::Destroy => "Destroy",
            RuneSet::Fight => "Fight",
            RuneSet::Determination => "Determination",
            RuneSet::Enhance => "Enhance",
            RuneSet::Accuracy => "Accuracy",
            RuneSet::Tolerance => "Tolerance",
        }
    }
}

impl fmt::Display for RuneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuneSet {
    type Err = RuneForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuneSet::ALL
            .into_iter()
            .find(|set| set.name() == s)
            .ok_or_else(|| RuneForgeError::UnknownSet(s.to_string()))
    }
}

/// An equippable rune as stored in the inventory.
///
/// Runes are immutable during a search; hypothetical upgrades are modeled
/// with a [`Prediction`](crate::Prediction) overlay passed alongside.
///
/// # Example
///
/// ```
/// use runeforge_core::{Rune, RuneSet, StatKind, Attribute};
///
/// let rune = Rune::new(7, 2, RuneSet::Violent, StatKind::Spd, 42.0)
///     .unwrap()
///     .with_sub(StatKind::HpPercent, 12.0)
///     .with_sub(StatKind::HpFlat, 300.0);
///
/// let amounts = rune.amounts();
/// assert_eq!(amounts.flat[Attribute::Spd], 42.0);
/// assert_eq!(amounts.flat[Attribute::Hp], 300.0);
/// assert_eq!(amounts.percent[Attribute::Hp], 12.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rune {
    pub id: u64,
    /// Slot index, 1..=6.
    pub slot: u8,
    pub set: RuneSet,
    /// Upgrade level, 0..=15 in game terms.
    pub level: u8,
    pub main: StatValue,
    pub subs: Vec<StatValue>,
    pub locked: bool,
    /// Name of the character this rune is equipped on, if any.
    pub assigned_to: Option<String>,
}

impl Rune {
    /// Creates an unlocked, unassigned level-0 rune without sub-stats.
    ///
    /// # Errors
    ///
    /// Returns [`RuneForgeError::InvalidSlot`] when `slot` is outside 1..=6.
    pub fn new(
        id: u64,
        slot: u8,
        set: RuneSet,
        main: StatKind,
        main_value: f64,
    ) -> Result<Self, RuneForgeError> {
        if !(1..=6).contains(&slot) {
            return Err(RuneForgeError::InvalidSlot(slot));
        }
        Ok(Self {
            id,
            slot,
            set,
            level: 0,
            main: StatValue::new(main, main_value),
            subs: Vec::new(),
            locked: false,
            assigned_to: None,
        })
    }

    pub fn with_sub(mut self, kind: StatKind, value: f64) -> Self {
        self.subs.push(StatValue::new(kind, value));
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn assigned_to(mut self, owner: impl Into<String>) -> Self {
        self.assigned_to = Some(owner.into());
        self
    }

    /// True if the rune sits on `owner` or on nobody.
    pub fn is_free_for(&self, owner: &str) -> bool {
        self.assigned_to.as_deref().map_or(true, |a| a == owner)
    }

    /// Main stat and sub-stats summed per attribute, split into flat and
    /// percent parts.
    pub fn amounts(&self) -> RuneAmounts {
        let mut amounts = RuneAmounts::default();
        for stat in std::iter::once(&self.main).chain(self.subs.iter()) {
            amounts.add(*stat);
        }
        amounts
    }
}

/// Per-attribute flat and percent contributions of a single rune.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuneAmounts {
    pub flat: AttributeVector,
    pub percent: AttributeVector,
}

impl RuneAmounts {
    pub fn add(&mut self, stat: StatValue) {
        let attribute = stat.kind.attribute();
        if stat.kind.is_percent() {
            self.percent.add(attribute, stat.value);
        } else {
            self.flat.add(attribute, stat.value);
        }
    }

    /// Value of `attribute` as seen by a threshold filter.
    ///
    /// The filter's flat and percent entries act as divisors:
    /// `flat / filter.flat + percent / filter.percent`, skipping a term whose
    /// divisor is zero. With both divisors zero the raw sum is used.
    pub fn filter_value(&self, attribute: Attribute, filter: &RuneFilter) -> f64 {
        let flat = self.flat[attribute];
        let percent = self.percent[attribute];
        if filter.flat == 0.0 && filter.percent == 0.0 {
            return flat + percent;
        }
        let mut value = 0.0;
        if filter.flat != 0.0 {
            value += flat / filter.flat;
        }
        if filter.percent != 0.0 {
            value += percent / filter.percent;
        }
        value
    }
}
