//! Deterministic stat engines for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use runeforge_core::{
    Attribute, AttributeVector, Character, Loadout, Prediction, Rune, RuneAmounts, StatEngine,
    StatError, StatValue,
};

/// Main-stat growth per predicted level, as a fraction of the current value.
const MAIN_GROWTH: f64 = 0.1;

/// The default test character.
pub fn character() -> Character {
    Character::new(
        "Tester",
        AttributeVector::new()
            .with(Attribute::Hp, 10_000.0)
            .with(Attribute::Atk, 700.0)
            .with(Attribute::Def, 600.0)
            .with(Attribute::Spd, 100.0)
            .with(Attribute::CritRate, 15.0)
            .with(Attribute::CritDamage, 50.0)
            .with(Attribute::Resistance, 15.0),
    )
}

/// Additive stat engine.
///
/// Flat amounts add directly; HP, ATK and DEF percentages scale the base
/// value; other percentages add directly. A rune registered with
/// [`with_rune`](Self::with_rune) contributes its table entry instead,
/// which may include derived attributes. Derived attributes then follow
/// simple closed formulas. No set bonuses.
#[derive(Debug, Clone, Default)]
pub struct TableStatEngine {
    table: HashMap<u64, AttributeVector>,
}

impl TableStatEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contribution of rune `id`.
    pub fn with_rune(mut self, id: u64, contribution: AttributeVector) -> Self {
        self.table.insert(id, contribution);
        self
    }

    fn contribution(
        &self,
        character: &Character,
        rune: &Rune,
        prediction: Prediction,
    ) -> AttributeVector {
        if let Some(entry) = self.table.get(&rune.id) {
            return *entry;
        }
        let amounts = self.rune_amounts(rune, prediction);
        Attribute::PRIMARY
            .into_iter()
            .map(|a| {
                let percent = amounts.percent[a];
                let percent = match a {
                    Attribute::Hp | Attribute::Atk | Attribute::Def => {
                        character.base[a] * percent / 100.0
                    }
                    _ => percent,
                };
                (a, amounts.flat[a] + percent)
            })
            .collect()
    }
}

fn derive(v: &mut AttributeVector) {
    let hp = v[Attribute::Hp];
    let def = v[Attribute::Def];
    let atk = v[Attribute::Atk];
    let crit_rate = v[Attribute::CritRate].min(100.0) / 100.0;
    let crit_damage = v[Attribute::CritDamage] / 100.0;

    let average = atk * (1.0 + crit_damage * crit_rate);
    v.add(Attribute::EffectiveHp, hp * (1140.0 + 3.5 * def) / 1000.0);
    v.add(Attribute::EffectiveHpDefBreak, hp * (1140.0 + 3.5 * def * 0.3) / 1000.0);
    v.add(Attribute::AverageDamage, average);
    v.add(Attribute::MaxDamage, atk * (1.0 + crit_damage));
    v.add(Attribute::Dps, average * v[Attribute::Spd] / 100.0);
}

impl StatEngine for TableStatEngine {
    fn attributes_for(
        &self,
        character: &Character,
        loadout: &Loadout<'_>,
    ) -> Result<AttributeVector, StatError> {
        let mut attributes = character.base;
        for (rune, prediction) in loadout.runes().iter().zip(loadout.predictions()) {
            for (attribute, value) in self.contribution(character, rune, *prediction).non_zero() {
                attributes.add(attribute, value);
            }
        }
        derive(&mut attributes);
        Ok(attributes)
    }

    fn rune_amounts(&self, rune: &Rune, prediction: Prediction) -> RuneAmounts {
        let mut amounts = rune.amounts();
        let levels = prediction.level_for(rune.level) - rune.level;
        if levels > 0 {
            let growth = rune.main.value * MAIN_GROWTH * f64::from(levels);
            amounts.add(StatValue::new(rune.main.kind, growth));
        }
        amounts
    }
}

/// Fails for every loadout that contains one of the listed runes and
/// delegates to [`TableStatEngine`] otherwise.
#[derive(Debug, Default)]
pub struct FailingStatEngine {
    inner: TableStatEngine,
    failing: HashSet<u64>,
    fail_all: bool,
    failures: AtomicU64,
}

impl FailingStatEngine {
    pub fn on_runes(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            failing: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn always() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn with_inner(mut self, inner: TableStatEngine) -> Self {
        self.inner = inner;
        self
    }

    /// Number of failed calls so far.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::SeqCst)
    }
}

impl StatEngine for FailingStatEngine {
    fn attributes_for(
        &self,
        character: &Character,
        loadout: &Loadout<'_>,
    ) -> Result<AttributeVector, StatError> {
        if self.fail_all || loadout.runes().iter().any(|r| self.failing.contains(&r.id)) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(StatError::new(format!(
                "no stats for loadout {:?}",
                loadout.rune_ids()
            )));
        }
        self.inner.attributes_for(character, loadout)
    }

    fn rune_amounts(&self, rune: &Rune, prediction: Prediction) -> RuneAmounts {
        self.inner.rune_amounts(rune, prediction)
    }
}
