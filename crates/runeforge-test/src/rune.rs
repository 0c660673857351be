//! Rune builders.

use runeforge_core::{Rune, RuneSet, StatKind, StatValue};

/// Builder for test runes.
///
/// Defaults: Energy set, level 0, `ATKflat 100` main stat, no sub-stats,
/// unlocked and unassigned.
#[derive(Debug, Clone)]
pub struct RuneBuilder {
    id: u64,
    slot: u8,
    set: RuneSet,
    level: u8,
    main: StatValue,
    subs: Vec<StatValue>,
    locked: bool,
    owner: Option<String>,
}

impl RuneBuilder {
    pub fn new(id: u64, slot: u8) -> Self {
        Self {
            id,
            slot,
            set: RuneSet::Energy,
            level: 0,
            main: StatValue::new(StatKind::AtkFlat, 100.0),
            subs: Vec::new(),
            locked: false,
            owner: None,
        }
    }

    pub fn set(mut self, set: RuneSet) -> Self {
        self.set = set;
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn main(mut self, kind: StatKind, value: f64) -> Self {
        self.main = StatValue::new(kind, value);
        self
    }

    pub fn sub(mut self, kind: StatKind, value: f64) -> Self {
        self.subs.push(StatValue::new(kind, value));
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// # Panics
    ///
    /// Panics if the slot is outside 1..=6.
    pub fn build(self) -> Rune {
        let mut rune = Rune::new(self.id, self.slot, self.set, self.main.kind, self.main.value)
            .expect("test rune slot must be 1..=6")
            .with_level(self.level);
        for sub in self.subs {
            rune = rune.with_sub(sub.kind, sub.value);
        }
        if self.locked {
            rune = rune.locked();
        }
        if let Some(owner) = self.owner {
            rune = rune.assigned_to(owner);
        }
        rune
    }
}

/// Six default runes of `set`, one per slot, ids `first_id..first_id + 6`.
pub fn full_set(first_id: u64, set: RuneSet) -> Vec<Rune> {
    (0..6u8)
        .map(|i| RuneBuilder::new(first_id + i as u64, i + 1).set(set).build())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let rune = RuneBuilder::new(3, 2).build();
        assert_eq!(rune.slot, 2);
        assert_eq!(rune.set, RuneSet::Energy);
        assert_eq!(rune.main.kind, StatKind::AtkFlat);
        assert!(!rune.locked);
        assert!(rune.assigned_to.is_none());
    }

    #[test]
    fn test_full_set_slots() {
        let runes = full_set(10, RuneSet::Swift);
        let slots: Vec<u8> = runes.iter().map(|r| r.slot).collect();
        let ids: Vec<u64> = runes.iter().map(|r| r.id).collect();
        assert_eq!(slots, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(ids, vec![10, 11, 12, 13, 14, 15]);
    }
}
