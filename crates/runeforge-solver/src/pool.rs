//! Candidate pool construction.
//!
//! Turns an inventory snapshot into six per-slot candidate arrays, then
//! drops every set that can no longer be completed from what survived.

use runeforge_config::{BuildConfig, ConfigError};
use runeforge_core::{Character, Prediction, Rune, RuneSet, StatEngine, SLOT_COUNT};
use smallvec::SmallVec;
use tracing::info;

use crate::filter::{resolve_prediction, slot_filter, FilterOp};

/// Candidates for one slot, with the prediction overlay they were
/// filtered under.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotPool<'a> {
    runes: Vec<&'a Rune>,
    prediction: Prediction,
}

impl<'a> SlotPool<'a> {
    pub fn new(runes: Vec<&'a Rune>, prediction: Prediction) -> Self {
        Self { runes, prediction }
    }

    pub fn runes(&self) -> &[&'a Rune] {
        &self.runes
    }

    pub fn prediction(&self) -> Prediction {
        self.prediction
    }

    pub fn len(&self) -> usize {
        self.runes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runes.is_empty()
    }

    fn contains_set(&self, set: RuneSet) -> bool {
        self.runes.iter().any(|r| r.set == set)
    }
}

/// Six candidate arrays, slot 1 first. Read-only while a search runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidatePools<'a> {
    slots: [SlotPool<'a>; SLOT_COUNT],
    pruned_sets: SmallVec<[RuneSet; 4]>,
}

impl<'a> CandidatePools<'a> {
    /// Wraps prepared pools without filtering.
    ///
    /// # Errors
    ///
    /// Fails if a rune sits in the pool of a slot other than its own.
    pub fn from_slots(slots: [SlotPool<'a>; SLOT_COUNT]) -> Result<Self, ConfigError> {
        for (i, pool) in slots.iter().enumerate() {
            if let Some(rune) = pool.runes.iter().find(|r| r.slot as usize != i + 1) {
                return Err(ConfigError::Invalid(format!(
                    "rune {} of slot {} placed in pool {}",
                    rune.id,
                    rune.slot,
                    i + 1
                )));
            }
        }
        Ok(Self {
            slots,
            pruned_sets: SmallVec::new(),
        })
    }

    /// Pool of the 1-based `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is outside 1..=6.
    pub fn slot(&self, slot: u8) -> &SlotPool<'a> {
        &self.slots[slot as usize - 1]
    }

    pub fn slots(&self) -> &[SlotPool<'a>; SLOT_COUNT] {
        &self.slots
    }

    pub fn sizes(&self) -> [usize; SLOT_COUNT] {
        std::array::from_fn(|i| self.slots[i].len())
    }

    pub fn predictions(&self) -> [Prediction; SLOT_COUNT] {
        std::array::from_fn(|i| self.slots[i].prediction)
    }

    /// Size of the Cartesian product, saturating at `u64::MAX`.
    pub fn combination_count(&self) -> u64 {
        self.slots
            .iter()
            .fold(1u64, |acc, pool| acc.saturating_mul(pool.len() as u64))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().any(SlotPool::is_empty)
    }

    /// Sets removed because too few slots could supply them.
    pub fn pruned_sets(&self) -> &[RuneSet] {
        &self.pruned_sets
    }
}

/// Builds [`CandidatePools`] from an inventory.
///
/// # Example
///
/// ```
/// use runeforge_config::BuildConfig;
/// use runeforge_core::{Character, RuneSet};
/// use runeforge_solver::PoolBuilder;
/// use runeforge_test::{full_set, TableStatEngine};
///
/// let inventory = full_set(1, RuneSet::Violent);
/// let config = BuildConfig::new().with_build_sets([RuneSet::Violent]);
/// let character = Character::new("Tester", Default::default());
///
/// let pools = PoolBuilder::new(&config)
///     .build(&inventory, &character, &TableStatEngine::new())
///     .unwrap();
/// assert_eq!(pools.combination_count(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PoolBuilder<'c> {
    config: &'c BuildConfig,
    include_locked: bool,
    include_equipped: bool,
}

impl<'c> PoolBuilder<'c> {
    pub fn new(config: &'c BuildConfig) -> Self {
        Self {
            config,
            include_locked: false,
            include_equipped: false,
        }
    }

    pub fn with_include_locked(mut self, include: bool) -> Self {
        self.include_locked = include;
        self
    }

    pub fn with_include_equipped(mut self, include: bool) -> Self {
        self.include_equipped = include;
        self
    }

    /// Filters `inventory` into per-slot pools for `character`.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error before touching the
    /// inventory.
    pub fn build<'a, E: StatEngine>(
        &self,
        inventory: &'a [Rune],
        character: &Character,
        engine: &E,
    ) -> Result<CandidatePools<'a>, ConfigError> {
        self.config.validate()?;

        let mut slots: [SlotPool<'a>; SLOT_COUNT] = Default::default();
        let filters: [FilterOp; SLOT_COUNT] =
            std::array::from_fn(|i| slot_filter(self.config, i as u8 + 1));
        for (i, pool) in slots.iter_mut().enumerate() {
            pool.prediction = resolve_prediction(self.config, i as u8 + 1);
        }

        for rune in inventory.iter().filter(|r| self.is_eligible(r, character)) {
            let index = rune.slot as usize - 1;
            let pool = &mut slots[index];
            if !filters[index].is_accept_all() {
                let amounts = engine.rune_amounts(rune, pool.prediction);
                if !filters[index].accepts(&amounts) {
                    continue;
                }
            }
            let allowed = self.config.main_stats_for(rune.slot);
            if rune.slot % 2 == 0 && !allowed.is_empty() && !allowed.contains(&rune.main.kind) {
                continue;
            }
            pool.runes.push(rune);
        }

        let pruned_sets = prune_infeasible_sets(&mut slots, &self.config.build_sets);

        let pools = CandidatePools { slots, pruned_sets };
        info!(
            event = "pool_built",
            character = %character.name,
            inventory = inventory.len(),
            sizes = ?pools.sizes(),
            combinations = pools.combination_count(),
            pruned_sets = ?pools.pruned_sets(),
        );
        Ok(pools)
    }

    fn is_eligible(&self, rune: &Rune, character: &Character) -> bool {
        (1..=SLOT_COUNT as u8).contains(&rune.slot)
            && (self.include_equipped || rune.is_free_for(&character.name))
            && (self.include_locked || !rune.locked)
            && self.config.build_sets.contains(&rune.set)
    }
}

/// Removes every set that fewer slots can supply than it needs pieces.
fn prune_infeasible_sets(
    slots: &mut [SlotPool<'_>; SLOT_COUNT],
    build_sets: &[RuneSet],
) -> SmallVec<[RuneSet; 4]> {
    let mut pruned = SmallVec::new();
    for (i, &set) in build_sets.iter().enumerate() {
        if build_sets[..i].contains(&set) {
            continue;
        }
        let present = slots.iter().filter(|pool| pool.contains_set(set)).count();
        if present < set.required_pieces() {
            pruned.push(set);
        }
    }
    if !pruned.is_empty() {
        for pool in slots.iter_mut() {
            pool.runes.retain(|r| !pruned.contains(&r.set));
        }
    }
    pruned
}

#[cfg(test)]
mod tests {
    use runeforge_core::{Attribute, RuneFilter, StatKind, Tier};
    use runeforge_test::{character, full_set, RuneBuilder, TableStatEngine};

    use super::*;

    fn build<'a>(config: &BuildConfig, inventory: &'a [Rune]) -> CandidatePools<'a> {
        PoolBuilder::new(config)
            .build(inventory, &character(), &TableStatEngine::new())
            .unwrap()
    }

    #[test]
    fn test_partition_by_slot() {
        let mut inventory = full_set(1, RuneSet::Energy);
        inventory.extend(full_set(10, RuneSet::Energy));
        let config = BuildConfig::new().with_build_sets([RuneSet::Energy]);

        let pools = build(&config, &inventory);
        assert_eq!(pools.sizes(), [2; 6]);
        assert_eq!(pools.combination_count(), 64);
        for slot in 1..=6u8 {
            assert!(pools.slot(slot).runes().iter().all(|r| r.slot == slot));
        }
    }

    #[test]
    fn test_ownership_and_lock_rules() {
        let inventory = vec![
            RuneBuilder::new(1, 1).build(),
            RuneBuilder::new(2, 1).owner("Someone Else").build(),
            RuneBuilder::new(3, 1).owner(character().name).build(),
            RuneBuilder::new(4, 1).locked().build(),
            RuneBuilder::new(5, 2).build(),
        ];
        let config = BuildConfig::new().with_build_sets([RuneSet::Energy]);

        let ids = |pools: &CandidatePools<'_>| -> Vec<u64> {
            pools.slot(1).runes().iter().map(|r| r.id).collect()
        };
        assert_eq!(ids(&build(&config, &inventory)), vec![1, 3]);

        let pools = PoolBuilder::new(&config)
            .with_include_equipped(true)
            .with_include_locked(true)
            .build(&inventory, &character(), &TableStatEngine::new())
            .unwrap();
        assert_eq!(ids(&pools), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ineligible_sets_dropped() {
        let mut inventory = full_set(1, RuneSet::Energy);
        inventory.extend(full_set(10, RuneSet::Guard));
        let config = BuildConfig::new().with_build_sets([RuneSet::Guard]);

        let pools = build(&config, &inventory);
        assert!(pools
            .slots()
            .iter()
            .all(|p| p.runes().iter().all(|r| r.set == RuneSet::Guard)));
    }

    #[test]
    fn test_empty_build_sets_gives_empty_pools() {
        let inventory = full_set(1, RuneSet::Energy);
        let pools = build(&BuildConfig::new(), &inventory);
        assert_eq!(pools.combination_count(), 0);
        assert!(pools.is_empty());
    }

    #[test]
    fn test_main_stat_restriction_on_even_slots() {
        let inventory = vec![
            RuneBuilder::new(1, 2).main(StatKind::Spd, 42.0).build(),
            RuneBuilder::new(2, 2).main(StatKind::AtkPercent, 63.0).build(),
            RuneBuilder::new(3, 4).main(StatKind::AtkPercent, 63.0).build(),
        ];
        let config = BuildConfig::new()
            .with_build_sets([RuneSet::Energy])
            .with_slot_main_stats(2, [StatKind::Spd]);

        let pools = build(&config, &inventory);
        assert_eq!(pools.slot(2).len(), 1);
        assert_eq!(pools.slot(2).runes()[0].id, 1);
        // empty allow-list leaves slot 4 alone
        assert_eq!(pools.slot(4).len(), 1);
    }

    #[test]
    fn test_threshold_filter_applies_per_slot() {
        let inventory = vec![
            RuneBuilder::new(1, 1).sub(StatKind::Spd, 15.0).build(),
            RuneBuilder::new(2, 1).sub(StatKind::Spd, 3.0).build(),
            RuneBuilder::new(3, 2).sub(StatKind::Spd, 3.0).build(),
        ];
        let config = BuildConfig::new()
            .with_build_sets([RuneSet::Energy])
            .with_filter(Tier::Odd, Attribute::Spd, RuneFilter::new(0.0, 0.0, 10.0));

        let pools = build(&config, &inventory);
        assert_eq!(pools.slot(1).len(), 1);
        assert_eq!(pools.slot(2).len(), 1);
    }

    #[test]
    fn test_prediction_recorded_per_slot() {
        let inventory = full_set(1, RuneSet::Energy);
        let config = BuildConfig::new()
            .with_build_sets([RuneSet::Energy])
            .with_prediction(Tier::Even, Prediction::new(12, true));

        let pools = build(&config, &inventory);
        assert_eq!(pools.slot(2).prediction(), Prediction::new(12, true));
        assert_eq!(pools.slot(1).prediction(), Prediction::NEUTRAL);
        // runes themselves are untouched
        assert!(inventory.iter().all(|r| r.level == 0));
    }

    #[test]
    fn test_prediction_lets_rune_pass_filter() {
        let inventory = vec![
            RuneBuilder::new(1, 1).main(StatKind::Spd, 10.0).build(),
            RuneBuilder::new(2, 2).main(StatKind::Spd, 30.0).build(),
        ];
        let config = BuildConfig::new()
            .with_build_sets([RuneSet::Energy])
            .with_filter(Tier::Global, Attribute::Spd, RuneFilter::new(0.0, 0.0, 15.0));

        let pools = build(&config, &inventory);
        assert!(pools.slot(1).is_empty());

        // level 0 -> 12 grows the main stat by 12 * 10%, to 22 SPD
        let config = config.with_prediction(Tier::Global, Prediction::new(12, false));
        let pools = build(&config, &inventory);
        assert_eq!(pools.slot(1).len(), 1);
        assert_eq!(pools.slot(1).runes()[0].id, 1);
        assert_eq!(pools.slot(2).len(), 1);
        assert_eq!(inventory[0].level, 0);
    }

    #[test]
    #[should_panic]
    fn test_slot_zero_panics() {
        let inventory = full_set(1, RuneSet::Energy);
        let config = BuildConfig::new().with_build_sets([RuneSet::Energy]);
        build(&config, &inventory).slot(0);
    }

    #[test]
    fn test_feasibility_prunes_four_piece_set() {
        let mut inventory = full_set(1, RuneSet::Energy);
        for (id, slot) in [(20, 1), (21, 3), (22, 5)] {
            inventory.push(RuneBuilder::new(id, slot).set(RuneSet::Violent).build());
        }
        let config = BuildConfig::new().with_build_sets([RuneSet::Energy, RuneSet::Violent]);

        let pools = build(&config, &inventory);
        assert_eq!(pools.pruned_sets(), &[RuneSet::Violent]);
        for pool in pools.slots() {
            assert!(pool.runes().iter().all(|r| r.set != RuneSet::Violent));
        }
        assert_eq!(pools.sizes(), [1; 6]);
    }

    #[test]
    fn test_feasibility_keeps_two_piece_set() {
        let inventory = vec![
            RuneBuilder::new(1, 1).set(RuneSet::Guard).build(),
            RuneBuilder::new(2, 2).set(RuneSet::Guard).build(),
        ];
        let config = BuildConfig::new().with_build_sets([RuneSet::Guard, RuneSet::Guard]);

        let pools = build(&config, &inventory);
        assert!(pools.pruned_sets().is_empty());
        assert_eq!(pools.slot(1).len(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let inventory = runeforge_test::random_inventory(7, 120);
        let config = BuildConfig::new()
            .with_build_sets(RuneSet::ALL)
            .with_filter(Tier::Global, Attribute::Spd, RuneFilter::new(0.0, 0.0, 4.0));

        assert_eq!(build(&config, &inventory), build(&config, &inventory));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = BuildConfig::new().with_weight(Attribute::Spd, f64::NAN);
        let err = PoolBuilder::new(&config)
            .build(&[], &character(), &TableStatEngine::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_slots_rejects_misplaced_rune() {
        let rune = RuneBuilder::new(1, 3).build();
        let mut slots: [SlotPool<'_>; SLOT_COUNT] = Default::default();
        slots[0] = SlotPool::new(vec![&rune], Prediction::NEUTRAL);
        assert!(CandidatePools::from_slots(slots).is_err());
    }
}
