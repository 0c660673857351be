//! Constraint checking and weighted scoring of assembled loadouts.

use runeforge_config::BuildConfig;
use runeforge_core::{AttributeVector, Loadout, RuneSet};
use smallvec::SmallVec;

/// Why a loadout was turned away. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// An attribute fell short of its configured minimum.
    BelowMinimum,
    /// A set on the loadout is incomplete while broken sets are not allowed.
    BrokenSet,
    /// A required set is absent or incomplete.
    MissingRequiredSet,
}

impl RejectReason {
    pub const COUNT: usize = 3;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Outcome of evaluating one loadout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accepted(f64),
    Rejected(RejectReason),
}

impl Verdict {
    pub fn score(&self) -> Option<f64> {
        match self {
            Verdict::Accepted(score) => Some(*score),
            Verdict::Rejected(_) => None,
        }
    }
}

/// Evaluates loadouts against the hard constraints and scores the ones
/// that pass.
///
/// Scoring credits `trunc(value / weight)` per weighted attribute and takes
/// back `trunc(excess / weight)` for value above a non-zero maximum.
///
/// ```
/// use runeforge_config::BuildConfig;
/// use runeforge_core::{Attribute, AttributeVector};
/// use runeforge_solver::BuildScorer;
///
/// let config = BuildConfig::new()
///     .with_weight(Attribute::Spd, 1.0)
///     .with_weight(Attribute::Hp, 1000.0)
///     .with_maximum(Attribute::Spd, 200.0);
/// let scorer = BuildScorer::new(&config);
///
/// let attributes = AttributeVector::new()
///     .with(Attribute::Spd, 230.0)
///     .with(Attribute::Hp, 25_500.0);
/// // 230 - 30 + 25
/// assert_eq!(scorer.score(&attributes), 225.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BuildScorer {
    weights: AttributeVector,
    minimum: AttributeVector,
    maximum: AttributeVector,
    allow_broken: bool,
    required_sets: SmallVec<[RuneSet; 3]>,
}

impl BuildScorer {
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            weights: config.sort,
            minimum: config.minimum,
            maximum: config.maximum,
            allow_broken: config.allow_broken,
            required_sets: config.required_sets.iter().copied().collect(),
        }
    }

    /// Fitness of an attribute vector. Higher is better.
    pub fn score(&self, attributes: &AttributeVector) -> f64 {
        let mut points = 0.0;
        for (attribute, weight) in self.weights.non_zero() {
            let value = attributes[attribute];
            points += (value / weight).trunc();
            let max = self.maximum[attribute];
            if max != 0.0 {
                points -= ((value - max).max(0.0) / weight).trunc();
            }
        }
        points
    }

    /// Checks the constraints in order, then scores.
    pub fn evaluate(&self, loadout: &Loadout<'_>, attributes: &AttributeVector) -> Verdict {
        if !attributes.meets_minimum(&self.minimum) {
            return Verdict::Rejected(RejectReason::BelowMinimum);
        }
        if !self.allow_broken && !loadout.sets_full() {
            return Verdict::Rejected(RejectReason::BrokenSet);
        }
        if !self.required_sets.iter().all(|&set| loadout.contains_set(set)) {
            return Verdict::Rejected(RejectReason::MissingRequiredSet);
        }
        Verdict::Accepted(self.score(attributes))
    }
}

#[cfg(test)]
mod tests {
    use runeforge_core::{Attribute, Prediction, Rune, SLOT_COUNT};
    use runeforge_test::{full_set, RuneBuilder};

    use super::*;

    fn loadout(runes: &[Rune]) -> Loadout<'_> {
        let refs: [&Rune; SLOT_COUNT] = std::array::from_fn(|i| &runes[i]);
        Loadout::new(refs, [Prediction::NEUTRAL; SLOT_COUNT])
    }

    fn mixed_runes(sets: [RuneSet; SLOT_COUNT]) -> Vec<Rune> {
        sets.iter()
            .enumerate()
            .map(|(i, &set)| RuneBuilder::new(i as u64, i as u8 + 1).set(set).build())
            .collect()
    }

    #[test]
    fn test_zero_weights_score_zero() {
        let scorer = BuildScorer::new(&BuildConfig::new());
        let attributes: AttributeVector =
            Attribute::ALL.iter().map(|&a| (a, 12_345.6)).collect();
        assert_eq!(scorer.score(&attributes), 0.0);
    }

    #[test]
    fn test_score_truncates_each_term() {
        let config = BuildConfig::new()
            .with_weight(Attribute::Spd, 10.0)
            .with_weight(Attribute::Dps, 100.0);
        let scorer = BuildScorer::new(&config);
        let attributes = AttributeVector::new()
            .with(Attribute::Spd, 199.0)
            .with(Attribute::Dps, 1050.0);
        assert_eq!(scorer.score(&attributes), 19.0 + 10.0);
    }

    #[test]
    fn test_maximum_penalizes_excess() {
        let config = BuildConfig::new()
            .with_weight(Attribute::CritRate, 1.0)
            .with_maximum(Attribute::CritRate, 100.0);
        let scorer = BuildScorer::new(&config);

        let at_cap = AttributeVector::new().with(Attribute::CritRate, 100.0);
        let over = AttributeVector::new().with(Attribute::CritRate, 130.0);
        assert_eq!(scorer.score(&at_cap), 100.0);
        assert_eq!(scorer.score(&over), 100.0);
    }

    #[test]
    fn test_minimum_rejects_first() {
        let runes = mixed_runes([RuneSet::Violent; 6]);
        let config = BuildConfig::new().with_minimum(Attribute::EffectiveHp, 30_000.0);
        let scorer = BuildScorer::new(&config);

        let weak = AttributeVector::new().with(Attribute::EffectiveHp, 29_999.0);
        let sturdy = AttributeVector::new().with(Attribute::EffectiveHp, 30_000.0);
        assert_eq!(
            scorer.evaluate(&loadout(&runes), &weak),
            Verdict::Rejected(RejectReason::BelowMinimum)
        );
        assert_eq!(scorer.evaluate(&loadout(&runes), &sturdy), Verdict::Accepted(0.0));
    }

    #[test]
    fn test_broken_sets() {
        use RuneSet::*;
        let runes = mixed_runes([Violent, Violent, Violent, Energy, Energy, Guard]);
        let attributes = AttributeVector::new();

        let strict = BuildScorer::new(&BuildConfig::new());
        assert_eq!(
            strict.evaluate(&loadout(&runes), &attributes),
            Verdict::Rejected(RejectReason::BrokenSet)
        );

        let relaxed = BuildScorer::new(&BuildConfig::new().with_allow_broken(true));
        assert!(relaxed.evaluate(&loadout(&runes), &attributes).score().is_some());
    }

    #[test]
    fn test_required_sets() {
        use RuneSet::*;
        let runes = mixed_runes([Violent, Violent, Violent, Violent, Energy, Energy]);
        let attributes = AttributeVector::new();

        let config = BuildConfig::new().with_required_set(Violent).with_required_set(Energy);
        assert!(BuildScorer::new(&config)
            .evaluate(&loadout(&runes), &attributes)
            .score()
            .is_some());

        let config = BuildConfig::new().with_required_set(Swift);
        assert_eq!(
            BuildScorer::new(&config).evaluate(&loadout(&runes), &attributes),
            Verdict::Rejected(RejectReason::MissingRequiredSet)
        );

        let energy = full_set(1, Energy);
        let config = BuildConfig::new().with_required_set(Energy);
        assert!(BuildScorer::new(&config)
            .evaluate(&loadout(&energy), &attributes)
            .score()
            .is_some());
    }

    #[test]
    fn test_score_is_pure() {
        let config = BuildConfig::new()
            .with_weight(Attribute::Spd, 1.0)
            .with_weight(Attribute::Atk, 50.0);
        let scorer = BuildScorer::new(&config);
        let attributes = AttributeVector::new()
            .with(Attribute::Spd, 180.0)
            .with(Attribute::Atk, 2_400.0);
        let first = scorer.score(&attributes);
        assert_eq!(scorer.score(&attributes), first);
        assert_eq!(scorer.clone().score(&attributes), first);
    }
}
