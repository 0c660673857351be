use runeforge_config::BuildConfig;
use runeforge_core::{Attribute, FilterOperator, Prediction, RuneFilter, RuneSet, StatKind, Tier};
use runeforge_test::RuneBuilder;

use super::*;

fn test_filter(test: f64) -> RuneFilter {
    RuneFilter::new(0.0, 0.0, test)
}

#[test]
fn test_no_filters_accept_all() {
    let config = BuildConfig::new();
    for slot in 1..=6 {
        assert!(slot_filter(&config, slot).is_accept_all());
    }
}

#[test]
fn test_zero_filters_accept_all() {
    let config = BuildConfig::new()
        .with_filter(Tier::Global, Attribute::Spd, RuneFilter::default())
        .with_operator(Tier::Global, FilterOperator::And);
    assert!(slot_filter(&config, 1).is_accept_all());
}

#[test]
fn test_slot_tier_overrides() {
    let config = BuildConfig::new()
        .with_filter(Tier::Global, Attribute::Spd, test_filter(5.0))
        .with_filter(Tier::Odd, Attribute::Spd, test_filter(3.0))
        .with_filter(Tier::Slot(1), Attribute::Spd, test_filter(9.0));

    assert_eq!(effective_filter(&config, 1, Attribute::Spd), Some(test_filter(9.0)));
    // global and parity merge where the slot is silent
    assert_eq!(effective_filter(&config, 3, Attribute::Spd), Some(test_filter(3.0)));
    assert_eq!(effective_filter(&config, 2, Attribute::Spd), Some(test_filter(5.0)));
    assert_eq!(effective_filter(&config, 2, Attribute::Hp), None);
}

#[test]
fn test_parity_merge_takes_smaller_components() {
    let config = BuildConfig::new()
        .with_filter(Tier::Global, Attribute::Hp, RuneFilter::new(200.0, 0.0, 4.0))
        .with_filter(Tier::Even, Attribute::Hp, RuneFilter::new(100.0, 8.0, 6.0));

    assert_eq!(
        effective_filter(&config, 4, Attribute::Hp),
        Some(RuneFilter::new(100.0, 8.0, 4.0))
    );
    assert_eq!(
        effective_filter(&config, 5, Attribute::Hp),
        Some(RuneFilter::new(200.0, 0.0, 4.0))
    );
}

#[test]
fn test_operator_from_most_specific_tier_with_filters() {
    let config = BuildConfig::new()
        .with_filter(Tier::Global, Attribute::Spd, test_filter(5.0))
        .with_operator(Tier::Global, FilterOperator::And)
        .with_filter(Tier::Slot(2), Attribute::Hp, test_filter(1.0))
        .with_operator(Tier::Slot(2), FilterOperator::Sum(2.0))
        // operator without filters does not qualify
        .with_operator(Tier::Odd, FilterOperator::Sum(9.0));

    assert_eq!(resolve_operator(&config, 2), FilterOperator::Sum(2.0));
    assert_eq!(resolve_operator(&config, 4), FilterOperator::And);
    assert_eq!(resolve_operator(&config, 3), FilterOperator::And);
}

#[test]
fn test_operator_defaults_to_or() {
    let config = BuildConfig::new().with_filter(Tier::Global, Attribute::Spd, test_filter(5.0));
    assert_eq!(resolve_operator(&config, 1), FilterOperator::Or);
    assert!(matches!(slot_filter(&config, 1), FilterOp::Any(_)));
}

#[test]
fn test_prediction_merge_across_tiers() {
    let config = BuildConfig::new()
        .with_prediction(Tier::Global, Prediction::new(9, false))
        .with_prediction(Tier::Even, Prediction::new(12, false))
        .with_prediction(Tier::Slot(4), Prediction::new(6, true));

    assert_eq!(resolve_prediction(&config, 4), Prediction::new(12, true));
    assert_eq!(resolve_prediction(&config, 3), Prediction::new(9, false));
    assert_eq!(resolve_prediction(&BuildConfig::new(), 1), Prediction::NEUTRAL);
}

#[test]
fn test_or_keeps_any_passing_attribute() {
    let config = BuildConfig::new()
        .with_filter(Tier::Global, Attribute::Spd, test_filter(10.0))
        .with_filter(Tier::Global, Attribute::CritRate, test_filter(8.0));
    let op = slot_filter(&config, 1);

    let fast = RuneBuilder::new(1, 1).sub(StatKind::Spd, 12.0).build();
    let critical = RuneBuilder::new(2, 1).sub(StatKind::CritRate, 9.0).build();
    let neither = RuneBuilder::new(3, 1).sub(StatKind::Spd, 4.0).build();

    assert!(op.accepts(&fast.amounts()));
    assert!(op.accepts(&critical.amounts()));
    assert!(!op.accepts(&neither.amounts()));
}

#[test]
fn test_and_needs_every_threshold() {
    let config = BuildConfig::new()
        .with_filter(Tier::Global, Attribute::Spd, test_filter(10.0))
        .with_filter(Tier::Global, Attribute::CritRate, test_filter(8.0))
        .with_operator(Tier::Global, FilterOperator::And);
    let op = slot_filter(&config, 1);

    let both = RuneBuilder::new(1, 1)
        .sub(StatKind::Spd, 12.0)
        .sub(StatKind::CritRate, 9.0)
        .build();
    let one = RuneBuilder::new(2, 1).sub(StatKind::Spd, 12.0).build();

    assert!(op.accepts(&both.amounts()));
    assert!(!op.accepts(&one.amounts()));
}

#[test]
fn test_sum_weights_flat_and_percent() {
    // HP: 1 point per 100 flat or per 5 percent; SPD: 1 point per 5
    let config = BuildConfig::new()
        .with_filter(Tier::Even, Attribute::Hp, RuneFilter::new(100.0, 5.0, 0.0))
        .with_filter(Tier::Even, Attribute::Spd, RuneFilter::new(5.0, 0.0, 0.0))
        .with_operator(Tier::Even, FilterOperator::Sum(4.0));
    let op = slot_filter(&config, 2);

    let rune = RuneBuilder::new(1, 2)
        .main(StatKind::HpPercent, 10.0)
        .sub(StatKind::HpFlat, 100.0)
        .sub(StatKind::Spd, 5.0)
        .build();
    // 10/5 + 100/100 + 5/5
    assert!(op.accepts(&rune.amounts()));

    let weak = RuneBuilder::new(2, 2)
        .main(StatKind::HpPercent, 10.0)
        .set(RuneSet::Energy)
        .build();
    assert!(!op.accepts(&weak.amounts()));

    // odd slots are not covered by the even tier
    assert!(slot_filter(&config, 1).is_accept_all());
}
