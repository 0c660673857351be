//! Tier resolution: global, parity and slot configuration folded into
//! one filter, operator and prediction per slot.

use runeforge_config::BuildConfig;
use runeforge_core::{Attribute, FilterOperator, Prediction, RuneFilter, Tier};
use tracing::debug;

use super::{AttributeTest, FilterOp};

/// Effective filter of `attribute` for `slot`.
///
/// A slot-tier entry replaces the broader tiers outright. Otherwise the
/// global and parity entries combine component-wise, the smaller non-zero
/// value winning. All-zero entries count as absent.
pub fn effective_filter(
    config: &BuildConfig,
    slot: u8,
    attribute: Attribute,
) -> Option<RuneFilter> {
    let lookup = |tier| {
        config
            .filter(tier, attribute)
            .copied()
            .filter(RuneFilter::is_non_zero)
    };

    if let Some(filter) = lookup(Tier::Slot(slot)) {
        return Some(filter);
    }
    match (lookup(Tier::Global), lookup(Tier::parity(slot))) {
        (Some(global), Some(parity)) => Some(global.min(&parity)),
        (global, parity) => global.or(parity),
    }
}

fn has_filters(config: &BuildConfig, tier: Tier) -> bool {
    config
        .tier_filters(tier)
        .is_some_and(|filters| filters.values().any(RuneFilter::is_non_zero))
}

/// Operator for `slot`: the most specific tier that has both an operator
/// and non-zero filters. Falls back to OR.
pub fn resolve_operator(config: &BuildConfig, slot: u8) -> FilterOperator {
    Tier::chain(slot)
        .into_iter()
        .filter(|&tier| has_filters(config, tier))
        .filter_map(|tier| config.operator(tier))
        .last()
        .unwrap_or_default()
}

/// Prediction for `slot`: highest level across the covering tiers,
/// sub-stat prediction if any tier asks for it.
pub fn resolve_prediction(config: &BuildConfig, slot: u8) -> Prediction {
    Tier::chain(slot)
        .into_iter()
        .filter_map(|tier| config.prediction(tier))
        .fold(Prediction::NEUTRAL, Prediction::merge)
}

/// Builds the filter every candidate for `slot` must pass.
pub fn slot_filter(config: &BuildConfig, slot: u8) -> FilterOp {
    for tier in Tier::chain(slot) {
        if config.operator(tier).is_some() && !has_filters(config, tier) {
            debug!(
                event = "filter_tier_skipped",
                slot,
                tier = %tier,
                "operator without filters, tier accepts all"
            );
        }
    }

    let tests: Vec<AttributeTest> = Attribute::PRIMARY
        .into_iter()
        .filter_map(|a| effective_filter(config, slot, a).map(|f| AttributeTest::new(a, f)))
        .collect();
    if tests.is_empty() {
        return FilterOp::AcceptAll;
    }

    let thresholds = || -> Vec<AttributeTest> {
        tests.iter().copied().filter(|t| t.filter.test != 0.0).collect()
    };
    match resolve_operator(config, slot) {
        FilterOperator::Sum(target) => FilterOp::SumAtLeast {
            target,
            terms: tests.clone(),
        },
        FilterOperator::Or => match thresholds() {
            t if t.is_empty() => FilterOp::AcceptAll,
            t => FilterOp::Any(t),
        },
        FilterOperator::And => match thresholds() {
            t if t.is_empty() => FilterOp::AcceptAll,
            t => FilterOp::All(t),
        },
    }
}
