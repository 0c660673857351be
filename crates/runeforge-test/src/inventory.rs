//! Reproducible random inventories.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use runeforge_core::{Rune, RuneSet, StatKind};

use crate::rune::RuneBuilder;

/// Owner name given to runes equipped elsewhere.
pub const OTHER_OWNER: &str = "Someone Else";

fn stat_value(rng: &mut ChaCha8Rng, kind: StatKind, main: bool) -> f64 {
    let (low, high) = match kind {
        StatKind::HpFlat => (100, 400),
        StatKind::AtkFlat | StatKind::DefFlat => (10, 30),
        _ => (3, 10),
    };
    let value = f64::from(rng.random_range(low..=high));
    if main {
        value * 4.0
    } else {
        value
    }
}

/// `count` runes spread round-robin over the six slots.
///
/// The same seed always yields the same inventory. Roughly one rune in ten
/// is locked and one in five is equipped by [`OTHER_OWNER`].
pub fn random_inventory(seed: u64, count: usize) -> Vec<Rune> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let slot = (i % 6) as u8 + 1;
            let set = RuneSet::ALL[rng.random_range(0..RuneSet::ALL.len())];
            let main = StatKind::ALL[rng.random_range(0..StatKind::ALL.len())];
            let main_value = stat_value(&mut rng, main, true);

            let mut builder = RuneBuilder::new(i as u64 + 1, slot)
                .set(set)
                .level(rng.random_range(0..=15))
                .main(main, main_value);
            for _ in 0..rng.random_range(2..=4) {
                let kind = StatKind::ALL[rng.random_range(0..StatKind::ALL.len())];
                let value = stat_value(&mut rng, kind, false);
                builder = builder.sub(kind, value);
            }
            if rng.random_bool(0.1) {
                builder = builder.locked();
            }
            if rng.random_bool(0.2) {
                builder = builder.owner(OTHER_OWNER);
            }
            builder.build()
        })
        .collect()
}
