//! Loadouts: one rune per slot.

use smallvec::SmallVec;

use crate::error::RuneForgeError;
use crate::prediction::Prediction;
use crate::rune::{Rune, RuneSet};

/// Number of rune slots on a character.
pub const SLOT_COUNT: usize = 6;

/// Piece count per set present on a loadout. At most six distinct sets.
pub type SetCounts = SmallVec<[(RuneSet, usize); SLOT_COUNT]>;

/// An ordered 6-tuple of runes, position `i` holding the slot `i + 1` rune.
///
/// Each rune travels with the [`Prediction`] overlay it is valued under.
///
/// # Example
///
/// ```
/// use runeforge_core::{Loadout, Prediction, Rune, RuneSet, StatKind};
///
/// let runes: Vec<Rune> = (1..=6)
///     .map(|slot| {
///         let set = if slot <= 4 { RuneSet::Violent } else { RuneSet::Energy };
///         Rune::new(slot as u64, slot, set, StatKind::HpFlat, 100.0).unwrap()
///     })
///     .collect();
/// let refs: [&Rune; 6] = std::array::from_fn(|i| &runes[i]);
///
/// let loadout = Loadout::try_new(refs, [Prediction::NEUTRAL; 6]).unwrap();
/// assert!(loadout.sets_full());
/// assert!(loadout.contains_set(RuneSet::Violent));
/// assert_eq!(loadout.completed_sets().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loadout<'a> {
    runes: [&'a Rune; SLOT_COUNT],
    predictions: [Prediction; SLOT_COUNT],
}

impl<'a> Loadout<'a> {
    /// Assembles a loadout without re-checking slot positions.
    ///
    /// Callers must pass runes whose slot index matches their position;
    /// candidate pools guarantee this by construction.
    #[inline]
    pub fn new(runes: [&'a Rune; SLOT_COUNT], predictions: [Prediction; SLOT_COUNT]) -> Self {
        debug_assert!(runes.iter().enumerate().all(|(i, r)| r.slot as usize == i + 1));
        Self { runes, predictions }
    }

    /// Assembles a loadout, checking that every rune sits in its own slot.
    pub fn try_new(
        runes: [&'a Rune; SLOT_COUNT],
        predictions: [Prediction; SLOT_COUNT],
    ) -> Result<Self, RuneForgeError> {
        if let Some(misplaced) = runes
            .iter()
            .enumerate()
            .find(|(i, r)| r.slot as usize != i + 1)
        {
            return Err(RuneForgeError::InvalidSlot(misplaced.1.slot));
        }
        Ok(Self { runes, predictions })
    }

    pub fn runes(&self) -> &[&'a Rune; SLOT_COUNT] {
        &self.runes
    }

    /// The rune in 1-based `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is outside 1..=6.
    pub fn rune(&self, slot: u8) -> &'a Rune {
        self.runes[slot as usize - 1]
    }

    pub fn predictions(&self) -> &[Prediction; SLOT_COUNT] {
        &self.predictions
    }

    /// Rune ids in slot order.
    pub fn rune_ids(&self) -> [u64; SLOT_COUNT] {
        std::array::from_fn(|i| self.runes[i].id)
    }

    /// Number of equipped pieces per set, in first-seen order.
    pub fn set_counts(&self) -> SetCounts {
        let mut counts = SetCounts::new();
        for rune in &self.runes {
            match counts.iter_mut().find(|(set, _)| *set == rune.set) {
                Some((_, n)) => *n += 1,
                None => counts.push((rune.set, 1)),
            }
        }
        counts
    }

    /// Sets whose piece count reaches their requirement.
    pub fn completed_sets(&self) -> SmallVec<[RuneSet; 3]> {
        self.set_counts()
            .into_iter()
            .filter(|(set, n)| *n >= set.required_pieces())
            .map(|(set, _)| set)
            .collect()
    }

    /// True if no set on the loadout is left incomplete.
    pub fn sets_full(&self) -> bool {
        self.set_counts()
            .iter()
            .all(|(set, n)| *n >= set.required_pieces())
    }

    /// True if `set` is present and complete.
    pub fn contains_set(&self, set: RuneSet) -> bool {
        self.set_counts()
            .iter()
            .any(|(s, n)| *s == set && *n >= set.required_pieces())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat::StatKind;

    fn runes(sets: [RuneSet; 6]) -> Vec<Rune> {
        sets.iter()
            .enumerate()
            .map(|(i, set)| {
                Rune::new(i as u64, i as u8 + 1, *set, StatKind::AtkFlat, 10.0).unwrap()
            })
            .collect()
    }

    fn loadout(runes: &[Rune]) -> Loadout<'_> {
        Loadout::new(std::array::from_fn(|i| &runes[i]), [Prediction::NEUTRAL; 6])
    }

    #[test]
    fn test_broken_set_detected() {
        use RuneSet::*;
        let rs = runes([Violent, Violent, Violent, Violent, Energy, Swift]);
        let l = loadout(&rs);
        assert!(!l.sets_full());
        assert!(l.contains_set(Violent));
        assert!(!l.contains_set(Energy));
    }

    #[test]
    fn test_three_two_piece_sets_are_full() {
        use RuneSet::*;
        let rs = runes([Energy, Energy, Blade, Blade, Guard, Guard]);
        let l = loadout(&rs);
        assert!(l.sets_full());
        assert_eq!(l.completed_sets().as_slice(), &[Energy, Blade, Guard]);
    }

    #[test]
    #[should_panic]
    fn test_rune_slot_out_of_range_panics() {
        let rs = runes([RuneSet::Energy; 6]);
        loadout(&rs).rune(7);
    }

    #[test]
    fn test_try_new_rejects_misplaced_rune() {
        use RuneSet::*;
        let mut rs = runes([Energy; 6]);
        rs.swap(0, 1);
        let refs: [&Rune; 6] = std::array::from_fn(|i| &rs[i]);
        assert_eq!(
            Loadout::try_new(refs, [Prediction::NEUTRAL; 6]).unwrap_err(),
            RuneForgeError::InvalidSlot(2)
        );
    }
}
