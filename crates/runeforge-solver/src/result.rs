//! Search results.

use runeforge_core::{AttributeVector, Loadout, SLOT_COUNT};

use crate::statistics::SearchStatistics;

/// A passing loadout with the attributes and score it was judged on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredLoadout<'a> {
    pub loadout: Loadout<'a>,
    pub attributes: AttributeVector,
    pub score: f64,
}

impl<'a> ScoredLoadout<'a> {
    pub fn new(loadout: Loadout<'a>, attributes: AttributeVector, score: f64) -> Self {
        Self {
            loadout,
            attributes,
            score,
        }
    }

    pub fn rune_ids(&self) -> [u64; SLOT_COUNT] {
        self.loadout.rune_ids()
    }
}

/// Retained loadouts of one search, best first.
///
/// Rebuilt wholesale by every search; never merged with an earlier set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet<'a> {
    builds: Vec<ScoredLoadout<'a>>,
    statistics: SearchStatistics,
}

impl<'a> ResultSet<'a> {
    /// Orders `retained` by descending score and keeps the first `limit`.
    ///
    /// The sort is stable, so equal scores keep their merge order.
    /// Returns the set and the loadouts cut by truncation.
    pub fn assemble(
        mut retained: Vec<ScoredLoadout<'a>>,
        limit: usize,
        statistics: SearchStatistics,
    ) -> (Self, Vec<ScoredLoadout<'a>>) {
        retained.sort_by(|a, b| b.score.total_cmp(&a.score));
        let removed = if retained.len() > limit {
            retained.split_off(limit)
        } else {
            Vec::new()
        };
        let set = Self {
            builds: retained,
            statistics,
        };
        (set, removed)
    }

    /// The highest-scoring loadout.
    pub fn best(&self) -> Option<&ScoredLoadout<'a>> {
        self.builds.first()
    }

    pub fn builds(&self) -> &[ScoredLoadout<'a>] {
        &self.builds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredLoadout<'a>> {
        self.builds.iter()
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn into_builds(self) -> Vec<ScoredLoadout<'a>> {
        self.builds
    }
}

impl<'s, 'a> IntoIterator for &'s ResultSet<'a> {
    type Item = &'s ScoredLoadout<'a>;
    type IntoIter = std::slice::Iter<'s, ScoredLoadout<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use runeforge_core::{Prediction, Rune, RuneSet};
    use runeforge_test::full_set;

    use super::*;

    fn scored(runes: &[Rune], score: f64) -> ScoredLoadout<'_> {
        let refs: [&Rune; SLOT_COUNT] = std::array::from_fn(|i| &runes[i]);
        ScoredLoadout::new(
            Loadout::new(refs, [Prediction::NEUTRAL; SLOT_COUNT]),
            AttributeVector::new(),
            score,
        )
    }

    #[test]
    fn test_assemble_sorts_and_truncates() {
        let a = full_set(1, RuneSet::Energy);
        let b = full_set(10, RuneSet::Guard);
        let c = full_set(20, RuneSet::Blade);

        let (set, removed) = ResultSet::assemble(
            vec![scored(&a, 10.0), scored(&b, 15.0), scored(&c, 12.0)],
            2,
            SearchStatistics::default(),
        );
        let scores: Vec<f64> = set.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![15.0, 12.0]);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].score, 10.0);
        assert_eq!(set.best().map(|s| s.rune_ids()[0]), Some(10));
    }

    #[test]
    fn test_ties_keep_merge_order() {
        let a = full_set(1, RuneSet::Energy);
        let b = full_set(10, RuneSet::Guard);

        let (set, _) = ResultSet::assemble(
            vec![scored(&a, 5.0), scored(&b, 5.0)],
            1,
            SearchStatistics::default(),
        );
        assert_eq!(set.best().map(|s| s.rune_ids()[0]), Some(1));
    }

    #[test]
    fn test_empty() {
        let (set, removed) = ResultSet::assemble(Vec::new(), 1, SearchStatistics::default());
        assert!(set.is_empty());
        assert!(set.best().is_none());
        assert!(removed.is_empty());
    }
}
