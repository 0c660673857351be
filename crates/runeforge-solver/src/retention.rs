//! Retention of passing loadouts while a search runs.
//!
//! Two strategies hold the retained loadouts. Local buffers give each
//! worker its own vector and keep-best-only compares against a cached
//! maximum; buffers merge once enumeration ends. The shared scan keeps one
//! locked vector and rescans it for the maximum before every append.

use std::sync::{Mutex, PoisonError};

use crate::result::ScoredLoadout;

/// Which passing loadouts are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Every passing loadout.
    #[default]
    KeepAll,
    /// Only a loadout that strictly beats everything retained so far.
    KeepBestOnly,
}

impl RetentionPolicy {
    pub fn from_keep_best_only(keep_best_only: bool) -> Self {
        if keep_best_only {
            RetentionPolicy::KeepBestOnly
        } else {
            RetentionPolicy::KeepAll
        }
    }
}

/// A worker's private buffer.
#[derive(Debug)]
pub(crate) struct LocalBuffer<'a> {
    policy: RetentionPolicy,
    builds: Vec<ScoredLoadout<'a>>,
    best: f64,
}

impl<'a> LocalBuffer<'a> {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            policy,
            builds: Vec::new(),
            best: f64::NEG_INFINITY,
        }
    }

    pub fn offer(&mut self, build: ScoredLoadout<'a>) -> bool {
        if self.policy == RetentionPolicy::KeepBestOnly
            && !self.builds.is_empty()
            && build.score <= self.best
        {
            return false;
        }
        self.best = self.best.max(build.score);
        self.builds.push(build);
        true
    }

    pub fn into_builds(self) -> Vec<ScoredLoadout<'a>> {
        self.builds
    }
}

/// One container shared by every worker.
#[derive(Debug)]
pub(crate) struct SharedResults<'a> {
    policy: RetentionPolicy,
    builds: Mutex<Vec<ScoredLoadout<'a>>>,
}

impl<'a> SharedResults<'a> {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            policy,
            builds: Mutex::new(Vec::new()),
        }
    }

    pub fn offer(&self, build: ScoredLoadout<'a>) -> bool {
        let mut builds = self.builds.lock().unwrap_or_else(PoisonError::into_inner);
        if self.policy == RetentionPolicy::KeepBestOnly && !builds.is_empty() {
            let best = builds
                .iter()
                .map(|b| b.score)
                .fold(f64::NEG_INFINITY, f64::max);
            if build.score <= best {
                return false;
            }
        }
        builds.push(build);
        true
    }

    pub fn into_builds(self) -> Vec<ScoredLoadout<'a>> {
        self.builds
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Where a worker sends the loadouts it finds.
#[derive(Debug)]
pub(crate) enum Sink<'s, 'a> {
    Local(LocalBuffer<'a>),
    Shared(&'s SharedResults<'a>),
}

impl<'s, 'a> Sink<'s, 'a> {
    pub fn offer(&mut self, build: ScoredLoadout<'a>) -> bool {
        match self {
            Sink::Local(buffer) => buffer.offer(build),
            Sink::Shared(shared) => shared.offer(build),
        }
    }

    /// Builds held privately; empty for the shared container.
    pub fn into_builds(self) -> Vec<ScoredLoadout<'a>> {
        match self {
            Sink::Local(buffer) => buffer.into_builds(),
            Sink::Shared(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use runeforge_core::{AttributeVector, Loadout, Prediction, Rune, RuneSet, SLOT_COUNT};
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

    fn scores(builds: &[ScoredLoadout<'_>]) -> Vec<f64> {
        builds.iter().map(|b| b.score).collect()
    }

    #[test]
    fn test_keep_all() {
        let runes = full_set(1, RuneSet::Energy);
        let mut buffer = LocalBuffer::new(RetentionPolicy::KeepAll);
        for score in [10.0, 15.0, 12.0] {
            assert!(buffer.offer(scored(&runes, score)));
        }
        assert_eq!(scores(&buffer.into_builds()), vec![10.0, 15.0, 12.0]);
    }

    #[test]
    fn test_keep_best_only_local() {
        let runes = full_set(1, RuneSet::Energy);
        let mut buffer = LocalBuffer::new(RetentionPolicy::KeepBestOnly);
        assert!(buffer.offer(scored(&runes, 10.0)));
        assert!(buffer.offer(scored(&runes, 15.0)));
        assert!(!buffer.offer(scored(&runes, 12.0)));
        assert!(!buffer.offer(scored(&runes, 15.0)));
        assert_eq!(scores(&buffer.into_builds()), vec![10.0, 15.0]);
    }

    #[test]
    fn test_keep_best_only_shared() {
        let runes = full_set(1, RuneSet::Energy);
        let shared = SharedResults::new(RetentionPolicy::KeepBestOnly);
        let mut sink = Sink::Shared(&shared);
        assert!(sink.offer(scored(&runes, 10.0)));
        assert!(sink.offer(scored(&runes, 15.0)));
        assert!(!sink.offer(scored(&runes, 12.0)));
        assert!(sink.into_builds().is_empty());
        assert_eq!(scores(&shared.into_builds()), vec![10.0, 15.0]);
    }

    #[test]
    fn test_negative_first_score_is_kept() {
        let runes = full_set(1, RuneSet::Energy);
        let mut buffer = LocalBuffer::new(RetentionPolicy::KeepBestOnly);
        assert!(buffer.offer(scored(&runes, -3.0)));
        assert!(!buffer.offer(scored(&runes, -4.0)));
    }

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(
            RetentionPolicy::from_keep_best_only(true),
            RetentionPolicy::KeepBestOnly
        );
        assert_eq!(RetentionPolicy::from_keep_best_only(false), RetentionPolicy::KeepAll);
    }
}
