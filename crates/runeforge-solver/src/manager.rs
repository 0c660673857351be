//! Build manager: the caller-facing search surface.
//!
//! A [`BuildManager`] owns the stat engine, the character and the build
//! configuration. It builds candidate pools, runs searches against them,
//! exposes a cancellation handle and remembers the best loadout of the
//! last run.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use runeforge_config::{BuildConfig, ConfigError, SearchConfig};
use runeforge_core::{AttributeVector, Character, Rune, StatEngine, SLOT_COUNT};

use crate::event::{FnEventListener, SearchEventListener};
use crate::pool::{CandidatePools, PoolBuilder};
use crate::result::{ResultSet, ScoredLoadout};
use crate::search::BruteForceSearch;
use crate::termination::CancellationToken;

/// Owned summary of the best loadout of a finished search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestBuild {
    pub rune_ids: [u64; SLOT_COUNT],
    pub score: f64,
    pub attributes: AttributeVector,
}

impl From<&ScoredLoadout<'_>> for BestBuild {
    fn from(build: &ScoredLoadout<'_>) -> Self {
        Self {
            rune_ids: build.rune_ids(),
            score: build.score,
            attributes: build.attributes,
        }
    }
}

type MessageCallback<'f> = dyn Fn(&str) + Send + Sync + 'f;
type ProgressCallback<'f> = dyn Fn(f64) + Send + Sync + 'f;

/// Finds rune loadouts for one character.
///
/// # Example
///
/// ```
/// use runeforge_config::BuildConfig;
/// use runeforge_core::{Attribute, RuneSet};
/// use runeforge_solver::BuildManager;
/// use runeforge_test::{character, full_set, TableStatEngine};
///
/// let mut inventory = full_set(1, RuneSet::Violent);
/// inventory.extend(full_set(10, RuneSet::Violent));
///
/// let build = BuildConfig::new()
///     .with_build_sets([RuneSet::Violent])
///     .with_weight(Attribute::Spd, 1.0);
/// let manager = BuildManager::new(TableStatEngine::new(), character(), build);
///
/// let pools = manager.gen_runes(&inventory).unwrap();
/// let results = manager.gen_builds(&pools, 5, 0, None, None, false);
///
/// assert_eq!(results.len(), 5);
/// assert_eq!(manager.best().map(|b| b.score), results.best().map(|b| b.score));
/// ```
pub struct BuildManager<E: StatEngine> {
    engine: E,
    character: Character,
    build: BuildConfig,
    search: SearchConfig,
    token: CancellationToken,
    running: AtomicBool,
    listeners: Vec<Arc<dyn SearchEventListener>>,
    best: Mutex<Option<BestBuild>>,
}

impl<E: StatEngine> BuildManager<E> {
    pub fn new(engine: E, character: Character, build: BuildConfig) -> Self {
        Self {
            engine,
            character,
            build,
            search: SearchConfig::default(),
            token: CancellationToken::new(),
            running: AtomicBool::new(false),
            listeners: Vec::new(),
            best: Mutex::new(None),
        }
    }

    /// Defaults for pool visibility, threads and retention strategy.
    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Registers a listener for every subsequent search.
    pub fn add_listener(&mut self, listener: Arc<dyn SearchEventListener>) {
        self.listeners.push(listener);
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Builds the six candidate pools from `inventory`.
    ///
    /// Locked runes and runes equipped on other characters are included
    /// only if the search configuration asks for them.
    ///
    /// # Errors
    ///
    /// Returns the build configuration's validation error before any
    /// filtering takes place.
    pub fn gen_runes<'a>(
        &self,
        inventory: &'a [Rune],
    ) -> Result<CandidatePools<'a>, ConfigError> {
        PoolBuilder::new(&self.build)
            .with_include_locked(self.search.include_locked)
            .with_include_equipped(self.search.include_equipped)
            .build(inventory, &self.character, &self.engine)
    }

    /// Searches `pools` and returns the ranked loadouts.
    ///
    /// `top` results are kept (zero keeps the single best) and a non-zero
    /// `top` also ends the search once that many loadouts are retained.
    /// `time_limit_secs` of zero means no time limit. The callbacks receive
    /// status text and the evaluated fraction, possibly from worker threads.
    pub fn gen_builds<'a>(
        &self,
        pools: &CandidatePools<'a>,
        top: usize,
        time_limit_secs: u64,
        on_message: Option<&MessageCallback<'_>>,
        on_progress: Option<&ProgressCallback<'_>>,
        keep_best_only: bool,
    ) -> ResultSet<'a> {
        let search = self
            .search
            .clone()
            .with_top(top)
            .with_time_limit_secs(time_limit_secs)
            .with_keep_best_only(keep_best_only);
        let callbacks = FnEventListener::new(on_message, on_progress);
        self.run(pools, &search, Some(Arc::new(callbacks)))
    }

    /// Searches `pools` with an explicit search configuration.
    pub fn search<'a>(&self, pools: &CandidatePools<'a>, search: &SearchConfig) -> ResultSet<'a> {
        self.run(pools, search, None)
    }

    /// Builds pools from `inventory` and searches them with the stored
    /// search configuration.
    pub fn optimize<'a>(&self, inventory: &'a [Rune]) -> Result<ResultSet<'a>, ConfigError> {
        let pools = self.gen_runes(inventory)?;
        Ok(self.search(&pools, &self.search))
    }

    fn run<'a, 'e>(
        &'e self,
        pools: &CandidatePools<'a>,
        search: &SearchConfig,
        extra: Option<Arc<dyn SearchEventListener + 'e>>,
    ) -> ResultSet<'a> {
        self.token.reset();
        self.running.store(true, Ordering::Release);

        let mut engine =
            BruteForceSearch::from_config(&self.engine, &self.character, &self.build, search);
        for listener in &self.listeners {
            engine = engine.with_listener(listener.clone());
        }
        if let Some(listener) = extra {
            engine = engine.with_listener(listener);
        }

        let results = engine.run(pools, &self.token);
        *self.best.lock().unwrap_or_else(PoisonError::into_inner) =
            results.best().map(BestBuild::from);
        self.running.store(false, Ordering::Release);
        results
    }

    /// Requests that a running search stop. Idempotent; returns at once.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A handle other threads can use to cancel the current search.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Best loadout of the last finished search.
    pub fn best(&self) -> Option<BestBuild> {
        *self.best.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: StatEngine + Debug> Debug for BuildManager<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildManager")
            .field("engine", &self.engine)
            .field("character", &self.character.name)
            .field("running", &self.is_running())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
