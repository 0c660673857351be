//! Exhaustive Cartesian-product search.
//!
//! The first slot's candidates are the unit of parallel work. Each rayon
//! task walks the remaining five slots sequentially, evaluating every
//! combination, and flushes its private counters to the shared
//! [`SearchScope`] after each pass over the two innermost slots.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use runeforge_config::{BuildConfig, RetentionStrategy, SearchConfig, ThreadCount};
use runeforge_core::{Character, Loadout, Rune, StatEngine};
use tracing::{debug, info, warn};

use crate::event::{SearchEventListener, SearchEventSupport, NO_RESULTS_MESSAGE};
use crate::pool::CandidatePools;
use crate::result::{ResultSet, ScoredLoadout};
use crate::retention::{LocalBuffer, RetentionPolicy, SharedResults, Sink};
use crate::scope::{SearchScope, Tally};
use crate::scoring::{BuildScorer, Verdict};
use crate::termination::{
    CancellationToken, OrTermination, ResultCountTermination, Termination, TimeTermination,
};

/// Minimum spacing of progress reports from one worker.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// The clock is read once per this many combinations, plus at every flush.
const CLOCK_CHECK_MASK: u64 = 0xFF;

/// Per-task state carried through the rayon fold.
struct Worker<'s, 'a> {
    sink: Sink<'s, 'a>,
    tally: Tally,
    ticks: u64,
    last_report: Instant,
}

impl<'s, 'a> Worker<'s, 'a> {
    fn new(sink: Sink<'s, 'a>) -> Self {
        Self {
            sink,
            tally: Tally::default(),
            ticks: 0,
            last_report: Instant::now(),
        }
    }
}

/// Brute-force loadout search.
///
/// # Example
///
/// ```
/// use runeforge_config::{BuildConfig, SearchConfig};
/// use runeforge_core::{Attribute, RuneSet};
/// use runeforge_solver::{BruteForceSearch, CancellationToken, PoolBuilder};
/// use runeforge_test::{character, full_set, TableStatEngine};
///
/// let mut inventory = full_set(1, RuneSet::Energy);
/// inventory.extend(full_set(10, RuneSet::Energy));
/// let build = BuildConfig::new()
///     .with_build_sets([RuneSet::Energy])
///     .with_weight(Attribute::Atk, 10.0);
///
/// let engine = TableStatEngine::new();
/// let character = character();
/// let pools = PoolBuilder::new(&build).build(&inventory, &character, &engine).unwrap();
///
/// let search = BruteForceSearch::from_config(&engine, &character, &build, &SearchConfig::new());
/// let results = search.run(&pools, &CancellationToken::new());
///
/// assert_eq!(results.len(), 1);
/// assert_eq!(results.statistics().evaluated, 64);
/// ```
pub struct BruteForceSearch<'e, E> {
    engine: &'e E,
    character: &'e Character,
    scorer: BuildScorer,
    policy: RetentionPolicy,
    strategy: RetentionStrategy,
    result_count: usize,
    termination: Option<Box<dyn Termination + 'e>>,
    thread_count: ThreadCount,
    events: SearchEventSupport<'e>,
}

impl<'e, E: StatEngine> BruteForceSearch<'e, E> {
    /// Keeps every passing loadout and returns the single best, with no
    /// budget and automatic thread count.
    pub fn new(engine: &'e E, character: &'e Character, scorer: BuildScorer) -> Self {
        Self {
            engine,
            character,
            scorer,
            policy: RetentionPolicy::KeepAll,
            strategy: RetentionStrategy::LocalBuffers,
            result_count: 1,
            termination: None,
            thread_count: ThreadCount::Auto,
            events: SearchEventSupport::new(),
        }
    }

    /// A search scored by `build` and shaped by `search`: retention,
    /// result count, thread count and the time and result budgets.
    pub fn from_config(
        engine: &'e E,
        character: &'e Character,
        build: &BuildConfig,
        search: &SearchConfig,
    ) -> Self {
        let termination = OrTermination::new((
            search.time_limit().map(TimeTermination::new),
            search
                .result_limit()
                .map(|limit| ResultCountTermination::new(limit as u64)),
        ));
        Self::new(engine, character, BuildScorer::new(build))
            .with_policy(RetentionPolicy::from_keep_best_only(search.keep_best_only))
            .with_strategy(search.retention_strategy)
            .with_result_count(search.result_count())
            .with_thread_count(search.thread_count)
            .with_termination(termination)
    }

    pub fn with_policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_strategy(mut self, strategy: RetentionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Size of the final result set. Clamped to at least one.
    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = count.max(1);
        self
    }

    pub fn with_termination<T: Termination + 'e>(mut self, termination: T) -> Self {
        self.termination = Some(Box::new(termination));
        self
    }

    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn SearchEventListener + 'e>) -> Self {
        self.events.add_listener(listener);
        self
    }

    pub fn events_mut(&mut self) -> &mut SearchEventSupport<'e> {
        &mut self.events
    }

    /// Enumerates every combination of `pools` until the space is
    /// exhausted, a termination fires or `token` is cancelled.
    ///
    /// A cancelled run still sorts, truncates and reports completion.
    pub fn run<'a>(&self, pools: &CandidatePools<'a>, token: &CancellationToken) -> ResultSet<'a> {
        let scope = SearchScope::new(pools.combination_count(), token.clone());
        let threads = self.thread_count.resolve(pools.slot(1).len());
        info!(
            event = "search_start",
            character = %self.character.name,
            total = scope.total(),
            sizes = ?pools.sizes(),
            threads,
            policy = ?self.policy,
            strategy = ?self.strategy,
        );

        let retained = if scope.total() == 0 || !scope.is_running() {
            Vec::new()
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| self.enumerate(pools, &scope)),
                Err(err) => {
                    warn!(event = "thread_pool_error", error = %err, "using the global pool");
                    self.enumerate(pools, &scope)
                }
            }
        };

        self.finish(&scope, retained)
    }

    fn sink<'s, 'a>(&self, shared: &'s SharedResults<'a>) -> Sink<'s, 'a> {
        match self.strategy {
            RetentionStrategy::LocalBuffers => Sink::Local(LocalBuffer::new(self.policy)),
            RetentionStrategy::SharedScan => Sink::Shared(shared),
        }
    }

    fn enumerate<'a>(
        &self,
        pools: &CandidatePools<'a>,
        scope: &SearchScope,
    ) -> Vec<ScoredLoadout<'a>> {
        let shared = SharedResults::new(self.policy);

        let local = pools
            .slot(1)
            .runes()
            .par_iter()
            .fold(
                || Worker::new(self.sink(&shared)),
                |mut worker, &first| {
                    if scope.is_running() {
                        self.search_from(first, pools, scope, &mut worker);
                    }
                    worker
                },
            )
            .map(|mut worker| {
                scope.flush(&mut worker.tally);
                worker.sink.into_builds()
            })
            .reduce(Vec::new, |mut left, mut right| {
                left.append(&mut right);
                left
            });

        match self.strategy {
            RetentionStrategy::LocalBuffers => local,
            RetentionStrategy::SharedScan => shared.into_builds(),
        }
    }

    /// Walks slots 2..=6 for one first-slot rune.
    fn search_from<'a>(
        &self,
        first: &'a Rune,
        pools: &CandidatePools<'a>,
        scope: &SearchScope,
        worker: &mut Worker<'_, 'a>,
    ) {
        let [_, second_pool, third_pool, fourth_pool, fifth_pool, sixth_pool] = pools.slots();
        let predictions = pools.predictions();

        'outer: for &second in second_pool.runes() {
            for &third in third_pool.runes() {
                for &fourth in fourth_pool.runes() {
                    for &fifth in fifth_pool.runes() {
                        for &sixth in sixth_pool.runes() {
                            let runes = [first, second, third, fourth, fifth, sixth];
                            self.evaluate(Loadout::new(runes, predictions), scope, worker);

                            worker.ticks += 1;
                            if worker.ticks & CLOCK_CHECK_MASK == 0
                                && worker.last_report.elapsed() >= PROGRESS_INTERVAL
                            {
                                self.report_progress(scope, worker);
                            }
                            if !scope.is_running() {
                                break 'outer;
                            }
                        }
                    }

                    scope.flush(&mut worker.tally);
                    if worker.last_report.elapsed() >= PROGRESS_INTERVAL {
                        self.report_progress(scope, worker);
                    } else {
                        self.check_termination(scope);
                    }
                    if !scope.is_running() {
                        break 'outer;
                    }
                }
            }
        }
    }

    fn evaluate<'a>(&self, loadout: Loadout<'a>, scope: &SearchScope, worker: &mut Worker<'_, 'a>) {
        worker.tally.evaluated += 1;

        let attributes = match self.engine.attributes_for(self.character, &loadout) {
            Ok(attributes) => attributes,
            Err(err) => {
                worker.tally.engine_failures += 1;
                if scope.first_engine_failure() {
                    warn!(
                        event = "engine_error",
                        error = %err,
                        runes = ?loadout.rune_ids(),
                        "further failures are only counted"
                    );
                    self.events.fire_progress_message(&err.to_string());
                }
                return;
            }
        };

        match self.scorer.evaluate(&loadout, &attributes) {
            Verdict::Rejected(reason) => worker.tally.reject(reason),
            Verdict::Accepted(score) => {
                worker.tally.passed += 1;
                let build = ScoredLoadout::new(loadout, attributes, score);
                if worker.sink.offer(build) {
                    worker.tally.retained += 1;
                    self.events.fire_result_added(&build);
                }
            }
        }
    }

    fn report_progress(&self, scope: &SearchScope, worker: &mut Worker<'_, '_>) {
        scope.flush(&mut worker.tally);
        worker.last_report = Instant::now();

        let completed = scope.evaluated();
        let total = scope.total();
        let fraction = scope.progress();
        debug!(event = "progress", completed, total, passed = scope.passed());

        self.events.fire_progress(fraction);
        self.events.fire_progress_count(completed, total);
        self.events
            .fire_progress_message(&format!("{:.2}%", fraction * 100.0));
        self.check_termination(scope);
    }

    fn check_termination(&self, scope: &SearchScope) {
        if !scope.is_running() {
            return;
        }
        if let Some(reason) = self.termination.as_ref().and_then(|t| t.triggered(scope)) {
            debug!(event = "termination", reason = %reason);
            scope.stop(reason);
        }
    }

    fn finish<'a>(&self, scope: &SearchScope, retained: Vec<ScoredLoadout<'a>>) -> ResultSet<'a> {
        let statistics = scope.statistics();
        let (results, removed) = ResultSet::assemble(retained, self.result_count, statistics);
        for build in &removed {
            self.events.fire_result_removed(build);
        }

        self.events.fire_progress(1.0);
        self.events
            .fire_progress_count(statistics.evaluated, statistics.total);
        self.events.fire_progress_message("100%");
        if results.is_empty() {
            self.events.fire_progress_message(NO_RESULTS_MESSAGE);
        }

        info!(
            event = "search_end",
            evaluated = statistics.evaluated,
            passed = statistics.passed,
            discarded = statistics.discarded(),
            retained = results.len(),
            duration_ms = statistics.duration.as_millis() as u64,
            speed = statistics.speed() as u64,
            stop_reason = %statistics.stop_reason,
        );

        self.events.fire_completed(&results);
        results
    }
}
