//! RuneForge - Rune Loadout Optimizer
//!
//! Describe a build, hand over an inventory and a stat engine, and get the
//! best-scoring loadouts back.
//!
//! # Example
//!
//! ```rust
//! use runeforge::prelude::*;
//! use runeforge_test::{character, full_set, TableStatEngine};
//!
//! let inventory = full_set(1, RuneSet::Energy);
//! let config = OptimizerConfig {
//!     build: BuildConfig::new()
//!         .with_build_sets([RuneSet::Energy])
//!         .with_weight(Attribute::Spd, 1.0),
//!     ..OptimizerConfig::default()
//! };
//!
//! let results = run_optimizer(TableStatEngine::new(), character(), &inventory, &config).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results.best().map(|b| b.score), Some(100.0));
//! ```

// Domain types
pub use runeforge_core::{
    Attribute, AttributeVector, Character, FilterOperator, Loadout, Prediction, Rune,
    RuneAmounts, RuneFilter, RuneForgeError, RuneSet, StatEngine, StatError, StatKind, StatValue,
    Tier, SLOT_COUNT,
};

// Configuration
pub use runeforge_config::{
    BuildConfig, ConfigError, OptimizerConfig, RetentionStrategy, SearchConfig, ThreadCount,
};

// Search
pub use runeforge_solver::{
    BestBuild, BruteForceSearch, BuildManager, BuildScorer, CancellationToken, CandidatePools,
    PoolBuilder, ResultSet, ScoredLoadout, SearchStatistics, StopReason,
};

// Events
pub use runeforge_solver::{
    ChannelEventListener, CountingEventListener, LoggingEventListener, SearchEvent,
    SearchEventListener,
};

/// Lower-level solver building blocks.
pub use runeforge_solver as solver;

#[cfg(feature = "console")]
pub use runeforge_console as console;

mod optimizer;
pub use optimizer::{run_optimizer, run_optimizer_from_file};

pub mod prelude {
    pub use super::{run_optimizer, run_optimizer_from_file};
    pub use super::{Attribute, Character, Rune, RuneSet, StatEngine, StatKind, Tier};
    pub use super::{BuildConfig, OptimizerConfig, SearchConfig};
    pub use super::{BuildManager, ResultSet, StopReason};
}
