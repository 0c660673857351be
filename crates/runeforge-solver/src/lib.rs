//! RuneForge Solver Engine
//!
//! This crate turns an inventory snapshot into ranked rune loadouts:
//! - Candidate filtering over global, parity and slot tiers
//! - Pool building with set-feasibility pruning
//! - Constraint checking and weighted scoring
//! - Exhaustive, parallel Cartesian-product search
//! - Termination (time and result budgets, cooperative cancellation)
//! - Event system for progress reporting

pub mod event;
pub mod filter;
pub mod manager;
pub mod pool;
pub mod result;
pub mod retention;
pub mod scope;
pub mod scoring;
pub mod search;
pub mod statistics;
pub mod termination;

pub use event::{
    ChannelEventListener, CountingEventListener, FnEventListener, LoggingEventListener,
    SearchEvent, SearchEventListener, SearchEventSupport,
};
pub use filter::{AttributeTest, FilterOp};
pub use manager::{BestBuild, BuildManager};
pub use pool::{CandidatePools, PoolBuilder, SlotPool};
pub use result::{ResultSet, ScoredLoadout};
pub use retention::RetentionPolicy;
pub use scope::SearchScope;
pub use scoring::{BuildScorer, RejectReason, Verdict};
pub use search::BruteForceSearch;
pub use statistics::{SearchStatistics, StopReason};
pub use termination::{
    CancellationToken, OrTermination, ResultCountTermination, Termination, TimeTermination,
};
