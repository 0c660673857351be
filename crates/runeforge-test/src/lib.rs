//! Shared test fixtures for RuneForge crates.
//!
//! - [`rune`] - rune builders and ready-made six-slot sets
//! - [`engine`] - deterministic stat engines, including one that fails
//! - [`inventory`] - reproducible random inventories
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! runeforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use runeforge_core::RuneSet;
//! use runeforge_test::{character, full_set, TableStatEngine};
//!
//! let runes = full_set(1, RuneSet::Violent);
//! assert_eq!(runes.len(), 6);
//! assert_eq!(character().name, "Tester");
//! let _engine = TableStatEngine::new();
//! ```

pub mod engine;
pub mod inventory;
pub mod rune;

pub use engine::{character, FailingStatEngine, TableStatEngine};
pub use inventory::random_inventory;
pub use rune::{full_set, RuneBuilder};
