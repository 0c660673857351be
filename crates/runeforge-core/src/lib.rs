//! RuneForge Core - domain types for rune loadout optimization
//!
//! This crate provides the fundamental abstractions shared by the other
//! RuneForge crates:
//! - Attribute identifiers and fixed-size attribute vectors
//! - Runes, rune sets and stat kinds
//! - Loadouts (one rune per slot) and set bookkeeping
//! - Threshold filter data types and filter tiers
//! - The [`StatEngine`] trait implemented by the external stat math

pub mod attribute;
pub mod engine;
pub mod error;
pub mod filter;
pub mod loadout;
pub mod prediction;
pub mod rune;
pub mod stat;

#[cfg(feature = "serde")]
mod serde_impls;

pub use attribute::{Attribute, AttributeVector};
pub use engine::{Character, StatEngine};
pub use error::{RuneForgeError, StatError};
pub use filter::{FilterOperator, RuneFilter, Tier};
pub use loadout::{Loadout, SLOT_COUNT};
pub use prediction::Prediction;
pub use rune::{Rune, RuneAmounts, RuneSet};
pub use stat::{StatKind, StatValue};
