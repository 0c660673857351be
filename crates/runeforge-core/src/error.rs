//! Error types for RuneForge

use thiserror::Error;

/// Main error type for RuneForge domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuneForgeError {
    /// Attribute name outside the closed attribute set.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Filter tier key that is not `g`, `o`, `e` or a slot number.
    #[error("unknown filter tier: {0}")]
    UnknownTier(String),

    /// Rune stat kind name that is not recognized.
    #[error("unknown stat kind: {0}")]
    UnknownStatKind(String),

    /// Rune set name that is not recognized.
    #[error("unknown rune set: {0}")]
    UnknownSet(String),

    /// Slot index outside 1..=6.
    #[error("invalid slot: {0} (expected 1..=6)")]
    InvalidSlot(u8),

    /// Error in build configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failure reported by a [`StatEngine`](crate::StatEngine) for a single loadout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stat derivation failed: {message}")]
pub struct StatError {
    pub message: String,
}

impl StatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type alias for RuneForge operations
pub type Result<T> = std::result::Result<T, RuneForgeError>;
