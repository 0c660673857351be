//! The stat-derivation seam.
//!
//! RuneForge never computes combat math itself. Base/growth curves, main
//! and sub-stat composition and set bonuses live behind [`StatEngine`].

use crate::attribute::AttributeVector;
use crate::error::StatError;
use crate::loadout::Loadout;
use crate::prediction::Prediction;
use crate::rune::{Rune, RuneAmounts};

/// The character a loadout is built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Owner name matched against [`Rune::assigned_to`].
    pub name: String,
    /// Base attributes before runes.
    pub base: AttributeVector,
}

impl Character {
    pub fn new(name: impl Into<String>, base: AttributeVector) -> Self {
        Self {
            name: name.into(),
            base,
        }
    }
}

/// External, pure attribute derivation.
///
/// Implementations are called concurrently from search workers and must
/// not rely on call order.
pub trait StatEngine: Send + Sync {
    /// Resolves the full attribute vector (primary and derived) of
    /// `character` wearing `loadout`.
    fn attributes_for(
        &self,
        character: &Character,
        loadout: &Loadout<'_>,
    ) -> Result<AttributeVector, StatError>;

    /// Flat and percent amounts of a single rune under `prediction`.
    ///
    /// Used by candidate filtering. The default ignores the prediction.
    fn rune_amounts(&self, rune: &Rune, _prediction: Prediction) -> RuneAmounts {
        rune.amounts()
    }
}

impl<E: StatEngine + ?Sized> StatEngine for &E {
    fn attributes_for(
        &self,
        character: &Character,
        loadout: &Loadout<'_>,
    ) -> Result<AttributeVector, StatError> {
        (**self).attributes_for(character, loadout)
    }

    fn rune_amounts(&self, rune: &Rune, prediction: Prediction) -> RuneAmounts {
        (**self).rune_amounts(rune, prediction)
    }
}
