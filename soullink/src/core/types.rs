//! Shared deterministic types for the roster core.
//!
//! These types are the inputs and outputs of core operations. They are not
//! persisted; the on-disk shapes live in [`crate::roster`].

use crate::roster::SpeciesRef;

/// A resolved species: number plus the directory name (empty if unknown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    pub number: u32,
    pub name: String,
}

impl Species {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

impl From<Species> for SpeciesRef {
    fn from(species: Species) -> Self {
        SpeciesRef {
            number: species.number,
            name: species.name,
        }
    }
}

/// A creature a player may pick, identified by its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamCandidate {
    Pairing(String),
    Fusion(String),
}

impl TeamCandidate {
    pub fn source_id(&self) -> &str {
        match self {
            TeamCandidate::Pairing(id) | TeamCandidate::Fusion(id) => id,
        }
    }
}

/// An unused, live pairing slot offered for fusion selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableSlot {
    pub pairing_id: String,
    pub number: u32,
    pub name: String,
}

/// Which pairings a burial moved to the graveyard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuryOutcome {
    pub fusion_id: String,
    /// Empty when neither source pairing still existed.
    pub buried: Vec<String>,
}

/// Result of a team addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAddOutcome {
    pub uid: String,
    /// Counterpart uid when the linked partner's team accepted it.
    pub mirrored: Option<String>,
}

/// Result of a team removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRemoveOutcome {
    pub uid: String,
    /// Counterpart uid when it was present on the partner's team.
    pub mirrored: Option<String>,
}
