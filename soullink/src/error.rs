//! Error types for roster operations.
//!
//! Every mutating operation either applies fully or rejects with a
//! [`RosterError`] before touching the aggregate. A failed save after a
//! successful mutation is not an error: it travels next to the result as a
//! [`PersistenceWarning`].

use std::fmt;

use crate::roster::Player;

/// Coarse classification of failures, stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidState,
    PersistenceWarning,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::PersistenceWarning => "persistence warning",
        };
        f.write_str(label)
    }
}

/// Rejection raised before any mutation is applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("pairing {0} not found")]
    PairingNotFound(String),

    #[error("fusion {0} not found")]
    FusionNotFound(String),

    #[error("graveyard entry {0} not found")]
    GraveyardEntryNotFound(String),

    #[error("{player} team has no entry {uid}")]
    TeamEntryNotFound { player: Player, uid: String },

    #[error("choose two different pairings (got {0} twice)")]
    SamePairing(String),

    #[error("pairing {0} is in the graveyard")]
    PairingDead(String),

    #[error("{player} creature of pairing {pairing_id} is already used")]
    SlotUsed { pairing_id: String, player: Player },

    #[error("pairing {0} is in a fusion; unfuse or bury the fusion first")]
    PairingInUse(String),

    #[error("encounter label must not be empty")]
    EmptyEncounter,

    #[error("{player} team is full ({capacity} entries)")]
    TeamFull { player: Player, capacity: usize },

    #[error("{player} team already contains {uid}")]
    AlreadyOnTeam { player: Player, uid: String },

    #[error("cannot evolve pairing {0}: it is dead")]
    EvolveDead(String),
}

impl RosterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RosterError::PairingNotFound(_)
            | RosterError::FusionNotFound(_)
            | RosterError::GraveyardEntryNotFound(_)
            | RosterError::TeamEntryNotFound { .. } => ErrorKind::NotFound,
            RosterError::SamePairing(_)
            | RosterError::PairingDead(_)
            | RosterError::SlotUsed { .. }
            | RosterError::PairingInUse(_)
            | RosterError::EmptyEncounter
            | RosterError::TeamFull { .. }
            | RosterError::AlreadyOnTeam { .. } => ErrorKind::Conflict,
            RosterError::EvolveDead(_) => ErrorKind::InvalidState,
        }
    }
}

/// The store could not write the roster; the in-memory mutation stands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("roster changes kept in memory but not saved: {message}")]
pub struct PersistenceWarning {
    pub message: String,
}

impl PersistenceWarning {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::PersistenceWarning
    }
}
