//! Deterministic, pure roster logic.
//!
//! Core modules must be free of I/O side effects. They operate on an in-memory
//! [`Roster`](crate::roster::Roster), take timestamps and resolved species as
//! inputs, and return deterministic outputs suitable for tests.

pub mod availability;
pub mod evolution;
pub mod fusion;
pub mod ids;
pub mod invariants;
pub mod pairing;
pub mod team;
pub mod types;
pub mod used_flags;
