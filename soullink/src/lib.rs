//! Roster consistency engine for a two-player soul-linked fusion run.
//!
//! Every creature one player catches is linked to the creature the other
//! player caught at the same encounter (a pairing). Pairings can be fused in
//! same-side pairs, buried, evolved and placed on per-player teams. The crate
//! enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic roster logic (derived flags, fusion
//!   lifecycle, evolution, team sync). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, roster file, species table).
//!
//! [`tracker::Tracker`] owns the roster and sequences core logic with
//! persistence; the `soullink` binary is a thin command surface over it.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod roster;
pub mod species;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tracker;
