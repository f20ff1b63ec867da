//! Stable exit codes for `soullink` commands.

use crate::error::ErrorKind;

/// Command succeeded (possibly with a persistence warning on stderr).
pub const OK: i32 = 0;
/// Invalid config, arguments, or other unexpected failure.
pub const INVALID: i32 = 1;
/// A referenced pairing, fusion, graveyard entry or team uid does not exist.
pub const NOT_FOUND: i32 = 2;
/// A precondition was violated (already fused, team full, ...).
pub const CONFLICT: i32 = 3;
/// The operation targeted a dead or terminal entity.
pub const INVALID_STATE: i32 = 4;
/// `soullink validate` found invariant violations.
pub const INCONSISTENT: i32 = 5;

pub fn for_kind(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::NotFound => NOT_FOUND,
        ErrorKind::Conflict => CONFLICT,
        ErrorKind::InvalidState => INVALID_STATE,
        ErrorKind::PersistenceWarning => OK,
    }
}
