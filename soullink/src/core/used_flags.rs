//! Derived `used` flags for pairing slots.
//!
//! A slot is used iff its pairing is dead or some fusion component on the same
//! player side references the pairing. The flags are never maintained at
//! mutation sites; this pass rebuilds them wholesale from `dead` and the
//! fusion list, so it is idempotent and order-independent.

use std::collections::HashMap;

use crate::roster::{Player, Roster};

/// Recompute every slot's `used` flag from scratch.
///
/// Returns the `(pairing id, player)` slots whose flag changed, sorted, so
/// callers can log drift between the stored and derived state.
pub fn recompute_used_flags(roster: &mut Roster) -> Vec<(String, Player)> {
    let before: Vec<[bool; 2]> = roster
        .pairings
        .iter()
        .map(|p| [p.player1.used, p.player2.used])
        .collect();

    for pairing in &mut roster.pairings {
        pairing.player1.used = pairing.dead;
        pairing.player2.used = pairing.dead;
    }

    let index: HashMap<String, usize> = roster
        .pairings
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.id.clone(), idx))
        .collect();

    for fusion in &roster.fusions {
        for (player, component) in fusion.components() {
            // Components whose pairing is gone are left dangling.
            if let Some(&idx) = index.get(&component.pairing_id) {
                roster.pairings[idx].slot_mut(player).used = true;
            }
        }
    }

    let mut changed = Vec::new();
    for (pairing, flags) in roster.pairings.iter().zip(before) {
        for (player, was) in Player::BOTH.into_iter().zip(flags) {
            if pairing.slot(player).used != was {
                changed.push((pairing.id.clone(), player));
            }
        }
    }
    changed.sort();
    changed
}
