//! Read-side selections computed from the derived `used` flags.

use crate::core::types::AvailableSlot;
use crate::roster::{GraveyardEntry, Pairing, Player, Roster};

/// Live pairings whose `player` slot is free, in insertion order.
pub fn available_for(roster: &Roster, player: Player) -> Vec<AvailableSlot> {
    roster
        .pairings
        .iter()
        .filter(|p| !p.dead && !p.slot(player).used)
        .map(|p| {
            let slot = p.slot(player);
            AvailableSlot {
                pairing_id: p.id.clone(),
                number: slot.number,
                name: slot.name.clone(),
            }
        })
        .collect()
}

/// Live pairings with neither slot used.
pub fn unfused_pairings(roster: &Roster) -> Vec<&Pairing> {
    roster
        .pairings
        .iter()
        .filter(|p| !p.dead && !p.in_use())
        .collect()
}

/// Graveyard entries, most recent burial first.
pub fn graveyard_newest_first(roster: &Roster) -> Vec<&GraveyardEntry> {
    roster.graveyard.iter().rev().collect()
}
