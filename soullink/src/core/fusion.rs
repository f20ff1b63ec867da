//! Fusion lifecycle: create, unfuse and bury.
//!
//! Fusing is whole-pairing exclusive. Once pairings `a` and `b` are fused,
//! both players' creatures from each pairing are consumed, so a pairing that
//! is used on either side is rejected up front.

use crate::core::ids::{IdKind, format_id};
use crate::core::types::BuryOutcome;
use crate::error::RosterError;
use crate::roster::{Fusion, FusionComponent, FusionSide, GraveyardEntry, Pairing, Player, Roster};

/// Fuse two distinct, unused pairings and return the new fusion id.
///
/// Preconditions are checked in order and the first failure wins:
/// distinct ids, both exist, neither dead, neither player-1 slot used,
/// neither player-2 slot used.
pub fn create_fusion(
    roster: &mut Roster,
    pairing_a: &str,
    pairing_b: &str,
    now: &str,
) -> Result<String, RosterError> {
    if pairing_a == pairing_b {
        return Err(RosterError::SamePairing(pairing_a.to_string()));
    }
    let a = roster
        .pairing(pairing_a)
        .ok_or_else(|| RosterError::PairingNotFound(pairing_a.to_string()))?;
    let b = roster
        .pairing(pairing_b)
        .ok_or_else(|| RosterError::PairingNotFound(pairing_b.to_string()))?;
    for pairing in [a, b] {
        if pairing.dead {
            return Err(RosterError::PairingDead(pairing.id.clone()));
        }
    }
    for player in Player::BOTH {
        for pairing in [a, b] {
            if pairing.slot(player).used {
                return Err(RosterError::SlotUsed {
                    pairing_id: pairing.id.clone(),
                    player,
                });
            }
        }
    }

    let id = format_id(IdKind::Fusion, roster.next_fusion_id);
    let fusion = Fusion {
        id: id.clone(),
        created_at: now.to_string(),
        player1: fusion_side(a, b, Player::One),
        player2: fusion_side(a, b, Player::Two),
    };

    for pairing_id in [pairing_a, pairing_b] {
        if let Some(pairing) = roster.pairing_mut(pairing_id) {
            pairing.player1.used = true;
            pairing.player2.used = true;
        }
    }
    roster.fusions.push(fusion);
    roster.next_fusion_id += 1;
    Ok(id)
}

/// Remove a fusion. Its pairings become available again once flags are
/// recomputed and no other fusion references them.
pub fn unfuse(roster: &mut Roster, fusion_id: &str) -> Result<Fusion, RosterError> {
    let idx = fusion_index(roster, fusion_id)?;
    Ok(roster.fusions.remove(idx))
}

/// Remove a fusion and move each source pairing that still exists to the
/// graveyard.
///
/// Other fusions referencing the same pairings are not checked; their
/// snapshots are left pointing at the buried ids.
pub fn bury_fusion(
    roster: &mut Roster,
    fusion_id: &str,
    now: &str,
) -> Result<BuryOutcome, RosterError> {
    let idx = fusion_index(roster, fusion_id)?;
    let fusion = roster.fusions.remove(idx);
    let sources = fusion.pairing_ids();

    let mut buried = Vec::new();
    let mut kept = Vec::with_capacity(roster.pairings.len());
    for pairing in std::mem::take(&mut roster.pairings) {
        if sources.contains(&pairing.id.as_str()) {
            roster
                .graveyard
                .push(GraveyardEntry::from_pairing(&pairing, now));
            buried.push(pairing.id);
        } else {
            kept.push(pairing);
        }
    }
    roster.pairings = kept;

    Ok(BuryOutcome {
        fusion_id: fusion.id,
        buried,
    })
}

fn fusion_side(a: &Pairing, b: &Pairing, player: Player) -> FusionSide {
    FusionSide {
        a: component(a, player),
        b: component(b, player),
    }
}

fn component(pairing: &Pairing, player: Player) -> FusionComponent {
    let slot = pairing.slot(player);
    FusionComponent {
        pairing_id: pairing.id.clone(),
        number: slot.number,
        name: slot.name.clone(),
    }
}

fn fusion_index(roster: &Roster, fusion_id: &str) -> Result<usize, RosterError> {
    roster
        .fusions
        .iter()
        .position(|f| f.id == fusion_id)
        .ok_or_else(|| RosterError::FusionNotFound(fusion_id.to_string()))
}
