//! Per-player team rosters kept symmetric under the soul link.
//!
//! Adding a creature to one player's team also adds the linked creature from
//! the same source to the partner's team when there is room. The mirror is
//! best effort: a full partner team leaves the teams asymmetric without an
//! error. Capacity and symmetry are enforced at mutation time only.

use tracing::debug;

use crate::core::types::{TeamAddOutcome, TeamCandidate, TeamRemoveOutcome};
use crate::error::RosterError;
use crate::roster::{Player, Roster, TeamEntry, TeamSource, team_uid};

/// Default number of creatures a team may hold.
pub const TEAM_CAPACITY: usize = 6;

/// Add a creature to `player`'s team and mirror its counterpart.
pub fn add_to_team(
    roster: &mut Roster,
    player: Player,
    candidate: &TeamCandidate,
    capacity: usize,
) -> Result<TeamAddOutcome, RosterError> {
    if let TeamCandidate::Pairing(pairing_id) = candidate {
        let pairing = roster
            .pairing(pairing_id)
            .ok_or_else(|| RosterError::PairingNotFound(pairing_id.clone()))?;
        if pairing.dead {
            return Err(RosterError::PairingDead(pairing_id.clone()));
        }
        if pairing.slot(player).used {
            return Err(RosterError::SlotUsed {
                pairing_id: pairing_id.clone(),
                player,
            });
        }
    }
    let entry = build_entry(roster, player, candidate)?;

    let team = roster.team(player);
    if team.iter().any(|e| e.uid == entry.uid) {
        return Err(RosterError::AlreadyOnTeam {
            player,
            uid: entry.uid,
        });
    }
    if team.len() >= capacity {
        return Err(RosterError::TeamFull { player, capacity });
    }

    let uid = entry.uid.clone();
    roster.team_mut(player).push(entry);

    let partner = player.other();
    let counterpart = build_entry(roster, partner, candidate)?;
    let partner_team = roster.team(partner);
    let mirrored = if partner_team.iter().any(|e| e.uid == counterpart.uid) {
        None
    } else if partner_team.len() >= capacity {
        debug!(uid = %counterpart.uid, %partner, "partner team full; mirror skipped");
        None
    } else {
        let counterpart_uid = counterpart.uid.clone();
        roster.team_mut(partner).push(counterpart);
        Some(counterpart_uid)
    };

    Ok(TeamAddOutcome { uid, mirrored })
}

/// Remove `uid` from `player`'s team and its counterpart from the partner's.
pub fn remove_from_team(
    roster: &mut Roster,
    player: Player,
    uid: &str,
) -> Result<TeamRemoveOutcome, RosterError> {
    let team = roster.team_mut(player);
    let idx = team
        .iter()
        .position(|e| e.uid == uid)
        .ok_or_else(|| RosterError::TeamEntryNotFound {
            player,
            uid: uid.to_string(),
        })?;
    team.remove(idx);

    let mirrored = counterpart_uid(uid).and_then(|counterpart| {
        let partner_team = roster.team_mut(player.other());
        let before = partner_team.len();
        partner_team.retain(|e| e.uid != counterpart);
        (partner_team.len() != before).then_some(counterpart)
    });

    Ok(TeamRemoveOutcome {
        uid: uid.to_string(),
        mirrored,
    })
}

/// Swap the side suffix of a team uid, keeping the source-id prefix.
pub fn counterpart_uid(uid: &str) -> Option<String> {
    let (source_id, suffix) = uid.rsplit_once('_')?;
    let player = Player::from_suffix(suffix)?;
    Some(team_uid(source_id, player.other()))
}

/// Creatures `player` could add right now: unused live pairing slots, then
/// every fusion, minus anything already on the team.
pub fn team_candidates(roster: &Roster, player: Player) -> Vec<TeamCandidate> {
    let team = roster.team(player);
    let on_team = |source_id: &str| {
        let uid = team_uid(source_id, player);
        team.iter().any(|e| e.uid == uid)
    };

    let pairings = roster
        .pairings
        .iter()
        .filter(|p| !p.dead && !p.slot(player).used && !on_team(&p.id))
        .map(|p| TeamCandidate::Pairing(p.id.clone()));
    let fusions = roster
        .fusions
        .iter()
        .filter(|f| !on_team(&f.id))
        .map(|f| TeamCandidate::Fusion(f.id.clone()));
    pairings.chain(fusions).collect()
}

/// Drop team entries whose source pairing or fusion no longer exists.
///
/// Returns the removed uids in team order, player 1 first.
pub fn prune_orphaned_entries(roster: &mut Roster) -> Vec<String> {
    let mut removed = Vec::new();
    for player in Player::BOTH {
        let live: Vec<bool> = roster
            .team(player)
            .iter()
            .map(|entry| match entry.source {
                TeamSource::Paired => roster.pairing(&entry.source_id).is_some(),
                TeamSource::Fusion => roster.fusion(&entry.source_id).is_some(),
            })
            .collect();
        let team = roster.team_mut(player);
        let mut keep = live.into_iter();
        team.retain(|entry| {
            let alive = keep.next().unwrap_or(true);
            if !alive {
                removed.push(entry.uid.clone());
            }
            alive
        });
    }
    removed
}

fn build_entry(
    roster: &Roster,
    player: Player,
    candidate: &TeamCandidate,
) -> Result<TeamEntry, RosterError> {
    let (source, species) = match candidate {
        TeamCandidate::Pairing(id) => {
            let pairing = roster
                .pairing(id)
                .ok_or_else(|| RosterError::PairingNotFound(id.clone()))?;
            (TeamSource::Paired, vec![pairing.slot(player).clone().into()])
        }
        TeamCandidate::Fusion(id) => {
            let fusion = roster
                .fusion(id)
                .ok_or_else(|| RosterError::FusionNotFound(id.clone()))?;
            let species = fusion
                .side(player)
                .components()
                .into_iter()
                .map(Into::into)
                .collect();
            (TeamSource::Fusion, species)
        }
    };
    let source_id = candidate.source_id();
    Ok(TeamEntry {
        uid: team_uid(source_id, player),
        source,
        source_id: source_id.to_string(),
        player,
        species,
    })
}
