//! Roster invariants not expressible in the serialized shape.

use std::collections::{HashMap, HashSet};

use crate::core::ids::{IdKind, parse_id};
use crate::roster::{Player, Roster, TeamSource};

/// Check roster invariants:
/// - Pairing, fusion and graveyard ids are well formed and unique
/// - Counters are ahead of every issued id
/// - No id is both a live pairing and a graveyard entry
/// - Fusions reference two distinct, existing pairings on both sides
/// - `used` flags match the derived value
/// - Teams respect `capacity` and hold no duplicate uids
pub fn validate_invariants(roster: &Roster, capacity: usize) -> Vec<String> {
    let mut errors = Vec::new();
    check_ids(roster, &mut errors);
    check_fusions(roster, &mut errors);
    check_used_flags(roster, &mut errors);
    check_teams(roster, capacity, &mut errors);
    errors
}

fn check_ids(roster: &Roster, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    let pairing_ids = roster.pairings.iter().map(|p| p.id.as_str());
    let buried_ids = roster
        .graveyard
        .iter()
        .filter(|g| g.is_pairing())
        .map(|g| g.id.as_str());
    for id in pairing_ids.chain(buried_ids) {
        if !seen.insert(id) {
            errors.push(format!("pairing id '{}' appears more than once", id));
        }
        check_counter(id, IdKind::Pairing, roster.next_pair_id, errors);
    }

    let mut seen = HashSet::new();
    for fusion in &roster.fusions {
        if !seen.insert(fusion.id.as_str()) {
            errors.push(format!("duplicate fusion id '{}'", fusion.id));
        }
        check_counter(&fusion.id, IdKind::Fusion, roster.next_fusion_id, errors);
    }
}

fn check_counter(id: &str, expected: IdKind, next: u32, errors: &mut Vec<String>) {
    match parse_id(id) {
        Some((kind, counter)) if kind == expected => {
            if counter >= next {
                errors.push(format!("id '{}' is not below counter {}", id, next));
            }
        }
        _ => errors.push(format!("malformed id '{}'", id)),
    }
}

fn check_fusions(roster: &Roster, errors: &mut Vec<String>) {
    let live: HashSet<&str> = roster.pairings.iter().map(|p| p.id.as_str()).collect();
    for fusion in &roster.fusions {
        let [a, b] = fusion.pairing_ids();
        if a == b {
            errors.push(format!("{}: fuses pairing '{}' with itself", fusion.id, a));
        }
        for player in Player::BOTH {
            let side = fusion.side(player);
            if [side.a.pairing_id.as_str(), side.b.pairing_id.as_str()] != [a, b] {
                errors.push(format!(
                    "{}: {} components reference different pairings",
                    fusion.id, player
                ));
            }
        }
        for (player, component) in fusion.components() {
            if !live.contains(component.pairing_id.as_str()) {
                errors.push(format!(
                    "{}: {} component references missing pairing '{}'",
                    fusion.id, player, component.pairing_id
                ));
            }
        }
    }
}

fn check_used_flags(roster: &Roster, errors: &mut Vec<String>) {
    let mut fused: HashSet<(&str, Player)> = HashSet::new();
    for fusion in &roster.fusions {
        for (player, component) in fusion.components() {
            fused.insert((component.pairing_id.as_str(), player));
        }
    }
    for pairing in &roster.pairings {
        for player in Player::BOTH {
            let expected = pairing.dead || fused.contains(&(pairing.id.as_str(), player));
            if pairing.slot(player).used != expected {
                errors.push(format!(
                    "{}: {} used flag is {} but should be {}",
                    pairing.id,
                    player,
                    pairing.slot(player).used,
                    expected
                ));
            }
        }
    }
}

fn check_teams(roster: &Roster, capacity: usize, errors: &mut Vec<String>) {
    for player in Player::BOTH {
        let team = roster.team(player);
        if team.len() > capacity {
            errors.push(format!(
                "{} team holds {} entries (capacity {})",
                player,
                team.len(),
                capacity
            ));
        }
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in team {
            *counts.entry(entry.uid.as_str()).or_default() += 1;
            if entry.player != player {
                errors.push(format!(
                    "{} team holds {} entry '{}'",
                    player, entry.player, entry.uid
                ));
            }
            let exists = match entry.source {
                TeamSource::Paired => roster.pairing(&entry.source_id).is_some(),
                TeamSource::Fusion => roster.fusion(&entry.source_id).is_some(),
            };
            if !exists {
                errors.push(format!(
                    "{} team entry '{}' references missing source '{}'",
                    player, entry.uid, entry.source_id
                ));
            }
        }
        let mut duplicates: Vec<&str> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(uid, _)| uid)
            .collect();
        duplicates.sort_unstable();
        for uid in duplicates {
            errors.push(format!("{} team holds '{}' more than once", player, uid));
        }
    }
}
