//! Pairing lifecycle: creation, deletion and graveyard transitions.

use tracing::warn;

use crate::core::ids::{IdKind, format_id};
use crate::core::types::Species;
use crate::error::RosterError;
use crate::roster::{GraveyardEntry, Pairing, Roster, Slot};

/// Append a new pairing for one encounter and return its id.
pub fn add_pairing(
    roster: &mut Roster,
    player1: Species,
    encounter: &str,
    player2: Species,
    now: &str,
) -> Result<String, RosterError> {
    let encounter = encounter.trim();
    if encounter.is_empty() {
        return Err(RosterError::EmptyEncounter);
    }

    let id = format_id(IdKind::Pairing, roster.next_pair_id);
    let slot = |species: Species| Slot {
        number: species.number,
        name: species.name,
        encounter: encounter.to_string(),
        used: false,
    };
    roster.pairings.push(Pairing {
        id: id.clone(),
        created_at: now.to_string(),
        player1: slot(player1),
        player2: slot(player2),
        dead: false,
    });
    roster.next_pair_id += 1;
    Ok(id)
}

/// Remove an unused pairing outright.
pub fn delete_pairing(roster: &mut Roster, pairing_id: &str) -> Result<(), RosterError> {
    let idx = removable_index(roster, pairing_id)?;
    roster.pairings.remove(idx);
    Ok(())
}

/// Move an unused pairing to the graveyard, snapshotting both species.
pub fn send_to_graveyard(
    roster: &mut Roster,
    pairing_id: &str,
    now: &str,
) -> Result<(), RosterError> {
    let idx = removable_index(roster, pairing_id)?;
    let pairing = roster.pairings.remove(idx);
    roster
        .graveyard
        .push(GraveyardEntry::from_pairing(&pairing, now));
    Ok(())
}

/// Drop a `pairing` graveyard record. The id stays retired. Records of
/// other kinds are never removed here.
pub fn delete_graveyard_entry(roster: &mut Roster, id: &str) -> Result<(), RosterError> {
    let before = roster.graveyard.len();
    roster
        .graveyard
        .retain(|entry| !(entry.is_pairing() && entry.id == id));
    if roster.graveyard.len() == before {
        return Err(RosterError::GraveyardEntryNotFound(id.to_string()));
    }
    Ok(())
}

/// Convert pairings persisted with `dead: true` into graveyard entries.
///
/// Returns the migrated ids in their original order.
pub fn migrate_dead_pairings(roster: &mut Roster, now: &str) -> Vec<String> {
    let (dead, live): (Vec<Pairing>, Vec<Pairing>) = std::mem::take(&mut roster.pairings)
        .into_iter()
        .partition(|p| p.dead);
    roster.pairings = live;

    let mut migrated = Vec::with_capacity(dead.len());
    for pairing in dead {
        if roster.in_graveyard(&pairing.id) {
            warn!(pairing = %pairing.id, "dead pairing already buried; dropping duplicate");
        } else {
            roster
                .graveyard
                .push(GraveyardEntry::from_pairing(&pairing, now));
        }
        migrated.push(pairing.id);
    }
    migrated
}

fn removable_index(roster: &Roster, pairing_id: &str) -> Result<usize, RosterError> {
    let idx = roster
        .pairings
        .iter()
        .position(|p| p.id == pairing_id)
        .ok_or_else(|| RosterError::PairingNotFound(pairing_id.to_string()))?;
    if roster.pairings[idx].in_use() {
        return Err(RosterError::PairingInUse(pairing_id.to_string()));
    }
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::used_flags::recompute_used_flags;
    use crate::error::ErrorKind;
    use crate::roster::GraveyardKind;
    use crate::test_support::{NOW, fusion, pairing, roster_with};

    /// Ids come from the counter, which advances on every add.
    #[test]
    fn add_pairing_allocates_sequential_ids() {
        let mut roster = Roster::default();
        let first = add_pairing(
            &mut roster,
            Species::new(1, "Bulbasaur"),
            " Route 1 ",
            Species::new(4, "Charmander"),
            NOW,
        )
        .expect("add");
        let second = add_pairing(
            &mut roster,
            Species::new(7, "Squirtle"),
            "Route 2",
            Species::new(10, "Caterpie"),
            NOW,
        )
        .expect("add");

        assert_eq!((first.as_str(), second.as_str()), ("P0001", "P0002"));
        assert_eq!(roster.next_pair_id, 3);
        assert_eq!(roster.pairings[0].player1.encounter, "Route 1");
        assert_eq!(roster.pairings[0].player2.name, "Charmander");
        assert!(!roster.pairings[0].player2.used);
    }

    #[test]
    fn add_pairing_rejects_blank_encounter() {
        let mut roster = Roster::default();
        let err = add_pairing(
            &mut roster,
            Species::new(1, "Bulbasaur"),
            "   ",
            Species::new(4, "Charmander"),
            NOW,
        )
        .expect_err("blank encounter");
        assert_eq!(err, RosterError::EmptyEncounter);
        assert_eq!(roster.next_pair_id, 1);
    }

    /// Counters never rewind after deletion.
    #[test]
    fn deleted_ids_are_not_reused() {
        let mut roster = Roster::default();
        let id = add_pairing(
            &mut roster,
            Species::new(1, "Bulbasaur"),
            "Route 1",
            Species::new(4, "Charmander"),
            NOW,
        )
        .expect("add");
        delete_pairing(&mut roster, &id).expect("delete");
        let next = add_pairing(
            &mut roster,
            Species::new(7, "Squirtle"),
            "Route 2",
            Species::new(10, "Caterpie"),
            NOW,
        )
        .expect("add");
        assert_eq!(next, "P0002");
    }

    /// Fused pairings cannot be deleted or buried directly.
    #[test]
    fn used_pairing_is_protected() {
        let a = pairing("P0001", 1, 4);
        let b = pairing("P0002", 7, 10);
        let f = fusion("F0001", &a, &b);
        let mut roster = roster_with(vec![a, b], vec![f]);
        recompute_used_flags(&mut roster);

        let err = delete_pairing(&mut roster, "P0001").expect_err("in use");
        assert_eq!(err.kind(), ErrorKind::Conflict);
        let err = send_to_graveyard(&mut roster, "P0002", NOW).expect_err("in use");
        assert_eq!(err, RosterError::PairingInUse("P0002".into()));
        assert_eq!(roster.pairings.len(), 2);
        assert!(roster.graveyard.is_empty());
    }

    #[test]
    fn send_to_graveyard_snapshots_species() {
        let mut roster = roster_with(vec![pairing("P0001", 1, 4)], Vec::new());

        send_to_graveyard(&mut roster, "P0001", NOW).expect("grave");

        assert!(roster.pairings.is_empty());
        let entry = &roster.graveyard[0];
        assert_eq!(entry.kind, GraveyardKind::Pairing);
        assert_eq!(entry.id, "P0001");
        assert_eq!(entry.numbers(), Some((1, 4)));
        assert_eq!(entry.created_at, NOW);

        let err = send_to_graveyard(&mut roster, "P0001", NOW).expect_err("gone");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn delete_graveyard_entry_reports_missing() {
        let mut roster = roster_with(vec![pairing("P0001", 1, 4)], Vec::new());
        send_to_graveyard(&mut roster, "P0001", NOW).expect("grave");

        delete_graveyard_entry(&mut roster, "P0001").expect("delete");
        assert!(roster.graveyard.is_empty());
        let err = delete_graveyard_entry(&mut roster, "P0001").expect_err("missing");
        assert_eq!(err, RosterError::GraveyardEntryNotFound("P0001".into()));
    }

    /// Records of other kinds sharing an id are not deleted.
    #[test]
    fn delete_graveyard_entry_only_removes_pairing_records() {
        let mut roster = roster_with(vec![pairing("P0001", 1, 4)], Vec::new());
        let mut legacy = GraveyardEntry::from_pairing(&roster.pairings[0], NOW);
        legacy.kind = GraveyardKind::Other("pokemon".into());
        legacy.id = "P0002".into();
        roster.graveyard.push(legacy);

        let err = delete_graveyard_entry(&mut roster, "P0002").expect_err("not a pairing record");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(roster.graveyard.len(), 1);

        send_to_graveyard(&mut roster, "P0001", NOW).expect("grave");
        delete_graveyard_entry(&mut roster, "P0001").expect("delete");
        let ids: Vec<&str> = roster.graveyard.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["P0002"]);
    }

    /// Legacy dead pairings leave the pairing list for the graveyard.
    #[test]
    fn migrate_dead_pairings_moves_to_graveyard() {
        let mut dead = pairing("P0002", 7, 10);
        dead.dead = true;
        let mut roster = roster_with(vec![pairing("P0001", 1, 4), dead], Vec::new());

        let migrated = migrate_dead_pairings(&mut roster, NOW);

        assert_eq!(migrated, vec!["P0002".to_string()]);
        assert_eq!(roster.pairings.len(), 1);
        assert_eq!(roster.graveyard[0].id, "P0002");
        assert_eq!(roster.graveyard[0].numbers(), Some((7, 10)));
    }
}
