//! Roster owner that sequences every operation.
//!
//! [`Tracker`] holds the only in-memory copy of the roster. Each mutating call
//! validates against the current derived state, applies the change through a
//! pure core function, reconciles derived state from scratch and asks the
//! store to persist. A failed save is reported as a [`PersistenceWarning`]
//! next to the result; the in-memory change stays in effect.

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::core::availability;
use crate::core::evolution::{self, EvolutionReport};
use crate::core::fusion;
use crate::core::invariants::validate_invariants;
use crate::core::pairing;
use crate::core::team;
use crate::core::types::{
    AvailableSlot, BuryOutcome, Species, TeamAddOutcome, TeamCandidate, TeamRemoveOutcome,
};
use crate::core::used_flags::recompute_used_flags;
use crate::error::{PersistenceWarning, RosterError};
use crate::io::roster_store::RosterStore;
use crate::roster::{GraveyardEntry, Pairing, Player, Roster};
use crate::species::SpeciesDirectory;

/// A successfully applied mutation plus any persistence warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied<T> {
    pub value: T,
    pub warning: Option<PersistenceWarning>,
}

impl<T> Applied<T> {
    pub fn is_persisted(&self) -> bool {
        self.warning.is_none()
    }
}

pub struct Tracker<S, D> {
    roster: Roster,
    store: S,
    species: D,
    team_capacity: usize,
}

impl<S: RosterStore, D: SpeciesDirectory> Tracker<S, D> {
    /// Load the roster and reconcile derived state. Nothing is written.
    pub fn open(store: S, species: D, team_capacity: usize) -> Self {
        let mut roster = store.load();
        let migrated = pairing::migrate_dead_pairings(&mut roster, &timestamp());
        if !migrated.is_empty() {
            info!(pairings = ?migrated, "moved dead pairings to the graveyard");
        }
        let changed = reconcile(&mut roster);
        if !changed.is_empty() {
            debug!(slots = changed.len(), "used flags differed from stored state");
        }
        Self {
            roster,
            store,
            species,
            team_capacity,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn species(&self) -> &D {
        &self.species
    }

    pub fn team_capacity(&self) -> usize {
        self.team_capacity
    }

    #[instrument(skip(self))]
    pub fn add_pairing(
        &mut self,
        player1: u32,
        encounter: &str,
        player2: u32,
    ) -> Result<Applied<String>, RosterError> {
        let id = pairing::add_pairing(
            &mut self.roster,
            self.species.resolve(player1),
            encounter,
            self.species.resolve(player2),
            &timestamp(),
        )?;
        info!(pairing = %id, "pairing added");
        Ok(self.commit(id))
    }

    #[instrument(skip(self))]
    pub fn delete_pairing(&mut self, pairing_id: &str) -> Result<Applied<()>, RosterError> {
        pairing::delete_pairing(&mut self.roster, pairing_id)?;
        info!(pairing = %pairing_id, "pairing deleted");
        Ok(self.commit(()))
    }

    #[instrument(skip(self))]
    pub fn send_to_graveyard(&mut self, pairing_id: &str) -> Result<Applied<()>, RosterError> {
        pairing::send_to_graveyard(&mut self.roster, pairing_id, &timestamp())?;
        info!(pairing = %pairing_id, "pairing sent to graveyard");
        Ok(self.commit(()))
    }

    #[instrument(skip(self))]
    pub fn delete_graveyard_entry(&mut self, id: &str) -> Result<Applied<()>, RosterError> {
        pairing::delete_graveyard_entry(&mut self.roster, id)?;
        info!(pairing = %id, "graveyard entry deleted");
        Ok(self.commit(()))
    }

    #[instrument(skip(self))]
    pub fn create_fusion(
        &mut self,
        pairing_a: &str,
        pairing_b: &str,
    ) -> Result<Applied<String>, RosterError> {
        let id = fusion::create_fusion(&mut self.roster, pairing_a, pairing_b, &timestamp())?;
        info!(fusion = %id, "fusion created");
        Ok(self.commit(id))
    }

    #[instrument(skip(self))]
    pub fn unfuse(&mut self, fusion_id: &str) -> Result<Applied<()>, RosterError> {
        let removed = fusion::unfuse(&mut self.roster, fusion_id)?;
        info!(fusion = %removed.id, pairings = ?removed.pairing_ids(), "fusion unfused");
        Ok(self.commit(()))
    }

    #[instrument(skip(self))]
    pub fn bury_fusion(&mut self, fusion_id: &str) -> Result<Applied<BuryOutcome>, RosterError> {
        let outcome = fusion::bury_fusion(&mut self.roster, fusion_id, &timestamp())?;
        if outcome.buried.is_empty() {
            info!(fusion = %fusion_id, "fusion removed; no pairings left to bury");
        } else {
            info!(fusion = %fusion_id, pairings = ?outcome.buried, "fusion buried");
        }
        Ok(self.commit(outcome))
    }

    /// Evolve one player's creature in a pairing to `species_number`.
    #[instrument(skip(self))]
    pub fn evolve(
        &mut self,
        pairing_id: &str,
        player: Player,
        species_number: u32,
    ) -> Result<Applied<EvolutionReport>, RosterError> {
        let species = self.species.resolve(species_number);
        let report = evolution::evolve(&mut self.roster, pairing_id, player, species)?;
        info!(
            pairing = %pairing_id,
            %player,
            species = species_number,
            fusion_components = report.fusion_components,
            team_entries = report.team_entries,
            "creature evolved"
        );
        Ok(self.commit(report))
    }

    #[instrument(skip(self))]
    pub fn add_to_team(
        &mut self,
        player: Player,
        candidate: &TeamCandidate,
    ) -> Result<Applied<TeamAddOutcome>, RosterError> {
        let outcome = team::add_to_team(&mut self.roster, player, candidate, self.team_capacity)?;
        info!(uid = %outcome.uid, mirrored = ?outcome.mirrored, "added to team");
        Ok(self.commit(outcome))
    }

    #[instrument(skip(self))]
    pub fn remove_from_team(
        &mut self,
        player: Player,
        uid: &str,
    ) -> Result<Applied<TeamRemoveOutcome>, RosterError> {
        let outcome = team::remove_from_team(&mut self.roster, player, uid)?;
        info!(uid = %outcome.uid, mirrored = ?outcome.mirrored, "removed from team");
        Ok(self.commit(outcome))
    }

    /// Replace the roster with a fresh empty one.
    pub fn reset(&mut self) -> Applied<()> {
        self.roster = Roster::default();
        info!("roster reset");
        self.commit(())
    }

    pub fn available_for(&self, player: Player) -> Vec<AvailableSlot> {
        availability::available_for(&self.roster, player)
    }

    pub fn unfused_pairings(&self) -> Vec<&Pairing> {
        availability::unfused_pairings(&self.roster)
    }

    pub fn graveyard_newest_first(&self) -> Vec<&GraveyardEntry> {
        availability::graveyard_newest_first(&self.roster)
    }

    pub fn team_candidates(&self, player: Player) -> Vec<TeamCandidate> {
        team::team_candidates(&self.roster, player)
    }

    /// Evolution targets for the current species of one pairing slot.
    pub fn evolution_options(
        &self,
        pairing_id: &str,
        player: Player,
    ) -> Result<Vec<Species>, RosterError> {
        let pairing = self
            .roster
            .pairing(pairing_id)
            .ok_or_else(|| RosterError::PairingNotFound(pairing_id.to_string()))?;
        Ok(self.species.evolutions_of(pairing.slot(player).number))
    }

    pub fn validate(&self) -> Vec<String> {
        validate_invariants(&self.roster, self.team_capacity)
    }

    fn commit<T>(&mut self, value: T) -> Applied<T> {
        reconcile(&mut self.roster);
        let warning = match self.store.save(&self.roster) {
            Ok(()) => None,
            Err(err) => {
                let message = format!("{:#}", err);
                warn!(error = %message, "roster not persisted; keeping in-memory state");
                Some(PersistenceWarning { message })
            }
        };
        Applied { value, warning }
    }
}

fn reconcile(roster: &mut Roster) -> Vec<(String, Player)> {
    let changed = recompute_used_flags(roster);
    let pruned = team::prune_orphaned_entries(roster);
    if !pruned.is_empty() {
        debug!(uids = ?pruned, "dropped team entries with missing sources");
    }
    changed
}

fn timestamp() -> String {
    Utc::now()
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
