//! Species changes and their propagation into fusion and team snapshots.

use crate::core::types::Species;
use crate::error::RosterError;
use crate::roster::{Player, Roster, SpeciesRef, TeamSource};

/// Counts of snapshots refreshed by an evolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvolutionReport {
    pub fusion_components: usize,
    pub team_entries: usize,
}

/// Change the species of one side of a pairing.
///
/// Fusion components referencing the pairing are refreshed only on the same
/// player side; the linked partner's creature evolves independently. Team
/// entries that snapshot the same creature are refreshed too.
pub fn evolve(
    roster: &mut Roster,
    pairing_id: &str,
    player: Player,
    species: Species,
) -> Result<EvolutionReport, RosterError> {
    let pairing = roster
        .pairing_mut(pairing_id)
        .ok_or_else(|| RosterError::PairingNotFound(pairing_id.to_string()))?;
    if pairing.dead {
        return Err(RosterError::EvolveDead(pairing_id.to_string()));
    }
    let slot = pairing.slot_mut(player);
    slot.number = species.number;
    slot.name = species.name.clone();

    let mut report = EvolutionReport::default();
    for fusion in &mut roster.fusions {
        for component in fusion.side_mut(player).components_mut() {
            if component.pairing_id == pairing_id {
                component.number = species.number;
                component.name = species.name.clone();
                report.fusion_components += 1;
            }
        }
    }

    refresh_team_snapshots(roster, player, &mut report);
    Ok(report)
}

fn refresh_team_snapshots(roster: &mut Roster, player: Player, report: &mut EvolutionReport) {
    let Roster {
        pairings,
        fusions,
        player1_team,
        player2_team,
        ..
    } = roster;
    let team = match player {
        Player::One => player1_team,
        Player::Two => player2_team,
    };

    for entry in team.iter_mut() {
        let current: Option<Vec<SpeciesRef>> = match entry.source {
            TeamSource::Paired => pairings
                .iter()
                .find(|p| p.id == entry.source_id)
                .map(|p| vec![p.slot(player).clone().into()]),
            TeamSource::Fusion => fusions
                .iter()
                .find(|f| f.id == entry.source_id)
                .map(|f| {
                    f.side(player)
                        .components()
                        .into_iter()
                        .map(Into::into)
                        .collect()
                }),
        };
        match current {
            Some(species) if species != entry.species => {
                entry.species = species;
                report.team_entries += 1;
            }
            _ => {}
        }
    }
}
