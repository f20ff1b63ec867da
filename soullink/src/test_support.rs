//! Test-only helpers for building rosters and species tables.

use std::cell::{Cell, RefCell};

use anyhow::{Result, anyhow};

use crate::core::ids::{IdKind, parse_id};
use crate::io::roster_store::RosterStore;
use crate::roster::{Fusion, FusionComponent, FusionSide, Pairing, Player, Roster, Slot};
use crate::species::{EvolutionEdge, SpeciesRecord, SpeciesTable};

/// Fixed timestamp for deterministic records.
pub const NOW: &str = "2025-01-01T12:00:00.000000";

/// Create an unused pairing with placeholder names and encounter `Route`.
pub fn pairing(id: &str, player1: u32, player2: u32) -> Pairing {
    let slot = |number: u32| Slot {
        number,
        name: format!("#{:03}", number),
        encounter: "Route".to_string(),
        used: false,
    };
    Pairing {
        id: id.to_string(),
        created_at: NOW.to_string(),
        player1: slot(player1),
        player2: slot(player2),
        dead: false,
    }
}

/// Create a fusion of `a` and `b` without touching any `used` flags.
pub fn fusion(id: &str, a: &Pairing, b: &Pairing) -> Fusion {
    let component = |p: &Pairing, player: Player| FusionComponent {
        pairing_id: p.id.clone(),
        number: p.slot(player).number,
        name: p.slot(player).name.clone(),
    };
    let side = |player: Player| FusionSide {
        a: component(a, player),
        b: component(b, player),
    };
    Fusion {
        id: id.to_string(),
        created_at: NOW.to_string(),
        player1: side(Player::One),
        player2: side(Player::Two),
    }
}

/// Build a roster with counters advanced past every well-formed id.
pub fn roster_with(pairings: Vec<Pairing>, fusions: Vec<Fusion>) -> Roster {
    let next = |ids: Vec<&str>, kind: IdKind| {
        ids.into_iter()
            .filter_map(parse_id)
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| n + 1)
            .max()
            .unwrap_or(1)
    };
    let next_pair_id = next(pairings.iter().map(|p| p.id.as_str()).collect(), IdKind::Pairing);
    let next_fusion_id = next(fusions.iter().map(|f| f.id.as_str()).collect(), IdKind::Fusion);
    Roster {
        pairings,
        fusions,
        next_pair_id,
        next_fusion_id,
        ..Roster::default()
    }
}

fn record(number: u32, name: &str, evolves_to: &[(u32, Option<&str>)]) -> SpeciesRecord {
    SpeciesRecord {
        number,
        name: name.to_string(),
        evolves_to: evolves_to
            .iter()
            .map(|(number, name)| EvolutionEdge {
                number: *number,
                name: name.map(str::to_string),
            })
            .collect(),
    }
}

/// Small species table covering the numbers used across tests.
pub fn species_table() -> SpeciesTable {
    SpeciesTable::new([
        record(1, "Bulbasaur", &[(2, Some("Ivysaur"))]),
        record(2, "Ivysaur", &[(3, Some("Venusaur"))]),
        record(3, "Venusaur", &[]),
        record(4, "Charmander", &[(5, Some("Charmeleon"))]),
        record(5, "Charmeleon", &[(6, None)]),
        record(6, "Charizard", &[]),
        record(7, "Squirtle", &[(8, None)]),
        record(8, "Wartortle", &[]),
        record(10, "Caterpie", &[(11, None)]),
        record(11, "Metapod", &[]),
        record(16, "Pidgey", &[]),
        record(19, "Rattata", &[]),
        record(133, "Eevee", &[(134, None), (135, Some(""))]),
        record(134, "Vaporeon", &[]),
        record(135, "Jolteon", &[]),
    ])
}

/// In-memory store that records saves and can be told to fail them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    initial: Roster,
    saved: RefCell<Option<Roster>>,
    saves: Cell<usize>,
    failing: Cell<bool>,
}

impl MemoryStore {
    pub fn with_roster(roster: Roster) -> Self {
        Self {
            initial: roster,
            ..Self::default()
        }
    }

    pub fn fail_saves(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Most recent successfully saved roster.
    pub fn saved(&self) -> Option<Roster> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl RosterStore for MemoryStore {
    fn load(&self) -> Roster {
        self.saved().unwrap_or_else(|| self.initial.clone())
    }

    fn save(&self, roster: &Roster) -> Result<()> {
        if self.failing.get() {
            return Err(anyhow!("state file is locked"));
        }
        self.saves.set(self.saves.get() + 1);
        *self.saved.borrow_mut() = Some(roster.clone());
        Ok(())
    }
}

/// Temporary directory holding a JSON-backed store.
#[cfg(feature = "test-support")]
pub struct TempStore {
    pub dir: tempfile::TempDir,
    pub store: crate::io::roster_store::JsonFileStore,
}

#[cfg(feature = "test-support")]
impl TempStore {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let store = crate::io::roster_store::JsonFileStore::new(
            dir.path().join("data").join("state.json"),
            crate::io::roster_store::SaveRetry::default(),
        );
        Ok(Self { dir, store })
    }
}
