//! Persisted roster aggregate and the entities it owns.
//!
//! The serialized form of [`Roster`] is the on-disk contract: a single JSON
//! object with `pairings`, `fusions`, `graveyard`, `player1_team`,
//! `player2_team`, `next_pair_id` and `next_fusion_id`. Missing keys fall back
//! to their empty defaults so partially written legacy files still load.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two linked players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "player1")]
    One,
    #[serde(rename = "player2")]
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// The linked partner.
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Suffix used in team uids (`p1` / `p2`).
    pub fn suffix(self) -> &'static str {
        match self {
            Player::One => "p1",
            Player::Two => "p2",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Player> {
        match suffix {
            "p1" => Some(Player::One),
            "p2" => Some(Player::Two),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// One player's half of a pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub number: u32,
    pub name: String,
    pub encounter: String,
    /// Derived; overwritten by every recompute pass.
    #[serde(default)]
    pub used: bool,
}

/// Two soul-linked creatures caught at the same encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub id: String,
    pub created_at: String,
    pub player1: Slot,
    pub player2: Slot,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dead: bool,
}

impl Pairing {
    pub fn slot(&self, player: Player) -> &Slot {
        match player {
            Player::One => &self.player1,
            Player::Two => &self.player2,
        }
    }

    pub fn slot_mut(&mut self, player: Player) -> &mut Slot {
        match player {
            Player::One => &mut self.player1,
            Player::Two => &mut self.player2,
        }
    }

    /// True if either slot is consumed (fused or dead).
    pub fn in_use(&self) -> bool {
        self.player1.used || self.player2.used
    }
}

/// Snapshot of one source creature inside a fusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionComponent {
    pub pairing_id: String,
    pub number: u32,
    pub name: String,
}

/// A player's merged creature: the `a` and `b` halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionSide {
    pub a: FusionComponent,
    pub b: FusionComponent,
}

impl FusionSide {
    pub fn components(&self) -> [&FusionComponent; 2] {
        [&self.a, &self.b]
    }

    pub fn components_mut(&mut self) -> [&mut FusionComponent; 2] {
        [&mut self.a, &mut self.b]
    }
}

/// Two pairings merged into one creature per player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fusion {
    pub id: String,
    pub created_at: String,
    pub player1: FusionSide,
    pub player2: FusionSide,
}

impl Fusion {
    pub fn side(&self, player: Player) -> &FusionSide {
        match player {
            Player::One => &self.player1,
            Player::Two => &self.player2,
        }
    }

    pub fn side_mut(&mut self, player: Player) -> &mut FusionSide {
        match player {
            Player::One => &mut self.player1,
            Player::Two => &mut self.player2,
        }
    }

    /// Source pairing ids, taken from the player-1 side.
    pub fn pairing_ids(&self) -> [&str; 2] {
        [
            self.player1.a.pairing_id.as_str(),
            self.player1.b.pairing_id.as_str(),
        ]
    }

    /// All four components tagged with their player side.
    pub fn components(&self) -> impl Iterator<Item = (Player, &FusionComponent)> {
        Player::BOTH.into_iter().flat_map(move |player| {
            self.side(player)
                .components()
                .into_iter()
                .map(move |component| (player, component))
        })
    }
}

/// Graveyard record kind. Kinds other than `pairing` come from older state
/// files and are carried through saves verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GraveyardKind {
    Pairing,
    Other(String),
}

impl From<String> for GraveyardKind {
    fn from(kind: String) -> Self {
        if kind == "pairing" {
            GraveyardKind::Pairing
        } else {
            GraveyardKind::Other(kind)
        }
    }
}

impl From<GraveyardKind> for String {
    fn from(kind: GraveyardKind) -> Self {
        match kind {
            GraveyardKind::Pairing => "pairing".to_string(),
            GraveyardKind::Other(kind) => kind,
        }
    }
}

/// Species number kept on a graveyard record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuriedSlot {
    pub number: u32,
}

/// Terminal record for a creature removed from play.
///
/// Only `pairing` records are written by the tracker; their `player1` and
/// `player2` are always set. Fields this type does not know are kept in
/// `extra` so legacy records round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraveyardEntry {
    pub kind: GraveyardKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1: Option<BuriedSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2: Option<BuriedSlot>,
    #[serde(default)]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GraveyardEntry {
    pub fn from_pairing(pairing: &Pairing, created_at: &str) -> Self {
        Self {
            kind: GraveyardKind::Pairing,
            id: pairing.id.clone(),
            player1: Some(BuriedSlot {
                number: pairing.player1.number,
            }),
            player2: Some(BuriedSlot {
                number: pairing.player2.number,
            }),
            created_at: created_at.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_pairing(&self) -> bool {
        self.kind == GraveyardKind::Pairing
    }

    /// Buried species numbers, `None` for records without both slots.
    pub fn numbers(&self) -> Option<(u32, u32)> {
        Some((self.player1?.number, self.player2?.number))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSource {
    Paired,
    Fusion,
}

/// Species reference carried by a team entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRef {
    pub number: u32,
    pub name: String,
}

impl From<Slot> for SpeciesRef {
    fn from(slot: Slot) -> Self {
        SpeciesRef {
            number: slot.number,
            name: slot.name,
        }
    }
}

impl From<&FusionComponent> for SpeciesRef {
    fn from(component: &FusionComponent) -> Self {
        SpeciesRef {
            number: component.number,
            name: component.name.clone(),
        }
    }
}

/// A creature placed on one player's team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub uid: String,
    pub source: TeamSource,
    pub source_id: String,
    pub player: Player,
    /// One reference for a paired creature, `a` then `b` for a fusion.
    pub species: Vec<SpeciesRef>,
}

/// Build the stable team uid for a source id on a player side.
pub fn team_uid(source_id: &str, player: Player) -> String {
    format!("{}_{}", source_id, player.suffix())
}

/// The whole mutable roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub pairings: Vec<Pairing>,
    pub fusions: Vec<Fusion>,
    pub graveyard: Vec<GraveyardEntry>,
    pub player1_team: Vec<TeamEntry>,
    pub player2_team: Vec<TeamEntry>,
    pub next_pair_id: u32,
    pub next_fusion_id: u32,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            pairings: Vec::new(),
            fusions: Vec::new(),
            graveyard: Vec::new(),
            player1_team: Vec::new(),
            player2_team: Vec::new(),
            next_pair_id: 1,
            next_fusion_id: 1,
        }
    }
}

impl Roster {
    pub fn pairing(&self, id: &str) -> Option<&Pairing> {
        self.pairings.iter().find(|p| p.id == id)
    }

    pub fn pairing_mut(&mut self, id: &str) -> Option<&mut Pairing> {
        self.pairings.iter_mut().find(|p| p.id == id)
    }

    pub fn fusion(&self, id: &str) -> Option<&Fusion> {
        self.fusions.iter().find(|f| f.id == id)
    }

    pub fn team(&self, player: Player) -> &[TeamEntry] {
        match player {
            Player::One => &self.player1_team,
            Player::Two => &self.player2_team,
        }
    }

    pub fn team_mut(&mut self, player: Player) -> &mut Vec<TeamEntry> {
        match player {
            Player::One => &mut self.player1_team,
            Player::Two => &mut self.player2_team,
        }
    }

    pub fn in_graveyard(&self, id: &str) -> bool {
        self.graveyard.iter().any(|g| g.id == id)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fusion, pairing};

    /// Default roster matches the empty persisted shape with counters at 1.
    #[test]
    fn default_roster_serializes_to_known_shape() {
        let json = serde_json::to_value(Roster::default()).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "pairings": [],
                "fusions": [],
                "graveyard": [],
                "player1_team": [],
                "player2_team": [],
                "next_pair_id": 1,
                "next_fusion_id": 1
            })
        );
    }

    /// Legacy files missing team keys and counters still deserialize.
    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let roster: Roster =
            serde_json::from_str(r#"{"pairings": [], "fusions": []}"#).expect("parse");
        assert_eq!(roster, Roster::default());
    }

    /// `dead` is omitted when false so live pairings keep the original shape.
    #[test]
    fn live_pairing_omits_dead_flag() {
        let json = serde_json::to_value(pairing("P0001", 1, 4)).expect("serialize");
        assert!(json.get("dead").is_none());
        assert_eq!(json["player1"]["number"], 1);
        assert_eq!(json["player2"]["encounter"], "Route");
    }

    #[test]
    fn fusion_components_cover_both_sides() {
        let f = fusion("F0001", &pairing("P0001", 1, 4), &pairing("P0002", 7, 10));
        let sides: Vec<(Player, u32)> = f.components().map(|(p, c)| (p, c.number)).collect();
        assert_eq!(
            sides,
            vec![
                (Player::One, 1),
                (Player::One, 7),
                (Player::Two, 4),
                (Player::Two, 10)
            ]
        );
        assert_eq!(f.pairing_ids(), ["P0001", "P0002"]);
    }

    /// Unknown graveyard kinds and fields survive a parse/serialize cycle.
    #[test]
    fn legacy_graveyard_kind_is_preserved() {
        let raw = serde_json::json!({
            "kind": "pokemon",
            "id": "P0001",
            "player": "player1",
            "number": 25
        });

        let entry: GraveyardEntry = serde_json::from_value(raw.clone()).expect("parse");

        assert_eq!(entry.kind, GraveyardKind::Other("pokemon".into()));
        assert!(!entry.is_pairing());
        assert_eq!(entry.numbers(), None);
        let mut expected = raw;
        expected["created_at"] = serde_json::json!("");
        assert_eq!(serde_json::to_value(&entry).expect("serialize"), expected);
    }

    #[test]
    fn pairing_graveyard_entry_shape() {
        let entry = GraveyardEntry::from_pairing(&pairing("P0002", 7, 10), "2025-01-01");
        assert_eq!(
            serde_json::to_value(&entry).expect("serialize"),
            serde_json::json!({
                "kind": "pairing",
                "id": "P0002",
                "player1": {"number": 7},
                "player2": {"number": 10},
                "created_at": "2025-01-01"
            })
        );
        assert_eq!(entry.numbers(), Some((7, 10)));
    }

    #[test]
    fn team_uid_uses_side_suffix() {
        assert_eq!(team_uid("P0003", Player::Two), "P0003_p2");
        assert_eq!(Player::from_suffix("p1"), Some(Player::One));
        assert_eq!(Player::from_suffix("p3"), None);
    }
}
