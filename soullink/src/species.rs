//! Read-only species lookups.
//!
//! The engine consumes species data through [`SpeciesDirectory`] and never
//! mutates it. [`SpeciesTable`] is the in-memory implementation backed by the
//! JSON table loaded in [`crate::io::species_file`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::core::types::Species;

/// Species reference lookups consumed by the tracker.
pub trait SpeciesDirectory {
    /// Display name for `number`, or an empty string when unknown.
    fn name_for(&self, number: u32) -> String;

    /// Direct evolution targets of `number`, in table order. Empty when the
    /// species has no evolution edge.
    fn evolutions_of(&self, number: u32) -> Vec<Species>;

    fn resolve(&self, number: u32) -> Species {
        Species::new(number, self.name_for(number))
    }
}

/// One row of the species table file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpeciesRecord {
    pub number: u32,
    pub name: String,
    #[serde(default)]
    pub evolves_to: Vec<EvolutionEdge>,
}

/// Evolution target; a missing name is looked up by number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EvolutionEdge {
    pub number: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SpeciesTable {
    records: BTreeMap<u32, SpeciesRecord>,
}

impl SpeciesTable {
    /// Build a table; later duplicates of a number replace earlier ones.
    pub fn new(records: impl IntoIterator<Item = SpeciesRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.number, r)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Selection labels for every species, ordered by number.
    pub fn options(&self) -> Vec<String> {
        self.records
            .values()
            .map(|r| option_label(r.number, &r.name))
            .collect()
    }
}

impl SpeciesDirectory for SpeciesTable {
    fn name_for(&self, number: u32) -> String {
        self.records
            .get(&number)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }

    fn evolutions_of(&self, number: u32) -> Vec<Species> {
        let Some(record) = self.records.get(&number) else {
            return Vec::new();
        };
        record
            .evolves_to
            .iter()
            .map(|edge| {
                let name = edge
                    .name
                    .clone()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| self.name_for(edge.number));
                Species::new(edge.number, name)
            })
            .collect()
    }
}

/// Render a species as a selection label, e.g. `001 - Bulbasaur`.
pub fn option_label(number: u32, name: &str) -> String {
    format!("{:03} - {}", number, name)
}

/// Parse the species number from a label (`001 - Bulbasaur`) or a bare
/// number (`001`).
pub fn parse_species_number(option: &str) -> Option<u32> {
    let head = option.split('-').next()?.trim();
    if head.is_empty() {
        return None;
    }
    head.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::species_table;

    #[test]
    fn name_for_unknown_is_empty() {
        let table = species_table();
        assert_eq!(table.name_for(1), "Bulbasaur");
        assert_eq!(table.name_for(9999), "");
    }

    /// Missing edge names fall back to the target's table name.
    #[test]
    fn evolutions_fill_missing_names() {
        let table = species_table();
        let evolutions = table.evolutions_of(133);
        let names: Vec<&str> = evolutions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Vaporeon", "Jolteon"]);
        assert!(table.evolutions_of(3).is_empty());
        assert!(table.evolutions_of(9999).is_empty());
    }

    #[test]
    fn option_labels_round_trip_numbers() {
        assert_eq!(option_label(1, "Bulbasaur"), "001 - Bulbasaur");
        assert_eq!(parse_species_number("001 - Bulbasaur"), Some(1));
        assert_eq!(parse_species_number(" 150 "), Some(150));
        assert_eq!(parse_species_number("Bulbasaur"), None);
        assert_eq!(parse_species_number(""), None);
    }

    #[test]
    fn options_are_sorted_by_number() {
        let options = species_table().options();
        assert_eq!(options.first().map(String::as_str), Some("001 - Bulbasaur"));
    }
}
