//! Species table loading from a JSON array of records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::species::{SpeciesRecord, SpeciesTable};

/// Load the species table at `path`.
///
/// A missing file yields an empty table: every name lookup then returns the
/// empty sentinel and no evolutions are offered.
pub fn load_species_table(path: &Path) -> Result<SpeciesTable> {
    if !path.exists() {
        debug!(path = %path.display(), "no species table; names will be empty");
        return Ok(SpeciesTable::default());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read species {}", path.display()))?;
    let records: Vec<SpeciesRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("parse species {}", path.display()))?;
    let table = SpeciesTable::new(records);
    debug!(path = %path.display(), species = table.len(), "species table loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SpeciesDirectory;

    #[test]
    fn loads_records_with_optional_edges() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("species.json");
        fs::write(
            &path,
            r#"[
                {"number": 1, "name": "Bulbasaur", "evolves_to": [{"number": 2}]},
                {"number": 2, "name": "Ivysaur"}
            ]"#,
        )
        .expect("write");

        let table = load_species_table(&path).expect("load");

        assert_eq!(table.len(), 2);
        let evolutions = table.evolutions_of(1);
        assert_eq!(evolutions.len(), 1);
        assert_eq!(evolutions[0].name, "Ivysaur");
    }

    #[test]
    fn missing_table_is_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let table = load_species_table(&temp.path().join("none.json")).expect("load");
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_table_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("species.json");
        fs::write(&path, r#"{"number": 1}"#).expect("write");
        let err = load_species_table(&path).expect_err("not an array");
        assert!(format!("{:#}", err).contains("parse species"));
    }
}
