//! Soul-linked fusion run tracker.
//!
//! Thin command surface over [`soullink::tracker::Tracker`]. Every command
//! loads the roster, applies at most one operation, persists, and exits with a
//! stable code from [`soullink::exit_codes`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use soullink::core::ids::{IdKind, parse_id};
use soullink::core::types::TeamCandidate;
use soullink::error::RosterError;
use soullink::exit_codes;
use soullink::io::config::load_config;
use soullink::io::roster_store::JsonFileStore;
use soullink::io::species_file::load_species_table;
use soullink::roster::{Player, TeamEntry};
use soullink::species::{SpeciesDirectory, SpeciesTable, option_label, parse_species_number};
use soullink::tracker::{Applied, Tracker};

#[derive(Parser)]
#[command(
    name = "soullink",
    version,
    about = "Track a soul-linked fusion run for two players"
)]
struct Cli {
    /// Tracker config (TOML). Relative paths inside it resolve against its directory.
    #[arg(long, global = true, default_value = "soullink.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage pairings.
    #[command(subcommand)]
    Pair(PairCommand),
    /// Fuse two unused pairings (by id).
    Fuse { a: String, b: String },
    /// Dissolve a fusion; its pairings become available again.
    Unfuse { fusion: String },
    /// Remove a fusion and send both of its pairings to the graveyard.
    Bury { fusion: String },
    /// Evolve one player's creature in a pairing.
    Evolve {
        pairing: String,
        #[arg(long, value_parser = parse_player)]
        player: Player,
        /// Target species (`2` or `002 - Ivysaur`).
        #[arg(long, value_parser = parse_species)]
        to: u32,
    },
    /// Manage the per-player teams.
    #[command(subcommand)]
    Team(TeamCommand),
    /// Manage graveyard records.
    #[command(subcommand)]
    Graveyard(GraveyardCommand),
    /// Print pairings, fusions, teams and the graveyard.
    List,
    /// List species labels, optionally filtered by a name or number fragment.
    Species { query: Option<String> },
    /// Check roster invariants (ids, counters, used flags, teams).
    Validate,
    /// Erase the whole roster.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PairCommand {
    /// Record the two creatures caught at one encounter.
    Add {
        #[arg(value_parser = parse_species)]
        player1: u32,
        #[arg(value_parser = parse_species)]
        player2: u32,
        #[arg(long)]
        encounter: String,
    },
    /// Delete an unused pairing.
    Delete { pairing: String },
    /// Send an unused pairing to the graveyard.
    Grave { pairing: String },
}

#[derive(Subcommand)]
enum TeamCommand {
    /// Add a pairing (`P…`) or fusion (`F…`) creature; the partner's is mirrored.
    Add {
        #[arg(long, value_parser = parse_player)]
        player: Player,
        source: String,
    },
    /// Remove a team uid (e.g. `P0001_p1`) and its counterpart.
    Remove {
        #[arg(long, value_parser = parse_player)]
        player: Player,
        uid: String,
    },
}

#[derive(Subcommand)]
enum GraveyardCommand {
    /// Delete a graveyard record.
    Delete { id: String },
}

type FileTracker = Tracker<JsonFileStore, SpeciesTable>;

fn main() {
    soullink::logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let mut tracker = open_tracker(&cli.config)?;
    let code = match cli.command {
        Command::Pair(PairCommand::Add {
            player1,
            player2,
            encounter,
        }) => report(tracker.add_pairing(player1, &encounter, player2), |id| {
            println!("added pairing {}", id);
        }),
        Command::Pair(PairCommand::Delete { pairing }) => {
            report(tracker.delete_pairing(&pairing), |()| {
                println!("deleted pairing {}", pairing);
            })
        }
        Command::Pair(PairCommand::Grave { pairing }) => {
            report(tracker.send_to_graveyard(&pairing), |()| {
                println!("sent pairing {} to graveyard", pairing);
            })
        }
        Command::Fuse { a, b } => report(tracker.create_fusion(&a, &b), |id| {
            println!("created fusion {}", id);
        }),
        Command::Unfuse { fusion } => report(tracker.unfuse(&fusion), |()| {
            println!("unfused {}", fusion);
        }),
        Command::Bury { fusion } => report(tracker.bury_fusion(&fusion), |outcome| {
            if outcome.buried.is_empty() {
                println!("removed {}; no pairings found to bury", outcome.fusion_id);
            } else {
                println!(
                    "buried {}: sent pairings {} to graveyard",
                    outcome.fusion_id,
                    outcome.buried.join(", ")
                );
            }
        }),
        Command::Evolve {
            pairing,
            player,
            to,
        } => {
            let label = option_label(to, &tracker.species().name_for(to));
            report(tracker.evolve(&pairing, player, to), |evolved| {
                println!(
                    "evolved {} {} into {} ({} fusion snapshots updated)",
                    pairing, player, label, evolved.fusion_components
                );
            })
        }
        Command::Team(TeamCommand::Add { player, source }) => {
            let candidate = candidate_for(&source)?;
            report(tracker.add_to_team(player, &candidate), |outcome| {
                match outcome.mirrored {
                    Some(mirrored) => println!("added {} and {}", outcome.uid, mirrored),
                    None => println!("added {} (partner team unchanged)", outcome.uid),
                }
            })
        }
        Command::Team(TeamCommand::Remove { player, uid }) => {
            report(tracker.remove_from_team(player, &uid), |outcome| {
                match outcome.mirrored {
                    Some(mirrored) => println!("removed {} and {}", outcome.uid, mirrored),
                    None => println!("removed {}", outcome.uid),
                }
            })
        }
        Command::Graveyard(GraveyardCommand::Delete { id }) => {
            report(tracker.delete_graveyard_entry(&id), |()| {
                println!("deleted graveyard entry {}", id);
            })
        }
        Command::List => {
            print_roster(&tracker);
            exit_codes::OK
        }
        Command::Species { query } => {
            for label in matching_species(tracker.species(), query.as_deref()) {
                println!("{}", label);
            }
            exit_codes::OK
        }
        Command::Validate => {
            let errors = tracker.validate();
            if errors.is_empty() {
                println!("roster is consistent");
                exit_codes::OK
            } else {
                eprintln!("invariant violations:\n- {}", errors.join("\n- "));
                exit_codes::INCONSISTENT
            }
        }
        Command::Reset { yes } => {
            if !yes {
                eprintln!("refusing to reset without --yes");
                exit_codes::INVALID
            } else {
                report(Ok(tracker.reset()), |()| println!("roster cleared"))
            }
        }
    };
    Ok(code)
}

fn open_tracker(config_path: &Path) -> Result<FileTracker> {
    let base = config_path.parent().unwrap_or(Path::new(""));
    let config = load_config(config_path)?.relative_to(base);
    let species = load_species_table(&config.species_path)
        .with_context(|| format!("load species table {}", config.species_path.display()))?;
    let store = JsonFileStore::new(&config.state_path, config.save_retry());
    Ok(Tracker::open(store, species, config.team_capacity))
}

/// Print the outcome of an operation and map it to an exit code.
fn report<T>(result: Result<Applied<T>, RosterError>, on_success: impl FnOnce(T)) -> i32 {
    match result {
        Ok(applied) => {
            if let Some(warning) = &applied.warning {
                eprintln!("warning: {}", warning);
            }
            on_success(applied.value);
            exit_codes::OK
        }
        Err(err) => {
            eprintln!("{}: {}", err.kind(), err);
            exit_codes::for_kind(err.kind())
        }
    }
}

fn candidate_for(source: &str) -> Result<TeamCandidate> {
    match parse_id(source) {
        Some((IdKind::Pairing, _)) => Ok(TeamCandidate::Pairing(source.to_string())),
        Some((IdKind::Fusion, _)) => Ok(TeamCandidate::Fusion(source.to_string())),
        None => anyhow::bail!(
            "expected a pairing (P0001) or fusion (F0001) id, got '{}'",
            source
        ),
    }
}

fn print_roster(tracker: &FileTracker) {
    let roster = tracker.roster();

    println!("Pairings:");
    for p in &roster.pairings {
        let mark = if p.in_use() { " [fused]" } else { "" };
        println!(
            "  {} @ {}: {} | {}{}",
            p.id,
            p.player1.encounter,
            option_label(p.player1.number, &p.player1.name),
            option_label(p.player2.number, &p.player2.name),
            mark
        );
    }

    println!("Fusions:");
    for f in &roster.fusions {
        for player in Player::BOTH {
            let side = f.side(player);
            println!(
                "  {} {}: {} + {}",
                f.id,
                player,
                option_label(side.a.number, &side.a.name),
                option_label(side.b.number, &side.b.name)
            );
        }
    }

    for player in Player::BOTH {
        println!(
            "Team {} ({}/{}):",
            player.number(),
            roster.team(player).len(),
            tracker.team_capacity()
        );
        for entry in roster.team(player) {
            println!("  {}", describe_entry(entry));
        }
    }

    println!("Graveyard:");
    for g in tracker.graveyard_newest_first() {
        match g.numbers() {
            Some((p1, p2)) => {
                println!("  {}: #{:03} | #{:03} ({})", g.id, p1, p2, g.created_at);
            }
            None => println!("  {} [{}]", g.id, String::from(g.kind.clone())),
        }
    }
}

/// Species labels containing `query` (case-insensitive); all when `None`.
fn matching_species(table: &SpeciesTable, query: Option<&str>) -> Vec<String> {
    let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    table
        .options()
        .into_iter()
        .filter(|label| label.to_lowercase().contains(&needle))
        .collect()
}

fn describe_entry(entry: &TeamEntry) -> String {
    let species: Vec<String> = entry
        .species
        .iter()
        .map(|s| option_label(s.number, &s.name))
        .collect();
    format!("{} {}", entry.uid, species.join(" + "))
}

fn parse_player(value: &str) -> std::result::Result<Player, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "p1" | "player1" => Ok(Player::One),
        "2" | "p2" | "player2" => Ok(Player::Two),
        other => Err(format!("unknown player '{}' (use 1 or 2)", other)),
    }
}

fn parse_species(value: &str) -> std::result::Result<u32, String> {
    parse_species_number(value)
        .ok_or_else(|| format!("cannot read a species number from '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_add() {
        let cli = Cli::parse_from([
            "soullink",
            "pair",
            "add",
            "001 - Bulbasaur",
            "4",
            "--encounter",
            "Route 1",
        ]);
        assert!(matches!(
            cli.command,
            Command::Pair(PairCommand::Add {
                player1: 1,
                player2: 4,
                ..
            })
        ));
    }

    #[test]
    fn parse_evolve_player_aliases() {
        let cli = Cli::parse_from(["soullink", "evolve", "P0001", "--player", "p2", "--to", "5"]);
        assert!(matches!(
            cli.command,
            Command::Evolve {
                player: Player::Two,
                to: 5,
                ..
            }
        ));
    }

    #[test]
    fn species_query_matches_name_or_number() {
        let table = soullink::test_support::species_table();

        assert_eq!(matching_species(&table, Some("SAUR")).len(), 3);
        assert_eq!(matching_species(&table, Some("133")), vec!["133 - Eevee"]);
        assert_eq!(matching_species(&table, None).len(), table.len());
    }

    #[test]
    fn candidate_kind_follows_id_prefix() {
        assert_eq!(
            candidate_for("F0002").expect("fusion"),
            TeamCandidate::Fusion("F0002".into())
        );
        assert!(candidate_for("P0001_p1").is_err());
    }
}
