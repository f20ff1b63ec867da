//! I/O helpers: configuration, roster persistence and species tables.

pub mod config;
pub mod roster_store;
pub mod species_file;
