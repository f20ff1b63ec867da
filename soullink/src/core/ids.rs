//! Entity id formatting: a one-letter kind tag plus a zero-padded counter.

use std::sync::LazyLock;

use regex::Regex;

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([PF])(\d{4,})$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Pairing,
    Fusion,
}

impl IdKind {
    fn tag(self) -> char {
        match self {
            IdKind::Pairing => 'P',
            IdKind::Fusion => 'F',
        }
    }
}

pub fn format_id(kind: IdKind, counter: u32) -> String {
    format!("{}{:04}", kind.tag(), counter)
}

/// Split an id into its kind and counter value. `None` for malformed ids.
pub fn parse_id(id: &str) -> Option<(IdKind, u32)> {
    let caps = ID_PATTERN.captures(id)?;
    let kind = match &caps[1] {
        "P" => IdKind::Pairing,
        _ => IdKind::Fusion,
    };
    let counter = caps[2].parse().ok()?;
    Some((kind, counter))
}
