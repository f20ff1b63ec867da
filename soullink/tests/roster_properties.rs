//! Property tests over random operation sequences.
//!
//! Every sequence, including rejected operations, must leave a roster that
//! passes the invariant audit, never shares a pairing between fusions, and
//! survives a JSON round trip unchanged.

use std::collections::HashSet;

use proptest::prelude::*;
use soullink::core::team::TEAM_CAPACITY;
use soullink::core::types::TeamCandidate;
use soullink::core::used_flags::recompute_used_flags;
use soullink::roster::{Player, Roster};
use soullink::species::SpeciesTable;
use soullink::test_support::{MemoryStore, species_table};
use soullink::tracker::Tracker;

const NUMBERS: [u32; 8] = [1, 2, 4, 7, 10, 16, 19, 133];

#[derive(Debug, Clone)]
enum Op {
    Pair(u32, u32),
    Delete(u32),
    Grave(u32),
    Fuse(u32, u32),
    Unfuse(u32),
    Bury(u32),
    Evolve(u32, Player, u32),
    TeamPairing(Player, u32),
    TeamFusion(Player, u32),
    TeamRemove(Player, usize),
}

fn player() -> impl Strategy<Value = Player> {
    prop_oneof![Just(Player::One), Just(Player::Two)]
}

fn species() -> impl Strategy<Value = u32> {
    proptest::sample::select(NUMBERS.to_vec())
}

fn op() -> impl Strategy<Value = Op> {
    // Small id ranges so operations mostly hit existing entities.
    prop_oneof![
        3 => (species(), species()).prop_map(|(a, b)| Op::Pair(a, b)),
        1 => (1u32..8).prop_map(Op::Delete),
        1 => (1u32..8).prop_map(Op::Grave),
        3 => (1u32..8, 1u32..8).prop_map(|(a, b)| Op::Fuse(a, b)),
        1 => (1u32..5).prop_map(Op::Unfuse),
        1 => (1u32..5).prop_map(Op::Bury),
        2 => (1u32..8, player(), species()).prop_map(|(p, who, s)| Op::Evolve(p, who, s)),
        2 => (player(), 1u32..8).prop_map(|(who, p)| Op::TeamPairing(who, p)),
        2 => (player(), 1u32..5).prop_map(|(who, f)| Op::TeamFusion(who, f)),
        1 => (player(), 0usize..6).prop_map(|(who, i)| Op::TeamRemove(who, i)),
    ]
}

fn apply(tracker: &mut Tracker<MemoryStore, SpeciesTable>, op: &Op) {
    let pid = |n: u32| format!("P{:04}", n);
    let fid = |n: u32| format!("F{:04}", n);
    // Rejections are expected; only the resulting state matters.
    let _ = match op {
        Op::Pair(a, b) => tracker.add_pairing(*a, "Route", *b).map(drop),
        Op::Delete(n) => tracker.delete_pairing(&pid(*n)).map(drop),
        Op::Grave(n) => tracker.send_to_graveyard(&pid(*n)).map(drop),
        Op::Fuse(a, b) => tracker.create_fusion(&pid(*a), &pid(*b)).map(drop),
        Op::Unfuse(n) => tracker.unfuse(&fid(*n)).map(drop),
        Op::Bury(n) => tracker.bury_fusion(&fid(*n)).map(drop),
        Op::Evolve(n, who, s) => tracker.evolve(&pid(*n), *who, *s).map(drop),
        Op::TeamPairing(who, n) => tracker
            .add_to_team(*who, &TeamCandidate::Pairing(pid(*n)))
            .map(drop),
        Op::TeamFusion(who, n) => tracker
            .add_to_team(*who, &TeamCandidate::Fusion(fid(*n)))
            .map(drop),
        Op::TeamRemove(who, i) => {
            let uid = tracker.roster().team(*who).get(*i).map(|e| e.uid.clone());
            match uid {
                Some(uid) => tracker.remove_from_team(*who, &uid).map(drop),
                None => Ok(()),
            }
        }
    };
}

fn run(ops: &[Op]) -> Tracker<MemoryStore, SpeciesTable> {
    let mut tracker = Tracker::open(MemoryStore::default(), species_table(), TEAM_CAPACITY);
    for op in ops {
        apply(&mut tracker, op);
    }
    tracker
}

proptest! {
    #[test]
    fn any_sequence_keeps_invariants(ops in proptest::collection::vec(op(), 0..40)) {
        let tracker = run(&ops);
        let errors = tracker.validate();
        prop_assert!(errors.is_empty(), "violations: {:?}", errors);
    }

    #[test]
    fn pairings_belong_to_at_most_one_fusion(ops in proptest::collection::vec(op(), 0..40)) {
        let tracker = run(&ops);
        let mut seen = HashSet::new();
        for fusion in &tracker.roster().fusions {
            for id in fusion.pairing_ids() {
                prop_assert!(seen.insert(id.to_string()), "{} fused twice", id);
            }
        }
    }

    #[test]
    fn recompute_is_idempotent(ops in proptest::collection::vec(op(), 0..40)) {
        let tracker = run(&ops);
        let mut roster = tracker.roster().clone();
        prop_assert!(recompute_used_flags(&mut roster).is_empty());
        prop_assert_eq!(&roster, tracker.roster());
    }

    #[test]
    fn roster_survives_json_round_trip(ops in proptest::collection::vec(op(), 0..40)) {
        let tracker = run(&ops);
        let json = serde_json::to_string(tracker.roster()).expect("serialize");
        let parsed: Roster = serde_json::from_str(&json).expect("parse");
        prop_assert_eq!(&parsed, tracker.roster());
    }

    #[test]
    fn teams_never_exceed_capacity(ops in proptest::collection::vec(op(), 0..60)) {
        let tracker = run(&ops);
        for who in Player::BOTH {
            prop_assert!(tracker.roster().team(who).len() <= TEAM_CAPACITY);
        }
    }
}
