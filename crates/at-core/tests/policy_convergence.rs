//! End-to-end training convergence on the canonical risk archetypes.
//!
//! Under the default shaping, sufficient training must drive the greedy
//! policy to Accept the all-good-signals state, Reject the all-bad state,
//! and challenge a mid-tier state with MFA.

use at_common::Action;
use at_config::PresetName;
use at_core::{QTable, Trainer};

fn trained_table(episodes: u32) -> (QTable, at_core::StateSpace) {
    let mut config = PresetName::BalancedMfa.config();
    config.episodes = episodes;
    let mut trainer = Trainer::new(&config);
    let mut table = QTable::zeroed(trainer.space().len());
    trainer.run(&mut table, None).unwrap();
    let space = trainer.space().clone();
    (table, space)
}

#[test]
fn archetypes_converge_to_their_actions() {
    let (table, space) = trained_table(3_000);

    // All good signals: risk score 0, low tier.
    let all_good = space.index(&[0, 1, 1, 0, 1, 0, 0]).unwrap();
    assert_eq!(table.best_action(all_good), Action::Accept);

    // All bad signals: risk score 23.6, high tier.
    let all_bad = space.index(&[2, 0, 0, 1, 0, 2, 2]).unwrap();
    assert_eq!(table.best_action(all_bad), Action::Reject);

    // Mid tier (risk score 6.5): MFA's mid reward dominates.
    let mid = space.index(&[1, 1, 1, 0, 1, 1, 0]).unwrap();
    assert_eq!(table.best_action(mid), Action::Mfa);
}

#[test]
fn every_state_row_becomes_nonzero_under_long_training() {
    // With uniform episode starts and epsilon exploration, every state is
    // visited and at least one action value learned.
    let (table, space) = trained_table(3_000);
    let untouched = (0..space.len())
        .filter(|&i| table.row(i).iter().all(|&q| q == 0.0))
        .count();
    assert_eq!(untouched, 0);
}

#[test]
fn favor_accept_preset_accepts_through_mid_tier() {
    let mut config = PresetName::FavorAccept.config();
    config.episodes = 3_000;
    let mut trainer = Trainer::new(&config);
    let mut table = QTable::zeroed(trainer.space().len());
    trainer.run(&mut table, None).unwrap();

    // Risk score 6.5 is mid tier; this preset rewards Accept there (35
    // against MFA's 18).
    let mid = trainer.space().index(&[1, 1, 1, 0, 1, 1, 0]).unwrap();
    assert_eq!(table.best_action(mid), Action::Accept);
}
