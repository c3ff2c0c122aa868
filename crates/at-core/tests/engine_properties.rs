//! Property tests over the state bijection, reward shaping, and updates.

use at_common::Action;
use at_config::PresetName;
use at_core::model::RewardModel;
use at_core::{QTable, StateSpace};
use proptest::prelude::*;

/// Any tuple inside the 7-feature domain.
fn state7_strategy() -> impl Strategy<Value = Vec<u8>> {
    (0u8..3, 0u8..2, 0u8..2, 0u8..2, 0u8..2, 0u8..3, 0u8..3)
        .prop_map(|(a, up, uv, unk, rp, sign, auth)| vec![a, up, uv, unk, rp, sign, auth])
}

proptest! {
    #[test]
    fn index_round_trips_any_valid_state(state in state7_strategy()) {
        let space = StateSpace::auth7();
        let index = space.index(&state).unwrap();
        prop_assert!(index < 432);
        prop_assert_eq!(space.state(index).unwrap(), state);
    }

    #[test]
    fn out_of_domain_tuples_never_index(
        state in state7_strategy(),
        dim in 0usize..7,
        excess in 0u8..4,
    ) {
        let space = StateSpace::auth7();
        let mut bad = state;
        bad[dim] = space.features()[dim].cardinality() + excess;
        prop_assert!(space.index(&bad).is_err());
    }

    #[test]
    fn reward_monotonicity_holds_between_any_state_pair(
        lo in state7_strategy(),
        hi in state7_strategy(),
    ) {
        let model = RewardModel::new(&PresetName::BalancedMfa.config());
        let (lo, hi) = if model.risk_score(&lo) <= model.risk_score(&hi) {
            (lo, hi)
        } else {
            (hi, lo)
        };
        // Accept never pays more at higher risk; Reject never pays less.
        prop_assert!(model.reward(&lo, Action::Accept) >= model.reward(&hi, Action::Accept));
        prop_assert!(model.reward(&lo, Action::Reject) <= model.reward(&hi, Action::Reject));
    }

    #[test]
    fn td_update_contracts_distance_to_target(
        initial in -100.0f64..100.0,
        target in -100.0f64..100.0,
        alpha in 0.01f64..1.0,
    ) {
        let mut table = QTable::zeroed(1);
        table.update(0, Action::Mfa, initial, 1.0);

        table.update(0, Action::Mfa, target, alpha);
        let after = table.row(0)[Action::Mfa.index()];
        let before_gap = (target - initial).abs();
        let after_gap = (target - after).abs();
        if before_gap > 0.0 {
            prop_assert!(after_gap < before_gap);
        } else {
            prop_assert_eq!(after, target);
        }
    }
}
