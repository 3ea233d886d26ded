//! Rollback handling: the chain observer reports that the last `depth`
//! confirmations were reorganized away, and the core rewinds its state
//! along the `prev` chain to match.

use head_common::{Effect, HeadState, Ledger, Outcome, ServerOutput};

/// Always emits `RolledBack`, even when `depth` is `0` — the runtime asked,
/// so the client is told, regardless of whether the state actually moved.
pub fn handle<L: Ledger>(state: HeadState<L>, depth: u64) -> Outcome<L> {
    let rolled_back = state.rollback(depth);
    Outcome::new_state(
        rolled_back,
        vec![Effect::ClientEffect(ServerOutput::RolledBack)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestLedger;
    use head_common::HeadStateTag;

    #[test]
    fn rollback_zero_still_emits_rolled_back() {
        let outcome = handle::<TestLedger>(HeadState::Idle, 0);
        match outcome {
            Outcome::NewState(state, effects) => {
                assert_eq!(state.tag(), HeadStateTag::Idle);
                assert_eq!(effects.len(), 1);
                assert!(matches!(
                    effects[0],
                    Effect::ClientEffect(ServerOutput::RolledBack)
                ));
            }
            _ => panic!("expected NewState"),
        }
    }

    #[test]
    fn rollback_past_idle_stays_idle() {
        let outcome = handle::<TestLedger>(HeadState::Idle, 7);
        match outcome {
            Outcome::NewState(state, _) => assert_eq!(state.tag(), HeadStateTag::Idle),
            _ => panic!("expected NewState"),
        }
    }
}
