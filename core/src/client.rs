//! Local client command handlers.

use head_common::{
    Effect, Environment, Event, HeadState, HeadStateTag, InitialState, Ledger, LogicError,
    NetworkMessage, OpenState, Outcome, PostChainTx, ServerOutput,
};

/// `Init` in `Idle`. The state does not move yet; it only
/// moves once the chain observer reports `OnInitTx` back (`onchain::handle_init_tx`).
pub fn handle_init<L: Ledger>(parameters: head_common::HeadParameters) -> Outcome<L> {
    Outcome::new_state(
        HeadState::Idle,
        vec![Effect::OnChainEffect(PostChainTx::InitTx(parameters))],
    )
}

/// `Commit(utxo)` in `Initial`, gated on `self ∈ pendingCommits`.
pub fn handle_commit<L: Ledger>(
    env: &Environment,
    state: InitialState<L>,
    utxo: L::UTxO,
) -> Outcome<L> {
    if !state.pending_commits.contains(&env.me) {
        let event = Event::ClientEvent(head_common::Command::Commit(utxo));
        return Outcome::Error(LogicError::invalid_event(event, HeadStateTag::Initial));
    }
    let effect = Effect::OnChainEffect(PostChainTx::CommitTx(env.me, utxo));
    Outcome::new_state(HeadState::Initial(state), vec![effect])
}

/// `Abort` in `Initial`.
pub fn handle_abort<L: Ledger>(state: InitialState<L>) -> Outcome<L> {
    Outcome::new_state(
        HeadState::Initial(state),
        vec![Effect::OnChainEffect(PostChainTx::AbortTx)],
    )
}

/// `NewTx(tx)` in `Open`: broadcast the transaction, then
/// route it through the same path a received `ReqTx` would take. The
/// broadcast only happens if locally applying the transaction actually
/// advances the state — `Wait`/`Error` outcomes carry no effects list to
/// attach a broadcast to, and there is no point telling peers about a
/// transaction the local node itself just rejected or deferred.
pub fn handle_new_tx<L: Ledger>(
    env: &Environment,
    ledger: &L,
    state: OpenState<L>,
    tx: L::Tx,
) -> Outcome<L> {
    let broadcast = Effect::NetworkEffect(NetworkMessage::ReqTx(env.me, tx.clone()));
    match crate::snapshot_engine::handle_req_tx(env, ledger, state, env.me, tx) {
        Outcome::NewState(state, mut effects) => {
            effects.insert(0, broadcast);
            Outcome::new_state(state, effects)
        }
        other => other,
    }
}

/// `Close` in `Open`.
pub fn handle_close<L: Ledger>(state: OpenState<L>) -> Outcome<L> {
    let confirmed = state.coordinated.confirmed_snapshot.clone();
    Outcome::new_state(
        HeadState::Open(state),
        vec![Effect::OnChainEffect(PostChainTx::CloseTx(confirmed))],
    )
}

/// `Contest` in `Closed`.
pub fn handle_contest<L: Ledger>(state: head_common::ClosedState<L>) -> Outcome<L> {
    let confirmed = state.confirmed_snapshot.clone();
    Outcome::new_state(
        HeadState::Closed(state),
        vec![Effect::OnChainEffect(PostChainTx::ContestTx(confirmed))],
    )
}

/// `GetUTxO` in `Open`.
pub fn handle_get_utxo<L: Ledger>(state: OpenState<L>) -> Outcome<L> {
    let utxo = state.coordinated.seen_utxo.clone();
    Outcome::new_state(
        HeadState::Open(state),
        vec![Effect::ClientEffect(ServerOutput::UTxO(utxo))],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{party, signing_key, TestLedger, TestTx};
    use head_common::{CoordinatedHeadState, HeadParameters};
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn env() -> Environment {
        Environment::new(party(1), signing_key(1), BTreeSet::from([party(2)]))
    }

    fn params() -> HeadParameters {
        HeadParameters::new(Duration::from_secs(60), vec![party(1), party(2)])
    }

    #[test]
    fn commit_rejected_when_not_pending() {
        let state = InitialState {
            parameters: params(),
            pending_commits: BTreeSet::from([party(2)]),
            committed: Default::default(),
            prev: Box::new(HeadState::Idle),
        };
        let outcome = handle_commit::<TestLedger>(&env(), state, Default::default());
        assert!(outcome.is_error());
    }

    #[test]
    fn commit_accepted_when_pending() {
        let state = InitialState {
            parameters: params(),
            pending_commits: BTreeSet::from([party(1), party(2)]),
            committed: Default::default(),
            prev: Box::new(HeadState::Idle),
        };
        let outcome = handle_commit::<TestLedger>(&env(), state, Default::default());
        match outcome {
            Outcome::NewState(_, effects) => {
                assert_eq!(effects.len(), 1);
                assert!(matches!(
                    effects[0],
                    Effect::OnChainEffect(PostChainTx::CommitTx(..))
                ));
            }
            _ => panic!("expected NewState"),
        }
    }

    #[test]
    fn new_tx_broadcasts_only_on_advance() {
        let open = OpenState {
            parameters: params(),
            coordinated: CoordinatedHeadState::initial(Default::default()),
            prev: Box::new(HeadState::Idle),
        };
        let tx = TestTx::new(1, &[], &[(1, 10)]);
        let outcome = handle_new_tx(&env(), &TestLedger, open, tx);
        match outcome {
            Outcome::NewState(_, effects) => {
                assert!(matches!(effects[0], Effect::NetworkEffect(NetworkMessage::ReqTx(..))));
            }
            _ => panic!("expected NewState"),
        }
    }

    #[test]
    fn new_tx_failure_carries_no_broadcast() {
        let open = OpenState {
            parameters: params(),
            coordinated: CoordinatedHeadState::initial(Default::default()),
            prev: Box::new(HeadState::Idle),
        };
        let tx = TestTx::new(1, &[99], &[]);
        let outcome = handle_new_tx(&env(), &TestLedger, open, tx);
        assert!(outcome.is_wait());
    }
}
