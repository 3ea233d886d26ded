//! The top-level reducer: classifies every event by state and dispatches to
//! the handler modules. `update` itself holds no logic beyond that dispatch
//! — each module owns the guards for its own corner of the state machine.

use crate::{client, onchain, rollback, snapshot_engine};
use head_common::{
    ChainEvent, Command, Crypto, Effect, Environment, Event, HeadState, HeadStateTag, Ledger,
    LogicError, NetworkMessage, Outcome, ServerOutput,
};

/// Classify and dispatch one event. Pure, total, never blocks: every branch
/// returns exactly one [`Outcome`].
#[tracing::instrument(skip(env, ledger, crypto, state), fields(event = %event.tag(), from = %state.tag()))]
pub fn update<L, C>(
    env: &Environment,
    ledger: &L,
    crypto: &C,
    state: HeadState<L>,
    event: Event<L>,
) -> Outcome<L>
where
    L: Ledger,
    C: Crypto<L>,
{
    tracing::trace!("dispatching event");

    // Events meaningful in every state, independent of the state tag.
    match &event {
        Event::NetworkEvent(NetworkMessage::Connected(host)) => {
            return log_outcome(Outcome::new_state(
                state,
                vec![Effect::ClientEffect(ServerOutput::PeerConnected(host.clone()))],
            ));
        }
        Event::NetworkEvent(NetworkMessage::Disconnected(host)) => {
            return log_outcome(Outcome::new_state(
                state,
                vec![Effect::ClientEffect(ServerOutput::PeerDisconnected(
                    host.clone(),
                ))],
            ));
        }
        Event::OnChainEvent(ChainEvent::Rollback(depth)) => {
            return log_outcome(rollback::handle(state, *depth));
        }
        Event::OnChainEvent(ChainEvent::Tick(_)) => {
            return log_outcome(Outcome::unchanged(state));
        }
        _ => {}
    }

    let outcome = match state {
        HeadState::Idle => dispatch_idle(event),
        HeadState::Initial(s) => dispatch_initial(env, ledger, s, event),
        HeadState::Open(s) => dispatch_open(env, ledger, crypto, s, event),
        HeadState::Closed(s) => dispatch_closed(s, event),
        HeadState::Final => Outcome::Error(LogicError::invalid_event(event, HeadStateTag::Final)),
    };
    log_outcome(outcome)
}

/// Logs the shape of an outcome: transitions at `info`, guard rejections and
/// waits at `debug`. Never logs the event/state payloads themselves, only
/// their tags.
fn log_outcome<L: Ledger>(outcome: Outcome<L>) -> Outcome<L> {
    match &outcome {
        Outcome::NewState(state, effects) => {
            tracing::info!(to = %state.tag(), effects = effects.len(), "transitioned");
        }
        Outcome::Wait(reason) => {
            tracing::debug!(%reason, "waiting");
        }
        Outcome::Error(err) => {
            tracing::debug!(%err, "rejected");
        }
    }
    outcome
}

fn dispatch_idle<L: Ledger>(event: Event<L>) -> Outcome<L> {
    match event {
        Event::ClientEvent(Command::Init(parameters)) => client::handle_init(parameters),
        Event::OnChainEvent(ChainEvent::Observation(
            head_common::OnChainTx::OnInitTx { parameters },
        )) => onchain::handle_init_tx(parameters),
        other => Outcome::Error(LogicError::invalid_event(other, HeadStateTag::Idle)),
    }
}

fn dispatch_initial<L: Ledger>(
    env: &Environment,
    ledger: &L,
    state: head_common::InitialState<L>,
    event: Event<L>,
) -> Outcome<L> {
    match event {
        Event::ClientEvent(Command::Commit(utxo)) => client::handle_commit(env, state, utxo),
        Event::ClientEvent(Command::Abort) => client::handle_abort(state),
        Event::OnChainEvent(ChainEvent::Observation(head_common::OnChainTx::OnCommitTx {
            party,
            utxo,
        })) => onchain::handle_commit_tx(state, party, utxo),
        Event::OnChainEvent(ChainEvent::Observation(
            head_common::OnChainTx::OnCollectComTx,
        )) => onchain::handle_collect_com_tx(ledger, state),
        Event::OnChainEvent(ChainEvent::Observation(head_common::OnChainTx::OnAbortTx)) => {
            onchain::handle_abort_tx(state)
        }
        other => Outcome::Error(LogicError::invalid_event(other, HeadStateTag::Initial)),
    }
}

fn dispatch_open<L: Ledger, C: Crypto<L>>(
    env: &Environment,
    ledger: &L,
    crypto: &C,
    state: head_common::OpenState<L>,
    event: Event<L>,
) -> Outcome<L> {
    match event {
        Event::NetworkEvent(NetworkMessage::ReqTx(from, tx)) => {
            snapshot_engine::handle_req_tx(env, ledger, state, from, tx)
        }
        Event::NetworkEvent(NetworkMessage::ReqSn(from, sn, txs)) => {
            snapshot_engine::handle_req_sn(env, ledger, crypto, state, from, sn, txs)
        }
        Event::NetworkEvent(NetworkMessage::AckSn(from, sig, sn)) => {
            snapshot_engine::handle_ack_sn(env, ledger, crypto, state, from, sig, sn)
        }
        Event::ClientEvent(Command::NewTx(tx)) => client::handle_new_tx(env, ledger, state, tx),
        Event::ClientEvent(Command::Close) => client::handle_close(state),
        Event::ClientEvent(Command::GetUTxO) => client::handle_get_utxo(state),
        Event::OnChainEvent(ChainEvent::Observation(head_common::OnChainTx::OnCloseTx {
            snapshot_number,
            deadline,
        })) => onchain::handle_close_tx(state, snapshot_number, deadline),
        other => Outcome::Error(LogicError::invalid_event(other, HeadStateTag::Open)),
    }
}

fn dispatch_closed<L: Ledger>(state: head_common::ClosedState<L>, event: Event<L>) -> Outcome<L> {
    match event {
        Event::ClientEvent(Command::Contest) => client::handle_contest(state),
        Event::OnChainEvent(ChainEvent::Observation(
            head_common::OnChainTx::OnContestTx { snapshot_number },
        )) => onchain::handle_contest_tx(state, snapshot_number),
        Event::ShouldPostFanout => onchain::handle_should_post_fanout(state),
        Event::OnChainEvent(ChainEvent::Observation(head_common::OnChainTx::OnFanoutTx)) => {
            onchain::handle_fanout_tx(state)
        }
        other => Outcome::Error(LogicError::invalid_event(other, HeadStateTag::Closed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{party, signing_key, TestCrypto, TestLedger};
    use head_common::HeadParameters;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn env() -> Environment {
        Environment::new(party(1), signing_key(1), BTreeSet::from([party(2)]))
    }

    #[test]
    fn connected_is_accepted_in_every_state() {
        let outcome = update(
            &env(),
            &TestLedger,
            &TestCrypto,
            HeadState::Final,
            Event::NetworkEvent(NetworkMessage::Connected("peer-1".into())),
        );
        match outcome {
            Outcome::NewState(state, effects) => {
                assert_eq!(state.tag(), HeadStateTag::Final);
                assert!(matches!(
                    effects[0],
                    Effect::ClientEffect(ServerOutput::PeerConnected(_))
                ));
            }
            _ => panic!("expected NewState"),
        }
    }

    #[test]
    fn tick_is_a_pure_heartbeat() {
        let outcome = update(
            &env(),
            &TestLedger,
            &TestCrypto,
            HeadState::Idle,
            Event::OnChainEvent(ChainEvent::Tick(42)),
        );
        match outcome {
            Outcome::NewState(state, effects) => {
                assert_eq!(state.tag(), HeadStateTag::Idle);
                assert!(effects.is_empty());
            }
            _ => panic!("expected NewState"),
        }
    }

    #[test]
    fn idle_rejects_unrelated_commands() {
        let outcome = update(
            &env(),
            &TestLedger,
            &TestCrypto,
            HeadState::Idle,
            Event::ClientEvent(Command::Close),
        );
        assert!(outcome.is_error());
    }

    #[test]
    fn init_command_in_idle_posts_init_tx() {
        let parameters = HeadParameters::new(Duration::from_secs(60), vec![party(1), party(2)]);
        let outcome = update(
            &env(),
            &TestLedger,
            &TestCrypto,
            HeadState::Idle,
            Event::ClientEvent(Command::Init(parameters)),
        );
        match outcome {
            Outcome::NewState(state, effects) => {
                assert_eq!(state.tag(), HeadStateTag::Idle);
                assert!(matches!(
                    effects[0],
                    Effect::OnChainEffect(head_common::PostChainTx::InitTx(_))
                ));
            }
            _ => panic!("expected NewState"),
        }
    }

    #[test]
    fn final_rejects_everything_but_global_events() {
        let outcome = update(
            &env(),
            &TestLedger,
            &TestCrypto,
            HeadState::Final,
            Event::ClientEvent(Command::GetUTxO),
        );
        assert!(outcome.is_error());
    }
}
