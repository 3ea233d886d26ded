//! On-chain observation handling: state transitions driven by transactions
//! the chain observer reports as posted.

use head_common::{
    ChainEvent, ClosedState, CoordinatedHeadState, Effect, Event, HeadParameters, HeadState,
    HeadStateTag, InitialState, Ledger, LogicError, OnChainTx, OpenState, Outcome, Party,
    PostChainTx, ServerOutput,
};
use std::collections::{BTreeMap, BTreeSet};

/// `Idle + Observation(OnInitTx{params})` → `Initial`.
pub fn handle_init_tx<L: Ledger>(parameters: HeadParameters) -> Outcome<L> {
    let pending_commits: BTreeSet<Party> = parameters.party_set();
    let initial = InitialState {
        parameters,
        pending_commits,
        committed: BTreeMap::new(),
        prev: Box::new(HeadState::Idle),
    };
    Outcome::new_state(
        HeadState::Initial(initial),
        vec![Effect::ClientEffect(ServerOutput::HeadIsInitializing)],
    )
}

/// `Initial + Observation(OnCommitTx{party, utxo})`.
pub fn handle_commit_tx<L: Ledger>(
    mut state: InitialState<L>,
    party: Party,
    utxo: L::UTxO,
) -> Outcome<L> {
    if !state.pending_commits.remove(&party) {
        let event = Event::OnChainEvent(ChainEvent::Observation(OnChainTx::OnCommitTx {
            party,
            utxo,
        }));
        return Outcome::Error(LogicError::invalid_event(event, HeadStateTag::Initial));
    }
    state.committed.insert(party, utxo);
    let mut effects = Vec::new();
    if state.pending_commits.is_empty() {
        effects.push(Effect::OnChainEffect(PostChainTx::CollectComTx));
    }
    Outcome::new_state(HeadState::Initial(state), effects)
}

/// `Initial + Observation(OnCollectComTx)` → `Open`.
pub fn handle_collect_com_tx<L: Ledger>(ledger: &L, state: InitialState<L>) -> Outcome<L> {
    let utxos: Vec<L::UTxO> = state.committed.values().cloned().collect();
    let union = ledger.union_utxo(&utxos);
    let parameters = state.parameters.clone();
    let open = OpenState {
        parameters,
        coordinated: CoordinatedHeadState::initial(union),
        prev: Box::new(HeadState::Initial(state)),
    };
    Outcome::new_state(
        HeadState::Open(open),
        vec![Effect::ClientEffect(ServerOutput::HeadIsOpen)],
    )
}

/// `Initial + Observation(OnAbortTx)` → `Final`.
pub fn handle_abort_tx<L: Ledger>(_state: InitialState<L>) -> Outcome<L> {
    Outcome::new_state(
        HeadState::Final,
        vec![Effect::ClientEffect(ServerOutput::HeadIsAborted)],
    )
}

/// `Open + Observation(OnCloseTx{snapshotNumber, deadline})` → `Closed`.
pub fn handle_close_tx<L: Ledger>(
    state: OpenState<L>,
    snapshot_number: u64,
    _deadline: i64,
) -> Outcome<L> {
    let confirmed_number = state.coordinated.confirmed_snapshot.number();
    let confirmed_snapshot = state.coordinated.confirmed_snapshot.clone();
    let parameters = state.parameters.clone();
    let contestation_period = parameters.contestation_period;
    let closed = ClosedState {
        parameters,
        confirmed_snapshot: confirmed_snapshot.clone(),
        prev: Box::new(HeadState::Open(state)),
    };
    let mut effects = vec![Effect::ClientEffect(ServerOutput::HeadIsClosed)];
    if snapshot_number < confirmed_number {
        effects.push(Effect::OnChainEffect(PostChainTx::ContestTx(confirmed_snapshot)));
    }
    effects.push(Effect::Delay {
        delay: contestation_period,
        reason: head_common::WaitReason::WaitOnContestationPeriod,
        event: Box::new(Event::ShouldPostFanout),
    });
    Outcome::new_state(HeadState::Closed(closed), effects)
}

/// `Closed + Observation(OnContestTx{snapshotNumber})`.
pub fn handle_contest_tx<L: Ledger>(state: ClosedState<L>, snapshot_number: u64) -> Outcome<L> {
    let confirmed_number = state.confirmed_snapshot.number();
    let mut effects = Vec::new();
    if snapshot_number < confirmed_number {
        effects.push(Effect::OnChainEffect(PostChainTx::ContestTx(
            state.confirmed_snapshot.clone(),
        )));
    }
    Outcome::new_state(HeadState::Closed(state), effects)
}

/// `Closed + ShouldPostFanout`.
pub fn handle_should_post_fanout<L: Ledger>(state: ClosedState<L>) -> Outcome<L> {
    let confirmed = state.confirmed_snapshot.clone();
    Outcome::new_state(
        HeadState::Closed(state),
        vec![Effect::OnChainEffect(PostChainTx::FanoutTx(confirmed))],
    )
}

/// `Closed + Observation(OnFanoutTx)` → `Final`.
pub fn handle_fanout_tx<L: Ledger>(_state: ClosedState<L>) -> Outcome<L> {
    Outcome::new_state(
        HeadState::Final,
        vec![Effect::ClientEffect(ServerOutput::HeadIsFinalized)],
    )
}
