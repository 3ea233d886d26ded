//! The snapshot engine: transaction intake, snapshot proposal and
//! acknowledgement while the head is `Open`.

use head_common::{
    leader, Crypto, Effect, Environment, Event, HeadState, HeadStateTag, Ledger, LogicError,
    NetworkMessage, OpenState, Outcome, Party, SeenSnapshotState, ServerOutput, Signature,
    Snapshot, WaitReason,
};

/// `ReqTx(from, tx)`. `from` is accepted but not checked against the leader
/// — any party may originate a transaction request.
pub fn handle_req_tx<L: Ledger>(
    env: &Environment,
    ledger: &L,
    mut state: OpenState<L>,
    _from: Party,
    tx: L::Tx,
) -> Outcome<L> {
    match ledger.apply_transactions(&state.coordinated.seen_utxo, std::slice::from_ref(&tx)) {
        Ok(next_utxo) => {
            state.coordinated.seen_txs.push(tx);
            state.coordinated.seen_utxo = next_utxo;
            let mut effects = Vec::new();
            let next_number = state.coordinated.confirmed_snapshot.number() + 1;
            let am_leader = leader(next_number, &state.parameters.parties) == env.me;
            if am_leader && state.coordinated.seen_snapshot.is_none() {
                effects.push(Effect::NetworkEffect(NetworkMessage::ReqSn(
                    env.me,
                    next_number,
                    state.coordinated.seen_txs.clone(),
                )));
            }
            Outcome::new_state(HeadState::Open(state), effects)
        }
        Err(err) => Outcome::Wait(WaitReason::WaitOnNotApplicableTx(err)),
    }
}

/// `ReqSn(from, sn, txs)`. Guards run in the documented order; the first
/// failing guard wins.
pub fn handle_req_sn<L: Ledger, C: Crypto<L>>(
    env: &Environment,
    ledger: &L,
    crypto: &C,
    mut state: OpenState<L>,
    from: Party,
    sn: u64,
    txs: Vec<L::Tx>,
) -> Outcome<L> {
    let confirmed_number = state.coordinated.confirmed_snapshot.number();

    if from != leader(sn, &state.parameters.parties) {
        let event = Event::NetworkEvent(NetworkMessage::ReqSn(from, sn, txs));
        return Outcome::Error(LogicError::invalid_event(event, HeadStateTag::Open));
    }
    if sn <= confirmed_number {
        let event = Event::NetworkEvent(NetworkMessage::ReqSn(from, sn, txs));
        return Outcome::Error(LogicError::invalid_event(event, HeadStateTag::Open));
    }
    if sn > confirmed_number + 1 {
        return Outcome::Wait(WaitReason::WaitOnSeenSnapshot);
    }
    if let Some(seen) = &state.coordinated.seen_snapshot {
        let in_flight = seen.snapshot.number;
        if sn == in_flight {
            let event = Event::NetworkEvent(NetworkMessage::ReqSn(from, sn, txs));
            return Outcome::Error(LogicError::invalid_event(event, HeadStateTag::Open));
        }
        return Outcome::Wait(WaitReason::WaitOnSnapshotNumber(in_flight));
    }

    let confirmed_utxo = state.coordinated.confirmed_snapshot.utxo().clone();
    match ledger.apply_transactions(&confirmed_utxo, &txs) {
        Ok(result_utxo) => {
            let snapshot = Snapshot {
                number: sn,
                utxo: result_utxo,
                confirmed_txs: txs,
            };
            let sig = crypto.sign(&env.signing_key, &snapshot);
            state.coordinated.seen_snapshot =
                Some(SeenSnapshotState::new(snapshot, env.me, sig.clone()));
            let effects = vec![Effect::NetworkEffect(NetworkMessage::AckSn(env.me, sig, sn))];
            Outcome::new_state(HeadState::Open(state), effects)
        }
        Err(err) => Outcome::Wait(WaitReason::WaitOnNotApplicableTx(err)),
    }
}

/// `AckSn(from, sig, sn)`. Invalid signatures are dropped silently, not
/// reported as `Error` — a byzantine or buggy peer must not be able to halt
/// the head.
pub fn handle_ack_sn<L: Ledger, C: Crypto<L>>(
    env: &Environment,
    ledger: &L,
    crypto: &C,
    mut state: OpenState<L>,
    from: Party,
    sig: Signature,
    sn: u64,
) -> Outcome<L> {
    let matches_in_flight = state
        .coordinated
        .seen_snapshot
        .as_ref()
        .is_some_and(|seen| seen.snapshot.number == sn);
    if !matches_in_flight {
        return Outcome::Wait(WaitReason::WaitOnSeenSnapshot);
    }

    let seen = state.coordinated.seen_snapshot.as_ref().expect("checked above");
    if !crypto.verify(&from, &sig, &seen.snapshot) {
        tracing::warn!(?from, sn, "dropping ack with invalid signature");
        return Outcome::unchanged(HeadState::Open(state));
    }

    let seen = state.coordinated.seen_snapshot.as_mut().expect("checked above");
    seen.acks.insert(from, sig);

    if !seen.is_complete(&state.parameters.parties) {
        return Outcome::unchanged(HeadState::Open(state));
    }

    let seen = state
        .coordinated
        .seen_snapshot
        .take()
        .expect("checked above");
    let sigs: Vec<Signature> = seen.acks.values().cloned().collect();
    let agg = crypto.aggregate(&sigs);

    // The network only guarantees per-sender FIFO delivery, not one global
    // order, so a non-leader's `seen_txs` is not guaranteed to list
    // `confirmed_txs` as a contiguous prefix. Remove each confirmed
    // transaction by value rather than draining the first N slots.
    let mut remaining_txs = state.coordinated.seen_txs.clone();
    for confirmed_tx in &seen.snapshot.confirmed_txs {
        if let Some(pos) = remaining_txs.iter().position(|tx| tx == confirmed_tx) {
            remaining_txs.remove(pos);
        }
    }
    let remaining_utxo = match ledger.apply_transactions(&seen.snapshot.utxo, &remaining_txs) {
        Ok(utxo) => utxo,
        Err(err) => return Outcome::Wait(WaitReason::WaitOnNotApplicableTx(err)),
    };
    state.coordinated.seen_txs = remaining_txs;
    state.coordinated.seen_utxo = remaining_utxo;
    let snapshot = seen.snapshot;
    let confirmed_number = snapshot.number;
    state.coordinated.confirmed_snapshot =
        head_common::ConfirmedSnapshot::Confirmed(snapshot.clone(), agg.clone());

    let mut effects = vec![Effect::ClientEffect(ServerOutput::SnapshotConfirmed(
        snapshot,
        agg,
    ))];
    let next_number = confirmed_number + 1;
    let am_leader = leader(next_number, &state.parameters.parties) == env.me;
    if am_leader && !state.coordinated.seen_txs.is_empty() {
        effects.push(Effect::NetworkEffect(NetworkMessage::ReqSn(
            env.me,
            next_number,
            state.coordinated.seen_txs.clone(),
        )));
    }
    Outcome::new_state(HeadState::Open(state), effects)
}
