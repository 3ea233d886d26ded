//! Property-based tests: snapshot monotonicity, the leader constraint,
//! rollback involution and UTxO cache consistency.

use head_common::test_support::{party, TestLedger, TestTx};
use head_common::{leader, CoordinatedHeadState, HeadState, HeadStateTag, InitialState, Ledger,
    OpenState};
use quickcheck_macros::quickcheck;
use std::collections::{BTreeMap, BTreeSet};

fn parties_of(n: u8) -> Vec<head_common::Party> {
    let n = (n % 7) + 1;
    (0..n).map(|i| party(i + 1)).collect()
}

/// Leader constraint: for any accepted `ReqSn(from, sn, _)`,
/// `from == parties[(sn-1) mod N]` — verified here as the defining property
/// of [`leader`] itself, since the reducer's guard is exactly this equality.
#[quickcheck]
fn leader_constraint_matches_formula(sn: u64, n: u8) -> bool {
    let parties = parties_of(n);
    let expected = parties[(sn.saturating_sub(1) as usize) % parties.len()];
    leader(sn, &parties) == expected
}

#[quickcheck]
fn leader_is_always_a_party(sn: u64, n: u8) -> bool {
    let parties = parties_of(n);
    parties.contains(&leader(sn, &parties))
}

fn chain_of_depth(depth: u8) -> HeadState<TestLedger> {
    let mut state = HeadState::Idle;
    for i in 0..depth {
        state = if i % 2 == 0 {
            HeadState::Initial(InitialState {
                parameters: head_common::HeadParameters::new(
                    std::time::Duration::from_secs(1),
                    vec![],
                ),
                pending_commits: BTreeSet::new(),
                committed: BTreeMap::new(),
                prev: Box::new(state),
            })
        } else {
            HeadState::Open(OpenState {
                parameters: head_common::HeadParameters::new(
                    std::time::Duration::from_secs(1),
                    vec![],
                ),
                coordinated: CoordinatedHeadState::initial(Default::default()),
                prev: Box::new(state),
            })
        };
    }
    state
}

/// Rollback involution: `rollback(state, a+b) ==
/// rollback(rollback(state, a), b)`.
#[quickcheck]
fn rollback_is_involutive(total_depth: u8, a: u8) -> bool {
    let total_depth = total_depth % 12;
    let a = if total_depth == 0 { 0 } else { a % (total_depth + 1) };
    let b = total_depth - a;
    let state = chain_of_depth(total_depth);
    let combined = state.clone().rollback(total_depth as u64);
    let stepped = state.rollback(a as u64).rollback(b as u64);
    combined.tag() == stepped.tag()
}

#[quickcheck]
fn rollback_zero_is_identity(depth: u8) -> bool {
    let state = chain_of_depth(depth % 8);
    state.clone().rollback(0).tag() == state.tag()
}

#[quickcheck]
fn rollback_past_idle_stays_idle(depth: u8) -> bool {
    HeadState::<TestLedger>::Idle.rollback(depth as u64).tag() == HeadStateTag::Idle
}

/// `apply_transactions` on an empty list is a no-op.
#[quickcheck]
fn apply_empty_transactions_is_identity(entries: Vec<(u64, u64)>) -> bool {
    let ledger = TestLedger;
    let utxo: BTreeMap<u64, u64> = entries.into_iter().collect();
    ledger.apply_transactions(&utxo, &[]) == Ok(utxo)
}

/// UTxO cache consistency: applying a sequence of
/// non-conflicting transactions one at a time yields the same result as
/// applying them all at once, in order.
#[quickcheck]
fn sequential_application_matches_batch_application(ids: Vec<u64>) -> bool {
    let ledger = TestLedger;
    let mut unique_ids: Vec<u64> = ids;
    unique_ids.dedup();
    let txs: Vec<TestTx> = unique_ids
        .iter()
        .map(|id| TestTx::new(*id, &[], &[(*id, 1)]))
        .collect();

    let mut utxo = ledger.init_utxo();
    for tx in &txs {
        utxo = ledger.apply_transactions(&utxo, std::slice::from_ref(tx)).unwrap();
    }

    let batch = ledger.apply_transactions(&ledger.init_utxo(), &txs).unwrap();
    utxo == batch
}
