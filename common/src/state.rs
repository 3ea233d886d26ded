//! Head state: the top-level tagged union and the `Open`-state coordinated
//! snapshot bookkeeping.

use crate::ledger::Ledger;
use crate::party::Party;
use crate::params::HeadParameters;
use crate::snapshot::{ConfirmedSnapshot, SeenSnapshotState, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-`Open`-state bookkeeping: the locally-seen UTxO/transactions layered
/// on top of the last confirmed snapshot, and any snapshot currently
/// awaiting signatures.
///
/// Invariant: `seen_utxo ==
/// apply_transactions(confirmed_snapshot.utxo, seen_txs)` and every element
/// of `seen_txs` applies cleanly in order — maintained by every transition in
/// `head_core::snapshot_engine`, never recomputed from scratch on the hot
/// path except where the snapshot engine explicitly does so (after a
/// confirmation prunes `seen_txs`).
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub struct CoordinatedHeadState<L: Ledger> {
    pub seen_utxo: L::UTxO,
    pub seen_txs: Vec<L::Tx>,
    pub confirmed_snapshot: ConfirmedSnapshot<L>,
    pub seen_snapshot: Option<SeenSnapshotState<L>>,
}

impl<L: Ledger> CoordinatedHeadState<L> {
    /// The coordinated state immediately after `OnCollectComTx`: snapshot 0
    /// is the union of all committed UTxOs, no transactions seen yet,
    /// nothing in flight.
    pub fn initial(committed_utxo: L::UTxO) -> Self {
        Self {
            seen_utxo: committed_utxo.clone(),
            seen_txs: Vec::new(),
            confirmed_snapshot: ConfirmedSnapshot::Initial(Snapshot {
                number: 0,
                utxo: committed_utxo,
                confirmed_txs: Vec::new(),
            }),
            seen_snapshot: None,
        }
    }
}

impl<L: Ledger> Clone for CoordinatedHeadState<L> {
    fn clone(&self) -> Self {
        Self {
            seen_utxo: self.seen_utxo.clone(),
            seen_txs: self.seen_txs.clone(),
            confirmed_snapshot: self.confirmed_snapshot.clone(),
            seen_snapshot: self.seen_snapshot.clone(),
        }
    }
}

impl<L: Ledger> std::fmt::Debug for CoordinatedHeadState<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatedHeadState")
            .field("seen_utxo", &self.seen_utxo)
            .field("seen_txs", &self.seen_txs.len())
            .field("confirmed_snapshot", &self.confirmed_snapshot)
            .field("seen_snapshot", &self.seen_snapshot)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub struct InitialState<L: Ledger> {
    pub parameters: HeadParameters,
    pub pending_commits: BTreeSet<Party>,
    pub committed: BTreeMap<Party, L::UTxO>,
    pub prev: Box<HeadState<L>>,
}

#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub struct OpenState<L: Ledger> {
    pub parameters: HeadParameters,
    pub coordinated: CoordinatedHeadState<L>,
    pub prev: Box<HeadState<L>>,
}

#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub struct ClosedState<L: Ledger> {
    pub parameters: HeadParameters,
    pub confirmed_snapshot: ConfirmedSnapshot<L>,
    pub prev: Box<HeadState<L>>,
}

/// Top-level head state. Each non-`Idle` variant carries `prev`, the
/// previous `HeadState`, forming the append-only, acyclic history that
/// rollback (`head_core::rollback`) walks — the only consumer of `prev`.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum HeadState<L: Ledger> {
    Idle,
    Initial(InitialState<L>),
    Open(OpenState<L>),
    Closed(ClosedState<L>),
    Final,
}

/// Lightweight state discriminator, used for logging and for
/// [`crate::outcome::LogicError::InvalidEvent`] so rejecting an event never
/// requires cloning the whole state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadStateTag {
    Idle,
    Initial,
    Open,
    Closed,
    Final,
}

impl std::fmt::Display for HeadStateTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl<L: Ledger> HeadState<L> {
    pub fn tag(&self) -> HeadStateTag {
        match self {
            HeadState::Idle => HeadStateTag::Idle,
            HeadState::Initial(_) => HeadStateTag::Initial,
            HeadState::Open(_) => HeadStateTag::Open,
            HeadState::Closed(_) => HeadStateTag::Closed,
            HeadState::Final => HeadStateTag::Final,
        }
    }

    /// Pop `depth` layers off the `prev` chain. Rolling back past `Idle`
    /// stays at `Idle` — there is nothing further back.
    pub fn rollback(self, depth: u64) -> Self {
        let mut state = self;
        for _ in 0..depth {
            state = match state {
                HeadState::Idle => HeadState::Idle,
                HeadState::Initial(s) => *s.prev,
                HeadState::Open(s) => *s.prev,
                HeadState::Closed(s) => *s.prev,
                HeadState::Final => {
                    // Final carries no prev; treat as its own fixed point.
                    // Fanout is irreversible on chain, so there is nowhere
                    // further to go.
                    HeadState::Final
                }
            };
        }
        state
    }
}

impl<L: Ledger> Clone for HeadState<L> {
    fn clone(&self) -> Self {
        match self {
            HeadState::Idle => HeadState::Idle,
            HeadState::Initial(s) => HeadState::Initial(InitialState {
                parameters: s.parameters.clone(),
                pending_commits: s.pending_commits.clone(),
                committed: s.committed.clone(),
                prev: s.prev.clone(),
            }),
            HeadState::Open(s) => HeadState::Open(OpenState {
                parameters: s.parameters.clone(),
                coordinated: s.coordinated.clone(),
                prev: s.prev.clone(),
            }),
            HeadState::Closed(s) => HeadState::Closed(ClosedState {
                parameters: s.parameters.clone(),
                confirmed_snapshot: s.confirmed_snapshot.clone(),
                prev: s.prev.clone(),
            }),
            HeadState::Final => HeadState::Final,
        }
    }
}

impl<L: Ledger> std::fmt::Debug for HeadState<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadState::Idle => write!(f, "Idle"),
            HeadState::Initial(s) => f
                .debug_struct("Initial")
                .field("pending_commits", &s.pending_commits.len())
                .field("committed", &s.committed.len())
                .finish(),
            HeadState::Open(s) => f.debug_struct("Open").field("coordinated", &s.coordinated).finish(),
            HeadState::Closed(s) => f
                .debug_struct("Closed")
                .field("confirmed_snapshot", &s.confirmed_snapshot)
                .finish(),
            HeadState::Final => write!(f, "Final"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestLedger;

    fn idle() -> HeadState<TestLedger> {
        HeadState::Idle
    }

    #[test]
    fn rollback_zero_is_identity() {
        let state = idle();
        assert_eq!(state.tag(), state.clone().rollback(0).tag());
    }

    #[test]
    fn rollback_composes() {
        let params = HeadParameters::new(std::time::Duration::from_secs(1), vec![]);
        let l1 = HeadState::Initial(InitialState {
            parameters: params.clone(),
            pending_commits: BTreeSet::new(),
            committed: BTreeMap::new(),
            prev: Box::new(HeadState::Idle),
        });
        let l2 = HeadState::Open(OpenState {
            parameters: params,
            coordinated: CoordinatedHeadState::initial(Default::default()),
            prev: Box::new(l1),
        });
        let once_twice = l2.clone().rollback(1).rollback(1);
        let combined = l2.rollback(2);
        assert_eq!(once_twice.tag(), combined.tag());
        assert_eq!(combined.tag(), HeadStateTag::Idle);
    }

    #[test]
    fn rollback_past_idle_stays_idle() {
        assert_eq!(idle().rollback(5).tag(), HeadStateTag::Idle);
    }
}
