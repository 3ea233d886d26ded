//! Snapshots: numbered, signed summaries of the head's UTxO and confirmed
//! transactions.

use crate::ledger::Ledger;
use crate::party::{AggregateSignature, Party, Signature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A numbered summary of the head's UTxO set and the transactions that
/// produced it since the previous snapshot.
///
/// Invariant: `number` strictly increases across confirmed snapshots within
/// a single head lifetime; `number == 0` is the initial snapshot (utxo taken
/// from the chain, no transactions).
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub struct Snapshot<L: Ledger> {
    pub number: u64,
    pub utxo: L::UTxO,
    pub confirmed_txs: Vec<L::Tx>,
}

impl<L: Ledger> Clone for Snapshot<L> {
    fn clone(&self) -> Self {
        Self {
            number: self.number,
            utxo: self.utxo.clone(),
            confirmed_txs: self.confirmed_txs.clone(),
        }
    }
}

impl<L: Ledger> std::fmt::Debug for Snapshot<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("number", &self.number)
            .field("utxo", &self.utxo)
            .field("confirmed_txs", &self.confirmed_txs)
            .finish()
    }
}

impl<L: Ledger> PartialEq for Snapshot<L>
where
    L::UTxO: PartialEq,
    L::Tx: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
            && self.utxo == other.utxo
            && self.confirmed_txs == other.confirmed_txs
    }
}

/// `number = 0` snapshots come straight from the chain and carry no
/// aggregate signature; every later snapshot is `Confirmed` once all
/// parties have acked it.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum ConfirmedSnapshot<L: Ledger> {
    Initial(Snapshot<L>),
    Confirmed(Snapshot<L>, AggregateSignature),
}

impl<L: Ledger> ConfirmedSnapshot<L> {
    pub fn snapshot(&self) -> &Snapshot<L> {
        match self {
            ConfirmedSnapshot::Initial(s) => s,
            ConfirmedSnapshot::Confirmed(s, _) => s,
        }
    }

    pub fn number(&self) -> u64 {
        self.snapshot().number
    }

    pub fn utxo(&self) -> &L::UTxO {
        &self.snapshot().utxo
    }
}

impl<L: Ledger> Clone for ConfirmedSnapshot<L> {
    fn clone(&self) -> Self {
        match self {
            ConfirmedSnapshot::Initial(s) => ConfirmedSnapshot::Initial(s.clone()),
            ConfirmedSnapshot::Confirmed(s, agg) => {
                ConfirmedSnapshot::Confirmed(s.clone(), agg.clone())
            }
        }
    }
}

impl<L: Ledger> std::fmt::Debug for ConfirmedSnapshot<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfirmedSnapshot::Initial(s) => f.debug_tuple("Initial").field(s).finish(),
            ConfirmedSnapshot::Confirmed(s, agg) => {
                f.debug_tuple("Confirmed").field(s).field(agg).finish()
            }
        }
    }
}

/// A snapshot awaiting signatures before it can be confirmed, with the acks
/// collected so far keyed by signer.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub struct SeenSnapshotState<L: Ledger> {
    pub snapshot: Snapshot<L>,
    pub acks: BTreeMap<Party, Signature>,
}

impl<L: Ledger> SeenSnapshotState<L> {
    pub fn new(snapshot: Snapshot<L>, signer: Party, sig: Signature) -> Self {
        let mut acks = BTreeMap::new();
        acks.insert(signer, sig);
        Self { snapshot, acks }
    }

    /// True once every party in `parties` has an entry in `acks`.
    pub fn is_complete(&self, parties: &[Party]) -> bool {
        parties.iter().all(|p| self.acks.contains_key(p))
    }
}

impl<L: Ledger> Clone for SeenSnapshotState<L> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            acks: self.acks.clone(),
        }
    }
}

impl<L: Ledger> std::fmt::Debug for SeenSnapshotState<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeenSnapshotState")
            .field("snapshot", &self.snapshot)
            .field("acks", &self.acks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestLedger;

    #[test]
    fn seen_snapshot_completes_when_all_parties_have_acked() {
        let alice = Party([1u8; 32]);
        let bob = Party([2u8; 32]);
        let snap: Snapshot<TestLedger> = Snapshot {
            number: 1,
            utxo: Default::default(),
            confirmed_txs: Vec::new(),
        };
        let mut seen = SeenSnapshotState::new(snap, alice, Signature(vec![1]));
        assert!(!seen.is_complete(&[alice, bob]));
        seen.acks.insert(bob, Signature(vec![2]));
        assert!(seen.is_complete(&[alice, bob]));
    }
}
