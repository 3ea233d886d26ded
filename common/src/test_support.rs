//! In-memory `Ledger`/`Crypto` test doubles, grounded on the teacher's
//! fake/in-memory store pattern
//! (`modules/utxo_state/src/in_memory_immutable_utxo_store.rs`,
//! `fake_immutable_utxo_store.rs`). Gated behind the `test-support` feature
//! so downstream crates can depend on it from `dev-dependencies` without
//! pulling it into release builds.

use crate::crypto::{canonical_snapshot_bytes, Crypto};
use crate::ledger::{Ledger, ValidationError};
use crate::party::{AggregateSignature, Signature, SigningKey, VerificationKey};
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single output identifier mapped to a lovelace-like value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestTx {
    pub id: u64,
    pub inputs: Vec<u64>,
    pub outputs: Vec<(u64, u64)>,
}

impl TestTx {
    pub fn new(id: u64, inputs: &[u64], outputs: &[(u64, u64)]) -> Self {
        Self {
            id,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        }
    }
}

/// A ledger whose UTxO set is a plain `id -> value` map and whose
/// transactions consume listed inputs and produce listed outputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestLedger;

impl Ledger for TestLedger {
    type Tx = TestTx;
    type UTxO = BTreeMap<u64, u64>;

    fn init_utxo(&self) -> Self::UTxO {
        BTreeMap::new()
    }

    fn apply_transactions(
        &self,
        utxo: &Self::UTxO,
        txs: &[Self::Tx],
    ) -> Result<Self::UTxO, ValidationError> {
        let mut next = utxo.clone();
        for tx in txs {
            for input in &tx.inputs {
                if next.remove(input).is_none() {
                    return Err(ValidationError::MissingInput(input.to_string()));
                }
            }
            for (id, value) in &tx.outputs {
                next.insert(*id, *value);
            }
        }
        Ok(next)
    }

    fn union_utxo(&self, utxos: &[Self::UTxO]) -> Self::UTxO {
        let mut merged = BTreeMap::new();
        for utxo in utxos {
            merged.extend(utxo.iter().map(|(k, v)| (*k, *v)));
        }
        merged
    }
}

/// Non-cryptographic FNV-1a hash, good enough to make a deterministic test
/// double distinguishable per key and per message without pulling in a real
/// signature scheme the core has no business depending on.
fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Crypto capability test double. Verification keys and signing keys in this
/// double share the same bytes, so `party(id)` and `signing_key(id)` are a
/// matching pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestCrypto;

impl TestCrypto {
    fn digest<L: Ledger>(key_bytes: &[u8; 32], snapshot: &Snapshot<L>) -> Signature {
        let mut data = key_bytes.to_vec();
        data.extend(canonical_snapshot_bytes(snapshot));
        Signature(fnv1a(&data).to_le_bytes().to_vec())
    }
}

impl<L: Ledger> Crypto<L> for TestCrypto {
    fn sign(&self, key: &SigningKey, snapshot: &Snapshot<L>) -> Signature {
        Self::digest(&key.0, snapshot)
    }

    fn verify(&self, key: &VerificationKey, sig: &Signature, snapshot: &Snapshot<L>) -> bool {
        Self::digest(&key.0, snapshot) == *sig
    }

    fn aggregate(&self, sigs: &[Signature]) -> AggregateSignature {
        let mut data = Vec::new();
        for sig in sigs {
            data.extend_from_slice(&sig.0);
        }
        AggregateSignature(data)
    }

    fn verify_aggregate(
        &self,
        keys: &[VerificationKey],
        agg: &AggregateSignature,
        snapshot: &Snapshot<L>,
    ) -> bool {
        let expected = self.aggregate(
            &keys
                .iter()
                .map(|key| Self::digest(&key.0, snapshot))
                .collect::<Vec<_>>(),
        );
        expected.0 == agg.0
    }
}

/// A deterministic test party: verification key and signing key share bytes
/// so `party(n)` / `signing_key(n)` are always a matching pair.
pub fn party(n: u8) -> VerificationKey {
    VerificationKey([n; 32])
}

pub fn signing_key(n: u8) -> SigningKey {
    SigningKey([n; 32])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_transactions_rejects_missing_input() {
        let ledger = TestLedger;
        let utxo = ledger.init_utxo();
        let tx = TestTx::new(1, &[99], &[]);
        assert!(matches!(
            ledger.apply_transactions(&utxo, &[tx]),
            Err(ValidationError::MissingInput(_))
        ));
    }

    #[test]
    fn apply_transactions_is_noop_on_empty_list() {
        let ledger = TestLedger;
        let utxo: BTreeMap<u64, u64> = [(1, 100)].into_iter().collect();
        assert_eq!(ledger.apply_transactions(&utxo, &[]).unwrap(), utxo);
    }

    #[test]
    fn matching_key_pair_verifies() {
        let snapshot: Snapshot<TestLedger> = Snapshot {
            number: 1,
            utxo: BTreeMap::new(),
            confirmed_txs: Vec::new(),
        };
        let crypto = TestCrypto;
        let sig = crypto.sign(&signing_key(7), &snapshot);
        assert!(crypto.verify(&party(7), &sig, &snapshot));
        assert!(!crypto.verify(&party(8), &sig, &snapshot));
    }
}
