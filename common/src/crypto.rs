//! The crypto capability: signing, verification and aggregation over
//! snapshots. Key generation and the aggregation math itself are an external
//! concern — this is only the interface the core is allowed to call.

use crate::ledger::Ledger;
use crate::party::{AggregateSignature, Signature, SigningKey, VerificationKey};
use crate::snapshot::Snapshot;

/// Canonical byte encoding of a snapshot for signing and verification.
/// Signer and verifier must agree on this bit-exactly; this implementation
/// reuses the wire JSON encoding so there is exactly one canonical format to
/// keep in sync, rather than a bespoke binary one.
pub fn canonical_snapshot_bytes<L: Ledger>(snapshot: &Snapshot<L>) -> Vec<u8> {
    serde_json::to_vec(snapshot).expect("Snapshot serialization is infallible")
}

/// External signing/aggregation capability, parameterised by the ledger so
/// that `Snapshot<L>` resolves to a concrete type.
pub trait Crypto<L: Ledger>: Send + Sync + 'static {
    fn sign(&self, key: &SigningKey, snapshot: &Snapshot<L>) -> Signature;

    fn verify(&self, key: &VerificationKey, sig: &Signature, snapshot: &Snapshot<L>) -> bool;

    fn aggregate(&self, sigs: &[Signature]) -> AggregateSignature;

    fn verify_aggregate(
        &self,
        keys: &[VerificationKey],
        agg: &AggregateSignature,
        snapshot: &Snapshot<L>,
    ) -> bool;
}
