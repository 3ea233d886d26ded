//! The ledger capability: opaque to the core beyond the operations below.
//! Shaped after the acropolis UTxO-store traits
//! (`modules/utxo_state/src/state.rs`'s `ImmutableUTXOStore`), reshaped here
//! as a synchronous, pure trait rather than an async store, because the core
//! must remain blocking- and I/O-free.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A transaction failed to apply against a given UTxO set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize, thiserror::Error)]
pub enum ValidationError {
    /// One of the transaction's inputs is not present in the UTxO set.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// The ledger rejected the transaction for a reason opaque to the core.
    #[error("transaction rejected: {0}")]
    Rejected(String),
}

/// External ledger validator. The real implementation wraps the Cardano
/// ledger transaction validator; this trait is the only surface the core
/// ever touches.
///
/// `apply_transactions` must be deterministic, order-sensitive, and a no-op
/// on an empty transaction list.
pub trait Ledger: Send + Sync + 'static {
    /// Opaque transaction type. Must be cheap to clone — the core keeps
    /// transactions around in `seen_txs` until they are confirmed.
    type Tx: Clone + PartialEq + Eq + Debug + Serialize + DeserializeOwned + Send + Sync;

    /// Opaque monoidal UTxO set: has an empty value and a union.
    type UTxO: Clone + Default + Debug + Serialize + DeserializeOwned + Send + Sync;

    /// The empty/genesis UTxO set.
    fn init_utxo(&self) -> Self::UTxO;

    /// Apply a list of transactions in order. Fails on the first
    /// transaction that does not apply; does not partially apply.
    fn apply_transactions(
        &self,
        utxo: &Self::UTxO,
        txs: &[Self::Tx],
    ) -> Result<Self::UTxO, ValidationError>;

    /// Monoidal union. Needed to form the head's snapshot-0 UTxO from the
    /// per-party committed sets once every commit has landed — the core has
    /// no other way to combine two opaque `UTxO` values, so this extends the
    /// ledger capability with the one combinator the rest of the protocol
    /// already assumes exists.
    fn union_utxo(&self, utxos: &[Self::UTxO]) -> Self::UTxO;
}
