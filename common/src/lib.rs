//! Data model, message types and external capability traits for the
//! coordinated head protocol.
//!
//! Nothing in this crate performs I/O; it exists so `head_core` and any
//! outer runtime agree on one set of wire/effect types, the way
//! `acropolis_common` is the single shared vocabulary for every acropolis
//! module.

pub mod crypto;
pub mod effect;
pub mod event;
pub mod ledger;
pub mod outcome;
pub mod params;
pub mod party;
pub mod snapshot;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crypto::{canonical_snapshot_bytes, Crypto};
pub use effect::{Effect, PostChainTx, ServerOutput};
pub use event::{ChainEvent, Command, Event, EventTag, NetworkMessage, OnChainTx};
pub use ledger::{Ledger, ValidationError};
pub use outcome::{LogicError, Outcome, WaitReason};
pub use params::{leader, Environment, HeadParameters};
pub use party::{AggregateSignature, Party, Signature, SigningKey, VerificationKey};
pub use snapshot::{ConfirmedSnapshot, SeenSnapshotState, Snapshot};
pub use state::{ClosedState, CoordinatedHeadState, HeadState, HeadStateTag, InitialState, OpenState};
