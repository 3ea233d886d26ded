//! Effects: the outputs of the reducer. Effects are data, never callbacks —
//! the reducer returns a list, the outer runtime dispatches it.

use crate::ledger::Ledger;
use crate::outcome::WaitReason;
use crate::params::HeadParameters;
use crate::party::{AggregateSignature, Party};
use crate::snapshot::{ConfirmedSnapshot, Snapshot};
use crate::event::{Event, NetworkMessage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pushed to local clients.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum ServerOutput<L: Ledger> {
    PeerConnected(String),
    PeerDisconnected(String),
    HeadIsInitializing,
    HeadIsOpen,
    SnapshotConfirmed(Snapshot<L>, AggregateSignature),
    RolledBack,
    HeadIsClosed,
    HeadIsFinalized,
    HeadIsAborted,
    UTxO(L::UTxO),
}

/// A chain transaction to submit.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum PostChainTx<L: Ledger> {
    InitTx(HeadParameters),
    CommitTx(Party, L::UTxO),
    CollectComTx,
    CloseTx(ConfirmedSnapshot<L>),
    ContestTx(ConfirmedSnapshot<L>),
    FanoutTx(ConfirmedSnapshot<L>),
    AbortTx,
}

/// One effect the runtime must execute. `ClientEffect` ordering relative to
/// other effects in the same outcome is preserved by the runtime;
/// `NetworkEffect`/`OnChainEffect` may be pipelined independently.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum Effect<L: Ledger> {
    ClientEffect(ServerOutput<L>),
    NetworkEffect(NetworkMessage<L>),
    OnChainEffect(PostChainTx<L>),
    /// The runtime must re-deliver `event` after `delay`, using its own
    /// monotonic clock.
    Delay {
        delay: Duration,
        reason: WaitReason,
        event: Box<Event<L>>,
    },
}

impl<L: Ledger> Clone for ServerOutput<L> {
    fn clone(&self) -> Self {
        match self {
            ServerOutput::PeerConnected(h) => ServerOutput::PeerConnected(h.clone()),
            ServerOutput::PeerDisconnected(h) => ServerOutput::PeerDisconnected(h.clone()),
            ServerOutput::HeadIsInitializing => ServerOutput::HeadIsInitializing,
            ServerOutput::HeadIsOpen => ServerOutput::HeadIsOpen,
            ServerOutput::SnapshotConfirmed(s, agg) => {
                ServerOutput::SnapshotConfirmed(s.clone(), agg.clone())
            }
            ServerOutput::RolledBack => ServerOutput::RolledBack,
            ServerOutput::HeadIsClosed => ServerOutput::HeadIsClosed,
            ServerOutput::HeadIsFinalized => ServerOutput::HeadIsFinalized,
            ServerOutput::HeadIsAborted => ServerOutput::HeadIsAborted,
            ServerOutput::UTxO(u) => ServerOutput::UTxO(u.clone()),
        }
    }
}

impl<L: Ledger> std::fmt::Debug for ServerOutput<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerOutput::PeerConnected(h) => write!(f, "PeerConnected({h})"),
            ServerOutput::PeerDisconnected(h) => write!(f, "PeerDisconnected({h})"),
            ServerOutput::HeadIsInitializing => write!(f, "HeadIsInitializing"),
            ServerOutput::HeadIsOpen => write!(f, "HeadIsOpen"),
            ServerOutput::SnapshotConfirmed(s, _) => {
                write!(f, "SnapshotConfirmed(#{})", s.number)
            }
            ServerOutput::RolledBack => write!(f, "RolledBack"),
            ServerOutput::HeadIsClosed => write!(f, "HeadIsClosed"),
            ServerOutput::HeadIsFinalized => write!(f, "HeadIsFinalized"),
            ServerOutput::HeadIsAborted => write!(f, "HeadIsAborted"),
            ServerOutput::UTxO(_) => write!(f, "UTxO(..)"),
        }
    }
}

impl<L: Ledger> Clone for PostChainTx<L> {
    fn clone(&self) -> Self {
        match self {
            PostChainTx::InitTx(p) => PostChainTx::InitTx(p.clone()),
            PostChainTx::CommitTx(party, utxo) => PostChainTx::CommitTx(*party, utxo.clone()),
            PostChainTx::CollectComTx => PostChainTx::CollectComTx,
            PostChainTx::CloseTx(s) => PostChainTx::CloseTx(s.clone()),
            PostChainTx::ContestTx(s) => PostChainTx::ContestTx(s.clone()),
            PostChainTx::FanoutTx(s) => PostChainTx::FanoutTx(s.clone()),
            PostChainTx::AbortTx => PostChainTx::AbortTx,
        }
    }
}

impl<L: Ledger> std::fmt::Debug for PostChainTx<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostChainTx::InitTx(_) => write!(f, "InitTx"),
            PostChainTx::CommitTx(party, _) => write!(f, "CommitTx({party:?})"),
            PostChainTx::CollectComTx => write!(f, "CollectComTx"),
            PostChainTx::CloseTx(s) => write!(f, "CloseTx(#{})", s.number()),
            PostChainTx::ContestTx(s) => write!(f, "ContestTx(#{})", s.number()),
            PostChainTx::FanoutTx(s) => write!(f, "FanoutTx(#{})", s.number()),
            PostChainTx::AbortTx => write!(f, "AbortTx"),
        }
    }
}

impl<L: Ledger> Clone for Effect<L> {
    fn clone(&self) -> Self {
        match self {
            Effect::ClientEffect(o) => Effect::ClientEffect(o.clone()),
            Effect::NetworkEffect(m) => Effect::NetworkEffect(m.clone()),
            Effect::OnChainEffect(tx) => Effect::OnChainEffect(tx.clone()),
            Effect::Delay {
                delay,
                reason,
                event,
            } => Effect::Delay {
                delay: *delay,
                reason: reason.clone(),
                event: event.clone(),
            },
        }
    }
}

impl<L: Ledger> std::fmt::Debug for Effect<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::ClientEffect(o) => write!(f, "ClientEffect({o:?})"),
            Effect::NetworkEffect(m) => write!(f, "NetworkEffect({m:?})"),
            Effect::OnChainEffect(tx) => write!(f, "OnChainEffect({tx:?})"),
            Effect::Delay { delay, reason, .. } => {
                write!(f, "Delay({delay:?}, {reason:?})")
            }
        }
    }
}
