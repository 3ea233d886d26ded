//! Events: the inputs to the reducer.

use crate::ledger::Ledger;
use crate::params::HeadParameters;
use crate::party::{Party, Signature};
use serde::{Deserialize, Serialize};

/// A command issued by a local client.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum Command<L: Ledger> {
    /// Post `InitTx`. Carries the parameters to freeze for this head: unlike
    /// the other commands, `Idle` has no state yet to source them from, and
    /// `Environment` is deliberately per-node rather than per-head, so the
    /// caller supplies them here the same way the real node would read them
    /// from static config at startup.
    Init(HeadParameters),
    Commit(L::UTxO),
    NewTx(L::Tx),
    Close,
    Contest,
    GetUTxO,
    Abort,
}

/// A message received from a peer over the network. Tag discriminators
/// (`ReqTx`, `ReqSn`, `AckSn`, `Connected`, `Disconnected`) are part of the
/// public wire contract and must not be renamed.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum NetworkMessage<L: Ledger> {
    ReqTx(Party, L::Tx),
    ReqSn(Party, u64, Vec<L::Tx>),
    AckSn(Party, Signature, u64),
    Connected(String),
    Disconnected(String),
}

/// A transaction observed posted to the main chain, the payload of
/// `ChainEvent::Observation`.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum OnChainTx<L: Ledger> {
    OnInitTx { parameters: HeadParameters },
    OnCommitTx { party: Party, utxo: L::UTxO },
    OnCollectComTx,
    OnAbortTx,
    OnCloseTx { snapshot_number: u64, deadline: i64 },
    OnContestTx { snapshot_number: u64 },
    OnFanoutTx,
}

/// Something the chain observer reported back to the core.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum ChainEvent<L: Ledger> {
    Observation(OnChainTx<L>),
    /// Roll back `depth` confirmations.
    Rollback(u64),
    /// A runtime clock tick. Not meaningful in any particular state;
    /// accepted in every state as a heartbeat with no effect, the same way
    /// `Connected`/`Disconnected` are accepted everywhere.
    Tick(i64),
}

/// One event delivered to the reducer.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "L::UTxO: Serialize, L::Tx: Serialize",
    deserialize = "L::UTxO: Deserialize<'de>, L::Tx: Deserialize<'de>"
))]
pub enum Event<L: Ledger> {
    ClientEvent(Command<L>),
    NetworkEvent(NetworkMessage<L>),
    OnChainEvent(ChainEvent<L>),
    ShouldPostFanout,
}

/// Lightweight discriminator for logging and [`crate::outcome::LogicError`],
/// so rejecting an event never forces a clone of its (possibly large)
/// payload just to report what kind of event it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTag {
    Init,
    Commit,
    NewTx,
    Close,
    Contest,
    GetUTxO,
    Abort,
    ReqTx,
    ReqSn,
    AckSn,
    Connected,
    Disconnected,
    OnInitTx,
    OnCommitTx,
    OnCollectComTx,
    OnAbortTx,
    OnCloseTx,
    OnContestTx,
    OnFanoutTx,
    Rollback,
    Tick,
    ShouldPostFanout,
}

impl std::fmt::Display for EventTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl<L: Ledger> Command<L> {
    pub fn tag(&self) -> EventTag {
        match self {
            Command::Init(_) => EventTag::Init,
            Command::Commit(_) => EventTag::Commit,
            Command::NewTx(_) => EventTag::NewTx,
            Command::Close => EventTag::Close,
            Command::Contest => EventTag::Contest,
            Command::GetUTxO => EventTag::GetUTxO,
            Command::Abort => EventTag::Abort,
        }
    }
}

impl<L: Ledger> NetworkMessage<L> {
    pub fn tag(&self) -> EventTag {
        match self {
            NetworkMessage::ReqTx(..) => EventTag::ReqTx,
            NetworkMessage::ReqSn(..) => EventTag::ReqSn,
            NetworkMessage::AckSn(..) => EventTag::AckSn,
            NetworkMessage::Connected(_) => EventTag::Connected,
            NetworkMessage::Disconnected(_) => EventTag::Disconnected,
        }
    }
}

impl<L: Ledger> OnChainTx<L> {
    pub fn tag(&self) -> EventTag {
        match self {
            OnChainTx::OnInitTx { .. } => EventTag::OnInitTx,
            OnChainTx::OnCommitTx { .. } => EventTag::OnCommitTx,
            OnChainTx::OnCollectComTx => EventTag::OnCollectComTx,
            OnChainTx::OnAbortTx => EventTag::OnAbortTx,
            OnChainTx::OnCloseTx { .. } => EventTag::OnCloseTx,
            OnChainTx::OnContestTx { .. } => EventTag::OnContestTx,
            OnChainTx::OnFanoutTx => EventTag::OnFanoutTx,
        }
    }
}

impl<L: Ledger> ChainEvent<L> {
    pub fn tag(&self) -> EventTag {
        match self {
            ChainEvent::Observation(tx) => tx.tag(),
            ChainEvent::Rollback(_) => EventTag::Rollback,
            ChainEvent::Tick(_) => EventTag::Tick,
        }
    }
}

impl<L: Ledger> Event<L> {
    pub fn tag(&self) -> EventTag {
        match self {
            Event::ClientEvent(c) => c.tag(),
            Event::NetworkEvent(m) => m.tag(),
            Event::OnChainEvent(c) => c.tag(),
            Event::ShouldPostFanout => EventTag::ShouldPostFanout,
        }
    }
}

impl<L: Ledger> Clone for Command<L> {
    fn clone(&self) -> Self {
        match self {
            Command::Init(p) => Command::Init(p.clone()),
            Command::Commit(u) => Command::Commit(u.clone()),
            Command::NewTx(tx) => Command::NewTx(tx.clone()),
            Command::Close => Command::Close,
            Command::Contest => Command::Contest,
            Command::GetUTxO => Command::GetUTxO,
            Command::Abort => Command::Abort,
        }
    }
}

impl<L: Ledger> std::fmt::Debug for Command<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.tag())
    }
}

impl<L: Ledger> Clone for NetworkMessage<L> {
    fn clone(&self) -> Self {
        match self {
            NetworkMessage::ReqTx(p, tx) => NetworkMessage::ReqTx(*p, tx.clone()),
            NetworkMessage::ReqSn(p, n, txs) => NetworkMessage::ReqSn(*p, *n, txs.clone()),
            NetworkMessage::AckSn(p, sig, n) => NetworkMessage::AckSn(*p, sig.clone(), *n),
            NetworkMessage::Connected(h) => NetworkMessage::Connected(h.clone()),
            NetworkMessage::Disconnected(h) => NetworkMessage::Disconnected(h.clone()),
        }
    }
}

impl<L: Ledger> std::fmt::Debug for NetworkMessage<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.tag())
    }
}

impl<L: Ledger> Clone for OnChainTx<L> {
    fn clone(&self) -> Self {
        match self {
            OnChainTx::OnInitTx { parameters } => OnChainTx::OnInitTx {
                parameters: parameters.clone(),
            },
            OnChainTx::OnCommitTx { party, utxo } => OnChainTx::OnCommitTx {
                party: *party,
                utxo: utxo.clone(),
            },
            OnChainTx::OnCollectComTx => OnChainTx::OnCollectComTx,
            OnChainTx::OnAbortTx => OnChainTx::OnAbortTx,
            OnChainTx::OnCloseTx {
                snapshot_number,
                deadline,
            } => OnChainTx::OnCloseTx {
                snapshot_number: *snapshot_number,
                deadline: *deadline,
            },
            OnChainTx::OnContestTx { snapshot_number } => OnChainTx::OnContestTx {
                snapshot_number: *snapshot_number,
            },
            OnChainTx::OnFanoutTx => OnChainTx::OnFanoutTx,
        }
    }
}

impl<L: Ledger> std::fmt::Debug for OnChainTx<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.tag())
    }
}

impl<L: Ledger> Clone for ChainEvent<L> {
    fn clone(&self) -> Self {
        match self {
            ChainEvent::Observation(tx) => ChainEvent::Observation(tx.clone()),
            ChainEvent::Rollback(depth) => ChainEvent::Rollback(*depth),
            ChainEvent::Tick(t) => ChainEvent::Tick(*t),
        }
    }
}

impl<L: Ledger> std::fmt::Debug for ChainEvent<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.tag())
    }
}

impl<L: Ledger> Clone for Event<L> {
    fn clone(&self) -> Self {
        match self {
            Event::ClientEvent(c) => Event::ClientEvent(c.clone()),
            Event::NetworkEvent(m) => Event::NetworkEvent(m.clone()),
            Event::OnChainEvent(c) => Event::OnChainEvent(c.clone()),
            Event::ShouldPostFanout => Event::ShouldPostFanout,
        }
    }
}

impl<L: Ledger> std::fmt::Debug for Event<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.tag())
    }
}
