//! The reducer's result type.
//!
//! `Wait` and `Error` are deliberately distinct variants, not a single
//! "soft failure" case: `Wait` means "deliver me later", `Error` means
//! "never valid for this state". Collapsing them would lose that
//! distinction.

use crate::effect::Effect;
use crate::event::{Event, EventTag};
use crate::ledger::{Ledger, ValidationError};
use crate::state::{HeadState, HeadStateTag};
use serde::{Deserialize, Serialize};

/// Why the reducer could not advance yet, but might later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum WaitReason {
    #[error("transaction does not apply: {0}")]
    WaitOnNotApplicableTx(ValidationError),

    #[error("no snapshot currently in flight")]
    WaitOnSeenSnapshot,

    #[error("waiting for snapshot number {0}")]
    WaitOnSnapshotNumber(u64),

    #[error("waiting for the contestation period to elapse")]
    WaitOnContestationPeriod,
}

/// Why the reducer rejected an event outright.
#[derive(thiserror::Error)]
pub enum LogicError<L: Ledger> {
    #[error("event {event:?} ({tag}) is not valid in state {state}")]
    InvalidEvent {
        event: Event<L>,
        tag: EventTag,
        state: HeadStateTag,
    },

    #[error("requirement failed: {0}")]
    RequireFailed(String),

    #[error("event does not belong to this head")]
    NotOurHead,
}

impl<L: Ledger> LogicError<L> {
    pub fn invalid_event(event: Event<L>, state: HeadStateTag) -> Self {
        let tag = event.tag();
        LogicError::InvalidEvent { event, tag, state }
    }
}

impl<L: Ledger> std::fmt::Debug for LogicError<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicError::InvalidEvent { tag, state, .. } => f
                .debug_struct("InvalidEvent")
                .field("tag", tag)
                .field("state", state)
                .finish(),
            LogicError::RequireFailed(reason) => {
                f.debug_tuple("RequireFailed").field(reason).finish()
            }
            LogicError::NotOurHead => write!(f, "NotOurHead"),
        }
    }
}

/// The result of one `update` call. Exactly one of these is
/// produced per event; the reducer never mutates its inputs.
pub enum Outcome<L: Ledger> {
    NewState(HeadState<L>, Vec<Effect<L>>),
    Wait(WaitReason),
    Error(LogicError<L>),
}

impl<L: Ledger> Outcome<L> {
    pub fn new_state(state: HeadState<L>, effects: Vec<Effect<L>>) -> Self {
        Outcome::NewState(state, effects)
    }

    pub fn unchanged(state: HeadState<L>) -> Self {
        Outcome::NewState(state, Vec::new())
    }

    pub fn is_wait(&self) -> bool {
        matches!(self, Outcome::Wait(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

impl<L: Ledger> std::fmt::Debug for Outcome<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::NewState(state, effects) => f
                .debug_struct("NewState")
                .field("state", &state.tag())
                .field("effects", effects)
                .finish(),
            Outcome::Wait(reason) => f.debug_tuple("Wait").field(reason).finish(),
            Outcome::Error(err) => f.debug_tuple("Error").field(err).finish(),
        }
    }
}
