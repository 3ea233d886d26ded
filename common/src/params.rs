//! Head parameters and per-node environment.

use crate::party::{Party, SigningKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Frozen at head initialization. The party ordering is fixed for the
/// lifetime of the head and indexes leader election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadParameters {
    pub contestation_period: Duration,
    /// Ordered set of parties — order is significant, see [`leader`].
    pub parties: Vec<Party>,
}

impl HeadParameters {
    pub fn new(contestation_period: Duration, parties: Vec<Party>) -> Self {
        Self {
            contestation_period,
            parties,
        }
    }

    pub fn party_set(&self) -> BTreeSet<Party> {
        self.parties.iter().copied().collect()
    }
}

/// Per-node constant: who this node is, its signing key, and the other
/// parties it expects to hear from.
#[derive(Debug, Clone)]
pub struct Environment {
    pub me: Party,
    pub signing_key: SigningKey,
    pub others: BTreeSet<Party>,
}

impl Environment {
    pub fn new(me: Party, signing_key: SigningKey, others: BTreeSet<Party>) -> Self {
        Self {
            me,
            signing_key,
            others,
        }
    }
}

/// The leader for snapshot number `sn`: a pure function of the snapshot
/// number and the frozen party ordering. Never consult the wall clock or any
/// mutable state here.
///
/// # Panics
/// Panics if `parties` is empty; a head with no parties cannot exist.
pub fn leader(snapshot_number: u64, parties: &[Party]) -> Party {
    assert!(!parties.is_empty(), "a head must have at least one party");
    let index = (snapshot_number.saturating_sub(1) as usize) % parties.len();
    parties[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::party;

    #[test]
    fn leader_cycles_through_parties_in_order() {
        let parties = vec![party(1), party(2), party(3)];
        assert_eq!(leader(1, &parties), party(1));
        assert_eq!(leader(2, &parties), party(2));
        assert_eq!(leader(3, &parties), party(3));
        assert_eq!(leader(4, &parties), party(1));
        assert_eq!(leader(6, &parties), party(3));
    }
}
