//! Party identities and opaque cryptographic material.
//!
//! Key generation and the signature/aggregation math themselves are an
//! external capability (see [`crate::crypto`]); this module only carries the
//! byte-blob types the core passes around.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A verification key, serialized form. Opaque to the core beyond equality
/// and ordering (needed for leader election and ack-map membership).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerificationKey(pub [u8; 32]);

/// A signing key, serialized form. Never serialized onto the wire in
/// practice, but kept `Serialize`-able for test fixtures.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey(pub [u8; 32]);

/// The public identity of a head participant. The verification key *is* the
/// party identity.
pub type Party = VerificationKey;

/// A single signature over a canonical snapshot encoding.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(pub Vec<u8>);

/// An aggregate covering some subset of a head's parties.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSignature(pub Vec<u8>);

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vk:{}", hex::encode(&self.0[..4]))
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sk:{}", hex::encode(&self.0[..4]))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sig:{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for AggregateSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agg:{}", hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_keys_order_by_bytes() {
        let a = VerificationKey([0u8; 32]);
        let mut b = [0u8; 32];
        b[31] = 1;
        let b = VerificationKey(b);
        assert!(a < b);
    }
}
