//! Re-exports of `head_common`'s in-memory test doubles for this crate's own
//! unit tests, so submodules only need `use crate::test_support::*;`.

pub use head_common::test_support::{party, signing_key, TestCrypto, TestLedger, TestTx};
