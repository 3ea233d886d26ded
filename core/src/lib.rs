//! The coordinated head protocol reducer.
//!
//! `update` is a pure total function: it never performs I/O, never blocks,
//! holds no locks, and is deterministic given its inputs. An outer runtime
//! (out of scope here) owns the event queue, the clock, and dispatch of the
//! returned effects.

mod client;
mod onchain;
mod reducer;
mod rollback;
mod snapshot_engine;

#[cfg(test)]
mod test_support;

pub use reducer::update;
