//! Deterministic execution engine.
//!
//! Holds the reproducible random number source that every sampling
//! operation draws from. No other module owns randomness.

pub mod rng;

pub use rng::McRng;
