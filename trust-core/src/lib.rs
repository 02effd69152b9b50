//! Ambient primitives shared by every `trust-*` crate: logging macros, a
//! diagnostic-only clock, and the async lifecycle shape used by the sandbox
//! and the loader.
//!
//! Nothing in this crate is permitted to influence a trust decision. Clocks
//! are for incident timestamps only; logging is for operator visibility only.

extern crate self as trust_core;

pub mod lifecycle;
pub mod log;
pub mod time;
