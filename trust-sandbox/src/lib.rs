//! Compartment bootstrap (spec.md §4.G): a cooperative sandbox for
//! untrusted `Block`s, reachable by the host only through a frozen `caps`
//! handle.

mod block;
mod caps;
mod compartment;
mod hardening;

pub use block::{Block, BlockError};
pub use caps::{CapId, Caps, CapsCallOutcome};
pub use compartment::{CompartmentOutcome, CompartmentSession, InitRequest};
pub use hardening::self_test as hardening_self_test;
