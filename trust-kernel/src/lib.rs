//! Capability kernel (spec.md §4.H): `handleInvoke`'s deny-by-default
//! adjudication over mode/plan/nonce/caller/cap/tier/stamp/consent.

mod config;
mod consent;
mod kernel;
mod request;
mod stamp;

pub use config::KernelConfig;
pub use consent::{ConsentClaim, ConsentSubject};
pub use kernel::{handle_invoke, known_cap_ids, InvokeContext, KernelDecision};
pub use request::KernelRequest;
pub use stamp::{ShopStamp, StampSignature, Tier};
