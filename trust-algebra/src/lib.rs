//! Reason-code algebra and decision lattice shared by every component
//! (spec.md §4.B).

mod assertions;
pub mod codes;
mod decision;
mod normalize;
mod reason;

pub use assertions::assert_sorted_unique;
pub use decision::{derive_verdict, join_decision, Decision, Verdict};
pub use normalize::{checkpoint_eq, join, normalize, NormalizeOptions, ReasonBudget, DEFAULT_BUDGET, DEFAULT_MAX_PER_SUBJECT};
pub use reason::ReasonCode;
