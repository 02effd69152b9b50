//! The strict loader (spec.md §4.J): the top-level entry point that ties
//! every other `trust-*` crate into one verify-then-execute call and
//! produces the persisted-state summary (spec.md §6).

mod host;
mod loader;
mod plan;
mod result;
mod severity;

pub use host::{run_host_loop, HostSession};
pub use loader::{run_strict_load, ExecuteInput, LoaderInput};
pub use plan::{PlanArtifact, PlanGrant, PlanSnapshot};
pub use result::{ExecuteResult, LoaderExecute, LoaderResult, LoaderVerify};
pub use severity::{classify, IncidentSummary, Severity};
