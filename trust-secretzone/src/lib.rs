//! Consent brokering host (spec.md §4.I) for `executionMode=strict-privacy`.

mod secretzone;

pub use secretzone::{request_consent, ConsentRequest, SecretZoneOutcome};
