//! Bound bidirectional message channel (spec.md §4.F): nonce/plan/mode
//! envelope validation over an `async_channel` port pair.

mod envelope;
mod nonce;
mod port;

pub use envelope::{validate_envelope, BoundContext, Envelope, ExecutionMode};
pub use nonce::{assert_nonce_shape, safe_equal, Nonce, NonceError};
pub use port::{create_bound_channel, ChannelMessage, ChildPort, HostPort, Port, RecvOutcome};
