//! `createBoundChannel()` (spec.md §4.F): a bidirectional port pair over
//! `async_channel`, each side validating every inbound envelope against a
//! shared [`BoundContext`] before the payload ever reaches a handler.

use crate::envelope::{validate_envelope, BoundContext, Envelope};
use async_channel::{Receiver, Sender};
use serde_json::{json, Value};
use trust_algebra::ReasonCode;

#[derive(Clone, Debug)]
pub struct ChannelMessage {
    pub envelope: Envelope,
    pub body: Value,
}

/// Outcome of a single `recv` (spec.md's `on("message")`/`onmessage`).
pub enum RecvOutcome {
    /// Envelope matched; `body` is handed to the application.
    Message(Value),
    /// Envelope mismatched. A `result` message carrying these reason codes
    /// was already sent back over the port; the payload was never
    /// dispatched.
    Rejected(Vec<ReasonCode>),
    /// The peer closed its sender.
    Closed,
}

#[derive(Clone)]
pub struct Port {
    context: BoundContext,
    tx: Sender<ChannelMessage>,
    rx: Receiver<ChannelMessage>,
}

impl Port {
    fn new(context: BoundContext, tx: Sender<ChannelMessage>, rx: Receiver<ChannelMessage>) -> Self {
        Self { context, tx, rx }
    }

    pub async fn post_message(&self, body: Value) -> Result<(), async_channel::SendError<ChannelMessage>> {
        self.tx.send(ChannelMessage { envelope: self.context.to_envelope(), body }).await
    }

    pub async fn recv(&self) -> RecvOutcome {
        match self.rx.recv().await {
            Ok(msg) => {
                let reasons = validate_envelope(&self.context, &msg.envelope);
                if reasons.is_empty() {
                    RecvOutcome::Message(msg.body)
                } else {
                    let rejection = json!({
                        "kind": "result",
                        "ok": false,
                        "reasonCodes": reasons.iter().map(ReasonCode::as_str).collect::<Vec<_>>(),
                    });
                    let _ = self.post_message(rejection).await;
                    RecvOutcome::Rejected(reasons)
                }
            }
            Err(_) => RecvOutcome::Closed,
        }
    }

    pub fn close(&self) {
        self.tx.close();
        self.rx.close();
    }
}

/// The host's side of the bound channel.
#[derive(Clone)]
pub struct HostPort(Port);

/// The sandboxed child's side of the bound channel.
#[derive(Clone)]
pub struct ChildPort(Port);

impl std::ops::Deref for HostPort {
    type Target = Port;
    fn deref(&self) -> &Port {
        &self.0
    }
}

impl std::ops::Deref for ChildPort {
    type Target = Port;
    fn deref(&self) -> &Port {
        &self.0
    }
}

/// `createBoundChannel()` (spec.md §4.F): builds a fresh pair of ports
/// sharing `context`, each backed by its own `async_channel` in the
/// opposite direction.
pub fn create_bound_channel(context: BoundContext) -> (HostPort, ChildPort) {
    let (host_tx, child_rx) = async_channel::unbounded();
    let (child_tx, host_rx) = async_channel::unbounded();
    let host = HostPort(Port::new(context.clone(), host_tx, host_rx));
    let child = ChildPort(Port::new(context, child_tx, child_rx));
    (host, child)
}
