//! The init → run → terminate lifecycle shape shared by the sandbox
//! (trust-sandbox) and the strict loader (trust-loader), mirrored from the
//! teacher's `AsyncService` trait (`ident`/`start`/`signal_exit`/`stop`).

use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Stable identifier used in logs and incident records.
    fn ident(self: &Arc<Self>) -> &'static str;

    /// Begin the session. Idempotent callers should not call this twice.
    async fn start(self: &Arc<Self>);

    /// Cooperative shutdown signal; in-flight awaits should resolve promptly.
    fn signal_terminate(self: &Arc<Self>);

    /// Await full teardown.
    async fn stop(self: &Arc<Self>);
}
