// File: botwatch-common/src/traits/session_traits.rs

use async_trait::async_trait;
use crate::error::Error;
use crate::models::ClientSnapshot;

/// A monitored bot account, as seen through its own logged-in session.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait MonitoredSession: Send + Sync {
    /// Display name from configuration.
    fn name(&self) -> String;

    /// Read-only view of the session's current state.
    fn snapshot(&self) -> ClientSnapshot;

    /// Makes this account leave the guild. Irreversible without a new invite.
    async fn leave_guild(&self, guild_id: u64) -> Result<(), Error>;

    /// Closes the gateway connection. Safe to call on a session that never
    /// connected.
    async fn close(&self) -> Result<(), Error>;
}

/// Destination for outbound text, one platform message per call.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_chunk(&self, text: &str) -> Result<(), Error>;
}
