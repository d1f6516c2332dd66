// File: botwatch-core/src/registry.rs

use std::sync::Arc;

use tracing::{info, warn};

use botwatch_common::traits::session_traits::MonitoredSession;

/// Ordered set of monitored sessions, keyed by their configured display name.
///
/// Built once at startup and handed to the services that need it. Sessions that
/// failed to log in are still registered so they can be reported as offline.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Vec<Arc<dyn MonitoredSession>>,
}

impl SessionRegistry {
    pub fn new(sessions: Vec<Arc<dyn MonitoredSession>>) -> Self {
        Self { sessions }
    }

    /// Case-insensitive lookup by display name.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn MonitoredSession>> {
        let wanted = name.trim().to_lowercase();
        self.sessions
            .iter()
            .find(|s| s.name().to_lowercase() == wanted)
    }

    /// Display names in configuration order.
    pub fn names(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MonitoredSession>> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Closes every session in order. A failure is logged and the rest still close.
    pub async fn close_all(&self) {
        for session in &self.sessions {
            match session.close().await {
                Ok(()) => info!("Closed monitored bot '{}'", session.name()),
                Err(e) => warn!("Closing monitored bot '{}' failed: {e}", session.name()),
            }
        }
    }
}
