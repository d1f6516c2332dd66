use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Presence status as reported by the platform for a monitored account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    Online,
    Idle,
    DoNotDisturb,
    Offline,
    Unknown,
}

impl PresenceStatus {
    pub fn glyph(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "✅",
            PresenceStatus::Idle => "🌙",
            PresenceStatus::DoNotDisturb => "⛔",
            PresenceStatus::Offline => "❌",
            PresenceStatus::Unknown => "❓",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "Online",
            PresenceStatus::Idle => "Idle",
            PresenceStatus::DoNotDisturb => "Do Not Disturb",
            PresenceStatus::Offline => "Offline",
            PresenceStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Playing,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub kind: ActivityKind,
    pub name: String,
    pub detail: Option<String>,
    pub state: Option<String>,
    pub url: Option<String>,
}

impl ActivitySummary {
    pub fn new(kind: ActivityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            detail: None,
            state: None,
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSummary {
    pub id: u64,
    pub name: String,
}

/// Point-in-time view of one monitored session, built from its live cache.
///
/// Snapshots are never persisted and never written back; building one has no
/// side effects on the session it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub name: String,
    pub connected: bool,
    pub latency: Option<Duration>,
    pub guilds: Vec<GuildSummary>,
    pub status: PresenceStatus,
    pub activity: Option<ActivitySummary>,
}

impl ClientSnapshot {
    /// Snapshot for a session that never logged in or has not seen READY yet.
    pub fn offline(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connected: false,
            latency: None,
            guilds: Vec::new(),
            status: PresenceStatus::Offline,
            activity: None,
        }
    }
}
