// File: botwatch-core/src/test_utils/fake_session.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use botwatch_common::models::{ActivitySummary, ClientSnapshot, GuildSummary, PresenceStatus};
use botwatch_common::traits::platform_traits::PlatformIntegration;
use botwatch_common::traits::session_traits::{MessageSink, MonitoredSession};

use crate::Error;

/// In-memory stand-in for a monitored Discord session.
///
/// Starts disconnected; `connect()` flips it online unless built with
/// [`FakeSession::failing`]. Guild departures are recorded instead of sent.
pub struct FakeSession {
    name: String,
    fail_connect: bool,
    state: Mutex<ClientSnapshot>,
    left: Mutex<Vec<u64>>,
}

impl FakeSession {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_connect: false,
            state: Mutex::new(ClientSnapshot::offline(name)),
            left: Mutex::new(Vec::new()),
        }
    }

    /// A session whose login always fails.
    pub fn failing(name: &str) -> Self {
        Self {
            fail_connect: true,
            ..Self::new(name)
        }
    }

    /// Already connected, online, no activity, in the given guilds.
    pub fn online(name: &str, guilds: &[(u64, &str)]) -> Self {
        let session = Self::new(name);
        {
            let mut snap = session.state.lock();
            snap.connected = true;
            snap.status = PresenceStatus::Online;
            snap.latency = Some(Duration::from_millis(50));
            snap.guilds = guilds
                .iter()
                .map(|(id, n)| GuildSummary { id: *id, name: n.to_string() })
                .collect();
        }
        session
    }

    pub fn with_status(self, status: PresenceStatus) -> Self {
        self.state.lock().status = status;
        self
    }

    pub fn with_activity(self, activity: ActivitySummary) -> Self {
        self.state.lock().activity = Some(activity);
        self
    }

    pub fn left_guilds(&self) -> Vec<u64> {
        self.left.lock().clone()
    }

    pub fn into_dyn(self) -> Arc<dyn MonitoredSession> {
        Arc::new(self)
    }
}

#[async_trait]
impl MonitoredSession for FakeSession {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn snapshot(&self) -> ClientSnapshot {
        self.state.lock().clone()
    }

    async fn leave_guild(&self, guild_id: u64) -> Result<(), Error> {
        let mut snap = self.state.lock();
        let before = snap.guilds.len();
        snap.guilds.retain(|g| g.id != guild_id);
        if snap.guilds.len() == before {
            return Err(Error::NotFound(format!("guild {guild_id}")));
        }
        self.left.lock().push(guild_id);
        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        self.state.lock().connected = false;
        Ok(())
    }
}

#[async_trait]
impl PlatformIntegration for FakeSession {
    async fn connect(&mut self) -> Result<(), Error> {
        if self.fail_connect {
            return Err(Error::Auth("401 Unauthorized".into()));
        }
        let mut snap = self.state.lock();
        snap.connected = true;
        snap.status = PresenceStatus::Online;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.close().await
    }
}

/// Collects delivered chunks; optionally fails on the n-th call (1-based).
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<String>>,
    pub fail_on: Option<usize>,
    calls: Mutex<usize>,
}

impl RecordingSink {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_chunk(&self, text: &str) -> Result<(), Error> {
        let call = {
            let mut calls = self.calls.lock();
            *calls += 1;
            *calls
        };
        if self.fail_on == Some(call) {
            return Err(Error::Platform("429 Too Many Requests".into()));
        }
        self.sent.lock().push(text.to_string());
        Ok(())
    }
}
