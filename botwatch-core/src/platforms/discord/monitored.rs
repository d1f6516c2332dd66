use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_cache_inmemory::{DefaultInMemoryCache, ResourceType};
use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender as ShardSender,
    Shard,
    StreamExt,
};
use twilight_http::client::ClientBuilder;
use twilight_http::Client as HttpClient;
use twilight_model::gateway::payload::incoming::Ready as ReadyPayload;
use twilight_model::id::marker::GuildMarker;
use twilight_model::id::Id;

use botwatch_common::models::{ClientSnapshot, GuildSummary, PresenceStatus};
use botwatch_common::traits::platform_traits::{ConnectionStatus, PlatformIntegration};
use botwatch_common::traits::session_traits::MonitoredSession;

use crate::platforms::discord::presence::{presence_status, primary_activity};
use crate::Error;

/// Presence data is only delivered with the privileged presence intent, which
/// has to be enabled for each monitored application in the developer portal.
pub const MONITORED_INTENTS: Intents = Intents::GUILDS.union(Intents::GUILD_PRESENCES);

/// Live flags the shard runners write and snapshots read.
#[derive(Default)]
struct SessionState {
    ready: AtomicBool,
    latency: RwLock<Option<Duration>>,
}

/// One monitored bot, logged in with its own token.
pub struct DiscordMonitoredSession {
    name: String,
    token: String,
    connection_status: ConnectionStatus,

    http: Option<Arc<HttpClient>>,
    cache: Arc<DefaultInMemoryCache>,
    state: Arc<SessionState>,

    shard_tasks: Mutex<Vec<JoinHandle<()>>>,
    shard_senders: Mutex<Vec<ShardSender>>,
}

impl DiscordMonitoredSession {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        let cache = DefaultInMemoryCache::builder()
            .resource_types(ResourceType::GUILD | ResourceType::PRESENCE | ResourceType::USER_CURRENT)
            .build();

        Self {
            name: name.into(),
            token: token.into(),
            connection_status: ConnectionStatus::Disconnected,
            http: None,
            cache: Arc::new(cache),
            state: Arc::new(SessionState::default()),
            shard_tasks: Mutex::new(Vec::new()),
            shard_senders: Mutex::new(Vec::new()),
        }
    }
}

/// Keeps the cache, readiness flag and heartbeat latency of one shard current.
async fn monitored_shard_runner(
    name: String,
    mut shard: Shard,
    cache: Arc<DefaultInMemoryCache>,
    state: Arc<SessionState>,
) {
    let shard_id = shard.id().number();
    info!("(Monitored '{name}') Shard {shard_id} started.");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        match item {
            Ok(event) => {
                cache.update(&event);

                match &event {
                    Event::Ready(ready) => {
                        let data: &ReadyPayload = ready.as_ref();
                        info!(
                            "(Monitored '{name}') READY as {} (ID={}) in {} guild(s)",
                            data.user.name,
                            data.user.id,
                            data.guilds.len()
                        );
                        state.ready.store(true, Ordering::Release);
                    }
                    Event::Resumed => {
                        debug!("(Monitored '{name}') session resumed");
                        state.ready.store(true, Ordering::Release);
                    }
                    Event::GatewayClose(frame) => {
                        warn!("(Monitored '{name}') gateway closed: {frame:?}");
                        state.ready.store(false, Ordering::Release);
                    }
                    _ => {
                        trace!("(Monitored '{name}') shard {shard_id} => {:?}", event.kind());
                    }
                }

                *state.latency.write() = shard.latency().average();
            }
            Err(err) => {
                error!("(Monitored '{name}') shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    state.ready.store(false, Ordering::Release);
    warn!("(Monitored '{name}') shard {shard_id} event loop ended.");
}

#[async_trait]
impl PlatformIntegration for DiscordMonitoredSession {
    async fn connect(&mut self) -> Result<(), Error> {
        if matches!(self.connection_status, ConnectionStatus::Connected) {
            info!("(Monitored '{}') Already connected => skipping", self.name);
            return Ok(());
        }
        if self.token.is_empty() {
            return Err(Error::Auth(format!("token for '{}' is empty", self.name)));
        }

        let http_client = Arc::new(
            ClientBuilder::new()
                .token(self.token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );

        let config = Config::new(self.token.clone(), MONITORED_INTENTS);
        let shards = match gateway::create_recommended(&http_client, config, |_, b| b.build()).await {
            Ok(shards) => shards,
            Err(e) => {
                self.connection_status = ConnectionStatus::Error(e.to_string());
                return Err(Error::Platform(format!("create_recommended error: {e}")));
            }
        };
        self.http = Some(http_client);

        for shard in shards {
            self.shard_senders.lock().push(shard.sender());

            let handle = tokio::spawn(monitored_shard_runner(
                self.name.clone(),
                shard,
                self.cache.clone(),
                self.state.clone(),
            ));
            self.shard_tasks.lock().push(handle);
        }

        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;
        self.close().await
    }
}

#[async_trait]
impl MonitoredSession for DiscordMonitoredSession {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn snapshot(&self) -> ClientSnapshot {
        if !self.state.ready.load(Ordering::Acquire) {
            return ClientSnapshot::offline(&self.name);
        }
        let Some(current_user) = self.cache.current_user() else {
            return ClientSnapshot::offline(&self.name);
        };

        let mut guild_ids: Vec<(Id<GuildMarker>, String)> = self
            .cache
            .iter()
            .guilds()
            .map(|entry| {
                let guild = entry.value();
                (guild.id(), guild.name().to_string())
            })
            .collect();
        guild_ids.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));

        // Our own presence as the guilds see it; any guild will do.
        let presence = guild_ids
            .iter()
            .find_map(|(gid, _)| self.cache.presence(*gid, current_user.id));
        let (status, activity) = match presence {
            Some(p) => (presence_status(p.status()), primary_activity(p.activities())),
            None => (PresenceStatus::Online, None),
        };

        ClientSnapshot {
            name: self.name.clone(),
            connected: true,
            latency: *self.state.latency.read(),
            guilds: guild_ids
                .into_iter()
                .map(|(id, name)| GuildSummary { id: id.get(), name })
                .collect(),
            status,
            activity,
        }
    }

    async fn leave_guild(&self, guild_id: u64) -> Result<(), Error> {
        let http = self
            .http
            .as_ref()
            .ok_or_else(|| Error::Platform(format!("'{}' is not connected", self.name)))?;
        let id = Id::<GuildMarker>::new_checked(guild_id)
            .ok_or_else(|| Error::Parse(format!("invalid guild ID {guild_id}")))?;

        http.leave_guild(id)
            .await
            .map_err(|e| Error::Platform(format!("Error leaving guild {guild_id}: {e}")))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), Error> {
        let senders = std::mem::take(&mut *self.shard_senders.lock());
        for sender in &senders {
            if let Err(e) = sender.close(CloseFrame::NORMAL) {
                debug!("(Monitored '{}') shard already closed: {e}", self.name);
            }
        }

        let tasks = std::mem::take(&mut *self.shard_tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                warn!("(Monitored '{}') shard task ended abnormally: {e}", self.name);
            }
        }

        self.state.ready.store(false, Ordering::Release);
        Ok(())
    }
}
