use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

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
use twilight_model::gateway::payload::incoming::{MessageCreate, Ready as ReadyPayload};
use twilight_model::gateway::payload::outgoing::update_presence::UpdatePresencePayload;
use twilight_model::gateway::presence::{ActivityType, MinimalActivity, Status};
use twilight_model::id::marker::{ApplicationMarker, InteractionMarker};
use twilight_model::id::Id;

use botwatch_common::models::InboundCommand;
use botwatch_common::traits::platform_traits::{ConnectionStatus, PlatformIntegration};

use crate::config::CommandSurface;
use crate::services::discord::slashcommands::{inbound_from_interaction, register_global_slash_commands};
use crate::Error;

/// A command-shaped event from the monitor's gateway, ready for the service.
#[derive(Debug, Clone)]
pub enum DiscordInbound {
    Message {
        inbound: InboundCommand,
    },
    Interaction {
        interaction_id: Id<InteractionMarker>,
        token: String,
        inbound: InboundCommand,
    },
}

impl DiscordInbound {
    pub fn inbound(&self) -> &InboundCommand {
        match self {
            DiscordInbound::Message { inbound } => inbound,
            DiscordInbound::Interaction { inbound, .. } => inbound,
        }
    }
}

/// Reading message content needs the privileged message content intent; the
/// slash surface gets by with guild events alone.
pub fn monitor_intents(surface: CommandSurface) -> Intents {
    match surface {
        CommandSurface::Prefix => Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT,
        CommandSurface::Slash => Intents::GUILDS,
    }
}

/// The shard runner:
///   - records the application ID on READY (and registers slash commands)
///   - forwards prefix messages or slash interactions to `tx`
async fn shard_runner(
    mut shard: Shard,
    tx: UnboundedSender<DiscordInbound>,
    http: Arc<HttpClient>,
    surface: CommandSurface,
    application_id: Arc<RwLock<Option<Id<ApplicationMarker>>>>,
) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
                continue;
            }
        };

        match &event {
            Event::Ready(ready) => {
                let data: &ReadyPayload = ready.as_ref();
                info!(
                    "Shard {shard_id} => READY as {} (ID={})",
                    data.user.name, data.user.id
                );
                *application_id.write() = Some(data.application.id);

                if surface == CommandSurface::Slash && shard_id == 0 {
                    if let Err(e) = register_global_slash_commands(&http, data.application.id).await {
                        error!("Slash command registration failed: {e:?}");
                    }
                }
            }
            Event::MessageCreate(msg_create) => {
                let msg: &MessageCreate = msg_create;
                if msg.author.bot || surface != CommandSurface::Prefix {
                    continue;
                }
                debug!("Message in {} from {}", msg.channel_id, msg.author.name);

                let forwarded = DiscordInbound::Message {
                    inbound: InboundCommand::text(msg.channel_id.get(), msg.content.clone()),
                };
                if tx.send(forwarded).is_err() {
                    debug!("(ShardRunner) Shard {shard_id} receiver gone; stopping.");
                    break;
                }
            }
            Event::InteractionCreate(interaction) => {
                let Some(inbound) = inbound_from_interaction(&interaction.0) else {
                    debug!("Ignoring non-command interaction {}", interaction.id);
                    continue;
                };
                let forwarded = DiscordInbound::Interaction {
                    interaction_id: interaction.id,
                    token: interaction.token.clone(),
                    inbound,
                };
                if tx.send(forwarded).is_err() {
                    debug!("(ShardRunner) Shard {shard_id} receiver gone; stopping.");
                    break;
                }
            }
            _ => {
                trace!("Shard {shard_id} => unhandled event: {:?}", event.kind());
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

/// The monitor account: receives commands and posts reports.
pub struct MonitorPlatform {
    pub token: String,
    pub surface: CommandSurface,
    pub activity: Option<String>,
    pub connection_status: ConnectionStatus,

    pub rx: Mutex<Option<UnboundedReceiver<DiscordInbound>>>,

    pub shard_tasks: Vec<JoinHandle<()>>,
    pub shard_senders: Vec<ShardSender>,

    pub http: Option<Arc<HttpClient>>,
    application_id: Arc<RwLock<Option<Id<ApplicationMarker>>>>,
}

impl MonitorPlatform {
    pub fn new(token: String, surface: CommandSurface, activity: Option<String>) -> Self {
        Self {
            token,
            surface,
            activity,
            connection_status: ConnectionStatus::Disconnected,
            rx: Mutex::new(None),
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
            http: None,
            application_id: Arc::new(RwLock::new(None)),
        }
    }

    /// Known once the first READY has been received.
    pub fn application_id(&self) -> Option<Id<ApplicationMarker>> {
        *self.application_id.read()
    }

    pub async fn next_inbound(&self) -> Option<DiscordInbound> {
        let mut guard = self.rx.lock().await;
        match guard.as_mut() {
            Some(r) => r.recv().await,
            None => None,
        }
    }

    fn presence(&self) -> Option<UpdatePresencePayload> {
        let text = self.activity.as_ref()?;
        let activity = MinimalActivity {
            kind: ActivityType::Watching,
            name: text.clone(),
            url: None,
        };
        match UpdatePresencePayload::new(vec![activity.into()], false, None, Status::Online) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Ignoring monitor activity '{text}': {e}");
                None
            }
        }
    }
}

#[async_trait]
impl PlatformIntegration for MonitorPlatform {
    async fn connect(&mut self) -> Result<(), Error> {
        if matches!(self.connection_status, ConnectionStatus::Connected) {
            info!("(MonitorPlatform) Already connected => skipping");
            return Ok(());
        }
        if self.token.is_empty() {
            return Err(Error::Auth("Discord token is empty".into()));
        }

        let (tx, rx) = unbounded_channel::<DiscordInbound>();
        {
            let mut guard = self.rx.lock().await;
            *guard = Some(rx);
        }

        let http_client = Arc::new(
            ClientBuilder::new()
                .token(self.token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );
        self.http = Some(http_client.clone());

        let config = Config::new(self.token.clone(), monitor_intents(self.surface));
        let presence = self.presence();
        let shards = gateway::create_recommended(&http_client, config, |_, b| match &presence {
            Some(p) => b.presence(p.clone()).build(),
            None => b.build(),
        })
        .await
        .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        for shard in shards {
            self.shard_senders.push(shard.sender());

            let handle = tokio::spawn(shard_runner(
                shard,
                tx.clone(),
                http_client.clone(),
                self.surface,
                self.application_id.clone(),
            ));
            self.shard_tasks.push(handle);
        }

        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        for sender in self.shard_senders.drain(..) {
            if let Err(e) = sender.close(CloseFrame::NORMAL) {
                debug!("(MonitorPlatform) shard already closed: {e}");
            }
        }
        for task in self.shard_tasks.drain(..) {
            if let Err(e) = task.await {
                warn!("(MonitorPlatform) shard task ended abnormally: {e}");
            }
        }

        {
            let mut guard = self.rx.lock().await;
            *guard = None;
        }

        info!("(MonitorPlatform) Disconnected.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_surface_needs_message_content() {
        let intents = monitor_intents(CommandSurface::Prefix);
        assert!(intents.contains(Intents::MESSAGE_CONTENT));
        assert!(intents.contains(Intents::GUILD_MESSAGES));
    }

    #[test]
    fn test_slash_surface_avoids_privileged_intents() {
        let intents = monitor_intents(CommandSurface::Slash);
        assert_eq!(intents, Intents::GUILDS);
    }

    #[test]
    fn test_presence_only_when_activity_configured() {
        let none = MonitorPlatform::new("t".into(), CommandSurface::Prefix, None);
        assert!(none.presence().is_none());

        let some = MonitorPlatform::new("t".into(), CommandSurface::Prefix, Some("the bots".into()));
        let payload = some.presence().unwrap();
        assert_eq!(payload.activities.len(), 1);
        assert_eq!(payload.activities[0].name, "the bots");
        assert_eq!(payload.status, Status::Online);
    }

    #[tokio::test]
    async fn test_disconnect_before_connect_ends_inbound_stream() -> Result<(), Error> {
        let mut platform = MonitorPlatform::new("t".into(), CommandSurface::Slash, None);
        platform.disconnect().await?;
        assert!(platform.next_inbound().await.is_none());
        assert!(platform.shard_tasks.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let mut platform = MonitorPlatform::new(String::new(), CommandSurface::Prefix, None);
        assert!(matches!(platform.connect().await, Err(Error::Auth(_))));
        assert!(platform.application_id().is_none());
    }
}
