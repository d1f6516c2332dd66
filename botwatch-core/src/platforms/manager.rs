use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use twilight_http::Client as HttpClient;
use twilight_model::id::marker::{ApplicationMarker, ChannelMarker};
use twilight_model::id::Id;

use botwatch_common::models::{InboundCommand, MonitorCommand, Route, Visibility};
use botwatch_common::traits::platform_traits::PlatformIntegration;
use botwatch_common::traits::session_traits::{MessageSink, MonitoredSession};

use crate::config::MonitoredBotConfig;
use crate::platforms::discord::sink::{
    deferred_response,
    delete_original_response,
    message_response,
    respond_interaction,
};
use crate::platforms::discord::{
    ChannelSink,
    DiscordInbound,
    DiscordMonitoredSession,
    InteractionSink,
    MonitorPlatform,
};
use crate::registry::SessionRegistry;
use crate::services::message_sender::MessageSender;
use crate::services::monitor_service::MonitorService;
use crate::Error;

/// Logs sessions in one at a time, waiting `delay` between attempts.
///
/// A failed login is logged and recorded; the remaining sessions still start.
/// Results come back in input order.
pub async fn connect_sequentially<P>(
    sessions: &mut [P],
    delay: Duration,
) -> Vec<(String, Result<(), Error>)>
where
    P: PlatformIntegration + MonitoredSession,
{
    let total = sessions.len();
    let mut results = Vec::with_capacity(total);

    for (i, session) in sessions.iter_mut().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let name = session.name();
        info!("Logging in monitored bot '{}' ({}/{})", name, i + 1, total);

        let result = session.connect().await.map_err(|e| Error::SessionStart {
            name: name.clone(),
            reason: e.to_string(),
        });
        match &result {
            Ok(()) => info!("Monitored bot '{}' connected", name),
            Err(e) => error!("{e}; it will be reported offline"),
        }
        results.push((name, result));
    }

    results
}

/// Creates a Discord session per configured bot, logs them in, and registers
/// all of them (failed ones included).
pub async fn start_monitored_sessions(
    bots: &[MonitoredBotConfig],
    delay: Duration,
) -> (SessionRegistry, Vec<(String, Result<(), Error>)>) {
    let mut sessions: Vec<DiscordMonitoredSession> = bots
        .iter()
        .map(|b| DiscordMonitoredSession::new(b.name.clone(), b.token.clone()))
        .collect();

    let results = connect_sequentially(&mut sessions, delay).await;

    let registry = SessionRegistry::new(
        sessions
            .into_iter()
            .map(|s| Arc::new(s) as Arc<dyn MonitoredSession>)
            .collect(),
    );
    (registry, results)
}

/// Sends `text` through `sender`; if a chunk fails, tries once to leave a short
/// note so the reader knows the output is incomplete.
pub async fn deliver_with_notice<S: MessageSink>(sender: &MessageSender<S>, text: &str) {
    match sender.deliver(text).await {
        Ok(sent) => debug!("Delivered response in {} chunk(s)", sent),
        Err(Error::Delivery { chunk, total, reason }) => {
            warn!("Response delivery stopped at chunk {chunk}/{total}: {reason}");
            let note = format!("⚠️ Report delivery stopped at part {chunk} of {total}.");
            if let Err(e) = sender.sink().send_chunk(&note).await {
                error!("Could not send delivery failure note: {e:?}");
            }
        }
        Err(e) => error!("Response delivery failed: {e:?}"),
    }
}

/// Runs the monitor account: connects it, then handles every inbound command on
/// its own task so a long paced delivery does not hold up the next command.
pub struct PlatformManager {
    service: Arc<MonitorService>,
    chunk_delay: Duration,
}

impl PlatformManager {
    pub fn new(service: Arc<MonitorService>, chunk_delay: Duration) -> Self {
        Self {
            service,
            chunk_delay,
        }
    }

    /// Returns when the gateway stream ends. The caller owns `platform` and
    /// disconnects it afterwards.
    pub async fn run_monitor(&self, platform: &mut MonitorPlatform) -> Result<(), Error> {
        platform.connect().await?;
        info!("[Discord] Monitor connected.");

        let http = platform
            .http
            .clone()
            .ok_or_else(|| Error::Platform("monitor connected without an HTTP client".into()))?;

        while let Some(event) = platform.next_inbound().await {
            let service = Arc::clone(&self.service);
            let http = Arc::clone(&http);
            let application_id = platform.application_id();
            let chunk_delay = self.chunk_delay;

            tokio::spawn(async move {
                dispatch(service, http, application_id, event, chunk_delay).await;
            });
        }

        info!("[Discord] Monitor runtime ended.");
        Ok(())
    }
}

/// First answer for a slash interaction, decided before any work runs so the
/// acknowledgement always lands inside Discord's response window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionPlan {
    /// Nothing to run; answer right away.
    Reply { text: String, ephemeral: bool },
    /// Acknowledge now, run `command`, then fill in the answer.
    Defer { command: MonitorCommand, ephemeral: bool },
}

pub fn plan_interaction(service: &MonitorService, inbound: &InboundCommand) -> InteractionPlan {
    match service.route(inbound) {
        // Interactions must be answered, even ones we do not handle.
        Route::Ignored => InteractionPlan::Reply {
            text: format!("Unrecognized command in channel <#{}>.", inbound.channel_id),
            ephemeral: true,
        },
        Route::Invalid(text) => InteractionPlan::Reply { text, ephemeral: true },
        Route::Command(command) => {
            let ephemeral = service.expected_visibility(&command) == Visibility::Ephemeral;
            InteractionPlan::Defer { command, ephemeral }
        }
    }
}

async fn dispatch(
    service: Arc<MonitorService>,
    http: Arc<HttpClient>,
    application_id: Option<Id<ApplicationMarker>>,
    event: DiscordInbound,
    chunk_delay: Duration,
) {
    match event {
        DiscordInbound::Message { inbound } => {
            let Some(response) = service.handle(&inbound).await else {
                return;
            };
            let Some(channel_id) = Id::<ChannelMarker>::new_checked(inbound.channel_id) else {
                error!("Inbound message carried channel ID 0");
                return;
            };
            let sender = MessageSender::new(ChannelSink::new(http, channel_id), chunk_delay);
            deliver_with_notice(&sender, &response.text).await;
        }
        DiscordInbound::Interaction { interaction_id, token, inbound } => {
            let Some(application_id) = application_id else {
                error!("Interaction {} arrived before READY; cannot respond", interaction_id);
                return;
            };

            let (command, deferred_ephemeral) = match plan_interaction(&service, &inbound) {
                InteractionPlan::Reply { text, ephemeral } => {
                    let response = message_response(&text, ephemeral);
                    if let Err(e) =
                        respond_interaction(&http, application_id, interaction_id, &token, &response).await
                    {
                        error!("Could not answer interaction {}: {e}", interaction_id);
                    }
                    return;
                }
                InteractionPlan::Defer { command, ephemeral } => (command, ephemeral),
            };

            let deferred = deferred_response(deferred_ephemeral);
            if let Err(e) =
                respond_interaction(&http, application_id, interaction_id, &token, &deferred).await
            {
                error!("Could not acknowledge interaction {}: {e}", interaction_id);
                return;
            }

            let response = service.execute(command).await;
            let ephemeral = response.visibility == Visibility::Ephemeral;

            // The placeholder keeps the visibility it was deferred with, so a
            // mismatched answer goes out as follow-ups instead.
            let fill_original = ephemeral == deferred_ephemeral;
            if !fill_original {
                if let Err(e) = delete_original_response(&http, application_id, &token).await {
                    warn!("Could not remove deferred placeholder: {e}");
                }
            }

            let sink = InteractionSink::new(http, application_id, token, ephemeral, fill_original);
            let sender = MessageSender::new(sink, chunk_delay);
            deliver_with_notice(&sender, &response.text).await;
        }
    }
}
