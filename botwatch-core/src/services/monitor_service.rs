// File: botwatch-core/src/services/monitor_service.rs

use tracing::{debug, error, info, warn};

use botwatch_common::models::{InboundCommand, MonitorCommand, OutboundResponse, Route, Visibility};

use crate::config::parse_snowflake;
use crate::registry::SessionRegistry;
use crate::services::command_router::CommandRouter;
use crate::services::report_service::ReportService;

/// Single entry point for inbound commands: route, run, and produce the reply.
///
/// Every failure past this boundary becomes user-visible text; nothing here
/// returns an error to the gateway loop.
pub struct MonitorService {
    router: CommandRouter,
    reports: ReportService,
}

impl MonitorService {
    pub fn new(router: CommandRouter, registry: SessionRegistry) -> Self {
        Self {
            router,
            reports: ReportService::new(registry),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        self.reports.registry()
    }

    pub fn route(&self, inbound: &InboundCommand) -> Route {
        self.router.route(inbound)
    }

    /// Visibility `execute` will most likely answer with, known without doing
    /// any work. Only a failed `leave_server` can still turn out ephemeral.
    pub fn expected_visibility(&self, cmd: &MonitorCommand) -> Visibility {
        match cmd {
            MonitorCommand::ReportOne { name } if self.registry().find(name).is_none() => {
                Visibility::Ephemeral
            }
            _ => Visibility::Public,
        }
    }

    /// `None` means stay silent (not a command for us).
    pub async fn handle(&self, inbound: &InboundCommand) -> Option<OutboundResponse> {
        match self.route(inbound) {
            Route::Ignored => None,
            Route::Invalid(reason) => Some(OutboundResponse::ephemeral(reason)),
            Route::Command(cmd) => Some(self.execute(cmd).await),
        }
    }

    pub async fn execute(&self, cmd: MonitorCommand) -> OutboundResponse {
        debug!("Executing {:?}", cmd);
        match cmd {
            MonitorCommand::ReportAll => OutboundResponse::public(self.reports.report_all()),
            MonitorCommand::ReportOne { name } => match self.registry().find(&name) {
                Some(_) => OutboundResponse::public(self.reports.report_one(&name)),
                None => OutboundResponse::ephemeral(self.reports.not_found(&name)),
            },
            MonitorCommand::LeaveServer { name, server_id } => {
                self.leave_server(&name, &server_id).await
            }
        }
    }

    /// Makes one named session leave one guild, after checking it can.
    pub async fn leave_server(&self, name: &str, server_id: &str) -> OutboundResponse {
        let Some(session) = self.registry().find(name) else {
            return OutboundResponse::ephemeral(self.reports.not_found(name));
        };

        let Some(guild_id) = parse_snowflake(server_id) else {
            return OutboundResponse::ephemeral(format!("'{server_id}' is not a valid server ID."));
        };

        let snapshot = session.snapshot();
        if !snapshot.connected {
            return OutboundResponse::ephemeral(format!(
                "Bot '{}' is not connected, so it cannot leave servers right now.",
                snapshot.name
            ));
        }

        let Some(guild) = snapshot.guilds.iter().find(|g| g.id == guild_id) else {
            return OutboundResponse::ephemeral(format!(
                "Bot '{}' is not in server {guild_id}.",
                snapshot.name
            ));
        };

        match session.leave_guild(guild_id).await {
            Ok(()) => {
                info!("'{}' left guild {} ({})", snapshot.name, guild.name, guild_id);
                OutboundResponse::public(format!(
                    "Bot '{}' left server '{}' ({guild_id}).",
                    snapshot.name, guild.name
                ))
            }
            Err(e) => {
                error!("'{}' failed to leave guild {}: {:?}", snapshot.name, guild_id, e);
                OutboundResponse::ephemeral(format!(
                    "Failed to make '{}' leave server {guild_id}: {e}",
                    snapshot.name
                ))
            }
        }
    }

    pub fn warn_if_empty(&self) {
        if self.registry().is_empty() {
            warn!("No monitored bots configured; reports will say none were found");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use botwatch_common::models::{ClientSnapshot, GuildSummary, PresenceStatus};
    use botwatch_common::traits::session_traits::{MockMonitoredSession, MonitoredSession};
    use botwatch_common::Error;

    const CHANNEL: u64 = 777;

    fn snapshot_in(name: &str, guilds: &[(u64, &str)]) -> ClientSnapshot {
        ClientSnapshot {
            name: name.into(),
            connected: true,
            latency: None,
            guilds: guilds
                .iter()
                .map(|(id, n)| GuildSummary { id: *id, name: n.to_string() })
                .collect(),
            status: PresenceStatus::Online,
            activity: None,
        }
    }

    fn service_with(mock: MockMonitoredSession) -> MonitorService {
        let sessions: Vec<Arc<dyn MonitoredSession>> = vec![Arc::new(mock)];
        MonitorService::new(CommandRouter::new(CHANNEL, "!"), SessionRegistry::new(sessions))
    }

    fn leave(name: &str, id: &str) -> InboundCommand {
        InboundCommand::structured(CHANNEL, "leave_server", &[("bot_name", name), ("server_id", id)])
    }

    #[tokio::test]
    async fn test_leave_server_calls_session_once() {
        let mut mock = MockMonitoredSession::new();
        mock.expect_name().return_const("bot1".to_string());
        mock.expect_snapshot()
            .returning(|| snapshot_in("bot1", &[(123, "Home")]));
        mock.expect_leave_guild()
            .withf(|id| *id == 123)
            .times(1)
            .returning(|_| Ok(()));

        let svc = service_with(mock);
        let resp = svc.handle(&leave("BOT1", "123")).await.unwrap();
        assert_eq!(resp.visibility, Visibility::Public);
        assert_eq!(resp.text, "Bot 'bot1' left server 'Home' (123).");
    }

    #[tokio::test]
    async fn test_leave_server_not_member_never_calls_platform() {
        let mut mock = MockMonitoredSession::new();
        mock.expect_name().return_const("bot1".to_string());
        mock.expect_snapshot()
            .returning(|| snapshot_in("bot1", &[(999, "Elsewhere")]));
        mock.expect_leave_guild().never();

        let svc = service_with(mock);
        let resp = svc.handle(&leave("bot1", "123")).await.unwrap();
        assert_eq!(resp.text, "Bot 'bot1' is not in server 123.");
    }

    #[tokio::test]
    async fn test_leave_server_platform_failure_is_reported() {
        let mut mock = MockMonitoredSession::new();
        mock.expect_name().return_const("bot1".to_string());
        mock.expect_snapshot()
            .returning(|| snapshot_in("bot1", &[(123, "Home")]));
        mock.expect_leave_guild()
            .returning(|_| Err(Error::Platform("Missing Access".into())));

        let svc = service_with(mock);
        let resp = svc.handle(&leave("bot1", "123")).await.unwrap();
        assert_eq!(resp.visibility, Visibility::Ephemeral);
        assert!(resp.text.starts_with("Failed to make 'bot1' leave server 123"));
        assert!(resp.text.contains("Missing Access"));
    }

    #[tokio::test]
    async fn test_leave_server_disconnected_session() {
        let mut mock = MockMonitoredSession::new();
        mock.expect_name().return_const("bot1".to_string());
        mock.expect_snapshot().returning(|| ClientSnapshot::offline("bot1"));
        mock.expect_leave_guild().never();

        let svc = service_with(mock);
        let resp = svc.handle(&leave("bot1", "123")).await.unwrap();
        assert!(resp.text.contains("not connected"));
    }

    #[tokio::test]
    async fn test_leave_server_rejects_bad_id() {
        let mut mock = MockMonitoredSession::new();
        mock.expect_name().return_const("bot1".to_string());
        mock.expect_snapshot().never();
        mock.expect_leave_guild().never();

        let svc = service_with(mock);
        let resp = svc.handle(&leave("bot1", "not-a-number")).await.unwrap();
        assert_eq!(resp.text, "'not-a-number' is not a valid server ID.");
    }
}
