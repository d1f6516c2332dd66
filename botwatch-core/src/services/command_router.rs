// File: botwatch-core/src/services/command_router.rs

use tracing::debug;

use botwatch_common::models::{InboundBody, InboundCommand, MonitorCommand, Route};

pub const CMD_MONITOR: &str = "monitor";
pub const CMD_MONITOR_ALL: &str = "monitor_all";
pub const CMD_LEAVE_SERVER: &str = "leave_server";

pub const OPT_BOT_NAME: &str = "bot_name";
pub const OPT_SERVER_ID: &str = "server_id";

/// Maps inbound events to monitor commands for one configured channel.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    channel_id: u64,
    prefix: String,
}

impl CommandRouter {
    pub fn new(channel_id: u64, prefix: impl Into<String>) -> Self {
        Self {
            channel_id,
            prefix: prefix.into(),
        }
    }

    pub fn route(&self, inbound: &InboundCommand) -> Route {
        let parsed = match &inbound.body {
            InboundBody::Text(text) => self.parse_text(text),
            InboundBody::Structured { name, .. } => self.parse_structured(name, inbound),
        };

        match parsed {
            Route::Ignored => Route::Ignored,
            // Shape is only checked in the right channel; elsewhere every
            // recognized command gets the same redirect.
            _ if inbound.channel_id != self.channel_id => {
                debug!(
                    "Command from channel {} rejected; monitoring channel is {}",
                    inbound.channel_id, self.channel_id
                );
                Route::Invalid(self.redirect_notice())
            }
            other => other,
        }
    }

    pub fn redirect_notice(&self) -> String {
        format!(
            "Please use this command in the designated monitoring channel: <#{}>",
            self.channel_id
        )
    }

    fn parse_text(&self, text: &str) -> Route {
        let Some(rest) = text.trim().strip_prefix(self.prefix.as_str()) else {
            return Route::Ignored;
        };

        let (word, args) = match rest.split_once(char::is_whitespace) {
            Some((w, a)) => (w, a.trim()),
            None => (rest, ""),
        };
        debug!("Parsed prefix command: '{}', args: '{}'", word, args);

        match word {
            CMD_MONITOR_ALL => Route::Command(MonitorCommand::ReportAll),
            CMD_MONITOR if args.is_empty() => {
                Route::Invalid(format!("Usage: `{}{} <bot_name>`", self.prefix, CMD_MONITOR))
            }
            CMD_MONITOR => Route::Command(MonitorCommand::ReportOne {
                name: args.to_string(),
            }),
            _ => Route::Ignored,
        }
    }

    fn parse_structured(&self, name: &str, inbound: &InboundCommand) -> Route {
        let arg = |key: &str| {
            inbound
                .option(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match name {
            CMD_MONITOR_ALL => Route::Command(MonitorCommand::ReportAll),
            CMD_MONITOR => match arg(OPT_BOT_NAME) {
                Some(name) => Route::Command(MonitorCommand::ReportOne { name }),
                None => Route::Invalid("Usage: `/monitor bot_name:<name>`".into()),
            },
            CMD_LEAVE_SERVER => match (arg(OPT_BOT_NAME), arg(OPT_SERVER_ID)) {
                (Some(name), Some(server_id)) => {
                    Route::Command(MonitorCommand::LeaveServer { name, server_id })
                }
                _ => Route::Invalid(
                    "Usage: `/leave_server bot_name:<name> server_id:<id>`".into(),
                ),
            },
            other => {
                debug!("Unknown structured command '{}'", other);
                Route::Ignored
            }
        }
    }
}
