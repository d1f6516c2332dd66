// File: botwatch-core/src/services/discord/slashcommands/monitor.rs

use twilight_model::application::command::CommandType;
use twilight_util::builder::command::{CommandBuilder, StringBuilder};

use crate::services::command_router::{CMD_MONITOR, CMD_MONITOR_ALL, OPT_BOT_NAME};

/// `/monitor bot_name:<string>`
pub fn create_monitor_command() -> CommandBuilder {
    CommandBuilder::new(
        CMD_MONITOR,
        "Get detailed status for a specific monitored bot.",
        CommandType::ChatInput,
    )
    .option(
        StringBuilder::new(OPT_BOT_NAME, "Name of the monitored bot (case-insensitive)")
            .required(true),
    )
}

/// `/monitor_all`
pub fn create_monitor_all_command() -> CommandBuilder {
    CommandBuilder::new(
        CMD_MONITOR_ALL,
        "Get status for all configured monitored bots.",
        CommandType::ChatInput,
    )
}
