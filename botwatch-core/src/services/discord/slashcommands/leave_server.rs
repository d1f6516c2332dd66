// File: botwatch-core/src/services/discord/slashcommands/leave_server.rs

use twilight_model::application::command::CommandType;
use twilight_model::guild::Permissions;
use twilight_util::builder::command::{CommandBuilder, StringBuilder};

use crate::services::command_router::{CMD_LEAVE_SERVER, OPT_BOT_NAME, OPT_SERVER_ID};

/// `/leave_server bot_name:<string> server_id:<string>`
///
/// Restricted to members with Manage Guild by default; the action cannot be
/// undone without a new invite.
pub fn create_leave_server_command() -> CommandBuilder {
    CommandBuilder::new(
        CMD_LEAVE_SERVER,
        "Make a monitored bot leave a server.",
        CommandType::ChatInput,
    )
    .default_member_permissions(Permissions::MANAGE_GUILD)
    .option(StringBuilder::new(OPT_BOT_NAME, "Name of the monitored bot").required(true))
    .option(StringBuilder::new(OPT_SERVER_ID, "ID of the server to leave").required(true))
}
