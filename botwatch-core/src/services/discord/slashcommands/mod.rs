// File: botwatch-core/src/services/discord/slashcommands/mod.rs

pub mod leave_server;
pub mod monitor;

use std::sync::Arc;

use tracing::{debug, info};
use twilight_http::Client as HttpClient;
use twilight_model::{
    application::{
        command::Command,
        interaction::{application_command::CommandOptionValue, Interaction, InteractionData},
    },
    id::marker::ApplicationMarker,
    id::Id,
};

use botwatch_common::error::Error;
use botwatch_common::models::InboundCommand;

use crate::services::discord::slashcommands::leave_server::create_leave_server_command;
use crate::services::discord::slashcommands::monitor::{
    create_monitor_all_command,
    create_monitor_command,
};

/// The full command set, in registration order.
pub fn monitor_commands() -> Vec<Command> {
    vec![
        create_monitor_command().build(),
        create_monitor_all_command().build(),
        create_leave_server_command().build(),
    ]
}

pub async fn register_global_slash_commands(
    http: &Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
) -> Result<(), Error> {
    let commands = monitor_commands();

    http.interaction(application_id)
        .set_global_commands(&commands)
        .await
        .map_err(|e| Error::Platform(format!("Failed to register global slash commands: {e}")))?;

    info!("Registered {} global slash command(s)", commands.len());
    Ok(())
}

/// Normalizes an application-command interaction. Other interaction kinds
/// (components, autocomplete, ...) and interactions without a channel give `None`.
pub fn inbound_from_interaction(interaction: &Interaction) -> Option<InboundCommand> {
    let Some(InteractionData::ApplicationCommand(cmd_data)) = &interaction.data else {
        return None;
    };
    let channel_id = interaction.channel.as_ref()?.id.get();

    let options: Vec<(&str, &str)> = cmd_data
        .options
        .iter()
        .filter_map(|opt| match &opt.value {
            CommandOptionValue::String(v) => Some((opt.name.as_str(), v.as_str())),
            other => {
                debug!("Ignoring non-string option '{}': {:?}", opt.name, other);
                None
            }
        })
        .collect();

    Some(InboundCommand::structured(channel_id, cmd_data.name.as_str(), &options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilight_model::application::command::CommandOptionType;

    #[test]
    fn test_command_set_names() {
        let names: Vec<String> = monitor_commands().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["monitor", "monitor_all", "leave_server"]);
    }

    #[test]
    fn test_monitor_requires_bot_name() {
        let cmd = create_monitor_command().build();
        assert_eq!(cmd.options.len(), 1);
        assert_eq!(cmd.options[0].name, "bot_name");
        assert_eq!(cmd.options[0].kind, CommandOptionType::String);
        assert_eq!(cmd.options[0].required, Some(true));
    }

    #[test]
    fn test_leave_server_requires_both_options() {
        let cmd = create_leave_server_command().build();
        let names: Vec<&str> = cmd.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["bot_name", "server_id"]);
        assert!(cmd.options.iter().all(|o| o.required == Some(true)));
    }

    #[test]
    fn test_monitor_all_has_no_options() {
        assert!(create_monitor_all_command().build().options.is_empty());
    }
}
