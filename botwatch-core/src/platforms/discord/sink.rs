// File: botwatch-core/src/platforms/discord/sink.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client as HttpClient;
use twilight_model::{
    channel::message::MessageFlags,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::marker::{ApplicationMarker, ChannelMarker, InteractionMarker},
    id::Id,
};

use botwatch_common::traits::session_traits::MessageSink;
use crate::Error;

/// Posts each chunk as a regular message in one channel.
pub struct ChannelSink {
    http: Arc<HttpClient>,
    channel_id: Id<ChannelMarker>,
}

impl ChannelSink {
    pub fn new(http: Arc<HttpClient>, channel_id: Id<ChannelMarker>) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send_chunk(&self, text: &str) -> Result<(), Error> {
        self.http
            .create_message(self.channel_id)
            .content(text)
            .await
            .map_err(|e| Error::Platform(format!("Error sending Discord message: {e:?}")))?;
        Ok(())
    }
}

pub fn message_flags(ephemeral: bool) -> Option<MessageFlags> {
    ephemeral.then_some(MessageFlags::EPHEMERAL)
}

/// "Thinking..." acknowledgement; the real answer follows through the token.
pub fn deferred_response(ephemeral: bool) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::DeferredChannelMessageWithSource,
        data: message_flags(ephemeral).map(|flags| InteractionResponseData {
            flags: Some(flags),
            ..Default::default()
        }),
    }
}

/// Immediate single-message answer.
pub fn message_response(text: &str, ephemeral: bool) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(InteractionResponseData {
            content: Some(text.to_string()),
            flags: message_flags(ephemeral),
            ..Default::default()
        }),
    }
}

pub async fn respond_interaction(
    http: &HttpClient,
    application_id: Id<ApplicationMarker>,
    interaction_id: Id<InteractionMarker>,
    token: &str,
    response: &InteractionResponse,
) -> Result<(), Error> {
    http.interaction(application_id)
        .create_response(interaction_id, token, response)
        .await
        .map_err(|e| Error::Platform(format!("Error responding to interaction: {e}")))?;
    Ok(())
}

/// Removes the original (deferred) response of an interaction.
pub async fn delete_original_response(
    http: &HttpClient,
    application_id: Id<ApplicationMarker>,
    token: &str,
) -> Result<(), Error> {
    http.interaction(application_id)
        .delete_response(token)
        .await
        .map_err(|e| Error::Platform(format!("Error deleting interaction response: {e}")))?;
    Ok(())
}

/// Delivers chunks for an interaction that was already deferred.
///
/// With `fill_original` set, the first chunk replaces the deferred placeholder
/// and the rest become follow-ups. Without it every chunk is a follow-up.
pub struct InteractionSink {
    http: Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
    token: String,
    ephemeral: bool,
    original_pending: AtomicBool,
}

impl InteractionSink {
    pub fn new(
        http: Arc<HttpClient>,
        application_id: Id<ApplicationMarker>,
        token: String,
        ephemeral: bool,
        fill_original: bool,
    ) -> Self {
        Self {
            http,
            application_id,
            token,
            ephemeral,
            original_pending: AtomicBool::new(fill_original),
        }
    }
}

#[async_trait]
impl MessageSink for InteractionSink {
    async fn send_chunk(&self, text: &str) -> Result<(), Error> {
        let client = self.http.interaction(self.application_id);

        if self.original_pending.load(Ordering::Acquire) {
            client
                .update_response(&self.token)
                .content(Some(text))
                .await
                .map_err(|e| Error::Platform(format!("Error editing interaction response: {e}")))?;
            self.original_pending.store(false, Ordering::Release);
            return Ok(());
        }

        let mut followup = client.create_followup(&self.token).content(text);
        if let Some(flags) = message_flags(self.ephemeral) {
            followup = followup.flags(flags);
        }
        followup
            .await
            .map_err(|e| Error::Platform(format!("Error sending interaction follow-up: {e}")))?;
        Ok(())
    }
}
