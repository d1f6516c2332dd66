use std::time::Duration;

use tracing::{debug, error};

use botwatch_common::traits::session_traits::MessageSink;
use crate::Error;

/// Maximum length for a Discord message, in characters.
pub const DISCORD_MAX_MSG_LENGTH: usize = 2000;

/// Splits text into maximal pieces of at most `max_len` characters.
///
/// No re-wrapping: concatenating the result gives back `text` exactly, and a
/// multi-byte character is never cut in half. Empty text yields no pieces. A
/// `max_len` of zero is treated as one.
pub fn chunk_message(text: &str, max_len: usize) -> Vec<&str> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(max_len)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }

    chunks
}

/// Sends messages to one destination, pacing multi-part output.
pub struct MessageSender<S: MessageSink> {
    sink: S,
    max_len: usize,
    delay: Duration,
}

impl<S: MessageSink> MessageSender<S> {
    pub fn new(sink: S, delay: Duration) -> Self {
        Self {
            sink,
            max_len: DISCORD_MAX_MSG_LENGTH,
            delay,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Sends every chunk in order, sleeping between chunks (not after the last).
    ///
    /// Stops at the first failure and reports which chunk it was. Returns the
    /// number of chunks sent.
    pub async fn deliver(&self, text: &str) -> Result<usize, Error> {
        let chunks = chunk_message(text, self.max_len);
        let total = chunks.len();
        if total > 1 {
            debug!("Delivering {} characters in {} chunks", text.chars().count(), total);
        }

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Err(e) = self.sink.send_chunk(chunk).await {
                error!("Delivery failed at chunk {}/{}: {:?}", i + 1, total, e);
                return Err(Error::Delivery {
                    chunk: i + 1,
                    total,
                    reason: e.to_string(),
                });
            }
        }

        Ok(total)
    }
}
