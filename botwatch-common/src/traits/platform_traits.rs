// File: botwatch-common/src/traits/platform_traits.rs

use async_trait::async_trait;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error(String),
}

/// Lifecycle of one gateway login.
#[async_trait]
pub trait PlatformIntegration: Send + Sync {
    async fn connect(&mut self) -> Result<(), Error>;
    async fn disconnect(&mut self) -> Result<(), Error>;
}
