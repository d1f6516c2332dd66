// File: src/platforms/mod.rs

pub use botwatch_common::traits::platform_traits::{ConnectionStatus, PlatformIntegration};

pub mod discord;
pub mod manager;
