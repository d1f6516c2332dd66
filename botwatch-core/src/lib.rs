// src/lib.rs

pub mod config;
pub mod liveness;
pub mod platforms;
pub mod registry;
pub mod services;
pub mod test_utils;

pub use botwatch_common::error::Error;
pub use config::{CommandSurface, MonitorConfig, MonitoredBotConfig};
pub use registry::SessionRegistry;
