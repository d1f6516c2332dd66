// File: botwatch-common/src/models/mod.rs
pub mod monitor;
pub mod command;

pub use monitor::{ActivityKind, ActivitySummary, ClientSnapshot, GuildSummary, PresenceStatus};
pub use command::{InboundBody, InboundCommand, MonitorCommand, OutboundResponse, Route, Visibility};
