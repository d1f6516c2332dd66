pub mod monitored;
pub mod presence;
pub mod runtime;
pub mod sink;

pub use monitored::DiscordMonitoredSession;
pub use runtime::{DiscordInbound, MonitorPlatform};
pub use sink::{ChannelSink, InteractionSink};
