// File: botwatch-core/src/config.rs

use std::time::Duration;

use tracing::{debug, warn};

use crate::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(1000);

/// Source of environment-style key/value settings.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment (after `.env` has been loaded).
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Which inbound command surface this deployment listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSurface {
    /// `!monitor <name>` / `!monitor_all` in channel messages.
    Prefix,
    /// Global application commands `/monitor`, `/monitor_all`, `/leave_server`.
    Slash,
}

impl std::str::FromStr for CommandSurface {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prefix" | "text" => Ok(CommandSurface::Prefix),
            "slash" | "structured" => Ok(CommandSurface::Slash),
            other => Err(Error::Config(format!(
                "COMMAND_MODE must be 'prefix' or 'slash', got '{other}'"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct MonitoredBotConfig {
    pub name: String,
    pub token: String,
}

// Tokens stay out of debug output.
impl std::fmt::Debug for MonitoredBotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoredBotConfig")
            .field("name", &self.name)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct MonitorConfig {
    pub monitor_token: String,
    pub channel_id: u64,
    pub monitored: Vec<MonitoredBotConfig>,
    pub port: u16,
    pub surface: CommandSurface,
    pub prefix: String,
    pub login_delay: Duration,
    pub chunk_delay: Duration,
    /// Shown as "Watching <text>" on the monitor account.
    pub monitor_activity: Option<String>,
}

impl std::fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("monitor_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("monitored", &self.monitored)
            .field("port", &self.port)
            .field("surface", &self.surface)
            .field("prefix", &self.prefix)
            .field("login_delay", &self.login_delay)
            .field("chunk_delay", &self.chunk_delay)
            .field("monitor_activity", &self.monitor_activity)
            .finish()
    }
}

impl MonitorConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        if dotenv::dotenv().is_err() {
            debug!("No .env file found; using process environment only");
        }
        Self::from_reader(&SystemEnv)
    }

    pub fn from_reader(env: &impl ReadEnv) -> Result<Self, Error> {
        let monitor_token = non_empty(env, "MONITOR_BOT_TOKEN")
            .ok_or_else(|| Error::Config("MONITOR_BOT_TOKEN is not set".into()))?;

        let channel_raw = non_empty(env, "MONITOR_CHANNEL_ID")
            .ok_or_else(|| Error::Config("MONITOR_CHANNEL_ID is not set".into()))?;
        let channel_id = parse_snowflake(&channel_raw)
            .ok_or_else(|| Error::Config(format!("MONITOR_CHANNEL_ID is not a valid ID: '{channel_raw}'")))?;

        let monitored = read_monitored_bots(env);

        let port = match non_empty(env, "PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("PORT '{p}' is invalid: {e}")))?,
            None => DEFAULT_PORT,
        };

        let surface = match non_empty(env, "COMMAND_MODE") {
            Some(mode) => mode.parse()?,
            None => CommandSurface::Prefix,
        };

        let prefix = non_empty(env, "COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let login_delay = read_duration(env, "LOGIN_DELAY_SECS", Duration::from_secs)?
            .unwrap_or(DEFAULT_LOGIN_DELAY);
        let chunk_delay = read_duration(env, "CHUNK_DELAY_MS", Duration::from_millis)?
            .unwrap_or(DEFAULT_CHUNK_DELAY);

        Ok(Self {
            monitor_token,
            channel_id,
            monitored,
            port,
            surface,
            prefix,
            login_delay,
            chunk_delay,
            monitor_activity: non_empty(env, "MONITOR_ACTIVITY"),
        })
    }
}

/// `BOT_TOKEN_1`/`BOT_NAME_1`, `BOT_TOKEN_2`/`BOT_NAME_2`, ... up to the first
/// index where either half is missing.
fn read_monitored_bots(env: &impl ReadEnv) -> Vec<MonitoredBotConfig> {
    let mut bots = Vec::new();
    let mut i = 1;
    loop {
        let token = non_empty(env, &format!("BOT_TOKEN_{i}"));
        let name = non_empty(env, &format!("BOT_NAME_{i}"));
        match (token, name) {
            (Some(token), Some(name)) => bots.push(MonitoredBotConfig { name, token }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("BOT_TOKEN_{i}/BOT_NAME_{i} is only half set; stopping bot discovery here");
                break;
            }
            (None, None) => break,
        }
        i += 1;
    }
    bots
}

fn read_duration(
    env: &impl ReadEnv,
    key: &str,
    make: fn(u64) -> Duration,
) -> Result<Option<Duration>, Error> {
    match non_empty(env, key) {
        Some(raw) => raw
            .parse::<u64>()
            .map(|n| Some(make(n)))
            .map_err(|e| Error::Config(format!("{key} '{raw}' is invalid: {e}"))),
        None => Ok(None),
    }
}

fn non_empty(env: &impl ReadEnv, key: &str) -> Option<String> {
    env.var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Discord snowflakes are non-zero u64s.
pub fn parse_snowflake(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id != 0)
}
