// File: botwatch-common/src/models/command.rs

/// A command the monitor understands, after channel and argument validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    ReportOne { name: String },
    ReportAll,
    LeaveServer { name: String, server_id: String },
}

/// Outcome of routing one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Command(MonitorCommand),
    /// A recognized command that cannot run; the reason is shown to the user.
    Invalid(String),
    /// Not addressed to us. No response at all.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundBody {
    /// Raw message text from the prefix surface.
    Text(String),
    /// A structured (slash) command with its string options.
    Structured {
        name: String,
        options: Vec<(String, String)>,
    },
}

/// Platform-neutral view of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub channel_id: u64,
    pub body: InboundBody,
}

impl InboundCommand {
    pub fn text(channel_id: u64, text: impl Into<String>) -> Self {
        Self {
            channel_id,
            body: InboundBody::Text(text.into()),
        }
    }

    pub fn structured(channel_id: u64, name: impl Into<String>, options: &[(&str, &str)]) -> Self {
        Self {
            channel_id,
            body: InboundBody::Structured {
                name: name.into(),
                options: options
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        }
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        match &self.body {
            InboundBody::Structured { options, .. } => options
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            InboundBody::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    /// Only the invoking user sees it (slash surface); falls back to public on
    /// the prefix surface.
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResponse {
    pub text: String,
    pub visibility: Visibility,
}

impl OutboundResponse {
    pub fn public(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Public,
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visibility: Visibility::Ephemeral,
        }
    }
}
