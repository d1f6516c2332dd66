// File: botwatch-core/src/services/report_service.rs

use tracing::debug;

use crate::registry::SessionRegistry;
use crate::services::status_formatter::format_client_block;

pub const REPORT_TITLE: &str = "📊 **Discord Bot Monitoring Report** 📊";
pub const NO_BOTS_NOTICE: &str = "No bots found for monitoring.";

/// Builds text reports from the registry. Never mutates a session.
pub struct ReportService {
    registry: SessionRegistry,
}

impl ReportService {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Every registered session in configuration order, blank line between blocks.
    pub fn report_all(&self) -> String {
        if self.registry.is_empty() {
            return NO_BOTS_NOTICE.to_string();
        }

        let blocks: Vec<String> = self
            .registry
            .iter()
            .map(|session| format_client_block(&session.snapshot()))
            .collect();
        debug!("Built full report with {} block(s)", blocks.len());

        format!("{REPORT_TITLE}\n\n{}", blocks.join("\n\n"))
    }

    pub fn report_one(&self, name: &str) -> String {
        match self.registry.find(name) {
            Some(session) => format_client_block(&session.snapshot()),
            None => self.not_found(name),
        }
    }

    pub fn not_found(&self, name: &str) -> String {
        let names = self.registry.names();
        let available = if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        };
        format!("Bot '{name}' not found or not configured for monitoring. Available bots: {available}")
    }
}
