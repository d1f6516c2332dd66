
// File: src/services/mod.rs

pub mod command_router;
pub mod discord;
pub mod message_sender;
pub mod monitor_service;
pub mod report_service;
pub mod status_formatter;

pub use command_router::CommandRouter;
pub use message_sender::MessageSender;
pub use monitor_service::MonitorService;
pub use report_service::ReportService;
