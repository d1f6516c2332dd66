//! botwatch-server/src/server.rs
//!
//! Startup order: liveness, monitored logins, then the monitor account's
//! command loop until it ends or Ctrl-C arrives. Every gateway is closed on
//! the way out.

use std::sync::Arc;

use tracing::{error, info, warn};

use botwatch_core::liveness::{start_liveness_server, LivenessState};
use botwatch_core::platforms::discord::MonitorPlatform;
use botwatch_core::platforms::PlatformIntegration;
use botwatch_core::platforms::manager::{start_monitored_sessions, PlatformManager};
use botwatch_core::services::{CommandRouter, MonitorService};
use botwatch_core::{Error, MonitorConfig, SessionRegistry};

pub async fn run_server(config: MonitorConfig, liveness: bool) -> Result<(), Error> {
    // Up before the logins so hosting health checks pass during a slow startup.
    let liveness_state = LivenessState::new(SessionRegistry::default());
    if liveness {
        let state = liveness_state.clone();
        let port = config.port;
        tokio::spawn(async move {
            if let Err(e) = start_liveness_server(state, port).await {
                error!("Liveness server stopped: {e:?}");
            }
        });
    }

    let (registry, results) =
        start_monitored_sessions(&config.monitored, config.login_delay).await;
    liveness_state.publish(registry.clone());

    let failed: Vec<&str> = results
        .iter()
        .filter(|(_, r)| r.is_err())
        .map(|(name, _)| name.as_str())
        .collect();
    if failed.is_empty() {
        info!("All {} monitored bot(s) logged in", results.len());
    } else {
        warn!(
            "{}/{} monitored bot(s) failed to log in: {}",
            failed.len(),
            results.len(),
            failed.join(", ")
        );
    }

    let router = CommandRouter::new(config.channel_id, config.prefix.clone());
    let service = Arc::new(MonitorService::new(router, registry.clone()));
    service.warn_if_empty();

    let manager = PlatformManager::new(service, config.chunk_delay);
    let mut platform = MonitorPlatform::new(
        config.monitor_token.clone(),
        config.surface,
        config.monitor_activity.clone(),
    );

    let result = tokio::select! {
        res = manager.run_monitor(&mut platform) => res,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("Failed to listen for Ctrl-C: {:?}", e);
            }
            info!("Ctrl-C detected; shutting down.");
            Ok(())
        }
    };

    shutdown(&mut platform, &registry).await;
    result
}

/// Closes the monitor gateway and every monitored session.
async fn shutdown(platform: &mut MonitorPlatform, registry: &SessionRegistry) {
    if let Err(e) = platform.disconnect().await {
        warn!("Monitor disconnect failed: {e}");
    }
    registry.close_all().await;
    info!("All gateway connections closed.");
}
