// File: botwatch-core/tests/report_tests.rs

use std::time::Duration;

use botwatch_common::models::{ActivityKind, ActivitySummary, PresenceStatus};
use botwatch_common::traits::session_traits::MonitoredSession;
use botwatch_core::platforms::manager::connect_sequentially;
use botwatch_core::services::report_service::{NO_BOTS_NOTICE, REPORT_TITLE};
use botwatch_core::services::ReportService;
use botwatch_core::test_utils::FakeSession;
use botwatch_core::{Error, SessionRegistry};

fn registry_of(sessions: Vec<FakeSession>) -> SessionRegistry {
    SessionRegistry::new(sessions.into_iter().map(FakeSession::into_dyn).collect())
}

#[test]
fn test_report_all_with_no_bots_is_a_notice() {
    let reports = ReportService::new(SessionRegistry::default());
    let text = reports.report_all();
    assert_eq!(text, NO_BOTS_NOTICE);
    assert!(!text.is_empty());
}

#[test]
fn test_report_all_blocks_in_config_order() {
    let reports = ReportService::new(registry_of(vec![
        FakeSession::online("Zeta", &[(1, "Home")]),
        FakeSession::online("alpha", &[]).with_status(PresenceStatus::Idle),
    ]));

    let text = reports.report_all();
    assert!(text.starts_with(REPORT_TITLE));
    let zeta = text.find("--- **Zeta** ---").unwrap();
    let alpha = text.find("--- **alpha** ---").unwrap();
    assert!(zeta < alpha, "blocks must follow configuration order");
    assert!(text.contains("Status: Idle 🌙"));
    // Blank line between blocks.
    assert!(text.contains("Servers List: Home\n\n--- **alpha** ---"));
}

#[test]
fn test_report_one_is_case_insensitive() {
    let reports = ReportService::new(registry_of(vec![FakeSession::online("MyBot", &[(1, "Home")])]));
    let lower = reports.report_one("mybot");
    let mixed = reports.report_one("MyBot");
    assert_eq!(lower, mixed);
    assert!(lower.starts_with("--- **MyBot** ---"));
}

#[test]
fn test_report_one_unknown_lists_configured_names() {
    let reports = ReportService::new(registry_of(vec![
        FakeSession::new("bot1"),
        FakeSession::new("bot2"),
    ]));
    let text = reports.report_one("ghost");
    assert!(text.contains("'ghost' not found"));
    assert!(text.ends_with("Available bots: bot1, bot2"));
}

#[test]
fn test_report_one_unknown_with_nothing_configured() {
    let reports = ReportService::new(SessionRegistry::default());
    assert!(reports.report_one("ghost").ends_with("Available bots: none"));
}

#[test]
fn test_activity_rendering_through_report() {
    let mut activity = ActivitySummary::new(ActivityKind::Watching, "the logs");
    activity.detail = Some("tail -f".into());
    let reports = ReportService::new(registry_of(vec![
        FakeSession::online("watcher", &[]).with_activity(activity),
        FakeSession::online("idle", &[]),
    ]));

    let text = reports.report_all();
    assert!(text.contains("Activity: Watching: the logs | tail -f"));
    assert!(text.contains("Activity: No activity set"));
}

#[tokio::test]
async fn test_failed_login_still_reported_offline() -> Result<(), Error> {
    let mut sessions = vec![
        FakeSession::new("one"),
        FakeSession::failing("two"),
        FakeSession::new("three"),
    ];

    let results = connect_sequentially(&mut sessions, Duration::ZERO).await;
    let outcome: Vec<(&str, bool)> = results
        .iter()
        .map(|(name, r)| (name.as_str(), r.is_ok()))
        .collect();
    assert_eq!(outcome, vec![("one", true), ("two", false), ("three", true)]);
    assert!(matches!(
        &results[1].1,
        Err(Error::SessionStart { name, .. }) if name == "two"
    ));

    let reports = ReportService::new(registry_of(sessions));
    let text = reports.report_all();
    assert_eq!(text.matches("--- **").count(), 3);
    assert_eq!(text.matches("Could not log in or not ready yet").count(), 1);
    assert!(text.contains("--- **two** ---\nStatus: Offline ❌"));
    Ok(())
}

#[tokio::test]
async fn test_sequential_login_waits_between_sessions() {
    let mut sessions = vec![FakeSession::new("a"), FakeSession::new("b"), FakeSession::new("c")];
    let delay = Duration::from_millis(20);

    let started = std::time::Instant::now();
    let results = connect_sequentially(&mut sessions, delay).await;
    assert_eq!(results.len(), 3);
    // Two gaps for three sessions; no wait after the last one.
    assert!(started.elapsed() >= delay * 2);
}

#[tokio::test]
async fn test_close_all_takes_every_session_offline() {
    let mut sessions = vec![FakeSession::new("a"), FakeSession::failing("b")];
    connect_sequentially(&mut sessions, Duration::ZERO).await;

    let registry = registry_of(sessions);
    assert!(registry.find("a").unwrap().snapshot().connected);

    registry.close_all().await;
    assert!(registry.iter().all(|s| !s.snapshot().connected));
    // Closing twice is harmless.
    registry.close_all().await;

    let text = ReportService::new(registry).report_all();
    assert_eq!(text.matches("Status: Offline ❌").count(), 2);
}
