// File: botwatch-core/src/services/status_formatter.rs

use botwatch_common::models::{ActivityKind, ActivitySummary, ClientSnapshot};

pub const NO_ACTIVITY: &str = "No activity set";

/// Renders one monitored client as a text block (no trailing newline).
///
/// Line order is fixed: header, status, servers, latency (when known),
/// activity, server list. A disconnected client only gets the header and an
/// offline status line.
pub fn format_client_block(snapshot: &ClientSnapshot) -> String {
    let header = format!("--- **{}** ---", snapshot.name);

    if !snapshot.connected {
        return format!("{header}\nStatus: Offline ❌ (Could not log in or not ready yet)");
    }

    let mut lines = vec![
        header,
        format!("Status: {} {}", snapshot.status.label(), snapshot.status.glyph()),
        format!("Servers: {} 🌐", snapshot.guilds.len()),
    ];
    if let Some(latency) = snapshot.latency {
        lines.push(format!("Latency: {:.2} ms ⏱️", latency.as_secs_f64() * 1000.0));
    }
    lines.push(format!("Activity: {}", activity_line(snapshot.activity.as_ref())));

    if snapshot.guilds.is_empty() {
        lines.push("Servers List: Not in any servers.".to_string());
    } else {
        let names: Vec<&str> = snapshot.guilds.iter().map(|g| g.name.as_str()).collect();
        lines.push(format!("Servers List: {}", names.join(", ")));
    }

    lines.join("\n")
}

pub fn activity_line(activity: Option<&ActivitySummary>) -> String {
    let Some(activity) = activity else {
        return NO_ACTIVITY.to_string();
    };

    // Custom statuses carry their text in `state`; `name` is just "Custom Status".
    let (headline, state) = match activity.kind {
        ActivityKind::Custom => match activity.state.as_deref() {
            Some(text) if !text.is_empty() => (text, None),
            _ => (activity.name.as_str(), None),
        },
        _ => (activity.name.as_str(), activity.state.as_deref()),
    };

    let mut line = match activity.kind {
        ActivityKind::Playing => format!("Playing: {headline}"),
        ActivityKind::Streaming => format!("Streaming: {headline}"),
        ActivityKind::Listening => format!("Listening to: {headline}"),
        ActivityKind::Watching => format!("Watching: {headline}"),
        ActivityKind::Custom => format!("Custom Status: {headline}"),
        ActivityKind::Competing => format!("Competing in: {headline}"),
        ActivityKind::Other => headline.to_string(),
    };

    for extra in [activity.detail.as_deref(), state].into_iter().flatten() {
        if !extra.is_empty() {
            line.push_str(" | ");
            line.push_str(extra);
        }
    }
    if let Some(url) = activity.url.as_deref().filter(|u| !u.is_empty()) {
        line.push_str(&format!(" ({url})"));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use botwatch_common::models::{GuildSummary, PresenceStatus};
    use std::time::Duration;

    fn online(name: &str) -> ClientSnapshot {
        ClientSnapshot {
            name: name.into(),
            connected: true,
            latency: Some(Duration::from_micros(42_500)),
            guilds: vec![
                GuildSummary { id: 1, name: "Alpha".into() },
                GuildSummary { id: 2, name: "Beta".into() },
            ],
            status: PresenceStatus::Online,
            activity: None,
        }
    }

    #[test]
    fn test_block_line_order() {
        let block = format_client_block(&online("MyBot"));
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(
            lines,
            vec![
                "--- **MyBot** ---",
                "Status: Online ✅",
                "Servers: 2 🌐",
                "Latency: 42.50 ms ⏱️",
                "Activity: No activity set",
                "Servers List: Alpha, Beta",
            ]
        );
    }

    #[test]
    fn test_latency_omitted_when_unknown() {
        let mut snap = online("MyBot");
        snap.latency = None;
        assert!(!format_client_block(&snap).contains("Latency"));
    }

    #[test]
    fn test_status_glyphs() {
        for (status, expected) in [
            (PresenceStatus::Online, "Status: Online ✅"),
            (PresenceStatus::Idle, "Status: Idle 🌙"),
            (PresenceStatus::DoNotDisturb, "Status: Do Not Disturb ⛔"),
            (PresenceStatus::Offline, "Status: Offline ❌"),
            (PresenceStatus::Unknown, "Status: Unknown ❓"),
        ] {
            let mut snap = online("b");
            snap.status = status;
            assert!(format_client_block(&snap).contains(expected), "{status:?}");
        }
    }

    #[test]
    fn test_disconnected_client_reports_offline() {
        let block = format_client_block(&ClientSnapshot::offline("Sleepy"));
        assert_eq!(
            block,
            "--- **Sleepy** ---\nStatus: Offline ❌ (Could not log in or not ready yet)"
        );
    }

    #[test]
    fn test_no_guilds() {
        let mut snap = online("Lonely");
        snap.guilds.clear();
        let block = format_client_block(&snap);
        assert!(block.contains("Servers: 0 🌐"));
        assert!(block.contains("Servers List: Not in any servers."));
    }

    #[test]
    fn test_activity_phrases() {
        let cases = [
            (ActivityKind::Playing, "Playing: thing"),
            (ActivityKind::Streaming, "Streaming: thing"),
            (ActivityKind::Listening, "Listening to: thing"),
            (ActivityKind::Watching, "Watching: thing"),
            (ActivityKind::Custom, "Custom Status: thing"),
            (ActivityKind::Competing, "Competing in: thing"),
        ];
        for (kind, expected) in cases {
            let a = ActivitySummary::new(kind, "thing");
            assert_eq!(activity_line(Some(&a)), expected);
        }
    }

    #[test]
    fn test_activity_optional_fields() {
        let mut a = ActivitySummary::new(ActivityKind::Streaming, "Speedrun");
        a.detail = Some("Any%".into());
        a.state = Some("Level 3".into());
        a.url = Some("https://twitch.tv/someone".into());
        assert_eq!(
            activity_line(Some(&a)),
            "Streaming: Speedrun | Any% | Level 3 (https://twitch.tv/someone)"
        );
    }

    #[test]
    fn test_custom_status_uses_state_text() {
        let mut a = ActivitySummary::new(ActivityKind::Custom, "Custom Status");
        a.state = Some("fixing bugs".into());
        assert_eq!(activity_line(Some(&a)), "Custom Status: fixing bugs");
    }

    #[test]
    fn test_missing_activity_is_literal() {
        assert_eq!(activity_line(None), "No activity set");
    }
}
