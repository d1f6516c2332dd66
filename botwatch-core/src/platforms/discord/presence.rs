// File: botwatch-core/src/platforms/discord/presence.rs
//
// Conversions from twilight's gateway presence types to the display model.

use twilight_model::gateway::presence::{Activity, ActivityType, Status};

use botwatch_common::models::{ActivityKind, ActivitySummary, PresenceStatus};

pub fn presence_status(status: Status) -> PresenceStatus {
    match status {
        Status::Online => PresenceStatus::Online,
        Status::Idle => PresenceStatus::Idle,
        Status::DoNotDisturb => PresenceStatus::DoNotDisturb,
        // Invisible accounts look offline to everyone else.
        Status::Invisible | Status::Offline => PresenceStatus::Offline,
        #[allow(unreachable_patterns)]
        _ => PresenceStatus::Unknown,
    }
}

pub fn activity_kind(kind: ActivityType) -> ActivityKind {
    match kind {
        ActivityType::Playing => ActivityKind::Playing,
        ActivityType::Streaming => ActivityKind::Streaming,
        ActivityType::Listening => ActivityKind::Listening,
        ActivityType::Watching => ActivityKind::Watching,
        ActivityType::Custom => ActivityKind::Custom,
        ActivityType::Competing => ActivityKind::Competing,
        #[allow(unreachable_patterns)]
        _ => ActivityKind::Other,
    }
}

pub fn activity_summary(activity: &Activity) -> ActivitySummary {
    ActivitySummary {
        kind: activity_kind(activity.kind),
        name: activity.name.clone(),
        detail: activity.details.clone(),
        state: activity.state.clone(),
        url: activity.url.clone(),
    }
}

/// The activity worth showing: the first non-custom one, else whatever is first.
pub fn primary_activity(activities: &[Activity]) -> Option<ActivitySummary> {
    activities
        .iter()
        .find(|a| a.kind != ActivityType::Custom)
        .or_else(|| activities.first())
        .map(activity_summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilight_model::gateway::presence::MinimalActivity;

    fn activity(kind: ActivityType, name: &str) -> Activity {
        MinimalActivity {
            kind,
            name: name.to_string(),
            url: None,
        }
        .into()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(presence_status(Status::Online), PresenceStatus::Online);
        assert_eq!(presence_status(Status::Idle), PresenceStatus::Idle);
        assert_eq!(presence_status(Status::DoNotDisturb), PresenceStatus::DoNotDisturb);
        assert_eq!(presence_status(Status::Invisible), PresenceStatus::Offline);
        assert_eq!(presence_status(Status::Offline), PresenceStatus::Offline);
    }

    #[test]
    fn test_activity_summary_copies_optional_fields() {
        let mut a = activity(ActivityType::Playing, "Chess");
        a.details = Some("Ranked".into());
        a.state = Some("Move 12".into());
        let s = activity_summary(&a);
        assert_eq!(s.kind, ActivityKind::Playing);
        assert_eq!(s.name, "Chess");
        assert_eq!(s.detail.as_deref(), Some("Ranked"));
        assert_eq!(s.state.as_deref(), Some("Move 12"));
        assert!(s.url.is_none());
    }

    #[test]
    fn test_primary_activity_prefers_non_custom() {
        let list = vec![
            activity(ActivityType::Custom, "Custom Status"),
            activity(ActivityType::Listening, "lofi"),
        ];
        let s = primary_activity(&list).unwrap();
        assert_eq!(s.kind, ActivityKind::Listening);
    }

    #[test]
    fn test_primary_activity_falls_back_to_custom() {
        let list = vec![activity(ActivityType::Custom, "Custom Status")];
        assert_eq!(primary_activity(&list).unwrap().kind, ActivityKind::Custom);
        assert!(primary_activity(&[]).is_none());
    }
}
