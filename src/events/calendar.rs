//! Calendar view helpers over normalized events

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::normalizer::NormalizedEvent;

/// Sidebar length on the calendar page
pub const UPCOMING_SIDEBAR_LEN: usize = 5;

/// Events that have not finished yet (ongoing or upcoming)
pub fn visible_events(events: &[NormalizedEvent], now: DateTime<Utc>) -> Vec<&NormalizedEvent> {
    events.iter().filter(|event| event.end >= now).collect()
}

/// Earliest `limit` visible events by start time
pub fn upcoming_events(
    events: &[NormalizedEvent],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<&NormalizedEvent> {
    let mut visible = visible_events(events, now);
    visible.sort_by_key(|event| event.start);
    visible.truncate(limit);
    visible
}

/// Events starting on `day` (UTC)
pub fn events_on_day(events: &[NormalizedEvent], day: NaiveDate) -> Vec<&NormalizedEvent> {
    events
        .iter()
        .filter(|event| event.start.date_naive() == day)
        .collect()
}

/// Events bucketed by UTC start date, days in ascending order
pub fn group_by_day(events: &[NormalizedEvent]) -> BTreeMap<NaiveDate, Vec<&NormalizedEvent>> {
    let mut days: BTreeMap<NaiveDate, Vec<&NormalizedEvent>> = BTreeMap::new();
    for event in events {
        days.entry(event.start.date_naive()).or_default().push(event);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::normalizer::normalize_records;
    use crate::events::platforms::PlatformRegistry;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_events() -> Vec<NormalizedEvent> {
        let objects = vec![
            json!({"id": "past", "host": "codechef.com", "start": "2024-05-20T10:00:00", "end": "2024-05-20T12:00:00"}),
            json!({"id": "now", "host": "atcoder.jp", "start": "2024-06-01T11:00:00", "end": "2024-06-01T13:00:00"}),
            json!({"id": "soon", "host": "leetcode.com", "start": "2024-06-01T14:30:00", "end": "2024-06-01T16:00:00"}),
            json!({"id": "week", "host": "codeforces.com", "start": "2024-06-02T00:00:00", "end": "2024-06-09T00:00:00"}),
            json!({"id": "a", "host": "codeforces.com", "start": "2024-06-03T14:35:00", "end": "2024-06-03T16:35:00"}),
            json!({"id": "b", "host": "codeforces.com", "start": "2024-06-04T14:35:00", "end": "2024-06-04T16:35:00"}),
            json!({"id": "c", "host": "codeforces.com", "start": "2024-06-05T14:35:00", "end": "2024-06-05T16:35:00"}),
        ];
        normalize_records(&objects, &PlatformRegistry::builtin())
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_visible_events_include_ongoing() {
        let events = sample_events();
        let visible = visible_events(&events, now());
        assert!(visible.iter().all(|e| e.id != "past"));
        assert!(visible.iter().any(|e| e.id == "now"));
        assert_eq!(visible.len(), events.len() - 1);
    }

    #[test]
    fn test_upcoming_sidebar_is_capped() {
        let events = sample_events();
        let upcoming = upcoming_events(&events, now(), UPCOMING_SIDEBAR_LEN);
        let ids: Vec<&str> = upcoming.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["now", "soon", "week-start", "a", "b"]);
    }

    #[test]
    fn test_events_on_day_and_grouping() {
        let events = sample_events();
        let june_first = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let on_day: Vec<&str> = events_on_day(&events, june_first)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(on_day, vec!["now", "soon"]);

        let days = group_by_day(&events);
        let june_eighth = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        assert_eq!(days[&june_eighth][0].id, "week-end");
        assert_eq!(days.len(), 7);
        assert!(days.keys().zip(days.keys().skip(1)).all(|(a, b)| a < b));
    }
}
