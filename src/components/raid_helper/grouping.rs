use super::models::{Aggregation, DayGroup, RaidEvent, Schedule};
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::collections::BTreeMap;

/// Bucket events into calendar-day groups in the given display timezone.
///
/// A group's date is the event's start instant converted to `tz`; an event
/// exactly at local midnight belongs to that day, not the previous one.
/// Groups come out ascending by date, events within a group ascending by
/// start instant with the event id as tie-break. Days without events do not
/// appear.
pub fn group_by_day(events: Vec<RaidEvent>, tz: Tz) -> Vec<DayGroup> {
    let mut by_day: BTreeMap<NaiveDate, Vec<RaidEvent>> = BTreeMap::new();

    for event in events {
        let local_date = event.start_time.with_timezone(&tz).date_naive();
        by_day.entry(local_date).or_default().push(event);
    }

    by_day
        .into_iter()
        .map(|(date, mut events)| {
            events.sort_by(|a, b| {
                a.start_time
                    .cmp(&b.start_time)
                    .then_with(|| a.id.cmp(&b.id))
            });
            DayGroup { date, events }
        })
        .collect()
}

/// Assemble the final schedule from a pre-grouping aggregation
pub fn build_schedule(aggregation: Aggregation, tz: Tz) -> Schedule {
    Schedule {
        groups: group_by_day(aggregation.events, tz),
        errors: aggregation.errors,
        skipped: aggregation.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    fn make_event(id: &str, y: i32, mo: u32, d: u32, h: u32, min: u32) -> RaidEvent {
        RaidEvent {
            id: id.to_string(),
            title: format!("Raid {}", id),
            start_time: Utc.with_ymd_and_hms(y, mo, d, h, min, 0).unwrap(),
            server_id: "S1".to_string(),
            server_name: None,
            leader: None,
            description: None,
            signup_count: None,
            channel_name: None,
            raw: serde_json::Value::Null,
        }
    }

    #[test]
    fn groups_are_ascending_and_events_sorted_within() {
        let events = vec![
            make_event("late", 2024, 6, 11, 20, 0),
            make_event("early", 2024, 6, 10, 9, 0),
            make_event("noon", 2024, 6, 10, 12, 0),
        ];

        let groups = group_by_day(events, Tz::UTC);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(groups[1].date, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
        assert!(groups[0].date < groups[1].date);

        let ids: Vec<_> = groups[0].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "noon"]);
    }

    #[test]
    fn simultaneous_events_tie_break_by_id() {
        let events = vec![
            make_event("b", 2024, 6, 10, 20, 0),
            make_event("a", 2024, 6, 10, 20, 0),
        ];

        let groups = group_by_day(events, Tz::UTC);
        let ids: Vec<_> = groups[0].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn midnight_event_belongs_to_its_own_day() {
        let events = vec![make_event("midnight", 2024, 6, 10, 0, 0)];

        let groups = group_by_day(events, Tz::UTC);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    }

    #[test]
    fn grouping_uses_the_display_timezone() {
        // 22:00 UTC on June 9th is already June 10th, 00:00 in Prague (CEST)
        let events = vec![make_event("midnight-local", 2024, 6, 9, 22, 0)];
        let prague: Tz = "Europe/Prague".parse().unwrap();

        let groups = group_by_day(events.clone(), prague);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());

        // The same instant stays on June 9th in UTC
        let groups = group_by_day(events, Tz::UTC);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
    }

    #[test]
    fn only_days_with_events_appear() {
        let events = vec![
            make_event("1", 2024, 6, 10, 20, 0),
            make_event("2", 2024, 6, 14, 20, 0),
        ];

        let groups = group_by_day(events, Tz::UTC);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn build_schedule_is_deterministic() {
        let aggregation = Aggregation {
            events: vec![
                make_event("2", 2024, 6, 10, 21, 0),
                make_event("1", 2024, 6, 10, 20, 0),
            ],
            errors: Default::default(),
            skipped: 1,
        };

        let first = build_schedule(aggregation.clone(), Tz::UTC);
        let second = build_schedule(aggregation, Tz::UTC);
        assert_eq!(first, second);
        assert_eq!(first.skipped, 1);
        assert_eq!(first.event_count(), 2);
    }
}
