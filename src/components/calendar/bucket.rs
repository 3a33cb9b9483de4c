use super::models::Event;
use crate::utils::time::days_in_month;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Events of one calendar day, ordered by start time then id
pub type DayBucket<'a> = Vec<&'a Event>;

/// Assign events to the day cells of a zero-based month.
///
/// Every day of the month is present in the result, empty days included.
/// Events starting outside the month are left out. An out-of-range month
/// yields an empty map.
pub fn bucket(events: &[Event], month: u32, year: i32) -> BTreeMap<u32, DayBucket<'_>> {
    let Some(day_count) = days_in_month(month, year) else {
        return BTreeMap::new();
    };

    let mut buckets: BTreeMap<u32, DayBucket<'_>> = (1..=day_count).map(|day| (day, Vec::new())).collect();

    for event in events {
        let start = event.starts_at;
        if start.year() != year || start.month0() != month {
            continue;
        }
        if let Some(day) = buckets.get_mut(&start.day()) {
            day.push(event);
        }
    }

    for day in buckets.values_mut() {
        day.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::calendar::models::{Category, Priority};
    use crate::utils::time::parse_datetime;

    fn event(id: &str, start: &str) -> Event {
        let starts_at = parse_datetime(start).unwrap();
        Event {
            id: id.to_string(),
            name: format!("Event {}", id),
            content: None,
            category: Category::Lecture,
            priority: Priority::Low,
            progress: 0.0,
            created_at: starts_at,
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(1),
        }
    }

    fn ids(bucket: &DayBucket<'_>) -> Vec<String> {
        bucket.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_every_day_has_a_bucket() {
        for year in [1900, 2023, 2024, 2100] {
            for month in 0..12 {
                let buckets = bucket(&[], month, year);
                let expected = days_in_month(month, year).unwrap();
                assert_eq!(buckets.len() as u32, expected, "{}-{}", year, month + 1);
                assert_eq!(buckets.keys().next(), Some(&1));
                assert_eq!(buckets.keys().last(), Some(&expected));
                assert!(buckets.values().all(|b| b.is_empty()));
            }
        }
    }

    #[test]
    fn test_leap_day() {
        let events = vec![event("1", "2024-02-29 12:00")];
        let buckets = bucket(&events, 1, 2024);
        assert_eq!(buckets.len(), 29);
        assert_eq!(ids(&buckets[&29]), vec!["1"]);
    }

    #[test]
    fn test_only_matching_month_and_year() {
        let events = vec![
            event("march", "2024-03-15 09:00"),
            event("april", "2024-04-15 09:00"),
            event("last-year", "2023-03-15 09:00"),
            event("month-end", "2024-03-31 23:59"),
            event("next-month-start", "2024-04-01 00:00"),
        ];
        let buckets = bucket(&events, 2, 2024);

        assert_eq!(ids(&buckets[&15]), vec!["march"]);
        assert_eq!(ids(&buckets[&31]), vec!["month-end"]);
        let total: usize = buckets.values().map(|b| b.len()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_bucket_ordering() {
        let events = vec![
            event("c", "2024-03-15 14:00"),
            event("b", "2024-03-15 09:00"),
            event("a", "2024-03-15 09:00"),
            event("d", "2024-03-15 08:30"),
        ];
        let buckets = bucket(&events, 2, 2024);
        assert_eq!(ids(&buckets[&15]), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_invalid_month() {
        let events = vec![event("1", "2024-03-15 09:00")];
        assert!(bucket(&events, 12, 2024).is_empty());
    }
}
