//! Read-only queries over the held events.

use super::models::{Category, Event};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::collections::BTreeMap;

/// Events starting within `days` days from `now`, both ends inclusive,
/// optionally limited to one category. Ordered by start time then id.
pub fn upcoming<'a>(
    events: &'a [Event],
    now: NaiveDateTime,
    days: u32,
    category: Option<&Category>,
) -> Vec<&'a Event> {
    let until = TimeDelta::try_days(i64::from(days))
        .and_then(|span| now.checked_add_signed(span))
        .unwrap_or(NaiveDateTime::MAX);

    sorted(
        events
            .iter()
            .filter(|e| e.starts_at >= now && e.starts_at <= until)
            .filter(|e| category.map_or(true, |c| &e.category == c))
            .collect(),
    )
}

/// Events whose name or description contains `text`, ignoring case
pub fn search<'a>(events: &'a [Event], text: &str) -> Vec<&'a Event> {
    let needle = text.trim().to_lowercase();
    sorted(
        events
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle)
                    || e.content
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .collect(),
    )
}

/// Events starting on the given date
pub fn on_date(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    sorted(events.iter().filter(|e| e.starts_at.date() == date).collect())
}

fn sorted(mut events: Vec<&Event>) -> Vec<&Event> {
    events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));
    events
}

/// How busy the calendar is overall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Low => "Low",
            ActivityLevel::Medium => "Medium",
            ActivityLevel::High => "High",
        }
    }
}

/// Totals over a set of events
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarStats {
    pub total: usize,
    /// Progress at 1.0
    pub completed: usize,
    /// Progress strictly between 0.0 and 1.0
    pub in_progress: usize,
    /// Progress at 0.0
    pub pending: usize,
    /// Event count per category name, sorted by name
    pub by_category: BTreeMap<String, usize>,
}

impl CalendarStats {
    /// Share of completed events in percent; 0 for an empty calendar
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    pub fn activity_level(&self) -> ActivityLevel {
        match self.total {
            n if n > 50 => ActivityLevel::High,
            n if n > 20 => ActivityLevel::Medium,
            _ => ActivityLevel::Low,
        }
    }
}

pub fn statistics(events: &[Event]) -> CalendarStats {
    let mut stats = CalendarStats {
        total: events.len(),
        completed: 0,
        in_progress: 0,
        pending: 0,
        by_category: BTreeMap::new(),
    };

    for event in events {
        if event.progress >= 1.0 {
            stats.completed += 1;
        } else if event.progress > 0.0 {
            stats.in_progress += 1;
        } else {
            stats.pending += 1;
        }
        *stats
            .by_category
            .entry(event.category.as_str().to_string())
            .or_default() += 1;
    }

    stats
}
