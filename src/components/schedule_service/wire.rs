use crate::components::calendar::models::{Category, Event, Priority};
use crate::utils::time::{format_wire, parse_datetime};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Schedule as exchanged with the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub sid: String,
    pub name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub status: Option<f64>,
    pub creation_time: String,
    pub start_time: String,
    pub end_time: String,
}

/// The list endpoint returns raw table rows on some deployments
type ScheduleRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<f64>,
    String,
    String,
    String,
);

/// One entry of a schedules response, as an object or a positional row
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireSchedule {
    Record(ScheduleRecord),
    Row(ScheduleRow),
}

impl From<WireSchedule> for ScheduleRecord {
    fn from(wire: WireSchedule) -> Self {
        match wire {
            WireSchedule::Record(record) => record,
            WireSchedule::Row((sid, name, content, category, level, status, creation_time, start_time, end_time)) => {
                ScheduleRecord {
                    sid,
                    name,
                    content,
                    category,
                    level,
                    status,
                    creation_time,
                    start_time,
                    end_time,
                }
            }
        }
    }
}

impl From<&Event> for ScheduleRecord {
    fn from(event: &Event) -> Self {
        ScheduleRecord {
            sid: event.id.clone(),
            name: event.name.clone(),
            // The service stores content as a plain string
            content: Some(event.content.clone().unwrap_or_default()),
            category: Some(event.category.as_str().to_string()),
            level: Some(i64::from(event.priority.level())),
            status: Some(event.progress),
            creation_time: format_wire(&event.created_at),
            start_time: format_wire(&event.starts_at),
            end_time: format_wire(&event.ends_at),
        }
    }
}

impl ScheduleRecord {
    /// Convert into an event, or `None` when a timestamp is unreadable.
    ///
    /// Unknown categories and out-of-range levels degrade to defaults and the
    /// status is clamped into [0, 1].
    pub fn into_event(self) -> Option<Event> {
        let starts_at = parse_datetime(&self.start_time)?;
        let ends_at = parse_datetime(&self.end_time)?;
        // A missing creation time is not worth dropping the schedule over
        let created_at = parse_datetime(&self.creation_time).unwrap_or(starts_at);

        let progress = match self.status {
            Some(status) if status.is_finite() => status.clamp(0.0, 1.0),
            _ => 0.0,
        };

        Some(Event {
            id: self.sid,
            name: self.name,
            content: self.content.filter(|c| !c.is_empty()),
            category: self.category.as_deref().map(Category::parse).unwrap_or_default(),
            priority: Priority::from(self.level),
            progress,
            created_at,
            starts_at,
            ends_at,
        })
    }
}

/// Decode a schedules list, skipping entries with unreadable timestamps
pub fn decode_schedules(entries: Vec<WireSchedule>) -> Vec<Event> {
    entries
        .into_iter()
        .map(ScheduleRecord::from)
        .filter_map(|record| {
            let sid = record.sid.clone();
            let event = record.into_event();
            if event.is_none() {
                warn!("Skipping schedule {} with unreadable start or end time", sid);
            }
            event
        })
        .collect()
}
