use async_trait::async_trait;
use chrono::NaiveDateTime;
use redwood_calendar::components::calendar::models::{Category, Event, EventDraft};
use redwood_calendar::components::ScheduleBackend;
use redwood_calendar::config::Config;
use redwood_calendar::error::{not_found_error, transport_error, CalendarResult};
use redwood_calendar::utils::time::parse_datetime;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory stand-in for the schedule service
#[derive(Clone, Default)]
pub struct MockScheduleBackend {
    schedules: Arc<Mutex<Vec<Event>>>,
    fail_fetch: Arc<AtomicBool>,
    fail_create: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
    fetch_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockScheduleBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock pre-filled with schedules
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            schedules: Arc::new(Mutex::new(events)),
            ..Self::default()
        }
    }

    pub async fn schedules(&self) -> Vec<Event> {
        self.schedules.lock().await.clone()
    }

    /// Change the service side without going through the client
    pub async fn insert(&self, event: Event) {
        self.schedules.lock().await.push(event);
    }

    pub async fn remove(&self, id: &str) {
        self.schedules.lock().await.retain(|e| e.id != id);
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleBackend for MockScheduleBackend {
    async fn ping(&self) -> CalendarResult<String> {
        Ok("Mock Schedule Service".to_string())
    }

    async fn fetch_all(&self) -> CalendarResult<Vec<Event>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(transport_error("service unreachable"));
        }
        Ok(self.schedules.lock().await.clone())
    }

    async fn fetch_one(&self, id: &str) -> CalendarResult<Event> {
        self.schedules
            .lock()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| not_found_error(id))
    }

    async fn create(&self, event: &Event) -> CalendarResult<Event> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(transport_error("HTTP 500"));
        }
        self.schedules.lock().await.push(event.clone());
        Ok(event.clone())
    }

    async fn delete(&self, id: &str) -> CalendarResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(transport_error("HTTP 500"));
        }
        let mut schedules = self.schedules.lock().await;
        let before = schedules.len();
        schedules.retain(|e| e.id != id);
        if schedules.len() == before {
            return Err(not_found_error(id));
        }
        Ok(())
    }
}

#[allow(dead_code)]
pub fn at(raw: &str) -> NaiveDateTime {
    parse_datetime(raw).unwrap()
}

/// A valid draft on the given start, one hour long
#[allow(dead_code)]
pub fn draft(name: &str, category: Category, start: &str) -> EventDraft {
    let starts_at = at(start);
    EventDraft::new(name, starts_at, starts_at + chrono::Duration::hours(1)).with_category(category)
}

/// An event as the service would hold it
#[allow(dead_code)]
pub fn event(id: &str, name: &str, category: Category, start: &str, end: &str) -> Event {
    let draft = EventDraft::new(name, at(start), at(end)).with_category(category);
    Event::from_draft(id.to_string(), at("2024-01-01 00:00"), draft).unwrap()
}

/// Configuration with everything at its default except the given keys
#[allow(dead_code)]
pub fn config_with(overrides: &[(&str, &str)]) -> Arc<Config> {
    let overrides: Vec<(String, String)> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = Config::from_lookup(|key| {
        overrides
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap();
    Arc::new(config)
}
