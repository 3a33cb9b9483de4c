use super::models::{Event, EventDraft};
use crate::components::schedule_service::ScheduleBackend;
use crate::error::{not_found_error, transport_error, CalendarResult, Error};
use crate::utils::time::now_in;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Sequence number of an issued load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// What happened to a completed load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced with this many events
    Applied(usize),
    /// A newer load was issued meanwhile; the result was discarded
    Stale,
}

/// Generates client-side schedule ids from the millisecond clock.
///
/// Ids never repeat within a process, even when two are requested in the
/// same millisecond.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn next_id(&mut self) -> String {
        let id = Utc::now().timestamp_millis().max(self.last + 1);
        self.last = id;
        id.to_string()
    }
}

/// Authoritative in-memory collection of events for the active view.
///
/// All mutation goes through `load`, `create` and `delete`; every failure
/// leaves the collection as it was.
pub struct EventStore<B> {
    backend: B,
    events: Vec<Event>,
    timezone: Tz,
    ids: IdGenerator,
    issued: u64,
}

impl<B: ScheduleBackend> EventStore<B> {
    pub fn new(backend: B, timezone: Tz) -> Self {
        Self {
            backend,
            events: Vec::new(),
            timezone,
            ids: IdGenerator::default(),
            issued: 0,
        }
    }

    /// The current collection
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the collection with everything the service holds
    pub async fn load(&mut self) -> CalendarResult<&[Event]> {
        let ticket = self.begin_load();
        let result = self.backend.fetch_all().await;
        self.complete_load(ticket, result)?;
        Ok(&self.events)
    }

    /// Issue a new load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        debug!("Issued load #{}", self.issued);
        LoadTicket(self.issued)
    }

    /// Apply the result of a load if its ticket is still the latest one.
    ///
    /// Stale results are dropped whether they succeeded or failed.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: CalendarResult<Vec<Event>>,
    ) -> CalendarResult<LoadOutcome> {
        if ticket.0 != self.issued {
            debug!("Discarding load #{}, latest is #{}", ticket.0, self.issued);
            return Ok(LoadOutcome::Stale);
        }

        let fetched = match result {
            Ok(events) => events,
            Err(e) => {
                warn!("Failed to load schedules, keeping {} held events: {}", self.events.len(), e);
                return Err(e);
            }
        };

        let mut seen = HashSet::new();
        let mut events = Vec::with_capacity(fetched.len());
        for event in fetched {
            if seen.insert(event.id.clone()) {
                events.push(event);
            } else {
                warn!("Ignoring duplicate schedule id {}", event.id);
            }
        }

        info!("Loaded {} schedules", events.len());
        self.events = events;
        Ok(LoadOutcome::Applied(self.events.len()))
    }

    /// Create an event from a draft, stamped with a fresh id and the current time
    pub async fn create(&mut self, draft: EventDraft) -> CalendarResult<Event> {
        let created_at = now_in(&self.timezone);
        self.create_at(draft, created_at).await
    }

    /// Create an event with an explicit creation time
    pub async fn create_at(&mut self, draft: EventDraft, created_at: NaiveDateTime) -> CalendarResult<Event> {
        draft.validate()?;

        let mut id = self.ids.next_id();
        while self.contains(&id) {
            id = self.ids.next_id();
        }
        let event = Event::from_draft(id, created_at, draft)?;

        let created = self.backend.create(&event).await?;
        if created.id.is_empty() {
            return Err(transport_error("Service returned a schedule without an id"));
        }

        info!("Created schedule {} ({})", created.id, created.name);
        match self.events.iter_mut().find(|e| e.id == created.id) {
            Some(existing) => *existing = created.clone(),
            None => self.events.push(created.clone()),
        }
        Ok(created)
    }

    /// Delete an event held in the collection. A remote not-found still drops the local copy.
    pub async fn delete(&mut self, id: &str) -> CalendarResult<()> {
        if !self.contains(id) {
            return Err(not_found_error(id));
        }

        match self.backend.delete(id).await {
            Ok(()) => {
                self.events.retain(|e| e.id != id);
                info!("Deleted schedule {}", id);
                Ok(())
            }
            Err(Error::NotFound(missing)) => {
                // Already gone on the service, so the local copy is stale
                warn!("Schedule {} was already removed remotely, dropping local copy", id);
                self.events.retain(|e| e.id != id);
                Err(Error::NotFound(missing))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator_is_strictly_increasing() {
        let mut ids = IdGenerator::default();
        let generated: Vec<i64> = (0..100).map(|_| ids.next_id().parse().unwrap()).collect();
        assert!(generated.windows(2).all(|w| w[0] < w[1]));
    }
}
