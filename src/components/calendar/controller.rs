use super::bucket::{bucket, DayBucket};
use super::models::{Category, Event, EventDraft};
use super::query::{self, CalendarStats};
use super::selection::SelectionController;
use super::store::EventStore;
use crate::components::schedule_service::ScheduleBackend;
use crate::config::Config;
use crate::error::{not_found_error, validation_error, CalendarResult, Error};
use crate::utils::time::{is_displayable_month, month_name, now_in, shift_month};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

/// Top-level orchestrator of the month view.
///
/// Owns the active month and year, the event store and the selection, and is
/// the only place where user intent turns into store operations.
pub struct CalendarController<B> {
    config: Arc<Config>,
    store: EventStore<B>,
    selection: SelectionController,
    /// Zero-based month
    month: u32,
    year: i32,
    form_open: bool,
}

impl<B: ScheduleBackend> CalendarController<B> {
    /// Controller positioned on the current month in the configured timezone
    pub fn new(config: Arc<Config>, backend: B) -> Self {
        let today = now_in(&config.timezone).date();
        Self::starting_at(config, backend, today.month0(), today.year())
    }

    /// Controller positioned on an explicit zero-based month
    pub fn starting_at(config: Arc<Config>, backend: B, month: u32, year: i32) -> Self {
        let store = EventStore::new(backend, config.timezone);
        Self {
            config,
            store,
            selection: SelectionController::new(),
            month: month % 12,
            year,
            form_open: false,
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// e.g. "March 2024"
    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &EventStore<B> {
        &self.store
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Reload the store and drop a selection whose event disappeared
    pub async fn reload(&mut self) -> CalendarResult<()> {
        let result = self.store.load().await.map(|events| events.len());
        self.selection.reconcile(self.store.events());
        match result {
            Ok(count) => {
                info!("{}: {} schedules held", self.title(), count);
                Ok(())
            }
            Err(e) => {
                error!("Failed to reload schedules for {}: {}", self.title(), e);
                Err(e)
            }
        }
    }

    /// Move the active month by `delta`, wrapping around the year, and reload
    pub async fn navigate(&mut self, delta: i32) -> CalendarResult<()> {
        let (month, year) = shift_month(self.month, self.year, delta)
            .filter(|(month, year)| is_displayable_month(*month, *year))
            .ok_or_else(|| out_of_range(delta))?;
        self.month = month;
        self.year = year;
        info!("Navigated to {}", self.title());
        self.reload().await
    }

    /// Jump to an explicit zero-based month and reload
    pub async fn goto(&mut self, month: u32, year: i32) -> CalendarResult<()> {
        if !is_displayable_month(month, year) {
            return Err(validation_error(&format!(
                "{}-{:02} is outside the supported calendar range",
                year,
                month.saturating_add(1)
            )));
        }
        self.month = month;
        self.year = year;
        info!("Jumped to {}", self.title());
        self.reload().await
    }

    /// Day buckets of the active month
    pub fn buckets(&self) -> BTreeMap<u32, DayBucket<'_>> {
        bucket(self.store.events(), self.month, self.year)
    }

    /// Open the detail view for an event held by the store
    pub fn select(&mut self, id: &str) -> CalendarResult<&Event> {
        let event = self.store.get(id).ok_or_else(|| not_found_error(id))?;
        self.selection.select(event);
        Ok(event)
    }

    pub fn dismiss(&mut self) {
        self.selection.dismiss();
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn open_form(&mut self) -> CalendarResult<()> {
        if !self.config.enable_create {
            return Err(Error::FeatureDisabled("create"));
        }
        self.form_open = true;
        Ok(())
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    /// Create an event and close the creation form on success
    pub async fn submit_new_event(&mut self, draft: EventDraft) -> CalendarResult<Event> {
        if !self.config.enable_create {
            return Err(Error::FeatureDisabled("create"));
        }
        let created = self.store.create(draft).await.inspect_err(|e| {
            error!("Failed to create schedule: {}", e);
        })?;
        self.close_form();
        Ok(created)
    }

    /// Delete an event, closing the detail view if it showed that event
    pub async fn request_delete(&mut self, id: &str) -> CalendarResult<()> {
        if !self.config.enable_delete {
            return Err(Error::FeatureDisabled("delete"));
        }
        let result = self.store.delete(id).await;
        if result.is_ok() && self.selection.is_selected(id) {
            self.selection.dismiss();
        }
        self.selection.reconcile(self.store.events());
        result.inspect_err(|e| {
            error!("Failed to delete schedule {}: {}", id, e);
        })
    }

    /// Held events starting in the next `days` days
    pub fn upcoming(&self, days: u32, category: Option<&Category>) -> Vec<&Event> {
        let now = now_in(&self.config.timezone);
        query::upcoming(self.store.events(), now, days, category)
    }

    pub fn search(&self, text: &str) -> Vec<&Event> {
        query::search(self.store.events(), text)
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        query::on_date(self.store.events(), date)
    }

    pub fn statistics(&self) -> CalendarStats {
        query::statistics(self.store.events())
    }

    /// Look up a single schedule directly on the service
    pub async fn remote(&self, id: &str) -> CalendarResult<Event> {
        self.store.backend().fetch_one(id).await
    }

    /// Application name reported by the service
    pub async fn ping(&self) -> CalendarResult<String> {
        self.store.backend().ping().await
    }
}

fn out_of_range(delta: i32) -> Error {
    validation_error(&format!("moving {} months leaves the supported calendar range", delta))
}
