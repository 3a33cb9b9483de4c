mod actor;
mod handle;
pub mod wire;

pub use handle::ScheduleServiceHandle;

use crate::components::calendar::models::Event;
use crate::error::CalendarResult;
use async_trait::async_trait;

/// The remote schedule service as seen by the event store
#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// Health check; returns the service's application name
    async fn ping(&self) -> CalendarResult<String>;

    /// Fetch every schedule the service knows about
    async fn fetch_all(&self) -> CalendarResult<Vec<Event>>;

    /// Fetch a single schedule
    async fn fetch_one(&self, id: &str) -> CalendarResult<Event>;

    /// Store a new schedule and return the service's representation of it
    async fn create(&self, event: &Event) -> CalendarResult<Event>;

    /// Remove a schedule
    async fn delete(&self, id: &str) -> CalendarResult<()>;
}
