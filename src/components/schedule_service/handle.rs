use super::actor::{ScheduleServiceActor, ScheduleServiceActorHandle};
use super::ScheduleBackend;
use crate::components::calendar::models::Event;
use crate::config::Config;
use crate::error::CalendarResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the schedule service actor
#[derive(Clone)]
pub struct ScheduleServiceHandle {
    actor_handle: ScheduleServiceActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl ScheduleServiceHandle {
    /// Create a new handle and spawn the actor on the current runtime
    pub fn new(config: Arc<Config>) -> CalendarResult<Self> {
        let (mut actor, handle) = ScheduleServiceActor::new(config)?;

        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Ok(Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        })
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> CalendarResult<()> {
        self.actor_handle.shutdown().await
    }
}

#[async_trait]
impl ScheduleBackend for ScheduleServiceHandle {
    async fn ping(&self) -> CalendarResult<String> {
        self.actor_handle.ping().await
    }

    async fn fetch_all(&self) -> CalendarResult<Vec<Event>> {
        self.actor_handle.fetch_all().await
    }

    async fn fetch_one(&self, id: &str) -> CalendarResult<Event> {
        self.actor_handle.fetch_one(id).await
    }

    async fn create(&self, event: &Event) -> CalendarResult<Event> {
        self.actor_handle.create(event).await
    }

    async fn delete(&self, id: &str) -> CalendarResult<()> {
        self.actor_handle.delete(id).await
    }
}
