use super::wire::{decode_schedules, ScheduleRecord, WireSchedule};
use crate::components::calendar::models::Event;
use crate::config::Config;
use crate::error::{
    not_found_error, other_error, transport_error, validation_error, CalendarResult, Error,
};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The schedule service actor that owns the HTTP client
pub struct ScheduleServiceActor {
    config: Arc<Config>,
    client: Client,
    command_rx: mpsc::Receiver<ScheduleServiceCommand>,
}

/// Commands that can be sent to the schedule service actor
pub enum ScheduleServiceCommand {
    Ping(mpsc::Sender<CalendarResult<String>>),
    FetchAll(mpsc::Sender<CalendarResult<Vec<Event>>>),
    FetchOne(String, mpsc::Sender<CalendarResult<Event>>),
    Create(Box<Event>, mpsc::Sender<CalendarResult<Event>>),
    Delete(String, mpsc::Sender<CalendarResult<()>>),
    Shutdown,
}

/// Handle for communicating with the schedule service actor
#[derive(Clone)]
pub struct ScheduleServiceActorHandle {
    command_tx: mpsc::Sender<ScheduleServiceCommand>,
}

/// Error body the service sends with 4xx responses
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Body of the service's index route
#[derive(Debug, Deserialize)]
struct IndexBody {
    app_name: String,
}

impl ScheduleServiceActorHandle {
    /// Send a command and wait for its reply
    async fn request<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<CalendarResult<T>>) -> ScheduleServiceCommand,
    ) -> CalendarResult<T> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(build(response_tx))
            .await
            .map_err(|e| other_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| other_error("Response channel closed"))?
    }

    pub async fn ping(&self) -> CalendarResult<String> {
        self.request(ScheduleServiceCommand::Ping).await
    }

    pub async fn fetch_all(&self) -> CalendarResult<Vec<Event>> {
        self.request(ScheduleServiceCommand::FetchAll).await
    }

    pub async fn fetch_one(&self, id: &str) -> CalendarResult<Event> {
        let id = id.to_string();
        self.request(|tx| ScheduleServiceCommand::FetchOne(id, tx)).await
    }

    pub async fn create(&self, event: &Event) -> CalendarResult<Event> {
        let event = Box::new(event.clone());
        self.request(|tx| ScheduleServiceCommand::Create(event, tx)).await
    }

    pub async fn delete(&self, id: &str) -> CalendarResult<()> {
        let id = id.to_string();
        self.request(|tx| ScheduleServiceCommand::Delete(id, tx)).await
    }

    /// Shutdown the actor. Fails when it has already stopped.
    pub async fn shutdown(&self) -> CalendarResult<()> {
        self.command_tx
            .send(ScheduleServiceCommand::Shutdown)
            .await
            .map_err(|e| {
                debug!("Schedule service actor already stopped: {}", e);
                other_error("Schedule service actor already stopped")
            })
    }
}

impl ScheduleServiceActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<Config>) -> CalendarResult<(Self, ScheduleServiceActorHandle)> {
        let (command_tx, command_rx) = mpsc::channel(32);

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| transport_error(&format!("Failed to build HTTP client: {}", e)))?;

        let actor = Self {
            config,
            client,
            command_rx,
        };

        let handle = ScheduleServiceActorHandle { command_tx };

        Ok((actor, handle))
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Schedule service actor started for {}", self.config.api_url);

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                ScheduleServiceCommand::Ping(response_tx) => {
                    let _ = response_tx.send(self.ping().await).await;
                }
                ScheduleServiceCommand::FetchAll(response_tx) => {
                    let _ = response_tx.send(self.fetch_all().await).await;
                }
                ScheduleServiceCommand::FetchOne(id, response_tx) => {
                    let _ = response_tx.send(self.fetch_one(&id).await).await;
                }
                ScheduleServiceCommand::Create(event, response_tx) => {
                    let _ = response_tx.send(self.create(&event).await).await;
                }
                ScheduleServiceCommand::Delete(id, response_tx) => {
                    let _ = response_tx.send(self.delete(&id).await).await;
                }
                ScheduleServiceCommand::Shutdown => {
                    info!("Schedule service actor shutting down");
                    break;
                }
            }
        }

        info!("Schedule service actor shut down");
    }

    async fn ping(&self) -> CalendarResult<String> {
        let response = self
            .client
            .get(self.config.api_url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&format!("Failed to reach schedule service: {}", e)))?;
        let response = check_status(response, "ping").await?;
        let body: IndexBody = response
            .json()
            .await
            .map_err(|e| transport_error(&format!("Failed to parse index response: {}", e)))?;
        Ok(body.app_name)
    }

    async fn fetch_all(&self) -> CalendarResult<Vec<Event>> {
        let url = self.config.schedules_url()?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(&format!("Failed to fetch schedules: {}", e)))?;
        let response = check_status(response, "fetch schedules").await?;

        let entries: Vec<WireSchedule> = response
            .json()
            .await
            .map_err(|e| transport_error(&format!("Failed to parse schedules response: {}", e)))?;

        let total = entries.len();
        let events = decode_schedules(entries);
        debug!("Decoded {} of {} schedules", events.len(), total);
        Ok(events)
    }

    async fn fetch_one(&self, id: &str) -> CalendarResult<Event> {
        let url = self.config.schedule_url(id)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(&format!("Failed to fetch schedule {}: {}", id, e)))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(not_found_error(id));
        }
        let response = check_status(response, "fetch schedule").await?;

        // The single-schedule route may answer with a list of matching rows
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| transport_error(&format!("Failed to parse schedule response: {}", e)))?;
        let is_list = body
            .as_array()
            .is_some_and(|items| items.iter().all(|i| i.is_array() || i.is_object()));
        let entries: Vec<WireSchedule> = if is_list {
            serde_json::from_value(body)?
        } else {
            vec![serde_json::from_value(body)?]
        };

        decode_schedules(entries)
            .into_iter()
            .find(|event| event.id == id)
            .ok_or_else(|| not_found_error(id))
    }

    async fn create(&self, event: &Event) -> CalendarResult<Event> {
        let url = self.config.schedules_url()?;
        let record = ScheduleRecord::from(event);
        debug!("POST {} sid={}", url, record.sid);

        let response = self
            .client
            .post(url)
            .json(&record)
            .send()
            .await
            .map_err(|e| transport_error(&format!("Failed to create schedule: {}", e)))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(validation_error(&rejection_detail(response).await));
        }
        let response = check_status(response, "create schedule").await?;

        let created: ScheduleRecord = response
            .json()
            .await
            .map_err(|e| transport_error(&format!("Failed to parse created schedule: {}", e)))?;
        created
            .into_event()
            .ok_or_else(|| transport_error("Service returned a schedule with unreadable times"))
    }

    async fn delete(&self, id: &str) -> CalendarResult<()> {
        let url = self.config.schedule_url(id)?;
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| transport_error(&format!("Failed to delete schedule {}: {}", id, e)))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(not_found_error(id));
        }
        check_status(response, "delete schedule").await?;
        Ok(())
    }
}

/// Turn a non-success response into a transport error
async fn check_status(response: Response, action: &str) -> CalendarResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    Err(Error::Transport(format!(
        "Failed to {}: HTTP {} - {}",
        action, status, error_body
    )))
}

/// The service's `detail` message, or the raw body when it has none
async fn rejection_detail(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorDetail>(&body)
        .map(|e| e.detail)
        .unwrap_or(body)
}
