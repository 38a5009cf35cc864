use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::{
    client::RoomhubApi,
    error::RoomhubError,
    model::{Event, EventCandidate, EventFilter, NewEvent, SystemStatus},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the RoomhubApi trait that delegates to the domain service
pub struct RoomhubLocalClient {
    service: Arc<Service>,
}

impl RoomhubLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RoomhubApi for RoomhubLocalClient {
    async fn get_event(&self, id: i64) -> anyhow::Result<Event> {
        self.service.get_event(id).await.map_err(to_contract)
    }

    async fn list_events(&self, filter: EventFilter) -> anyhow::Result<Vec<Event>> {
        self.service.list_events(filter).await.map_err(to_contract)
    }

    async fn create_event(&self, new_event: NewEvent) -> anyhow::Result<Event> {
        self.service.create_event(new_event).await.map_err(to_contract)
    }

    async fn find_conflicts(
        &self,
        candidate: EventCandidate,
        exclude_id: Option<i64>,
    ) -> anyhow::Result<Vec<Event>> {
        self.service
            .find_conflicts(&candidate, exclude_id)
            .await
            .map_err(to_contract)
    }

    async fn get_system_status(&self, name: &str) -> anyhow::Result<SystemStatus> {
        self.service
            .get_system_status(name)
            .await
            .map_err(to_contract)
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn to_contract(e: DomainError) -> anyhow::Error {
    let contract_error = match e {
        DomainError::NotFound { entity, key } => RoomhubError::not_found(entity, key),
        DomainError::ScheduleConflict { conflicting_ids } => {
            RoomhubError::schedule_conflict(conflicting_ids)
        }
        DomainError::Duplicate { entity, key } => RoomhubError::duplicate(entity, key),
        e @ DomainError::Validation { .. } => RoomhubError::validation(e.to_string()),
        DomainError::Unprocessable { message } => RoomhubError::unprocessable(message),
        DomainError::Storage { .. } => RoomhubError::internal(),
    };
    anyhow::Error::new(contract_error)
}
