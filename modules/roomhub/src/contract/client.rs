use async_trait::async_trait;

use crate::contract::model::{
    Event, EventCandidate, EventFilter, NewEvent, SystemStatus,
};

/// In-process API of the roomhub module for other modules.
///
/// Errors are [`RoomhubError`](crate::contract::error::RoomhubError) values wrapped in `anyhow`.
#[async_trait]
pub trait RoomhubApi: Send + Sync {
    async fn get_event(&self, id: i64) -> anyhow::Result<Event>;

    async fn list_events(&self, filter: EventFilter) -> anyhow::Result<Vec<Event>>;

    /// Create an event, subject to the configured conflict policy.
    async fn create_event(&self, new_event: NewEvent) -> anyhow::Result<Event>;

    /// Existing events that collide with `candidate`, in id order.
    async fn find_conflicts(
        &self,
        candidate: EventCandidate,
        exclude_id: Option<i64>,
    ) -> anyhow::Result<Vec<Event>>;

    async fn get_system_status(&self, name: &str) -> anyhow::Result<SystemStatus>;
}
