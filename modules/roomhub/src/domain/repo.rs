use async_trait::async_trait;

use crate::contract::model::{
    Event, EventFilter, Guest, GuestFilter, Reminder, ReminderFilter, SystemStatus, User,
};

// Ports for the domain layer: persistence operations the domain needs.
// Object-safe and async-friendly via `async_trait`. The service validates and
// fills in defaults; the store assigns ids and persists.

#[async_trait]
pub trait EventsRepository: Send + Sync {
    async fn find_event(&self, id: i64) -> anyhow::Result<Option<Event>>;
    /// Matching events in id order.
    async fn list_events(&self, filter: &EventFilter) -> anyhow::Result<Vec<Event>>;
    /// Persist `event` under a fresh id (the incoming `id` is ignored).
    async fn insert_event(&self, event: Event) -> anyhow::Result<Event>;
    /// Replace the stored record with the same id. Returns false if it does not exist.
    async fn update_event(&self, event: Event) -> anyhow::Result<bool>;
    /// Returns true if a record was deleted.
    async fn delete_event(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait RemindersRepository: Send + Sync {
    async fn find_reminder(&self, id: i64) -> anyhow::Result<Option<Reminder>>;
    async fn list_reminders(&self, filter: &ReminderFilter) -> anyhow::Result<Vec<Reminder>>;
    async fn insert_reminder(&self, reminder: Reminder) -> anyhow::Result<Reminder>;
    async fn update_reminder(&self, reminder: Reminder) -> anyhow::Result<bool>;
    async fn delete_reminder(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait GuestsRepository: Send + Sync {
    async fn find_guest(&self, id: i64) -> anyhow::Result<Option<Guest>>;
    async fn list_guests(&self, filter: &GuestFilter) -> anyhow::Result<Vec<Guest>>;
    async fn insert_guest(&self, guest: Guest) -> anyhow::Result<Guest>;
    async fn update_guest(&self, guest: Guest) -> anyhow::Result<bool>;
    async fn delete_guest(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait SystemStatusRepository: Send + Sync {
    async fn find_status(&self, name: &str) -> anyhow::Result<Option<SystemStatus>>;
    async fn list_statuses(&self) -> anyhow::Result<Vec<SystemStatus>>;
    /// Fails if a status with the same name already exists.
    async fn insert_status(&self, status: SystemStatus) -> anyhow::Result<SystemStatus>;
    /// Replace the status with the same name. Returns false if it does not exist.
    async fn update_status(&self, status: SystemStatus) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_user(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn insert_user(&self, user: User) -> anyhow::Result<User>;
}

/// Everything the roomhub service persists, behind one handle.
pub trait RoomhubStore:
    EventsRepository + RemindersRepository + GuestsRepository + SystemStatusRepository + UsersRepository
{
}

impl<T> RoomhubStore for T where
    T: EventsRepository
        + RemindersRepository
        + GuestsRepository
        + SystemStatusRepository
        + UsersRepository
{
}
