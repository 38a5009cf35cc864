//! The service layer runs inside named spans and logs its decisions.

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing_test::traced_test;

use roomhub::config::ConflictPolicy;
use roomhub::contract::model::{
    Adjustment, DeviceState, Event, EventFilter, Guest, GuestFilter, NewEvent, NewSystemStatus,
    Reminder, ReminderFilter, SystemStatus, User,
};
use roomhub::domain::error::DomainError;
use roomhub::domain::repo::{
    EventsRepository, GuestsRepository, RemindersRepository, SystemStatusRepository,
    UsersRepository,
};
use roomhub::domain::service::{Service, ServiceConfig};
use roomhub::infra::storage::InMemoryStore;

fn service(policy: ConflictPolicy) -> Service {
    Service::new(
        Arc::new(InMemoryStore::new()),
        ServiceConfig {
            conflict_policy: policy,
            ..Default::default()
        },
    )
}

fn dinner(start: (u32, u32), end: (u32, u32)) -> NewEvent {
    NewEvent {
        user_id: 1,
        title: "Dinner".into(),
        description: None,
        space: "Kitchen".into(),
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0),
        is_all_day: false,
        color: None,
        attendees: vec![],
    }
}

#[traced_test]
#[tokio::test]
async fn create_event_emits_span() {
    let svc = service(ConflictPolicy::Reject);

    let created = svc.create_event(dinner((18, 0), (19, 0))).await.unwrap();

    assert_eq!(created.id, 1);
    assert!(logs_contain("roomhub.service.create_event"));
    assert!(logs_contain("Successfully created event with id=1"));
}

#[traced_test]
#[tokio::test]
async fn rejected_conflict_is_logged() {
    let svc = service(ConflictPolicy::Reject);
    svc.create_event(dinner((18, 0), (19, 0))).await.unwrap();

    let err = svc.create_event(dinner((18, 30), (19, 30))).await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::ScheduleConflict { ref conflicting_ids } if conflicting_ids == &vec![1]
    ));
    assert!(logs_contain("Rejecting event because of schedule conflict"));
    assert!(logs_contain("roomhub.service.find_conflicts"));
}

#[traced_test]
#[tokio::test]
async fn warn_policy_logs_a_warning_and_saves() {
    let svc = service(ConflictPolicy::Warn);
    svc.create_event(dinner((18, 0), (19, 0))).await.unwrap();

    let second = svc.create_event(dinner((18, 30), (19, 30))).await.unwrap();

    assert_eq!(second.id, 2);
    assert!(logs_contain("WARN"));
    assert!(logs_contain("saving anyway"));
    assert_eq!(svc.list_events(EventFilter::default()).await.unwrap().len(), 2);
}

#[traced_test]
#[tokio::test]
async fn adjust_temperature_emits_span() {
    let svc = service(ConflictPolicy::Reject);
    svc.create_system_status(NewSystemStatus {
        name: "temperature".into(),
        status: DeviceState::Operational,
        value: Some("68°F".into()),
    })
    .await
    .unwrap();

    let status = svc
        .adjust_temperature("temperature", Adjustment::Down)
        .await
        .unwrap();

    assert_eq!(status.value.as_deref(), Some("67°F"));
    assert!(logs_contain("roomhub.service.adjust_temperature"));
}

/// In-memory store whose event writes always fail.
struct BrokenEventWrites(InMemoryStore);

#[async_trait]
impl EventsRepository for BrokenEventWrites {
    async fn find_event(&self, id: i64) -> Result<Option<Event>> {
        self.0.find_event(id).await
    }
    async fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        self.0.list_events(filter).await
    }
    async fn insert_event(&self, _event: Event) -> Result<Event> {
        bail!("disk full")
    }
    async fn update_event(&self, _event: Event) -> Result<bool> {
        bail!("disk full")
    }
    async fn delete_event(&self, id: i64) -> Result<bool> {
        self.0.delete_event(id).await
    }
}

#[async_trait]
impl RemindersRepository for BrokenEventWrites {
    async fn find_reminder(&self, id: i64) -> Result<Option<Reminder>> {
        self.0.find_reminder(id).await
    }
    async fn list_reminders(&self, filter: &ReminderFilter) -> Result<Vec<Reminder>> {
        self.0.list_reminders(filter).await
    }
    async fn insert_reminder(&self, reminder: Reminder) -> Result<Reminder> {
        self.0.insert_reminder(reminder).await
    }
    async fn update_reminder(&self, reminder: Reminder) -> Result<bool> {
        self.0.update_reminder(reminder).await
    }
    async fn delete_reminder(&self, id: i64) -> Result<bool> {
        self.0.delete_reminder(id).await
    }
}

#[async_trait]
impl GuestsRepository for BrokenEventWrites {
    async fn find_guest(&self, id: i64) -> Result<Option<Guest>> {
        self.0.find_guest(id).await
    }
    async fn list_guests(&self, filter: &GuestFilter) -> Result<Vec<Guest>> {
        self.0.list_guests(filter).await
    }
    async fn insert_guest(&self, guest: Guest) -> Result<Guest> {
        self.0.insert_guest(guest).await
    }
    async fn update_guest(&self, guest: Guest) -> Result<bool> {
        self.0.update_guest(guest).await
    }
    async fn delete_guest(&self, id: i64) -> Result<bool> {
        self.0.delete_guest(id).await
    }
}

#[async_trait]
impl SystemStatusRepository for BrokenEventWrites {
    async fn find_status(&self, name: &str) -> Result<Option<SystemStatus>> {
        self.0.find_status(name).await
    }
    async fn list_statuses(&self) -> Result<Vec<SystemStatus>> {
        self.0.list_statuses().await
    }
    async fn insert_status(&self, status: SystemStatus) -> Result<SystemStatus> {
        self.0.insert_status(status).await
    }
    async fn update_status(&self, status: SystemStatus) -> Result<bool> {
        self.0.update_status(status).await
    }
}

#[async_trait]
impl UsersRepository for BrokenEventWrites {
    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        self.0.find_user(id).await
    }
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.0.find_user_by_username(username).await
    }
    async fn insert_user(&self, user: User) -> Result<User> {
        self.0.insert_user(user).await
    }
}

#[traced_test]
#[tokio::test]
async fn storage_failure_becomes_storage_error() {
    let svc = Service::new(
        Arc::new(BrokenEventWrites(InMemoryStore::new())),
        ServiceConfig::default(),
    );

    let err = svc.create_event(dinner((8, 0), (9, 0))).await.unwrap_err();

    match err {
        DomainError::Storage { message } => assert!(message.contains("disk full")),
        other => panic!("expected storage error, got {other:?}"),
    }
    assert!(logs_contain("roomhub.service.create_event"));
}
