use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::bail;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::contract::model::{
    Event, EventFilter, Guest, GuestFilter, Reminder, ReminderFilter, SystemStatus, User,
};
use crate::domain::repo::{
    EventsRepository, GuestsRepository, RemindersRepository, SystemStatusRepository,
    UsersRepository,
};

/// Records that carry a store-assigned integer id.
trait Keyed: Clone {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

macro_rules! keyed {
    ($($ty:ty),+) => {
        $(impl Keyed for $ty {
            fn id(&self) -> i64 {
                self.id
            }
            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        })+
    };
}

keyed!(Event, Reminder, Guest, SystemStatus, User);

/// One collection: rows ordered by id plus its own id sequence starting at 1.
struct Table<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    next_id: AtomicI64,
}

impl<T: Keyed> Table<T> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.read().get(&id).cloned()
    }

    fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().values().find(|r| pred(r)).cloned()
    }

    fn list(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.read().values().filter(|r| pred(r)).cloned().collect()
    }

    fn insert(&self, mut row: T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        row.set_id(id);
        self.rows.write().insert(id, row.clone());
        row
    }

    fn replace(&self, row: T) -> bool {
        match self.rows.write().get_mut(&row.id()) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    fn remove(&self, id: i64) -> bool {
        self.rows.write().remove(&id).is_some()
    }
}

/// Process-lifetime in-memory store. Each collection has its own lock.
pub struct InMemoryStore {
    events: Table<Event>,
    reminders: Table<Reminder>,
    guests: Table<Guest>,
    statuses: Table<SystemStatus>,
    users: Table<User>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            events: Table::new(),
            reminders: Table::new(),
            guests: Table::new(),
            statuses: Table::new(),
            users: Table::new(),
        }
    }
}

#[async_trait]
impl EventsRepository for InMemoryStore {
    async fn find_event(&self, id: i64) -> anyhow::Result<Option<Event>> {
        Ok(self.events.get(id))
    }

    async fn list_events(&self, filter: &EventFilter) -> anyhow::Result<Vec<Event>> {
        Ok(self.events.list(|e| filter.matches(e)))
    }

    async fn insert_event(&self, event: Event) -> anyhow::Result<Event> {
        Ok(self.events.insert(event))
    }

    async fn update_event(&self, event: Event) -> anyhow::Result<bool> {
        Ok(self.events.replace(event))
    }

    async fn delete_event(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.events.remove(id))
    }
}

#[async_trait]
impl RemindersRepository for InMemoryStore {
    async fn find_reminder(&self, id: i64) -> anyhow::Result<Option<Reminder>> {
        Ok(self.reminders.get(id))
    }

    async fn list_reminders(&self, filter: &ReminderFilter) -> anyhow::Result<Vec<Reminder>> {
        Ok(self.reminders.list(|r| filter.matches(r)))
    }

    async fn insert_reminder(&self, reminder: Reminder) -> anyhow::Result<Reminder> {
        Ok(self.reminders.insert(reminder))
    }

    async fn update_reminder(&self, reminder: Reminder) -> anyhow::Result<bool> {
        Ok(self.reminders.replace(reminder))
    }

    async fn delete_reminder(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.reminders.remove(id))
    }
}

#[async_trait]
impl GuestsRepository for InMemoryStore {
    async fn find_guest(&self, id: i64) -> anyhow::Result<Option<Guest>> {
        Ok(self.guests.get(id))
    }

    async fn list_guests(&self, filter: &GuestFilter) -> anyhow::Result<Vec<Guest>> {
        Ok(self.guests.list(|g| filter.matches(g)))
    }

    async fn insert_guest(&self, guest: Guest) -> anyhow::Result<Guest> {
        Ok(self.guests.insert(guest))
    }

    async fn update_guest(&self, guest: Guest) -> anyhow::Result<bool> {
        Ok(self.guests.replace(guest))
    }

    async fn delete_guest(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.guests.remove(id))
    }
}

#[async_trait]
impl SystemStatusRepository for InMemoryStore {
    async fn find_status(&self, name: &str) -> anyhow::Result<Option<SystemStatus>> {
        Ok(self.statuses.find(|s| s.name == name))
    }

    async fn list_statuses(&self) -> anyhow::Result<Vec<SystemStatus>> {
        Ok(self.statuses.list(|_| true))
    }

    async fn insert_status(&self, status: SystemStatus) -> anyhow::Result<SystemStatus> {
        if self.statuses.find(|s| s.name == status.name).is_some() {
            bail!("system status '{}' already exists", status.name);
        }
        Ok(self.statuses.insert(status))
    }

    async fn update_status(&self, status: SystemStatus) -> anyhow::Result<bool> {
        match self.statuses.find(|s| s.name == status.name) {
            Some(existing) => Ok(self.statuses.replace(SystemStatus {
                id: existing.id,
                ..status
            })),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UsersRepository for InMemoryStore {
    async fn find_user(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.users.get(id))
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.find(|u| u.username == username))
    }

    async fn insert_user(&self, user: User) -> anyhow::Result<User> {
        if self.users.find(|u| u.username == user.username).is_some() {
            bail!("user '{}' already exists", user.username);
        }
        Ok(self.users.insert(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{DeviceState, Priority, DEFAULT_EVENT_COLOR};
    use chrono::{NaiveDate, Utc};

    fn event(space: &str, day: u32) -> Event {
        Event {
            id: 0,
            user_id: 1,
            title: "Chores".into(),
            description: None,
            space: space.into(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            start_time: None,
            end_time: None,
            is_all_day: true,
            color: DEFAULT_EVENT_COLOR.into(),
            attendees: vec![],
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase_per_collection() {
        let store = InMemoryStore::new();
        let a = store.insert_event(event("Kitchen", 1)).await.unwrap();
        let b = store.insert_event(event("Kitchen", 2)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let r = store
            .insert_reminder(Reminder {
                id: 42,
                user_id: 1,
                text: "bins".into(),
                from_user: "A".into(),
                priority: Priority::High,
                completed: false,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(r.id, 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let a = store.insert_event(event("Kitchen", 1)).await.unwrap();
        assert!(store.delete_event(a.id).await.unwrap());
        assert!(!store.delete_event(a.id).await.unwrap());
        let b = store.insert_event(event("Kitchen", 1)).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn list_filters_and_keeps_id_order() {
        let store = InMemoryStore::new();
        for (space, day) in [("Kitchen", 2), ("Bathroom", 1), ("Kitchen", 1)] {
            store.insert_event(event(space, day)).await.unwrap();
        }
        let kitchen = store
            .list_events(&EventFilter {
                space: Some("Kitchen".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(kitchen.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test]
    async fn update_of_missing_row_reports_false() {
        let store = InMemoryStore::new();
        let mut ghost = event("Kitchen", 1);
        ghost.id = 7;
        assert!(!store.update_event(ghost).await.unwrap());
    }

    #[tokio::test]
    async fn status_names_are_unique() {
        let store = InMemoryStore::new();
        let status = SystemStatus {
            id: 0,
            name: "temperature".into(),
            status: DeviceState::Operational,
            value: Some("72°F".into()),
            last_updated: Utc::now(),
        };
        store.insert_status(status.clone()).await.unwrap();
        assert!(store.insert_status(status.clone()).await.is_err());

        let updated = SystemStatus {
            value: Some("73°F".into()),
            ..status
        };
        assert!(store.update_status(updated).await.unwrap());
        let stored = store.find_status("temperature").await.unwrap().unwrap();
        assert_eq!(stored.id, 1);
        assert_eq!(stored.value.as_deref(), Some("73°F"));
    }
}
