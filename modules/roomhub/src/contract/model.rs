use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Color applied to events created without one.
pub const DEFAULT_EVENT_COLOR: &str = "#7A8450";

/// Shared-calendar reservation of a household space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub space: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_all_day: bool,
    pub color: String,
    pub attendees: Vec<String>,
}

/// Data for creating a new event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub space: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_all_day: bool,
    pub color: Option<String>,
    pub attendees: Vec<String>,
}

/// Partial update data for an event. `None` leaves the field unchanged;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventPatch {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub space: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<Option<NaiveTime>>,
    pub end_time: Option<Option<NaiveTime>>,
    pub is_all_day: Option<bool>,
    pub color: Option<String>,
    pub attendees: Option<Vec<String>>,
}

/// The fields of an event that decide whether it collides with another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCandidate {
    pub date: NaiveDate,
    pub space: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_all_day: bool,
}

impl From<&Event> for EventCandidate {
    fn from(e: &Event) -> Self {
        Self {
            date: e.date,
            space: Some(e.space.clone()),
            start_time: e.start_time,
            end_time: e.end_time,
            is_all_day: e.is_all_day,
        }
    }
}

impl From<&NewEvent> for EventCandidate {
    fn from(e: &NewEvent) -> Self {
        Self {
            date: e.date,
            space: Some(e.space.clone()),
            start_time: e.start_time,
            end_time: e.end_time,
            is_all_day: e.is_all_day,
        }
    }
}

/// Filters for listing events. Unset fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventFilter {
    pub date: Option<NaiveDate>,
    pub user_id: Option<i64>,
    pub space: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, e: &Event) -> bool {
        self.date.map_or(true, |d| e.date == d)
            && self.user_id.map_or(true, |u| e.user_id == u)
            && self.space.as_deref().map_or(true, |s| e.space == s)
    }
}

/// Error returned when a string does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

/// A note from one roommate to the household.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub from_user: String,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub user_id: i64,
    pub text: String,
    pub from_user: String,
    pub priority: Priority,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReminderPatch {
    pub text: Option<String>,
    pub from_user: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReminderFilter {
    pub user_id: Option<i64>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl ReminderFilter {
    pub fn matches(&self, r: &Reminder) -> bool {
        self.user_id.map_or(true, |u| r.user_id == u)
            && self.completed.map_or(true, |c| r.completed == c)
            && self.priority.map_or(true, |p| r.priority == p)
    }
}

/// An expected visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub relationship: Option<String>,
    pub visit_date: NaiveDate,
    pub visit_time: Option<NaiveTime>,
    pub visit_end_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub is_first_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuest {
    pub user_id: i64,
    pub name: String,
    pub relationship: Option<String>,
    pub visit_date: NaiveDate,
    pub visit_time: Option<NaiveTime>,
    pub visit_end_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub is_first_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestPatch {
    pub name: Option<String>,
    pub relationship: Option<Option<String>>,
    pub visit_date: Option<NaiveDate>,
    pub visit_time: Option<Option<NaiveTime>>,
    pub visit_end_time: Option<Option<NaiveTime>>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub is_first_time: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestFilter {
    pub user_id: Option<i64>,
    pub visit_date: Option<NaiveDate>,
}

impl GuestFilter {
    pub fn matches(&self, g: &Guest) -> bool {
        self.user_id.map_or(true, |u| g.user_id == u)
            && self.visit_date.map_or(true, |d| g.visit_date == d)
    }
}

/// State reported by a simulated household device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Operational,
    Degraded,
    Outage,
    Maintenance,
    Unknown,
    Locked,
    Unlocked,
}

impl DeviceState {
    pub const ALL: [DeviceState; 7] = [
        DeviceState::Operational,
        DeviceState::Degraded,
        DeviceState::Outage,
        DeviceState::Maintenance,
        DeviceState::Unknown,
        DeviceState::Locked,
        DeviceState::Unlocked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceState::Operational => "operational",
            DeviceState::Degraded => "degraded",
            DeviceState::Outage => "outage",
            DeviceState::Maintenance => "maintenance",
            DeviceState::Unknown => "unknown",
            DeviceState::Locked => "locked",
            DeviceState::Unlocked => "unlocked",
        }
    }
}

impl FromStr for DeviceState {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// Status of one simulated device, keyed by its unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatus {
    pub id: i64,
    pub name: String,
    pub status: DeviceState,
    pub value: Option<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSystemStatus {
    pub name: String,
    pub status: DeviceState,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemStatusPatch {
    pub status: Option<DeviceState>,
    pub value: Option<String>,
}

/// Direction of a temperature adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Up,
    Down,
}

/// Roommate profile. Credentials are not modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub preferences: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub preferences: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_lowercase_only() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(Priority::default(), Priority::Medium);
        let err = "HIGH".parse::<Priority>().unwrap_err();
        assert_eq!(err.to_string(), "unknown priority 'HIGH'");
    }

    #[test]
    fn device_state_roundtrips_through_str() {
        for state in DeviceState::ALL {
            assert_eq!(state.as_str().parse::<DeviceState>().unwrap(), state);
        }
        assert!("broken".parse::<DeviceState>().is_err());
    }

    #[test]
    fn event_filter_combines_fields() {
        let event = Event {
            id: 1,
            user_id: 7,
            title: "Laundry".into(),
            description: None,
            space: "Laundry Room".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            start_time: None,
            end_time: None,
            is_all_day: true,
            color: DEFAULT_EVENT_COLOR.into(),
            attendees: vec![],
        };

        assert!(EventFilter::default().matches(&event));
        assert!(EventFilter {
            user_id: Some(7),
            space: Some("Laundry Room".into()),
            ..Default::default()
        }
        .matches(&event));
        assert!(!EventFilter {
            date: NaiveDate::from_ymd_opt(2025, 3, 2),
            ..Default::default()
        }
        .matches(&event));
    }
}
