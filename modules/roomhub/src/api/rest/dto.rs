//! Wire types. Dates are `YYYY-MM-DD` and times `HH:MM`; both arrive as strings
//! and are parsed into typed values here, once, before reaching the service.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    Adjustment, DeviceState, Event, EventCandidate, EventFilter, EventPatch, Guest, GuestFilter,
    GuestPatch, NewEvent, NewGuest, NewReminder, Priority, Reminder, ReminderFilter,
    ReminderPatch, SystemStatus, SystemStatusPatch, User,
};
use crate::domain::error::{DomainError, Violations};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

fn parse_date(v: &mut Violations, pointer: &str, raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            v.push(pointer, format!("'{raw}' is not a date, expected YYYY-MM-DD"));
            None
        }
    }
}

fn parse_time(v: &mut Violations, pointer: &str, raw: Option<&str>) -> Option<NaiveTime> {
    let raw = raw?;
    match NaiveTime::parse_from_str(raw, TIME_FORMAT) {
        Ok(t) => Some(t),
        Err(_) => {
            v.push(pointer, format!("'{raw}' is not a time, expected HH:MM"));
            None
        }
    }
}

/// A field given as `null` in a partial update clears the stored value.
fn parse_patch_time(
    v: &mut Violations,
    pointer: &str,
    raw: Option<&Option<String>>,
) -> Option<Option<NaiveTime>> {
    raw.map(|inner| parse_time(v, pointer, inner.as_deref()))
}

/// Absent stays `None` (with `#[serde(default)]`), `null` becomes `Some(None)`.
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn parse_priority(v: &mut Violations, pointer: &str, raw: Option<&str>) -> Option<Priority> {
    raw?.parse::<Priority>()
        .map_err(|e| v.push(pointer, e.to_string()))
        .ok()
}

fn parse_device_state(v: &mut Violations, pointer: &str, raw: Option<&str>) -> Option<DeviceState> {
    raw?.parse::<DeviceState>()
        .map_err(|e| v.push(pointer, e.to_string()))
        .ok()
}

fn fmt_time(t: Option<NaiveTime>) -> Option<String> {
    t.map(|t| t.format(TIME_FORMAT).to_string())
}

fn fmt_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------- events

/// REST DTO for event representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub space: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, absent for all-day events
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_all_day: bool,
    pub color: String,
    pub attendees: Vec<String>,
}

impl From<Event> for EventDto {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            title: e.title,
            description: e.description,
            space: e.space,
            date: fmt_date(e.date),
            start_time: fmt_time(e.start_time),
            end_time: fmt_time(e.end_time),
            is_all_day: e.is_all_day,
            color: e.color,
            attendees: e.attendees,
        }
    }
}

/// REST DTO for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventReq {
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub space: String,
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl TryFrom<CreateEventReq> for NewEvent {
    type Error = DomainError;

    fn try_from(req: CreateEventReq) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let date = parse_date(&mut v, "/date", &req.date);
        let start_time = parse_time(&mut v, "/startTime", req.start_time.as_deref());
        let end_time = parse_time(&mut v, "/endTime", req.end_time.as_deref());
        v.finish()?;

        Ok(Self {
            user_id: req.user_id,
            title: req.title,
            description: req.description,
            space: req.space,
            date: date.ok_or_else(|| DomainError::validation("/date", "required"))?,
            start_time,
            end_time,
            is_all_day: req.is_all_day,
            color: req.color,
            attendees: req.attendees,
        })
    }
}

/// REST DTO for updating an event (partial). Absent fields are left unchanged;
/// `null` clears `description`, `startTime` and `endTime`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventReq {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub space: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub start_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub end_time: Option<Option<String>>,
    pub is_all_day: Option<bool>,
    pub color: Option<String>,
    pub attendees: Option<Vec<String>>,
}

impl TryFrom<UpdateEventReq> for EventPatch {
    type Error = DomainError;

    fn try_from(req: UpdateEventReq) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let date = req.date.as_deref().and_then(|d| parse_date(&mut v, "/date", d));
        let start_time = parse_patch_time(&mut v, "/startTime", req.start_time.as_ref());
        let end_time = parse_patch_time(&mut v, "/endTime", req.end_time.as_ref());
        v.finish()?;

        Ok(Self {
            user_id: req.user_id,
            title: req.title,
            description: req.description,
            space: req.space,
            date,
            start_time,
            end_time,
            is_all_day: req.is_all_day,
            color: req.color,
            attendees: req.attendees,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    /// Only events on this date (`YYYY-MM-DD`)
    pub date: Option<String>,
    pub user_id: Option<i64>,
    pub space: Option<String>,
}

impl TryFrom<ListEventsQuery> for EventFilter {
    type Error = DomainError;

    fn try_from(q: ListEventsQuery) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let date = q.date.as_deref().and_then(|d| parse_date(&mut v, "/date", d));
        v.finish()?;
        Ok(Self {
            date,
            user_id: q.user_id,
            space: q.space,
        })
    }
}

/// Candidate reservation to test against the calendar.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckReq {
    pub date: String,
    #[serde(default)]
    pub space: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_all_day: bool,
    /// Id of the event being edited, never reported against itself
    #[serde(default)]
    pub exclude_id: Option<i64>,
}

impl ConflictCheckReq {
    /// Split into the typed candidate and the exclusion id.
    pub fn into_candidate(self) -> Result<(EventCandidate, Option<i64>), DomainError> {
        let mut v = Violations::new();
        let date = parse_date(&mut v, "/date", &self.date);
        let start_time = parse_time(&mut v, "/startTime", self.start_time.as_deref());
        let end_time = parse_time(&mut v, "/endTime", self.end_time.as_deref());
        v.finish()?;

        let candidate = EventCandidate {
            date: date.ok_or_else(|| DomainError::validation("/date", "required"))?,
            space: self.space,
            start_time,
            end_time,
            is_all_day: self.is_all_day,
        };
        Ok((candidate, self.exclude_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckDto {
    pub has_conflicts: bool,
    pub conflicts: Vec<EventDto>,
}

impl From<Vec<Event>> for ConflictCheckDto {
    fn from(events: Vec<Event>) -> Self {
        Self {
            has_conflicts: !events.is_empty(),
            conflicts: events.into_iter().map(EventDto::from).collect(),
        }
    }
}

// ---------------------------------------------------------------- reminders

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDto {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub from_user: String,
    /// `low`, `medium` or `high`
    pub priority: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Reminder> for ReminderDto {
    fn from(r: Reminder) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            text: r.text,
            from_user: r.from_user,
            priority: r.priority.as_str().to_string(),
            completed: r.completed,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderReq {
    pub user_id: i64,
    pub text: String,
    pub from_user: String,
    /// Defaults to `medium`
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl TryFrom<CreateReminderReq> for NewReminder {
    type Error = DomainError;

    fn try_from(req: CreateReminderReq) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let priority = parse_priority(&mut v, "/priority", req.priority.as_deref());
        v.finish()?;
        Ok(Self {
            user_id: req.user_id,
            text: req.text,
            from_user: req.from_user,
            priority: priority.unwrap_or_default(),
            completed: req.completed,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderReq {
    pub text: Option<String>,
    pub from_user: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

impl TryFrom<UpdateReminderReq> for ReminderPatch {
    type Error = DomainError;

    fn try_from(req: UpdateReminderReq) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let priority = parse_priority(&mut v, "/priority", req.priority.as_deref());
        v.finish()?;
        Ok(Self {
            text: req.text,
            from_user: req.from_user,
            priority,
            completed: req.completed,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListRemindersQuery {
    pub user_id: Option<i64>,
    /// `active` or `completed`
    pub status: Option<String>,
    /// `low`, `medium` or `high`
    pub priority: Option<String>,
}

impl TryFrom<ListRemindersQuery> for ReminderFilter {
    type Error = DomainError;

    fn try_from(q: ListRemindersQuery) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let completed = match q.status.as_deref() {
            None => None,
            Some("active") => Some(false),
            Some("completed") => Some(true),
            Some(other) => {
                v.push("/status", format!("unknown status '{other}', expected active or completed"));
                None
            }
        };
        let priority = parse_priority(&mut v, "/priority", q.priority.as_deref());
        v.finish()?;
        Ok(Self {
            user_id: q.user_id,
            completed,
            priority,
        })
    }
}

// ---------------------------------------------------------------- guests

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestDto {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub relationship: Option<String>,
    pub visit_date: String,
    pub visit_time: Option<String>,
    pub visit_end_time: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub is_first_time: bool,
}

impl From<Guest> for GuestDto {
    fn from(g: Guest) -> Self {
        Self {
            id: g.id,
            user_id: g.user_id,
            name: g.name,
            relationship: g.relationship,
            visit_date: fmt_date(g.visit_date),
            visit_time: fmt_time(g.visit_time),
            visit_end_time: fmt_time(g.visit_end_time),
            notes: g.notes,
            tags: g.tags,
            is_first_time: g.is_first_time,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestReq {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub relationship: Option<String>,
    pub visit_date: String,
    #[serde(default)]
    pub visit_time: Option<String>,
    #[serde(default)]
    pub visit_end_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub is_first_time: bool,
}

impl TryFrom<CreateGuestReq> for NewGuest {
    type Error = DomainError;

    fn try_from(req: CreateGuestReq) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let visit_date = parse_date(&mut v, "/visitDate", &req.visit_date);
        let visit_time = parse_time(&mut v, "/visitTime", req.visit_time.as_deref());
        let visit_end_time = parse_time(&mut v, "/visitEndTime", req.visit_end_time.as_deref());
        v.finish()?;
        Ok(Self {
            user_id: req.user_id,
            name: req.name,
            relationship: req.relationship,
            visit_date: visit_date
                .ok_or_else(|| DomainError::validation("/visitDate", "required"))?,
            visit_time,
            visit_end_time,
            notes: req.notes,
            tags: req.tags,
            is_first_time: req.is_first_time,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuestReq {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub relationship: Option<Option<String>>,
    pub visit_date: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub visit_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub visit_end_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub is_first_time: Option<bool>,
}

impl TryFrom<UpdateGuestReq> for GuestPatch {
    type Error = DomainError;

    fn try_from(req: UpdateGuestReq) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let visit_date = req
            .visit_date
            .as_deref()
            .and_then(|d| parse_date(&mut v, "/visitDate", d));
        let visit_time = parse_patch_time(&mut v, "/visitTime", req.visit_time.as_ref());
        let visit_end_time =
            parse_patch_time(&mut v, "/visitEndTime", req.visit_end_time.as_ref());
        v.finish()?;
        Ok(Self {
            name: req.name,
            relationship: req.relationship,
            visit_date,
            visit_time,
            visit_end_time,
            notes: req.notes,
            tags: req.tags,
            is_first_time: req.is_first_time,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListGuestsQuery {
    pub user_id: Option<i64>,
    /// Only guests visiting on this date (`YYYY-MM-DD`)
    pub date: Option<String>,
}

impl TryFrom<ListGuestsQuery> for GuestFilter {
    type Error = DomainError;

    fn try_from(q: ListGuestsQuery) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let visit_date = q.date.as_deref().and_then(|d| parse_date(&mut v, "/date", d));
        v.finish()?;
        Ok(Self {
            user_id: q.user_id,
            visit_date,
        })
    }
}

// ---------------------------------------------------------------- system status

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatusDto {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub value: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl From<SystemStatus> for SystemStatusDto {
    fn from(s: SystemStatus) -> Self {
        Self {
            id: s.id,
            name: s.name,
            status: s.status.as_str().to_string(),
            value: s.value,
            last_updated: s.last_updated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSystemStatusReq {
    /// One of `operational`, `degraded`, `outage`, `maintenance`, `unknown`, `locked`, `unlocked`
    pub status: Option<String>,
    pub value: Option<String>,
}

impl TryFrom<UpdateSystemStatusReq> for SystemStatusPatch {
    type Error = DomainError;

    fn try_from(req: UpdateSystemStatusReq) -> Result<Self, Self::Error> {
        let mut v = Violations::new();
        let status = parse_device_state(&mut v, "/status", req.status.as_deref());
        v.finish()?;
        Ok(Self {
            status,
            value: req.value,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustReq {
    /// `up` or `down`
    pub direction: String,
}

impl TryFrom<AdjustReq> for Adjustment {
    type Error = DomainError;

    fn try_from(req: AdjustReq) -> Result<Self, Self::Error> {
        match req.direction.as_str() {
            "up" => Ok(Adjustment::Up),
            "down" => Ok(Adjustment::Down),
            other => Err(DomainError::validation(
                "/direction",
                format!("unknown direction '{other}', expected up or down"),
            )),
        }
    }
}

// ---------------------------------------------------------------- users

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    #[schema(value_type = Object)]
    pub preferences: serde_json::Value,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            display_name: u.display_name,
            email: u.email,
            preferences: u.preferences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req() -> CreateEventReq {
        serde_json::from_value(serde_json::json!({
            "userId": 1,
            "title": "Laundry",
            "space": "Laundry Room",
            "date": "2025-06-01",
            "startTime": "09:00",
            "endTime": "10:00"
        }))
        .unwrap()
    }

    #[test]
    fn create_event_defaults_and_parsing() {
        let req = create_req();
        assert!(!req.is_all_day);
        assert!(req.attendees.is_empty());

        let new_event = NewEvent::try_from(req).unwrap();
        assert_eq!(new_event.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(new_event.start_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(new_event.color, None);
    }

    #[test]
    fn bad_date_and_time_are_reported_together() {
        let mut req = create_req();
        req.date = "06/01/2025".into();
        req.end_time = Some("25:99".into());

        let Err(DomainError::Validation { violations }) = NewEvent::try_from(req) else {
            panic!("expected validation error");
        };
        let pointers: Vec<_> = violations.iter().map(|v| v.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["/date", "/endTime"]);
    }

    #[test]
    fn update_tells_null_from_absent() {
        let req: UpdateEventReq = serde_json::from_value(serde_json::json!({
            "startTime": null,
            "endTime": "11:30"
        }))
        .unwrap();
        let patch = EventPatch::try_from(req).unwrap();
        assert_eq!(patch.start_time, Some(None));
        assert_eq!(patch.end_time, Some(NaiveTime::from_hms_opt(11, 30, 0)));
        assert_eq!(patch.description, None);

        let req: UpdateGuestReq =
            serde_json::from_value(serde_json::json!({ "notes": null, "visitTime": "7pm" }))
                .unwrap();
        let Err(DomainError::Validation { violations }) = GuestPatch::try_from(req) else {
            panic!("expected validation error");
        };
        assert_eq!(violations[0].pointer, "/visitTime");
    }

    #[test]
    fn event_dto_formats_times_as_hh_mm() {
        let new_event = NewEvent::try_from(create_req()).unwrap();
        let event = Event {
            id: 5,
            user_id: new_event.user_id,
            title: new_event.title,
            description: None,
            space: new_event.space,
            date: new_event.date,
            start_time: new_event.start_time,
            end_time: new_event.end_time,
            is_all_day: false,
            color: "#7A8450".into(),
            attendees: vec![],
        };
        let json = serde_json::to_value(EventDto::from(event)).unwrap();
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["date"], "2025-06-01");
        assert_eq!(json["isAllDay"], false);
    }

    #[test]
    fn reminder_status_filter_maps_to_completed_flag() {
        let f = ReminderFilter::try_from(ListRemindersQuery {
            status: Some("completed".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(f.completed, Some(true));

        let f = ReminderFilter::try_from(ListRemindersQuery {
            status: Some("active".into()),
            priority: Some("low".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(f.completed, Some(false));
        assert_eq!(f.priority, Some(Priority::Low));

        assert!(ReminderFilter::try_from(ListRemindersQuery {
            status: Some("done".into()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn reminder_priority_defaults_to_medium() {
        let req: CreateReminderReq = serde_json::from_value(serde_json::json!({
            "userId": 1,
            "text": "Water the plants",
            "fromUser": "Roommate A"
        }))
        .unwrap();
        assert_eq!(NewReminder::try_from(req).unwrap().priority, Priority::Medium);
    }

    #[test]
    fn guest_defaults_to_first_time() {
        let req: CreateGuestReq = serde_json::from_value(serde_json::json!({
            "userId": 1,
            "name": "Taylor",
            "visitDate": "2025-06-07"
        }))
        .unwrap();
        assert!(req.is_first_time);
        assert!(NewGuest::try_from(req).is_ok());
    }

    #[test]
    fn adjust_direction_is_strict() {
        assert_eq!(
            Adjustment::try_from(AdjustReq { direction: "up".into() }).unwrap(),
            Adjustment::Up
        );
        assert!(Adjustment::try_from(AdjustReq { direction: "sideways".into() }).is_err());
    }

    #[test]
    fn conflict_request_keeps_missing_space() {
        let req: ConflictCheckReq = serde_json::from_value(serde_json::json!({
            "date": "2025-06-01",
            "isAllDay": true,
            "excludeId": 3
        }))
        .unwrap();
        let (candidate, exclude) = req.into_candidate().unwrap();
        assert_eq!(candidate.space, None);
        assert!(candidate.is_all_day);
        assert_eq!(exclude, Some(3));
    }
}
