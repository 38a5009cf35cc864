//! Demo household loaded at startup when `seed_demo_data` is on.

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use tracing::info;

use crate::contract::model::{
    DeviceState, NewEvent, NewGuest, NewReminder, NewSystemStatus, NewUser, Priority,
};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

const BELLY: &str = "Isabel \"Belly\" Conklin";
const ROOMMATE_A: &str = "Roommate A";

fn hm(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

/// Saturday of the current week; `today` itself when it is a Saturday.
pub fn coming_saturday(today: NaiveDate) -> NaiveDate {
    let ahead = 6 - u64::from(today.weekday().num_days_from_sunday());
    today + Days::new(ahead)
}

/// Populate an empty store through the service so the usual rules apply.
pub async fn seed_demo_data(service: &Service, today: NaiveDate) -> Result<(), DomainError> {
    let user = service
        .create_user(NewUser {
            username: "demouser".into(),
            display_name: ROOMMATE_A.into(),
            email: Some("roommate.a@example.com".into()),
            preferences: serde_json::json!({}),
        })
        .await?;

    for (name, status, value) in [
        ("temperature", DeviceState::Operational, "72°F"),
        ("doorLock", DeviceState::Locked, "Front door is locked"),
    ] {
        service
            .create_system_status(NewSystemStatus {
                name: name.into(),
                status,
                value: Some(value.into()),
            })
            .await?;
    }

    let events = [
        ("Morning Shower", "Bathroom", (6, 0), (6, 30), "Roommate A's shower time", ROOMMATE_A),
        ("Lunch Prep", "Kitchen", (12, 30), (13, 30), "Roommate A's lunch preparation", ROOMMATE_A),
        ("Dinner Preparation", "Kitchen", (18, 0), (19, 30), "Isabel's dinner preparation", BELLY),
        ("Movie Night", "Living Room", (20, 0), (22, 0), "Group movie night", "Everyone"),
    ];
    for (title, space, (sh, sm), (eh, em), description, attendee) in events {
        service
            .create_event(NewEvent {
                user_id: user.id,
                title: title.into(),
                description: Some(description.into()),
                space: space.into(),
                date: today,
                start_time: hm(sh, sm),
                end_time: hm(eh, em),
                is_all_day: false,
                color: None,
                attendees: vec![attendee.into()],
            })
            .await?;
    }

    let reminders = [
        ("Don't forget to take the bins out tonight!", BELLY, Priority::High),
        ("It's your turn this week according to the schedule.", BELLY, Priority::Medium),
        ("Let's clean out old food this weekend.", ROOMMATE_A, Priority::Low),
    ];
    for (text, from_user, priority) in reminders {
        service
            .create_reminder(NewReminder {
                user_id: user.id,
                text: text.into(),
                from_user: from_user.into(),
                priority,
                completed: false,
            })
            .await?;
    }

    let guests = [
        (
            "Jeremiah Fisher",
            today,
            (19, 0),
            (22, 0),
            "Coming over for dinner and movie night. Allergic to nuts.",
            &["Friend", "Dinner Guest"][..],
            true,
        ),
        (
            "Steven Conklin",
            today + Days::new(1),
            (14, 0),
            (18, 0),
            "",
            &["Family"][..],
            false,
        ),
        (
            "Conrad Fisher",
            coming_saturday(today),
            (15, 0),
            (19, 0),
            "Study session for final exams",
            &["Study", "School"][..],
            false,
        ),
    ];
    for (name, visit_date, (sh, sm), (eh, em), notes, tags, is_first_time) in guests {
        service
            .create_guest(NewGuest {
                user_id: user.id,
                name: name.into(),
                relationship: Some("Visitor".into()),
                visit_date,
                visit_time: hm(sh, sm),
                visit_end_time: hm(eh, em),
                notes: Some(notes.into()),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                is_first_time,
            })
            .await?;
    }

    info!(
        events = events.len(),
        reminders = reminders.len(),
        guests = guests.len(),
        "Seeded demo household"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn coming_saturday_stays_within_the_week() {
        // 2025-06-02 is a Monday
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        for offset in 0..7 {
            let day = monday + Days::new(offset);
            let sat = coming_saturday(day);
            assert_eq!(sat.weekday(), Weekday::Sat);
            assert!(sat >= day);
            assert!((sat - day).num_days() <= 6);
        }
        let sunday = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!((coming_saturday(sunday) - sunday).num_days(), 6);
    }
}
