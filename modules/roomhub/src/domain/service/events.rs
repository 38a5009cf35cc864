use tracing::{debug, info, instrument, warn};

use super::{check_window, require_text, storage, today, Service};
use crate::config::ConflictPolicy;
use crate::contract::model::{
    Event, EventCandidate, EventFilter, EventPatch, NewEvent, DEFAULT_EVENT_COLOR,
};
use crate::domain::conflict::check_conflicts;
use crate::domain::error::{DomainError, Violations};

impl Service {
    #[instrument(name = "roomhub.service.get_event", skip(self), fields(event_id = id))]
    pub async fn get_event(&self, id: i64) -> Result<Event, DomainError> {
        debug!("Getting event by id");
        self.store
            .find_event(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found("Event", id))
    }

    #[instrument(name = "roomhub.service.list_events", skip(self))]
    pub async fn list_events(&self, filter: EventFilter) -> Result<Vec<Event>, DomainError> {
        let events = self.store.list_events(&filter).await.map_err(storage)?;
        debug!("Listed {} events", events.len());
        Ok(events)
    }

    #[instrument(name = "roomhub.service.list_todays_events", skip(self))]
    pub async fn list_todays_events(&self) -> Result<Vec<Event>, DomainError> {
        self.list_events(EventFilter {
            date: Some(today()),
            ..Default::default()
        })
        .await
    }

    /// Existing events colliding with `candidate`, in id order.
    #[instrument(
        name = "roomhub.service.find_conflicts",
        skip(self, candidate),
        fields(date = %candidate.date, space = ?candidate.space)
    )]
    pub async fn find_conflicts(
        &self,
        candidate: &EventCandidate,
        exclude_id: Option<i64>,
    ) -> Result<Vec<Event>, DomainError> {
        // Snapshot then check; a concurrent write between the two is not detected.
        let snapshot = self
            .store
            .list_events(&EventFilter {
                date: Some(candidate.date),
                ..Default::default()
            })
            .await
            .map_err(storage)?;
        let found: Vec<Event> = check_conflicts(candidate, &snapshot, exclude_id)
            .into_iter()
            .cloned()
            .collect();
        debug!("Found {} conflicting events", found.len());
        Ok(found)
    }

    #[instrument(
        name = "roomhub.service.create_event",
        skip(self, new_event),
        fields(title = %new_event.title, space = %new_event.space, date = %new_event.date)
    )]
    pub async fn create_event(&self, new_event: NewEvent) -> Result<Event, DomainError> {
        info!("Creating new event");

        let event = Event {
            id: 0,
            user_id: new_event.user_id,
            title: new_event.title,
            description: new_event.description,
            space: new_event.space,
            date: new_event.date,
            start_time: new_event.start_time,
            end_time: new_event.end_time,
            is_all_day: new_event.is_all_day,
            color: new_event
                .color
                .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
            attendees: new_event.attendees,
        };
        self.validate_event(&event)?;
        self.enforce_conflict_policy(&event, None).await?;

        let created = self.store.insert_event(event).await.map_err(storage)?;
        info!("Successfully created event with id={}", created.id);
        Ok(created)
    }

    #[instrument(name = "roomhub.service.update_event", skip(self, patch), fields(event_id = id))]
    pub async fn update_event(&self, id: i64, patch: EventPatch) -> Result<Event, DomainError> {
        info!("Updating event");

        let mut current = self.get_event(id).await?;
        apply_patch(&mut current, patch);
        self.validate_event(&current)?;
        self.enforce_conflict_policy(&current, Some(id)).await?;

        if !self.store.update_event(current.clone()).await.map_err(storage)? {
            return Err(DomainError::not_found("Event", id));
        }
        info!("Successfully updated event");
        Ok(current)
    }

    #[instrument(name = "roomhub.service.delete_event", skip(self), fields(event_id = id))]
    pub async fn delete_event(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting event");
        if !self.store.delete_event(id).await.map_err(storage)? {
            return Err(DomainError::not_found("Event", id));
        }
        info!("Successfully deleted event");
        Ok(())
    }

    async fn enforce_conflict_policy(
        &self,
        event: &Event,
        exclude_id: Option<i64>,
    ) -> Result<(), DomainError> {
        let conflicts = self
            .find_conflicts(&EventCandidate::from(event), exclude_id)
            .await?;
        if conflicts.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = conflicts.iter().map(|e| e.id).collect();
        match self.config.conflict_policy {
            ConflictPolicy::Reject => {
                info!(conflicting_ids = ?ids, "Rejecting event because of schedule conflict");
                Err(DomainError::schedule_conflict(ids))
            }
            ConflictPolicy::Warn => {
                warn!(conflicting_ids = ?ids, "Event collides with existing events, saving anyway");
                Ok(())
            }
        }
    }

    fn validate_event(&self, e: &Event) -> Result<(), DomainError> {
        let mut v = Violations::new();

        require_text(&mut v, "/title", &e.title);
        let title_len = e.title.chars().count();
        if title_len > self.config.max_title_length {
            v.push(
                "/title",
                format!(
                    "too long: {} characters (max: {})",
                    title_len, self.config.max_title_length
                ),
            );
        }
        require_text(&mut v, "/space", &e.space);

        if e.is_all_day {
            if e.start_time.is_some() {
                v.push("/startTime", "must be empty for all-day events");
            }
            if e.end_time.is_some() {
                v.push("/endTime", "must be empty for all-day events");
            }
        } else {
            if e.start_time.is_none() {
                v.push("/startTime", "required unless the event is all-day");
            }
            if e.end_time.is_none() {
                v.push("/endTime", "required unless the event is all-day");
            }
        }
        check_window(&mut v, "/endTime", e.start_time, e.end_time);

        v.finish()
    }
}

fn apply_patch(e: &mut Event, patch: EventPatch) {
    let EventPatch {
        user_id,
        title,
        description,
        space,
        date,
        start_time,
        end_time,
        is_all_day,
        color,
        attendees,
    } = patch;

    if let Some(v) = user_id {
        e.user_id = v;
    }
    if let Some(v) = title {
        e.title = v;
    }
    if let Some(v) = description {
        e.description = v;
    }
    if let Some(v) = space {
        e.space = v;
    }
    if let Some(v) = date {
        e.date = v;
    }
    if let Some(v) = start_time {
        e.start_time = v;
    }
    if let Some(v) = end_time {
        e.end_time = v;
    }
    if let Some(v) = is_all_day {
        e.is_all_day = v;
    }
    if let Some(v) = color {
        e.color = v;
    }
    if let Some(v) = attendees {
        e.attendees = v;
    }
}
