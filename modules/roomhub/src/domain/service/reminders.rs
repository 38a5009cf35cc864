use chrono::Utc;
use tracing::{debug, info, instrument};

use super::{require_text, storage, Service};
use crate::contract::model::{NewReminder, Reminder, ReminderFilter, ReminderPatch};
use crate::domain::error::{DomainError, Violations};

impl Service {
    #[instrument(name = "roomhub.service.get_reminder", skip(self), fields(reminder_id = id))]
    pub async fn get_reminder(&self, id: i64) -> Result<Reminder, DomainError> {
        self.store
            .find_reminder(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found("Reminder", id))
    }

    #[instrument(name = "roomhub.service.list_reminders", skip(self))]
    pub async fn list_reminders(
        &self,
        filter: ReminderFilter,
    ) -> Result<Vec<Reminder>, DomainError> {
        let reminders = self.store.list_reminders(&filter).await.map_err(storage)?;
        debug!("Listed {} reminders", reminders.len());
        Ok(reminders)
    }

    #[instrument(
        name = "roomhub.service.create_reminder",
        skip(self, new_reminder),
        fields(from_user = %new_reminder.from_user, priority = new_reminder.priority.as_str())
    )]
    pub async fn create_reminder(&self, new_reminder: NewReminder) -> Result<Reminder, DomainError> {
        info!("Creating new reminder");

        let reminder = Reminder {
            id: 0,
            user_id: new_reminder.user_id,
            text: new_reminder.text,
            from_user: new_reminder.from_user,
            priority: new_reminder.priority,
            completed: new_reminder.completed,
            created_at: Utc::now(),
        };
        validate_reminder(&reminder)?;

        let created = self.store.insert_reminder(reminder).await.map_err(storage)?;
        info!("Successfully created reminder with id={}", created.id);
        Ok(created)
    }

    #[instrument(name = "roomhub.service.update_reminder", skip(self, patch), fields(reminder_id = id))]
    pub async fn update_reminder(
        &self,
        id: i64,
        patch: ReminderPatch,
    ) -> Result<Reminder, DomainError> {
        info!("Updating reminder");

        let mut current = self.get_reminder(id).await?;
        if let Some(text) = patch.text {
            current.text = text;
        }
        if let Some(from_user) = patch.from_user {
            current.from_user = from_user;
        }
        if let Some(priority) = patch.priority {
            current.priority = priority;
        }
        if let Some(completed) = patch.completed {
            current.completed = completed;
        }
        validate_reminder(&current)?;

        if !self
            .store
            .update_reminder(current.clone())
            .await
            .map_err(storage)?
        {
            return Err(DomainError::not_found("Reminder", id));
        }
        Ok(current)
    }

    #[instrument(name = "roomhub.service.delete_reminder", skip(self), fields(reminder_id = id))]
    pub async fn delete_reminder(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting reminder");
        if !self.store.delete_reminder(id).await.map_err(storage)? {
            return Err(DomainError::not_found("Reminder", id));
        }
        Ok(())
    }
}

fn validate_reminder(r: &Reminder) -> Result<(), DomainError> {
    let mut v = Violations::new();
    require_text(&mut v, "/text", &r.text);
    require_text(&mut v, "/fromUser", &r.from_user);
    v.finish()
}
