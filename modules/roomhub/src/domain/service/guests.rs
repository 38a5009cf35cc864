use tracing::{debug, info, instrument};

use super::{check_window, require_text, storage, today, Service};
use crate::contract::model::{Guest, GuestFilter, GuestPatch, NewGuest};
use crate::domain::error::{DomainError, Violations};

impl Service {
    #[instrument(name = "roomhub.service.get_guest", skip(self), fields(guest_id = id))]
    pub async fn get_guest(&self, id: i64) -> Result<Guest, DomainError> {
        self.store
            .find_guest(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found("Guest", id))
    }

    #[instrument(name = "roomhub.service.list_guests", skip(self))]
    pub async fn list_guests(&self, filter: GuestFilter) -> Result<Vec<Guest>, DomainError> {
        let guests = self.store.list_guests(&filter).await.map_err(storage)?;
        debug!("Listed {} guests", guests.len());
        Ok(guests)
    }

    #[instrument(name = "roomhub.service.list_todays_guests", skip(self))]
    pub async fn list_todays_guests(&self) -> Result<Vec<Guest>, DomainError> {
        self.list_guests(GuestFilter {
            visit_date: Some(today()),
            ..Default::default()
        })
        .await
    }

    #[instrument(
        name = "roomhub.service.create_guest",
        skip(self, new_guest),
        fields(name = %new_guest.name, visit_date = %new_guest.visit_date)
    )]
    pub async fn create_guest(&self, new_guest: NewGuest) -> Result<Guest, DomainError> {
        info!("Registering new guest");

        let guest = Guest {
            id: 0,
            user_id: new_guest.user_id,
            name: new_guest.name,
            relationship: new_guest.relationship,
            visit_date: new_guest.visit_date,
            visit_time: new_guest.visit_time,
            visit_end_time: new_guest.visit_end_time,
            notes: new_guest.notes,
            tags: new_guest.tags,
            is_first_time: new_guest.is_first_time,
        };
        validate_guest(&guest)?;

        let created = self.store.insert_guest(guest).await.map_err(storage)?;
        info!("Successfully registered guest with id={}", created.id);
        Ok(created)
    }

    #[instrument(name = "roomhub.service.update_guest", skip(self, patch), fields(guest_id = id))]
    pub async fn update_guest(&self, id: i64, patch: GuestPatch) -> Result<Guest, DomainError> {
        info!("Updating guest");

        let mut g = self.get_guest(id).await?;
        if let Some(v) = patch.name {
            g.name = v;
        }
        if let Some(v) = patch.relationship {
            g.relationship = v;
        }
        if let Some(v) = patch.visit_date {
            g.visit_date = v;
        }
        if let Some(v) = patch.visit_time {
            g.visit_time = v;
        }
        if let Some(v) = patch.visit_end_time {
            g.visit_end_time = v;
        }
        if let Some(v) = patch.notes {
            g.notes = v;
        }
        if let Some(v) = patch.tags {
            g.tags = v;
        }
        if let Some(v) = patch.is_first_time {
            g.is_first_time = v;
        }
        validate_guest(&g)?;

        if !self.store.update_guest(g.clone()).await.map_err(storage)? {
            return Err(DomainError::not_found("Guest", id));
        }
        Ok(g)
    }

    #[instrument(name = "roomhub.service.delete_guest", skip(self), fields(guest_id = id))]
    pub async fn delete_guest(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting guest");
        if !self.store.delete_guest(id).await.map_err(storage)? {
            return Err(DomainError::not_found("Guest", id));
        }
        Ok(())
    }
}

fn validate_guest(g: &Guest) -> Result<(), DomainError> {
    let mut v = Violations::new();
    require_text(&mut v, "/name", &g.name);
    check_window(&mut v, "/visitEndTime", g.visit_time, g.visit_end_time);
    v.finish()
}
