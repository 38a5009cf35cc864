use tracing::{info, instrument};

use super::{require_text, storage, Service};
use crate::contract::model::{NewUser, User};
use crate::domain::error::{DomainError, Violations};

impl Service {
    #[instrument(name = "roomhub.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        self.store
            .find_user(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    #[instrument(name = "roomhub.service.get_user_by_username", skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.store
            .find_user_by_username(username)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found("User", username))
    }

    #[instrument(
        name = "roomhub.service.create_user",
        skip(self, new_user),
        fields(username = %new_user.username)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        let mut v = Violations::new();
        require_text(&mut v, "/username", &new_user.username);
        require_text(&mut v, "/displayName", &new_user.display_name);
        v.finish()?;

        if self
            .store
            .find_user_by_username(&new_user.username)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(DomainError::duplicate("User", new_user.username));
        }

        let created = self
            .store
            .insert_user(User {
                id: 0,
                username: new_user.username,
                display_name: new_user.display_name,
                email: new_user.email,
                preferences: new_user.preferences,
            })
            .await
            .map_err(storage)?;
        info!("Successfully created user with id={}", created.id);
        Ok(created)
    }
}
