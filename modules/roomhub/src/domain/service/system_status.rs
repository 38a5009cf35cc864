use chrono::Utc;
use tracing::{debug, info, instrument};

use super::{require_text, storage, Service};
use crate::contract::model::{Adjustment, NewSystemStatus, SystemStatus, SystemStatusPatch};
use crate::domain::error::{DomainError, Violations};

impl Service {
    #[instrument(name = "roomhub.service.list_system_statuses", skip(self))]
    pub async fn list_system_statuses(&self) -> Result<Vec<SystemStatus>, DomainError> {
        let statuses = self.store.list_statuses().await.map_err(storage)?;
        debug!("Listed {} statuses", statuses.len());
        Ok(statuses)
    }

    #[instrument(name = "roomhub.service.get_system_status", skip(self))]
    pub async fn get_system_status(&self, name: &str) -> Result<SystemStatus, DomainError> {
        self.store
            .find_status(name)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::not_found("System status", name))
    }

    #[instrument(
        name = "roomhub.service.create_system_status",
        skip(self, new_status),
        fields(name = %new_status.name)
    )]
    pub async fn create_system_status(
        &self,
        new_status: NewSystemStatus,
    ) -> Result<SystemStatus, DomainError> {
        info!("Registering system status");

        let mut v = Violations::new();
        require_text(&mut v, "/name", &new_status.name);
        v.finish()?;

        if self
            .store
            .find_status(&new_status.name)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(DomainError::duplicate("System status", new_status.name));
        }

        self.store
            .insert_status(SystemStatus {
                id: 0,
                name: new_status.name,
                status: new_status.status,
                value: new_status.value,
                last_updated: Utc::now(),
            })
            .await
            .map_err(storage)
    }

    /// Apply `patch` and refresh `last_updated`.
    #[instrument(name = "roomhub.service.update_system_status", skip(self, patch))]
    pub async fn update_system_status(
        &self,
        name: &str,
        patch: SystemStatusPatch,
    ) -> Result<SystemStatus, DomainError> {
        info!("Updating system status");

        let mut current = self.get_system_status(name).await?;
        if let Some(status) = patch.status {
            current.status = status;
        }
        if let Some(value) = patch.value {
            current.value = Some(value);
        }
        current.last_updated = Utc::now();

        if !self
            .store
            .update_status(current.clone())
            .await
            .map_err(storage)?
        {
            return Err(DomainError::not_found("System status", name));
        }
        Ok(current)
    }

    /// Step the first number in the status value by one degree, keeping the unit.
    #[instrument(name = "roomhub.service.adjust_temperature", skip(self))]
    pub async fn adjust_temperature(
        &self,
        name: &str,
        direction: Adjustment,
    ) -> Result<SystemStatus, DomainError> {
        let current = self.get_system_status(name).await?;
        let delta = match direction {
            Adjustment::Up => 1,
            Adjustment::Down => -1,
        };
        let value = current
            .value
            .as_deref()
            .and_then(|v| step_first_integer(v, delta))
            .ok_or_else(|| {
                DomainError::unprocessable(format!(
                    "System status '{name}' has no numeric value to adjust"
                ))
            })?;
        info!(new_value = %value, "Adjusting temperature");

        self.update_system_status(
            name,
            SystemStatusPatch {
                status: None,
                value: Some(value),
            },
        )
        .await
    }
}

/// Add `delta` to the first integer in `value`, leaving the surrounding text intact.
///
/// `"72°F"` with `+1` becomes `"73°F"`. Returns `None` when `value` has no digits
/// or the number does not fit.
pub fn step_first_integer(value: &str, delta: i64) -> Option<String> {
    let digits_at = value.find(|c: char| c.is_ascii_digit())?;
    let digits_len = value[digits_at..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len() - digits_at);
    let negative = value[..digits_at].ends_with('-');
    let start = if negative { digits_at - 1 } else { digits_at };
    let end = digits_at + digits_len;

    let current: i64 = value[start..end].parse().ok()?;
    let next = current.checked_add(delta)?;
    Some(format!("{}{}{}", &value[..start], next, &value[end..]))
}

#[cfg(test)]
mod tests {
    use super::step_first_integer;

    #[test]
    fn steps_value_with_unit() {
        assert_eq!(step_first_integer("72°F", 1).as_deref(), Some("73°F"));
        assert_eq!(step_first_integer("72°F", -1).as_deref(), Some("71°F"));
    }

    #[test]
    fn keeps_prefix_and_only_touches_first_number() {
        assert_eq!(
            step_first_integer("Set to 68°F (was 70)", 1).as_deref(),
            Some("Set to 69°F (was 70)")
        );
    }

    #[test]
    fn handles_sign_crossing() {
        assert_eq!(step_first_integer("0°C", -1).as_deref(), Some("-1°C"));
        assert_eq!(step_first_integer("-1°C", 1).as_deref(), Some("0°C"));
    }

    #[test]
    fn rejects_values_without_digits() {
        assert_eq!(step_first_integer("Front door is locked", 1), None);
        assert_eq!(step_first_integer("", -1), None);
    }
}
