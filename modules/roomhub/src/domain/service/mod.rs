//! Domain service: business rules over the [`RoomhubStore`] port.
//!
//! One `Service` covers every roomhub collection; the per-collection
//! operations live in the submodules as separate `impl Service` blocks.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::config::{ConflictPolicy, RoomhubConfig};
use crate::domain::error::{DomainError, Violations};
use crate::domain::repo::RoomhubStore;

mod events;
mod guests;
mod reminders;
mod system_status;
mod users;

pub use system_status::step_first_integer;

/// Domain service with business rules for the household.
/// Depends only on the store port, not on infra types.
#[derive(Clone)]
pub struct Service {
    store: Arc<dyn RoomhubStore>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub conflict_policy: ConflictPolicy,
    pub max_title_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&RoomhubConfig::default())
    }
}

impl From<&RoomhubConfig> for ServiceConfig {
    fn from(cfg: &RoomhubConfig) -> Self {
        Self {
            conflict_policy: cfg.conflict_policy,
            max_title_length: cfg.max_title_length,
        }
    }
}

impl Service {
    pub fn new(store: Arc<dyn RoomhubStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Current calendar date. "Today" is evaluated in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn storage(e: anyhow::Error) -> DomainError {
    DomainError::storage(format!("{e:#}"))
}

fn require_text(v: &mut Violations, pointer: &str, value: &str) {
    if value.trim().is_empty() {
        v.push(pointer, "must not be empty");
    }
}

/// `end` must not come before `start`. Equal times are allowed.
fn check_window(
    v: &mut Violations,
    end_pointer: &str,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            v.push(end_pointer, "must not be earlier than the start time");
        }
    }
}
