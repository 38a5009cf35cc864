//! Shared-space occupancy check.
//!
//! Two reservations collide when they are on the same date, for the same space,
//! and either one of them is all-day or their `[start, end)` windows intersect.
//! Anything that cannot be decided (missing times, missing space on a timed
//! candidate, empty or inverted windows) counts as no collision.

use chrono::NaiveTime;

use crate::contract::model::{Event, EventCandidate};

/// Events in `existing` that collide with `candidate`, in input order.
///
/// `exclude_id` names the record being edited so it is never reported against itself.
pub fn check_conflicts<'a>(
    candidate: &EventCandidate,
    existing: &'a [Event],
    exclude_id: Option<i64>,
) -> Vec<&'a Event> {
    existing
        .iter()
        .filter(|e| exclude_id != Some(e.id))
        .filter(|e| conflicts_with(candidate, e))
        .collect()
}

/// Pairwise collision between a candidate and one existing event.
pub fn conflicts_with(candidate: &EventCandidate, existing: &Event) -> bool {
    if candidate.date != existing.date {
        return false;
    }

    if candidate.is_all_day || existing.is_all_day {
        // An unnamed candidate space blocks the whole date.
        return candidate
            .space
            .as_deref()
            .map_or(true, |space| space == existing.space);
    }

    match candidate.space.as_deref() {
        Some(space) if space == existing.space => {}
        _ => return false,
    }

    match (
        candidate.start_time,
        candidate.end_time,
        existing.start_time,
        existing.end_time,
    ) {
        (Some(new_start), Some(new_end), Some(start), Some(end)) => {
            windows_overlap((new_start, new_end), (start, end))
        }
        _ => false,
    }
}

/// Half-open window intersection. Empty windows intersect nothing.
pub fn windows_overlap(a: (NaiveTime, NaiveTime), b: (NaiveTime, NaiveTime)) -> bool {
    let (a_start, a_end) = a;
    let (b_start, b_end) = b;
    if a_start >= a_end || b_start >= b_end {
        return false;
    }
    a_start < b_end && a_end > b_start
}
