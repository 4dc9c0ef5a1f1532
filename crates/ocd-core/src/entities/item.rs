use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ItemStatus, Priority, Swimlane};
use crate::errors::CoreError;
use crate::outcome::OutcomeMetrics;

/// A work item on the board. Decisions reference items; the outcome tracker
/// reads them once they reach a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: ItemStatus,
    pub swimlane: Option<Swimlane>,
    pub priority: Option<Priority>,
    pub labels: Vec<String>,
    pub cycle_count: u32,
    /// Minutes spent in DOING, accumulated every time the item leaves it.
    pub total_time_in_create: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub blocked_at: Option<DateTime<Utc>>,
    pub status_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Move the item to `next`, updating the lifecycle bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the board does not allow the move.
    pub fn apply_transition(&mut self, next: ItemStatus, now: DateTime<Utc>) -> Result<(), CoreError> {
        let from = self.status;
        if !from.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: "item".to_string(),
                id: self.id.clone(),
                from: from.to_string(),
                to: next.to_string(),
            });
        }

        if from == ItemStatus::Doing {
            let entered = self.status_changed_at.unwrap_or(self.updated_at);
            let minutes = (now - entered).num_minutes().max(0);
            let minutes = u32::try_from(minutes).unwrap_or(u32::MAX);
            self.total_time_in_create = self.total_time_in_create.saturating_add(minutes);
        }
        if from.is_rework(next) {
            self.cycle_count += 1;
        }

        match next {
            ItemStatus::Doing if self.started_at.is_none() => self.started_at = Some(now),
            ItemStatus::Done if self.completed_at.is_none() => self.completed_at = Some(now),
            ItemStatus::Blocked if self.blocked_at.is_none() => self.blocked_at = Some(now),
            _ => {}
        }

        self.status = next;
        self.status_changed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Minutes from creation to completion, once completed.
    #[must_use]
    pub fn time_to_complete(&self) -> Option<f64> {
        self.completed_at.map(|done| {
            let seconds = (done - self.created_at).num_seconds().max(0);
            f64::from(u32::try_from(seconds).unwrap_or(u32::MAX)) / 60.0
        })
    }

    /// The delayed signals this item contributes to every decision about it.
    #[must_use]
    pub fn outcome_metrics(&self) -> OutcomeMetrics {
        OutcomeMetrics {
            completed_successfully: Some(self.status == ItemStatus::Done),
            cycle_count: Some(self.cycle_count),
            blocked_at: self.blocked_at,
            total_time_in_create: Some(f64::from(self.total_time_in_create)),
            time_to_complete: self.time_to_complete(),
            ..OutcomeMetrics::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn item(status: ItemStatus) -> Item {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Item {
            id: "itm-0000abcd".into(),
            user_id: "usr-1".into(),
            title: "Write quarterly report".into(),
            status,
            swimlane: Some(Swimlane::Project),
            priority: Some(Priority::Medium),
            labels: vec![],
            cycle_count: 0,
            total_time_in_create: 0,
            started_at: None,
            completed_at: None,
            blocked_at: None,
            status_changed_at: Some(t0),
            created_at: t0,
            updated_at: t0,
        }
    }

    #[test]
    fn doing_time_accumulates_on_exit() {
        let mut it = item(ItemStatus::Todo);
        let t0 = it.created_at;
        it.apply_transition(ItemStatus::Doing, t0).unwrap();
        it.apply_transition(ItemStatus::InReview, t0 + Duration::minutes(45))
            .unwrap();
        assert_eq!(it.total_time_in_create, 45);
        assert_eq!(it.started_at, Some(t0));

        it.apply_transition(ItemStatus::Doing, t0 + Duration::minutes(60))
            .unwrap();
        it.apply_transition(ItemStatus::Done, t0 + Duration::minutes(90))
            .unwrap();
        assert_eq!(it.total_time_in_create, 75);
        assert_eq!(it.cycle_count, 1);
        assert_eq!(it.started_at, Some(t0));
        assert_eq!(it.completed_at, Some(t0 + Duration::minutes(90)));
    }

    #[test]
    fn first_blocked_timestamp_is_kept() {
        let mut it = item(ItemStatus::Doing);
        let t0 = it.created_at;
        it.apply_transition(ItemStatus::Blocked, t0 + Duration::minutes(5))
            .unwrap();
        it.apply_transition(ItemStatus::Doing, t0 + Duration::minutes(10))
            .unwrap();
        it.apply_transition(ItemStatus::Blocked, t0 + Duration::minutes(20))
            .unwrap();
        assert_eq!(it.blocked_at, Some(t0 + Duration::minutes(5)));
    }

    #[test]
    fn terminal_items_only_archive() {
        let mut it = item(ItemStatus::Done);
        let now = it.created_at;
        let err = it.apply_transition(ItemStatus::Doing, now).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(it.status, ItemStatus::Done);
        it.apply_transition(ItemStatus::Archive, now).unwrap();
        assert!(it.apply_transition(ItemStatus::Inbox, now).is_err());
    }

    #[test]
    fn outcome_metrics_from_done_item() {
        let mut it = item(ItemStatus::Doing);
        let t0 = it.created_at;
        it.apply_transition(ItemStatus::Done, t0 + Duration::minutes(30))
            .unwrap();
        let m = it.outcome_metrics();
        assert_eq!(m.completed_successfully, Some(true));
        assert_eq!(m.cycle_count, Some(0));
        assert_eq!(m.blocked_at, None);
        assert_eq!(m.total_time_in_create, Some(30.0));
        assert_eq!(m.time_to_complete, Some(30.0));
    }

    #[test]
    fn cold_storage_is_not_success() {
        let mut it = item(ItemStatus::Backlog);
        it.apply_transition(ItemStatus::ColdStorage, it.created_at)
            .unwrap();
        let m = it.outcome_metrics();
        assert_eq!(m.completed_successfully, Some(false));
        assert_eq!(m.time_to_complete, None);
    }
}
