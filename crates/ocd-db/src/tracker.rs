//! Outcome tracker.
//!
//! A terminal item transition produces an [`OutcomeEvent`]. Handling it derives
//! outcome metrics from the item, merges them into every decision that
//! references the item, and recomputes each of those rewards. The same event
//! can be replayed safely: the merge and the recompute are both idempotent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use ocd_core::enums::ItemStatus;
use ocd_core::responses::TrackerReport;

use crate::error::DatabaseError;
use crate::service::OcdService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeEvent {
    /// The item entered `DONE` or `COLD_STORAGE`.
    ItemTerminal {
        item_id: String,
        status: ItemStatus,
        at: DateTime<Utc>,
    },
}

impl OcdService {
    /// Apply one outcome event to every linked decision.
    ///
    /// Per-decision failures are logged and counted in the report.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the item or its decision list cannot be read.
    pub async fn handle_outcome_event(
        &self,
        event: &OutcomeEvent,
    ) -> Result<TrackerReport, DatabaseError> {
        let OutcomeEvent::ItemTerminal { item_id, status, .. } = event;

        let item = self.get_item(item_id).await?;
        let mut metrics = item.outcome_metrics();
        // The event's status wins over a later archive of the item.
        metrics.completed_successfully = Some(*status == ItemStatus::Done);

        let mut report = TrackerReport {
            events: 1,
            ..TrackerReport::default()
        };
        for id in self.decision_ids_for_item(item_id).await? {
            match self.submit_outcome(&id, &metrics).await {
                Ok(res) => {
                    tracing::debug!(decision_id = %id, reward = res.reward, "Outcome applied");
                    report.decisions_updated += 1;
                }
                Err(e) => {
                    tracing::warn!(decision_id = %id, item_id = %item_id, error = %e, "Outcome update failed");
                    report.errors += 1;
                }
            }
        }

        tracing::info!(
            item_id = %item_id,
            status = %status,
            updated = report.decisions_updated,
            errors = report.errors,
            "Outcome event handled"
        );
        Ok(report)
    }
}

/// Consume outcome events until every sender is dropped.
///
/// An event that fails as a whole (e.g. its item vanished) counts as one error.
pub async fn run_tracker(
    service: Arc<OcdService>,
    mut events: mpsc::Receiver<OutcomeEvent>,
) -> TrackerReport {
    let mut total = TrackerReport::default();
    while let Some(event) = events.recv().await {
        match service.handle_outcome_event(&event).await {
            Ok(report) => total.absorb(report),
            Err(e) => {
                tracing::warn!(?event, error = %e, "Outcome event failed");
                total.absorb(TrackerReport {
                    events: 1,
                    decisions_updated: 0,
                    errors: 1,
                });
            }
        }
    }
    tracing::info!(
        events = total.events,
        updated = total.decisions_updated,
        errors = total.errors,
        "Outcome tracker stopped"
    );
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{filer_decision, new_item, retriever_decision, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn terminal_move_updates_linked_decisions() {
        let svc = test_service().await;
        let item = svc.create_item(new_item("usr-1", "File taxes")).await.unwrap();
        let mut linked = filer_decision("usr-1", &[]);
        linked.item_id = Some(item.id.clone());
        let linked = svc.create_decision(linked).await.unwrap();
        let unrelated = svc.create_decision(retriever_decision("usr-1")).await.unwrap();

        svc.transition_item(&item.id, ItemStatus::Doing).await.unwrap();
        let moved = svc.move_item(&item.id, ItemStatus::Done).await.unwrap();
        assert!(moved.terminal);
        assert_eq!(
            moved.tracker,
            Some(TrackerReport {
                events: 1,
                decisions_updated: 1,
                errors: 0
            })
        );

        let d = svc.get_decision(&linked.id).await.unwrap();
        let m = d.outcome();
        assert_eq!(m.completed_successfully, Some(true));
        assert_eq!(m.cycle_count, Some(0));
        // completion_success 1.0 x 0.5; under a minute in DOING records no time
        assert!((d.reward.unwrap() - 0.5).abs() < 1e-9);

        assert!(svc.get_decision(&unrelated.id).await.unwrap().reward.is_none());
    }

    #[tokio::test]
    async fn archiving_keeps_terminal_reward() {
        let svc = test_service().await;
        let item = svc.create_item(new_item("usr-1", "Renew passport")).await.unwrap();
        let mut linked = filer_decision("usr-1", &[]);
        linked.item_id = Some(item.id.clone());
        let linked = svc.create_decision(linked).await.unwrap();

        svc.transition_item(&item.id, ItemStatus::Doing).await.unwrap();
        svc.move_item(&item.id, ItemStatus::Done).await.unwrap();
        let done = svc.get_decision(&linked.id).await.unwrap();
        assert!((done.reward.unwrap() - 0.5).abs() < 1e-9);

        let archived = svc.move_item(&item.id, ItemStatus::Archive).await.unwrap();
        assert!(!archived.terminal);

        let res = svc.compute_reward(&linked.id).await.unwrap();
        assert!((res.reward - 0.5).abs() < 1e-9);
        assert_eq!(res.decision.reward_components, done.reward_components);
        assert_eq!(res.decision.outcome().completed_successfully, Some(true));
    }

    #[tokio::test]
    async fn non_terminal_move_runs_nothing() {
        let svc = test_service().await;
        let item = svc.create_item(new_item("usr-1", "Plan trip")).await.unwrap();
        let moved = svc.move_item(&item.id, ItemStatus::Todo).await.unwrap();
        assert!(!moved.terminal);
        assert_eq!(moved.tracker, None);
    }

    #[tokio::test]
    async fn replayed_event_is_idempotent() {
        let svc = test_service().await;
        let item = svc.create_item(new_item("usr-1", "Old idea")).await.unwrap();
        let mut linked = filer_decision("usr-1", &[]);
        linked.item_id = Some(item.id.clone());
        let linked = svc.create_decision(linked).await.unwrap();

        let event = svc
            .transition_item(&item.id, ItemStatus::ColdStorage)
            .await
            .unwrap()
            .event
            .unwrap();

        svc.handle_outcome_event(&event).await.unwrap();
        let first = svc.get_decision(&linked.id).await.unwrap();
        svc.handle_outcome_event(&event).await.unwrap();
        let second = svc.get_decision(&linked.id).await.unwrap();

        assert_eq!(first.outcome_metrics, second.outcome_metrics);
        assert_eq!(first.reward, second.reward);
        assert_eq!(first.reward_components, second.reward_components);
        // completion_success -0.3 x 0.5
        assert!((first.reward.unwrap() + 0.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn tracker_keeps_manual_outcome_fields() {
        let svc = test_service().await;
        let item = svc.create_item(new_item("usr-1", "Report")).await.unwrap();
        let mut linked = filer_decision("usr-1", &[]);
        linked.item_id = Some(item.id.clone());
        let linked = svc.create_decision(linked).await.unwrap();
        svc.record_outcome(
            &linked.id,
            &ocd_core::outcome::OutcomeMetrics {
                opportunity_cost: Some(2.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        svc.move_item(&item.id, ItemStatus::Done).await.unwrap();
        let m = svc.get_decision(&linked.id).await.unwrap().outcome();
        assert_eq!(m.opportunity_cost, Some(2.0));
        assert_eq!(m.completed_successfully, Some(true));
    }

    #[tokio::test]
    async fn run_tracker_drains_channel() {
        let svc = Arc::new(test_service().await);
        let item = svc.create_item(new_item("usr-1", "Launch")).await.unwrap();
        let mut linked = filer_decision("usr-1", &[]);
        linked.item_id = Some(item.id.clone());
        svc.create_decision(linked).await.unwrap();

        let event = svc
            .transition_item(&item.id, ItemStatus::Done)
            .await
            .unwrap()
            .event
            .unwrap();

        let (tx, rx) = mpsc::channel(8);
        tx.send(event).await.unwrap();
        tx.send(OutcomeEvent::ItemTerminal {
            item_id: "itm-00000000".into(),
            status: ItemStatus::Done,
            at: Utc::now(),
        })
        .await
        .unwrap();
        drop(tx);

        let report = run_tracker(Arc::clone(&svc), rx).await;
        assert_eq!(
            report,
            TrackerReport {
                events: 2,
                decisions_updated: 1,
                errors: 1
            }
        );
    }
}
