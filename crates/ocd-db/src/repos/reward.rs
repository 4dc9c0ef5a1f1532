//! Reward recomputation on top of the decision store.
//!
//! Every path that changes a reward input (feedback, outcome, item terminal
//! transition) ends in [`OcdService::compute_reward`], which reads the
//! decision fresh and overwrites the reward columns.

use chrono::{Duration, Utc};

use ocd_core::entities::Decision;
use ocd_core::enums::{AgentType, Feedback};
use ocd_core::errors::CoreError;
use ocd_core::outcome::OutcomeMetrics;
use ocd_core::payload::AgentAction;
use ocd_core::responses::{BatchReport, DecisionRewardResponse};
use ocd_reward::{RewardContext, score};

use crate::error::DatabaseError;
use crate::service::OcdService;
use crate::updates::decision::DecisionUpdateBuilder;

impl OcdService {
    /// Gather what the calculators need besides the decision: the subject
    /// item, and for Filer decisions the user's current strategic focus.
    pub async fn reward_context(&self, decision: &Decision) -> Result<RewardContext, DatabaseError> {
        let item = match decision.item_id.as_deref() {
            Some(item_id) => self.find_item(item_id).await?,
            None => None,
        };

        let focus = if item.is_some() && decision.agent_type() == AgentType::Filer {
            let policy = &self.policy().focus;
            let since = Utc::now() - Duration::days(i64::from(policy.window_days));
            let completed = self.completions_since(&decision.user_id, since).await?;
            policy.resolve(&completed)
        } else {
            None
        };

        Ok(RewardContext { item, focus })
    }

    /// Recompute and store the reward of one decision.
    ///
    /// A pure function of the stored decision, its context and the current
    /// weights: calling it twice yields the same reward.
    pub async fn compute_reward(&self, id: &str) -> Result<DecisionRewardResponse, DatabaseError> {
        let decision = self.get_decision(id).await?;
        let ctx = self.reward_context(&decision).await?;
        let scored = score(&decision, &ctx, &self.policy().weights);
        let decision = self.store_reward(&decision, &scored).await?;
        Ok(DecisionRewardResponse {
            decision,
            reward: scored.reward,
        })
    }

    /// Record user feedback (with an optional replacement action) and
    /// recompute the reward. Feedback is given once per decision.
    ///
    /// Feedback that does not carry a correction clears any stale one.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` when the decision already has feedback, when a
    /// correction accompanies `CONFIRMED` or `IGNORED`, or when it belongs to
    /// another agent. `DatabaseError::NoResult` when the decision does not
    /// exist.
    pub async fn submit_feedback(
        &self,
        id: &str,
        feedback: Feedback,
        correction: Option<AgentAction>,
    ) -> Result<DecisionRewardResponse, DatabaseError> {
        let existing = self.get_decision(id).await?;
        if let Some(previous) = existing.user_feedback {
            return Err(CoreError::Validation(format!(
                "feedback already recorded for {id} ({previous})"
            ))
            .into());
        }

        let mut update = DecisionUpdateBuilder::new().feedback(feedback);
        if feedback.carries_correction() {
            if correction.is_some() {
                update = update.correction(correction);
            }
        } else {
            if correction.is_some() {
                return Err(CoreError::Validation(format!(
                    "{feedback} feedback cannot carry a correction"
                ))
                .into());
            }
            update = update.correction(None);
        }

        self.update_decision(id, update.build()).await?;
        self.compute_reward(id).await
    }

    /// Merge outcome metrics and recompute the reward.
    pub async fn submit_outcome(
        &self,
        id: &str,
        metrics: &OutcomeMetrics,
    ) -> Result<DecisionRewardResponse, DatabaseError> {
        self.record_outcome(id, metrics).await?;
        self.compute_reward(id).await
    }

    /// Compute rewards for every decision still waiting for one: reward
    /// unset, and either feedback given or the subject item terminal.
    ///
    /// Walks pending IDs in pages of `page_size` with a keyset cursor. A
    /// failing decision is logged and counted, never fatal to the batch.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` only if the pending-ID query itself fails.
    pub async fn compute_pending_rewards(&self, page_size: u32) -> Result<BatchReport, DatabaseError> {
        let page_size = page_size.max(1);
        let mut report = BatchReport::default();
        let mut cursor = String::new();

        loop {
            let ids = self.pending_reward_ids(&cursor, page_size).await?;
            let Some(last) = ids.last() else {
                break;
            };
            cursor.clone_from(last);

            for id in &ids {
                match self.compute_reward(id).await {
                    Ok(_) => report.processed += 1,
                    Err(e) => {
                        tracing::warn!(decision_id = %id, error = %e, "Reward computation failed");
                        report.errors += 1;
                    }
                }
            }

            if ids.len() < usize::try_from(page_size).unwrap_or(usize::MAX) {
                break;
            }
        }

        tracing::info!(
            processed = report.processed,
            errors = report.errors,
            "Pending reward batch finished"
        );
        Ok(report)
    }

    async fn pending_reward_ids(&self, after: &str, limit: u32) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT d.id FROM decisions d
                     LEFT JOIN items i ON i.id = d.item_id
                     WHERE d.reward IS NULL
                       AND (d.user_feedback IS NOT NULL OR i.status IN ('DONE', 'COLD_STORAGE'))
                       AND d.id > ?1
                     ORDER BY d.id LIMIT {limit}"
                ),
                [after],
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }
}
