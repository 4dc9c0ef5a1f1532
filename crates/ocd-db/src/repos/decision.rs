//! Decision repository: the append-mostly ledger of agent decisions.
//!
//! Writes are split by column group so concurrent writers never clobber each
//! other: feedback columns via [`OcdService::update_decision`], outcome metrics
//! via a single `json_patch` statement in [`OcdService::record_outcome`], and
//! reward columns via [`OcdService::store_reward`].

use chrono::Utc;

use ocd_core::audit_detail::{FeedbackRecordedDetail, RewardComputedDetail};
use ocd_core::entities::Decision;
use ocd_core::enums::{AgentType, AuditAction, EntityType, TrailOp};
use ocd_core::errors::CoreError;
use ocd_core::ids::PREFIX_DECISION;
use ocd_core::outcome::OutcomeMetrics;
use ocd_core::payload::AgentPayload;
use ocd_core::trail::TrailOperation;
use ocd_reward::Scored;
use ocd_reward::export::ExportOrder;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_json_column, parse_optional_datetime,
    parse_optional_json, to_json_text, to_json_value,
};
use crate::service::OcdService;
use crate::updates::decision::DecisionUpdate;

const SELECT_COLS: &str = "id, agent_type, state, action, user_correction, model_version, \
     user_id, item_id, opus_id, confidence, reasoning, alternative_actions, user_feedback, \
     feedback_at, outcome_metrics, outcome_observed_at, reward, reward_components, \
     reward_computed_at, is_training_data, is_validation_data, created_at";

const DEFAULT_LIST_LIMIT: u32 = 100;

fn row_to_decision(row: &libsql::Row) -> Result<Decision, DatabaseError> {
    let agent: AgentType = parse_enum(&row.get::<String>(1)?)?;
    let payload = AgentPayload::from_parts(
        agent,
        parse_json_column("state", &row.get::<String>(2)?)?,
        parse_json_column("action", &row.get::<String>(3)?)?,
        parse_optional_json(get_opt_string(row, 4)?.as_deref())?,
    )?;

    Ok(Decision {
        id: row.get(0)?,
        payload,
        model_version: row.get(5)?,
        user_id: row.get(6)?,
        item_id: get_opt_string(row, 7)?,
        opus_id: get_opt_string(row, 8)?,
        confidence: row.get::<Option<f64>>(9)?,
        reasoning: get_opt_string(row, 10)?,
        alternative_actions: parse_optional_json(get_opt_string(row, 11)?.as_deref())?,
        user_feedback: get_opt_string(row, 12)?.as_deref().map(parse_enum).transpose()?,
        feedback_at: parse_optional_datetime(get_opt_string(row, 13)?.as_deref())?,
        outcome_metrics: get_opt_string(row, 14)?
            .map(|s| parse_json_column("outcome_metrics", &s))
            .transpose()?,
        outcome_observed_at: parse_optional_datetime(get_opt_string(row, 15)?.as_deref())?,
        reward: row.get::<Option<f64>>(16)?,
        reward_components: parse_optional_json(get_opt_string(row, 17)?.as_deref())?,
        reward_computed_at: parse_optional_datetime(get_opt_string(row, 18)?.as_deref())?,
        is_training_data: row.get::<i64>(19)? != 0,
        is_validation_data: row.get::<i64>(20)? != 0,
        created_at: parse_datetime(&row.get::<String>(21)?)?,
    })
}

/// Input for [`OcdService::create_decision`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewDecision {
    pub payload: AgentPayload,
    pub model_version: String,
    pub user_id: String,
    pub item_id: Option<String>,
    pub opus_id: Option<String>,
    /// In `[0, 1]`.
    pub confidence: Option<f64>,
    pub reasoning: Option<String>,
    /// JSON array of the actions the agent considered.
    pub alternative_actions: Option<serde_json::Value>,
    /// Hold the decision out of training and into the validation split.
    pub validation: bool,
}

impl NewDecision {
    #[must_use]
    pub fn new(
        payload: AgentPayload,
        model_version: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            payload,
            model_version: model_version.into(),
            user_id: user_id.into(),
            item_id: None,
            opus_id: None,
            confidence: None,
            reasoning: None,
            alternative_actions: None,
            validation: false,
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.model_version.trim().is_empty() {
            return Err(CoreError::Validation("model_version must not be empty".into()));
        }
        if self.user_id.trim().is_empty() {
            return Err(CoreError::Validation("user_id must not be empty".into()));
        }
        if let Some(c) = self.confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(CoreError::Validation(format!(
                    "confidence must be within [0, 1], got {c}"
                )));
            }
        }
        if self
            .alternative_actions
            .as_ref()
            .is_some_and(|a| !a.is_array())
        {
            return Err(CoreError::Validation(
                "alternative_actions must be a JSON array".into(),
            ));
        }
        Ok(())
    }
}

/// Filter for [`OcdService::find_decisions`].
#[derive(Debug, Clone, Default)]
pub struct DecisionFilter {
    pub agent_type: Option<AgentType>,
    pub item_id: Option<String>,
    pub user_id: Option<String>,
    pub has_reward: Option<bool>,
    pub has_feedback: Option<bool>,
    pub limit: Option<u32>,
    pub order: ExportOrder,
}

/// WHERE-clause accumulator with positional parameters.
#[derive(Debug, Default)]
pub(crate) struct Conditions {
    clauses: Vec<String>,
    params: Vec<libsql::Value>,
}

impl Conditions {
    /// Add a clause with one bound value. `clause` receives the parameter index.
    pub(crate) fn bind(
        &mut self,
        value: impl Into<libsql::Value>,
        clause: impl FnOnce(usize) -> String,
    ) {
        self.params.push(value.into());
        self.clauses.push(clause(self.params.len()));
    }

    pub(crate) fn raw(&mut self, clause: &str) {
        self.clauses.push(clause.to_string());
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }
}

pub(crate) const fn order_sql(order: ExportOrder) -> &'static str {
    match order {
        ExportOrder::NewestFirst => "created_at DESC, id DESC",
        ExportOrder::OldestFirst => "created_at ASC, id ASC",
    }
}

impl OcdService {
    /// Record a new decision. The agent type comes from the payload variant.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` for empty identity fields or out-of-range
    /// confidence, `CoreError::NotFound` when `item_id` names no item.
    pub async fn create_decision(&self, new: NewDecision) -> Result<Decision, DatabaseError> {
        new.validate()?;
        if let Some(item_id) = new.item_id.as_deref() {
            if self.find_item(item_id).await?.is_none() {
                return Err(CoreError::NotFound {
                    entity_type: "item".into(),
                    id: item_id.to_string(),
                }
                .into());
            }
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DECISION).await?;
        let decision = Decision {
            id: id.clone(),
            payload: new.payload,
            model_version: new.model_version,
            user_id: new.user_id,
            item_id: new.item_id,
            opus_id: new.opus_id,
            confidence: new.confidence,
            reasoning: new.reasoning,
            alternative_actions: new.alternative_actions,
            user_feedback: None,
            feedback_at: None,
            outcome_metrics: None,
            outcome_observed_at: None,
            reward: None,
            reward_components: None,
            reward_computed_at: None,
            is_training_data: !new.validation,
            is_validation_data: new.validation,
            created_at: now,
        };

        let correction = decision
            .payload
            .correction_json()?
            .map(|c| to_json_text(&c))
            .transpose()?;
        let alternatives = decision
            .alternative_actions
            .as_ref()
            .map(to_json_text)
            .transpose()?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO decisions (id, agent_type, state, action, user_correction,
                     model_version, user_id, item_id, opus_id, confidence, reasoning,
                     alternative_actions, is_training_data, is_validation_data, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                libsql::params![
                    id.as_str(),
                    decision.agent_type().as_str(),
                    to_json_text(&decision.payload.state_json()?)?,
                    to_json_text(&decision.payload.action_json()?)?,
                    correction,
                    decision.model_version.as_str(),
                    decision.user_id.as_str(),
                    decision.item_id.as_deref(),
                    decision.opus_id.as_deref(),
                    decision.confidence,
                    decision.reasoning.as_deref(),
                    alternatives,
                    i64::from(decision.is_training_data),
                    i64::from(decision.is_validation_data),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.audit(
            &decision.user_id,
            EntityType::Decision,
            &id,
            AuditAction::Created,
            None,
        )
        .await?;

        self.trail().append_validated(&TrailOperation {
            v: 1,
            ts: now.to_rfc3339(),
            actor: decision.user_id.clone(),
            op: TrailOp::Create,
            entity: EntityType::Decision,
            id,
            data: to_json_value(&decision)?,
        })?;

        tracing::debug!(decision_id = %decision.id, agent = %decision.agent_type(), "Recorded decision");
        Ok(decision)
    }

    pub async fn get_decision(&self, id: &str) -> Result<Decision, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM decisions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_decision(&row)
    }

    pub async fn find_decisions(
        &self,
        filter: &DecisionFilter,
    ) -> Result<Vec<Decision>, DatabaseError> {
        let mut conditions = Conditions::default();
        if let Some(agent) = filter.agent_type {
            conditions.bind(agent.as_str(), |i| format!("agent_type = ?{i}"));
        }
        if let Some(ref item_id) = filter.item_id {
            conditions.bind(item_id.clone(), |i| format!("item_id = ?{i}"));
        }
        if let Some(ref user_id) = filter.user_id {
            conditions.bind(user_id.clone(), |i| format!("user_id = ?{i}"));
        }
        match filter.has_reward {
            Some(true) => conditions.raw("reward IS NOT NULL"),
            Some(false) => conditions.raw("reward IS NULL"),
            None => {}
        }
        match filter.has_feedback {
            Some(true) => conditions.raw("user_feedback IS NOT NULL"),
            Some(false) => conditions.raw("user_feedback IS NULL"),
            None => {}
        }

        self.select_decisions(
            conditions,
            filter.order,
            filter.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        )
        .await
    }

    pub(crate) async fn select_decisions(
        &self,
        conditions: Conditions,
        order: ExportOrder,
        limit: u32,
    ) -> Result<Vec<Decision>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM decisions {} ORDER BY {} LIMIT {limit}",
            conditions.where_clause(),
            order_sql(order),
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(conditions.params))
            .await?;

        let mut decisions = Vec::new();
        while let Some(row) = rows.next().await? {
            decisions.push(row_to_decision(&row)?);
        }
        Ok(decisions)
    }

    /// Apply a feedback/correction/split patch. Only the columns the patch
    /// sets are written; setting feedback also stamps `feedback_at`.
    ///
    /// Does not recompute the reward; see [`Self::submit_feedback`].
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` when a correction belongs to another agent.
    pub async fn update_decision(
        &self,
        id: &str,
        update: DecisionUpdate,
    ) -> Result<Decision, DatabaseError> {
        let current = self.get_decision(id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;
        let now = Utc::now();

        if let Some(feedback) = update.user_feedback {
            sets.push(format!("user_feedback = ?{idx}"));
            params.push(feedback.as_str().into());
            idx += 1;
            sets.push(format!("feedback_at = ?{idx}"));
            params.push(now.to_rfc3339().into());
            idx += 1;
        }
        if let Some(ref correction) = update.user_correction {
            let text = match correction {
                Some(action) => {
                    current.payload.clone().set_correction(action.clone())?;
                    Some(to_json_text(&action.to_untagged()?)?)
                }
                None => None,
            };
            sets.push(format!("user_correction = ?{idx}"));
            params.push(text.map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(training) = update.is_training_data {
            sets.push(format!("is_training_data = ?{idx}"));
            params.push(i64::from(training).into());
            idx += 1;
        }
        if let Some(validation) = update.is_validation_data {
            sets.push(format!("is_validation_data = ?{idx}"));
            params.push(i64::from(validation).into());
            idx += 1;
        }

        params.push(id.into());
        let sql = format!("UPDATE decisions SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        let (action, detail) = match update.user_feedback {
            Some(feedback) => (
                AuditAction::FeedbackRecorded,
                to_json_value(&FeedbackRecordedDetail {
                    feedback,
                    has_correction: matches!(update.user_correction, Some(Some(_))),
                })?,
            ),
            None => (AuditAction::Updated, to_json_value(&update)?),
        };
        self.audit(&current.user_id, EntityType::Decision, id, action, Some(detail))
            .await?;

        self.trail().append(&TrailOperation {
            v: 1,
            ts: now.to_rfc3339(),
            actor: current.user_id.clone(),
            op: TrailOp::Update,
            entity: EntityType::Decision,
            id: id.to_string(),
            data: to_json_value(&update)?,
        })?;

        self.get_decision(id).await
    }

    /// Merge observed outcome metrics into the stored ones. Fields absent
    /// from `metrics` keep their stored value.
    ///
    /// Does not recompute the reward; see [`Self::submit_outcome`].
    pub async fn record_outcome(
        &self,
        id: &str,
        metrics: &OutcomeMetrics,
    ) -> Result<Decision, DatabaseError> {
        let current = self.get_decision(id).await?;
        if metrics.is_empty() {
            return Ok(current);
        }

        let now = Utc::now();
        let patch = to_json_text(metrics)?;
        self.db()
            .conn()
            .execute(
                "UPDATE decisions
                 SET outcome_metrics = json_patch(COALESCE(outcome_metrics, '{}'), ?1),
                     outcome_observed_at = ?2
                 WHERE id = ?3",
                libsql::params![patch, now.to_rfc3339(), id],
            )
            .await?;

        let detail = to_json_value(metrics)?;
        self.audit(
            &current.user_id,
            EntityType::Decision,
            id,
            AuditAction::OutcomeRecorded,
            Some(detail.clone()),
        )
        .await?;

        self.trail().append(&TrailOperation {
            v: 1,
            ts: now.to_rfc3339(),
            actor: current.user_id.clone(),
            op: TrailOp::Update,
            entity: EntityType::Decision,
            id: id.to_string(),
            data: serde_json::json!({ "outcome_metrics": detail }),
        })?;

        self.get_decision(id).await
    }

    /// Overwrite the reward columns with a fresh score.
    pub async fn store_reward(
        &self,
        decision: &Decision,
        scored: &Scored,
    ) -> Result<Decision, DatabaseError> {
        let now = Utc::now();
        let components = scored
            .components
            .to_value()
            .map_err(|e| DatabaseError::Other(e.into()))?;

        self.db()
            .conn()
            .execute(
                "UPDATE decisions
                 SET reward = ?1, reward_components = ?2, reward_computed_at = ?3
                 WHERE id = ?4",
                libsql::params![
                    scored.reward,
                    to_json_text(&components)?,
                    now.to_rfc3339(),
                    decision.id.as_str()
                ],
            )
            .await?;

        self.audit(
            &decision.user_id,
            EntityType::Decision,
            &decision.id,
            AuditAction::RewardComputed,
            Some(to_json_value(&RewardComputedDetail {
                reward: scored.reward,
                previous: decision.reward,
            })?),
        )
        .await?;

        self.trail().append(&TrailOperation {
            v: 1,
            ts: now.to_rfc3339(),
            actor: decision.user_id.clone(),
            op: TrailOp::Update,
            entity: EntityType::Decision,
            id: decision.id.clone(),
            data: serde_json::json!({
                "reward": scored.reward,
                "reward_components": components,
            }),
        })?;

        self.get_decision(&decision.id).await
    }
}
