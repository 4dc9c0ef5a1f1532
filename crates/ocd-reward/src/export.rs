//! Training export: one chat-format JSON line per decision.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use ocd_core::entities::Decision;
use ocd_core::enums::{AgentType, Feedback};
use ocd_core::outcome::OutcomeMetrics;
use ocd_core::payload::AgentPayload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_jsonlines::{JsonLinesWriter, write_json_lines};

use crate::aggregate::aggregate;
use crate::components::RewardComponents;
use crate::error::RewardError;
use crate::weights::RewardWeights;

pub const DEFAULT_EXPORT_LIMIT: u32 = 1000;
pub const DEFAULT_MIN_REWARD: f64 = -2.0;

pub const FILER_SYSTEM_PROMPT: &str = "You are the Filer for a personal organization system. \
Read the human's instructions, any routing notes, the project the item was routed to, and the \
known projects, then classify the item. Return one JSON object with the keys \"swimlane\" \
(Expedite, Project, Habit or Home), \"priority\" (High, Medium or Low), \"labels\" (strategic \
labels such as \"Job 1 (Income)\" or \"Job 2 (Authority)\" plus any matching project name) and \
\"urgency\" (\"To Do\" or \"On Hold\"). Return only the raw JSON object.";

pub const LIBRARIAN_SYSTEM_PROMPT: &str = "You are the Librarian, a project analyst. Compare the \
new item against the strategic context and the other items in its project. Report conflicts with \
strategic goals, dependencies on unfinished items, redundant work, related items, and actionable \
suggestions. Return only a JSON array whose elements have \"type\" (Conflict, Dependency, \
Redundancy, Relation or Suggestion) and \"text\". Return [] if nothing applies.";

pub const PRIORITIZER_SYSTEM_PROMPT: &str =
    "You are the Prioritizer AI. Select the next Item to work on.";

/// Which of the train/validation partitions to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportSplit {
    #[default]
    Training,
    Validation,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Selection of decisions to export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFilter {
    pub agent_type: Option<AgentType>,
    pub user_id: Option<String>,
    /// Lower bound on the reward of rewarded decisions.
    pub min_reward: f64,
    /// Also drop decisions that have no reward yet.
    pub require_reward: bool,
    pub require_feedback: bool,
    pub split: ExportSplit,
    pub order: ExportOrder,
    pub limit: u32,
}

impl Default for ExportFilter {
    fn default() -> Self {
        Self {
            agent_type: None,
            user_id: None,
            min_reward: DEFAULT_MIN_REWARD,
            require_reward: false,
            require_feedback: false,
            split: ExportSplit::default(),
            order: ExportOrder::default(),
            limit: DEFAULT_EXPORT_LIMIT,
        }
    }
}

impl ExportFilter {
    /// Whether a single decision passes the filter. Ordering and limit are
    /// applied by the caller.
    #[must_use]
    pub fn matches(&self, decision: &Decision) -> bool {
        if self.agent_type.is_some_and(|a| a != decision.agent_type()) {
            return false;
        }
        if self
            .user_id
            .as_deref()
            .is_some_and(|u| u != decision.user_id)
        {
            return false;
        }
        match decision.reward {
            Some(r) if r < self.min_reward => return false,
            None if self.require_reward => return false,
            _ => {}
        }
        if self.require_feedback && decision.user_feedback.is_none() {
            return false;
        }
        match self.split {
            ExportSplit::Training => decision.is_training_data,
            ExportSplit::Validation => decision.is_validation_data,
            ExportSplit::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub decision_id: String,
    pub agent_type: AgentType,
    pub item_id: Option<String>,
    pub opus_id: Option<String>,
    pub user_feedback: Option<Feedback>,
    pub user_correction: Option<Value>,
    pub outcome_metrics: Option<OutcomeMetrics>,
    pub reward_components: Option<Value>,
    pub model_version: String,
    pub created_at: String,
    pub reward_computed_at: Option<String>,
}

/// One line of the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub messages: Vec<ChatMessage>,
    pub reward: f64,
    pub metadata: ExportMetadata,
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn system_prompt(agent: AgentType) -> String {
    match agent {
        AgentType::Filer => FILER_SYSTEM_PROMPT.to_string(),
        AgentType::Librarian => LIBRARIAN_SYSTEM_PROMPT.to_string(),
        AgentType::Prioritizer => PRIORITIZER_SYSTEM_PROMPT.to_string(),
        AgentType::Storer | AgentType::Retriever => format!("You are the {agent} AI agent."),
    }
}

fn assistant_turn(decision: &Decision) -> Result<Value, RewardError> {
    let mut turn = match &decision.payload {
        AgentPayload::Prioritizer(ex) => {
            let mut m = Map::new();
            m.insert(
                "recommended_item_id".into(),
                Value::String(ex.action.recommended_item_id.clone()),
            );
            m
        }
        payload => match payload.action_json()? {
            Value::Object(m) => m,
            other => {
                let mut m = Map::new();
                m.insert("action".into(), other);
                m
            }
        },
    };

    turn.insert("reasoning".into(), decision.reasoning.clone().into());
    if matches!(decision.agent_type(), AgentType::Filer | AgentType::Prioritizer) {
        turn.insert("confidence".into(), decision.confidence.into());
    }
    Ok(Value::Object(turn))
}

impl TrainingExample {
    /// Format a decision as a training example. Unrewarded decisions export
    /// with reward 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn from_decision(decision: &Decision) -> Result<Self, RewardError> {
        let agent = decision.agent_type();
        let state = decision.payload.state_json()?;
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: system_prompt(agent),
            },
            ChatMessage {
                role: Role::User,
                content: state.to_string(),
            },
            ChatMessage {
                role: Role::Assistant,
                content: assistant_turn(decision)?.to_string(),
            },
        ];

        Ok(Self {
            messages,
            reward: decision.reward.unwrap_or(0.0),
            metadata: ExportMetadata {
                decision_id: decision.id.clone(),
                agent_type: agent,
                item_id: decision.item_id.clone(),
                opus_id: decision.opus_id.clone(),
                user_feedback: decision.user_feedback,
                user_correction: decision.payload.correction_json()?,
                outcome_metrics: decision.outcome_metrics.clone(),
                reward_components: decision.reward_components.clone(),
                model_version: decision.model_version.clone(),
                created_at: iso(decision.created_at),
                reward_computed_at: decision.reward_computed_at.map(iso),
            },
        })
    }

    /// Recompute the reward from the exported components and `weights`.
    /// Lines without components re-derive to 0.
    ///
    /// # Errors
    ///
    /// Returns `RewardError::Components` if the exported tree has the wrong shape.
    pub fn rederive_reward(&self, weights: &RewardWeights) -> Result<f64, RewardError> {
        match &self.metadata.reward_components {
            None => Ok(0.0),
            Some(tree) => {
                let components =
                    RewardComponents::from_value(self.metadata.agent_type, tree.clone())?;
                Ok(aggregate(&components, weights))
            }
        }
    }
}

/// Format decisions as training examples.
///
/// # Errors
///
/// Fails on the first decision whose payload cannot be serialized.
pub fn build_examples(decisions: &[Decision]) -> Result<Vec<TrainingExample>, RewardError> {
    decisions.iter().map(TrainingExample::from_decision).collect()
}

/// Write examples as JSONL to `path`, replacing the file.
///
/// # Errors
///
/// Returns `RewardError::Io` if the file cannot be written.
pub fn write_jsonl_file(path: &Path, examples: &[TrainingExample]) -> Result<(), RewardError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_json_lines(path, examples)?;
    tracing::debug!(path = %path.display(), count = examples.len(), "Wrote training export");
    Ok(())
}

/// Write examples as JSONL to any writer (e.g. stdout).
///
/// # Errors
///
/// Returns `RewardError::Io` on write failure.
pub fn write_jsonl<W: Write>(writer: W, examples: &[TrainingExample]) -> Result<(), RewardError> {
    let mut lines = JsonLinesWriter::new(writer);
    lines.write_all(examples)?;
    lines.flush()?;
    Ok(())
}
