//! Typed state/action payloads, one variant per agent.
//!
//! A decision's `agent_type` is never stored separately from its payload:
//! it is read off the `AgentPayload` variant, so state, action and correction
//! always belong to the same agent.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::enums::{AgentType, FindingKind, Priority, Swimlane};
use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Filer
// ---------------------------------------------------------------------------

/// What the Filer saw: the captured instructions and routing context.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FilerState {
    pub instructions: String,
    #[serde(default)]
    pub routing_notes: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub known_projects: Vec<String>,
}

/// Classification assigned by the Filer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FilerAction {
    #[serde(default)]
    pub swimlane: Option<Swimlane>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub urgency: Option<String>,
}

// ---------------------------------------------------------------------------
// Librarian
// ---------------------------------------------------------------------------

/// Short description of an item, as handed to the Librarian.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ItemBrief {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LibrarianState {
    pub new_item: ItemBrief,
    #[serde(default)]
    pub strategic_context: Option<String>,
    #[serde(default)]
    pub corpus: Vec<ItemBrief>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LibrarianFinding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LibrarianAction {
    #[serde(default)]
    pub findings: Vec<LibrarianFinding>,
}

// ---------------------------------------------------------------------------
// Prioritizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PrioritizerState {
    #[serde(default)]
    pub candidate_item_ids: Vec<String>,
    #[serde(default)]
    pub energy_level: Option<String>,
    #[serde(default)]
    pub strategic_context: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PrioritizerAction {
    pub recommended_item_id: String,
}

// ---------------------------------------------------------------------------
// Storer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StorerState {
    pub content: String,
    #[serde(default)]
    pub existing_collections: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StorerAction {
    pub collection: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

// ---------------------------------------------------------------------------
// Retriever
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RetrieverState {
    pub query: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RetrieverAction {
    pub generated_content: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Exchange / payload unions
// ---------------------------------------------------------------------------

/// One agent's observed state, chosen action, and the human's replacement
/// action (if feedback supplied one).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Exchange<S, A> {
    pub state: S,
    pub action: A,
    #[serde(default)]
    pub correction: Option<A>,
}

impl<S, A> Exchange<S, A> {
    pub const fn new(state: S, action: A) -> Self {
        Self {
            state,
            action,
            correction: None,
        }
    }
}

/// The state/action record of a decision, tagged by agent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "agent_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentPayload {
    Filer(Exchange<FilerState, FilerAction>),
    Librarian(Exchange<LibrarianState, LibrarianAction>),
    Prioritizer(Exchange<PrioritizerState, PrioritizerAction>),
    Storer(Exchange<StorerState, StorerAction>),
    Retriever(Exchange<RetrieverState, RetrieverAction>),
}

/// An action detached from its decision, e.g. a human correction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "agent_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentAction {
    Filer(FilerAction),
    Librarian(LibrarianAction),
    Prioritizer(PrioritizerAction),
    Storer(StorerAction),
    Retriever(RetrieverAction),
}

impl AgentAction {
    #[must_use]
    pub const fn agent_type(&self) -> AgentType {
        match self {
            Self::Filer(_) => AgentType::Filer,
            Self::Librarian(_) => AgentType::Librarian,
            Self::Prioritizer(_) => AgentType::Prioritizer,
            Self::Storer(_) => AgentType::Storer,
            Self::Retriever(_) => AgentType::Retriever,
        }
    }

    /// Parse an untagged action JSON object for the given agent.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the value does not fit the agent's
    /// action shape.
    pub fn from_value(agent: AgentType, value: serde_json::Value) -> Result<Self, CoreError> {
        Ok(match agent {
            AgentType::Filer => Self::Filer(parse_part(agent, "action", value)?),
            AgentType::Librarian => Self::Librarian(parse_part(agent, "action", value)?),
            AgentType::Prioritizer => Self::Prioritizer(parse_part(agent, "action", value)?),
            AgentType::Storer => Self::Storer(parse_part(agent, "action", value)?),
            AgentType::Retriever => Self::Retriever(parse_part(agent, "action", value)?),
        })
    }

    /// The action as a plain JSON object, without the agent tag.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn to_untagged(&self) -> Result<serde_json::Value, CoreError> {
        match self {
            Self::Filer(a) => to_value(a),
            Self::Librarian(a) => to_value(a),
            Self::Prioritizer(a) => to_value(a),
            Self::Storer(a) => to_value(a),
            Self::Retriever(a) => to_value(a),
        }
    }
}

impl AgentPayload {
    #[must_use]
    pub const fn agent_type(&self) -> AgentType {
        match self {
            Self::Filer(_) => AgentType::Filer,
            Self::Librarian(_) => AgentType::Librarian,
            Self::Prioritizer(_) => AgentType::Prioritizer,
            Self::Storer(_) => AgentType::Storer,
            Self::Retriever(_) => AgentType::Retriever,
        }
    }

    /// Rebuild a payload from its stored untagged JSON parts.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if any part does not fit the agent's shape.
    pub fn from_parts(
        agent: AgentType,
        state: serde_json::Value,
        action: serde_json::Value,
        correction: Option<serde_json::Value>,
    ) -> Result<Self, CoreError> {
        Ok(match agent {
            AgentType::Filer => Self::Filer(exchange_from_parts(agent, state, action, correction)?),
            AgentType::Librarian => {
                Self::Librarian(exchange_from_parts(agent, state, action, correction)?)
            }
            AgentType::Prioritizer => {
                Self::Prioritizer(exchange_from_parts(agent, state, action, correction)?)
            }
            AgentType::Storer => {
                Self::Storer(exchange_from_parts(agent, state, action, correction)?)
            }
            AgentType::Retriever => {
                Self::Retriever(exchange_from_parts(agent, state, action, correction)?)
            }
        })
    }

    /// Attach a human correction. The correction must belong to the same agent.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` on an agent mismatch.
    pub fn set_correction(&mut self, correction: AgentAction) -> Result<(), CoreError> {
        let expected = self.agent_type();
        match (self, correction) {
            (Self::Filer(ex), AgentAction::Filer(a)) => ex.correction = Some(a),
            (Self::Librarian(ex), AgentAction::Librarian(a)) => ex.correction = Some(a),
            (Self::Prioritizer(ex), AgentAction::Prioritizer(a)) => ex.correction = Some(a),
            (Self::Storer(ex), AgentAction::Storer(a)) => ex.correction = Some(a),
            (Self::Retriever(ex), AgentAction::Retriever(a)) => ex.correction = Some(a),
            (_, other) => {
                return Err(CoreError::Validation(format!(
                    "correction for {} cannot be attached to a {expected} decision",
                    other.agent_type()
                )));
            }
        }
        Ok(())
    }

    /// The agent's action, detached from state.
    #[must_use]
    pub fn action(&self) -> AgentAction {
        match self {
            Self::Filer(ex) => AgentAction::Filer(ex.action.clone()),
            Self::Librarian(ex) => AgentAction::Librarian(ex.action.clone()),
            Self::Prioritizer(ex) => AgentAction::Prioritizer(ex.action.clone()),
            Self::Storer(ex) => AgentAction::Storer(ex.action.clone()),
            Self::Retriever(ex) => AgentAction::Retriever(ex.action.clone()),
        }
    }

    /// The human correction, if any.
    #[must_use]
    pub fn correction(&self) -> Option<AgentAction> {
        match self {
            Self::Filer(ex) => ex.correction.clone().map(AgentAction::Filer),
            Self::Librarian(ex) => ex.correction.clone().map(AgentAction::Librarian),
            Self::Prioritizer(ex) => ex.correction.clone().map(AgentAction::Prioritizer),
            Self::Storer(ex) => ex.correction.clone().map(AgentAction::Storer),
            Self::Retriever(ex) => ex.correction.clone().map(AgentAction::Retriever),
        }
    }

    /// Untagged JSON of the state, as stored and exported.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn state_json(&self) -> Result<serde_json::Value, CoreError> {
        match self {
            Self::Filer(ex) => to_value(&ex.state),
            Self::Librarian(ex) => to_value(&ex.state),
            Self::Prioritizer(ex) => to_value(&ex.state),
            Self::Storer(ex) => to_value(&ex.state),
            Self::Retriever(ex) => to_value(&ex.state),
        }
    }

    /// Untagged JSON of the action.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn action_json(&self) -> Result<serde_json::Value, CoreError> {
        self.action().to_untagged()
    }

    /// Untagged JSON of the correction, if any.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn correction_json(&self) -> Result<Option<serde_json::Value>, CoreError> {
        self.correction().map(|c| c.to_untagged()).transpose()
    }
}

fn exchange_from_parts<S, A>(
    agent: AgentType,
    state: serde_json::Value,
    action: serde_json::Value,
    correction: Option<serde_json::Value>,
) -> Result<Exchange<S, A>, CoreError>
where
    S: DeserializeOwned,
    A: DeserializeOwned,
{
    Ok(Exchange {
        state: parse_part(agent, "state", state)?,
        action: parse_part(agent, "action", action)?,
        correction: correction
            .map(|c| parse_part(agent, "correction", c))
            .transpose()?,
    })
}

fn parse_part<T: DeserializeOwned>(
    agent: AgentType,
    part: &str,
    value: serde_json::Value,
) -> Result<T, CoreError> {
    serde_json::from_value(value)
        .map_err(|e| CoreError::Validation(format!("invalid {agent} {part}: {e}")))
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Other(e.into()))
}
