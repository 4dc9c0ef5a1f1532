//! Agent types, feedback values, item lifecycle enums, and trail/audit kinds.
//!
//! Domain enums shared with the item tracker (`AgentType`, `Feedback`,
//! `ItemStatus`, `Swimlane`, `Priority`) serialize as `SCREAMING_SNAKE_CASE`,
//! matching the values stored by the task application. Bookkeeping enums
//! (`EntityType`, `AuditAction`, `TrailOp`) use `snake_case`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AgentType
// ---------------------------------------------------------------------------

/// The AI role that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentType {
    Filer,
    Librarian,
    Prioritizer,
    Storer,
    Retriever,
}

impl AgentType {
    pub const ALL: [Self; 5] = [
        Self::Filer,
        Self::Librarian,
        Self::Prioritizer,
        Self::Storer,
        Self::Retriever,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filer => "FILER",
            Self::Librarian => "LIBRARIAN",
            Self::Prioritizer => "PRIORITIZER",
            Self::Storer => "STORER",
            Self::Retriever => "RETRIEVER",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Human review verdict on an agent action. Set at most once per decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feedback {
    Confirmed,
    Corrected,
    Ignored,
    Overridden,
}

impl Feedback {
    /// Whether this verdict replaces the agent's action with a human one.
    #[must_use]
    pub const fn carries_correction(self) -> bool {
        matches!(self, Self::Corrected | Self::Overridden)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Corrected => "CORRECTED",
            Self::Ignored => "IGNORED",
            Self::Overridden => "OVERRIDDEN",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ItemStatus
// ---------------------------------------------------------------------------

/// Workflow status of a subject item.
///
/// ```text
/// inbox / backlog / todo / doing / in_review / blocked  (free movement)
///        → done ─────────┐
///        → cold_storage ─┴→ archive
/// ```
///
/// `DONE` and `COLD_STORAGE` are terminal: outcome evaluation becomes final
/// there and the only remaining move is into the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Inbox,
    Backlog,
    Todo,
    Doing,
    InReview,
    Blocked,
    Done,
    ColdStorage,
    Archive,
}

impl ItemStatus {
    /// Statuses whose arrival triggers outcome evaluation.
    pub const TERMINAL: [Self; 2] = [Self::Done, Self::ColdStorage];

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::ColdStorage)
    }

    /// Check whether moving to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return false;
        }
        match self {
            Self::Archive => false,
            Self::Done | Self::ColdStorage => next == Self::Archive,
            _ => next != Self::Archive,
        }
    }

    /// Moving back out of review counts as one rework cycle.
    #[must_use]
    pub const fn is_rework(self, next: Self) -> bool {
        matches!(self, Self::InReview) && matches!(next, Self::Doing | Self::Todo)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "INBOX",
            Self::Backlog => "BACKLOG",
            Self::Todo => "TODO",
            Self::Doing => "DOING",
            Self::InReview => "IN_REVIEW",
            Self::Blocked => "BLOCKED",
            Self::Done => "DONE",
            Self::ColdStorage => "COLD_STORAGE",
            Self::Archive => "ARCHIVE",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Swimlane
// ---------------------------------------------------------------------------

/// Kanban swimlane assigned by the Filer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Swimlane {
    Expedite,
    Project,
    Habit,
    Home,
}

impl Swimlane {
    /// Historical average time in the active state, in minutes.
    #[must_use]
    pub const fn base_minutes(self) -> f64 {
        match self {
            Self::Expedite => 120.0,
            Self::Project => 480.0,
            Self::Habit => 60.0,
            Self::Home => 180.0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expedite => "EXPEDITE",
            Self::Project => "PROJECT",
            Self::Habit => "HABIT",
            Self::Home => "HOME",
        }
    }
}

impl fmt::Display for Swimlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Scales the swimlane base duration.
    #[must_use]
    pub const fn time_multiplier(self) -> f64 {
        match self {
            Self::High => 0.8,
            Self::Medium => 1.0,
            Self::Low => 1.2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FindingKind
// ---------------------------------------------------------------------------

/// Kind of finding produced by the Librarian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum FindingKind {
    Conflict,
    Dependency,
    Redundancy,
    Relation,
    Suggestion,
}

impl FindingKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "Conflict",
            Self::Dependency => "Dependency",
            Self::Redundancy => "Redundancy",
            Self::Relation => "Relation",
            Self::Suggestion => "Suggestion",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    FeedbackRecorded,
    OutcomeRecorded,
    RewardComputed,
    StatusChanged,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::FeedbackRecorded => "feedback_recorded",
            Self::OutcomeRecorded => "outcome_recorded",
            Self::RewardComputed => "reward_computed",
            Self::StatusChanged => "status_changed",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity, used in the audit trail and JSONL trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Decision,
    Item,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decision => "decision",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Operation type recorded in JSONL trail files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    Create,
    Update,
    Transition,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Transition => "transition",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
