//! Response types returned as JSON by `ocd` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Decision, Item};

/// Response from `ocd reward pending`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: u32,
    pub errors: u32,
}

/// Aggregate stats of the outcome tracker.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrackerReport {
    pub events: u32,
    pub decisions_updated: u32,
    pub errors: u32,
}

impl TrackerReport {
    pub const fn absorb(&mut self, other: Self) {
        self.events += other.events;
        self.decisions_updated += other.decisions_updated;
        self.errors += other.errors;
    }
}

/// Response from `ocd item move`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ItemMoveResponse {
    pub item: Item,
    pub terminal: bool,
    pub tracker: Option<TrackerReport>,
}

/// Response from `ocd decision feedback|outcome` and `ocd reward compute`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DecisionRewardResponse {
    pub decision: Decision,
    pub reward: f64,
}

/// Response from `ocd export` when writing to a file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportResponse {
    pub path: String,
    pub written: u32,
}
