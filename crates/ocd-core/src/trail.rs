//! JSONL trail operation envelope.
//!
//! Every mutation is recorded as a `TrailOperation` in per-actor
//! `{data_dir}/trail/{actor}.jsonl` files, next to the audit table.
//!
//! The `v` field supports schema versioning: trail lines without a `v` field
//! deserialize with `v == 1`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, TrailOp};

const fn default_trail_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL trail.
///
/// `data` contains the full entity for `Create` ops and only the changed
/// fields for `Update` and `Transition`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// RFC 3339 timestamp of the operation.
    pub ts: String,

    /// User the mutation belongs to. Also names the trail file.
    pub actor: String,

    pub op: TrailOp,
    pub entity: EntityType,
    pub id: String,
    pub data: serde_json::Value,
}
