//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-actor `{trail_dir}/{actor}.jsonl`
//! files. Uses `serde_jsonlines::append_json_lines` for per-line appends.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ocd_core::entities::{Decision, Item};
use ocd_core::enums::{EntityType, TrailOp};
use ocd_core::trail::TrailOperation;

use crate::error::DatabaseError;

static DECISION_VALIDATOR: OnceLock<Option<jsonschema::Validator>> = OnceLock::new();
static ITEM_VALIDATOR: OnceLock<Option<jsonschema::Validator>> = OnceLock::new();

/// Appends trail operations to per-actor JSONL files.
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a new `TrailWriter` pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// Create a disabled writer (for tests or when the trail is turned off).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a trail operation to the actor's JSONL file.
    ///
    /// File path: `{trail_dir}/{op.actor}.jsonl`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.trail_dir.join(format!("{}.jsonl", file_stem(&op.actor)));
        serde_jsonlines::append_json_lines(&path, [op])
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(())
    }

    /// Append with schema validation of the `data` field.
    ///
    /// Only `Create` ops carry a full entity and are validated; `Update` and
    /// `Transition` ops carry partial data. Validation is warn-only.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append_validated(&self, op: &TrailOperation) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        if op.op == TrailOp::Create {
            let errors = validate_entity(op.entity, &op.data);
            if !errors.is_empty() {
                tracing::warn!(
                    entity = %op.entity,
                    id = %op.id,
                    ?errors,
                    "Trail data does not match entity schema"
                );
            }
        }

        self.append(op)
    }

    /// The directory where trail files are stored.
    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }
}

/// Schema errors of a full entity payload. Empty when valid, or when the
/// schema itself could not be compiled.
#[must_use]
pub fn validate_entity(entity: EntityType, data: &serde_json::Value) -> Vec<String> {
    let validator = match entity {
        EntityType::Decision => DECISION_VALIDATOR.get_or_init(|| {
            compile(&serde_json::to_value(schemars::schema_for!(Decision)).ok()?)
        }),
        EntityType::Item => ITEM_VALIDATOR.get_or_init(|| {
            compile(&serde_json::to_value(schemars::schema_for!(Item)).ok()?)
        }),
    };
    validator.as_ref().map_or_else(Vec::new, |v| {
        v.iter_errors(data).map(|e| e.to_string()).collect()
    })
}

fn compile(schema: &serde_json::Value) -> Option<jsonschema::Validator> {
    match jsonschema::validator_for(schema) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(error = %e, "Entity schema failed to compile; trail validation off");
            None
        }
    }
}

/// Actor IDs become file names; keep them to a safe character set.
fn file_stem(actor: &str) -> String {
    let stem: String = actor
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() { "anonymous".to_string() } else { stem }
}
