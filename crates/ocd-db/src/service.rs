//! Service layer orchestrating database mutations with audit and trail.
//!
//! `OcdService` wraps `OcdDb` (raw database access), `TrailWriter` (JSONL
//! persistence) and the `RewardPolicy` used whenever a reward is recomputed.
//! All repo methods are implemented as `impl OcdService`.

use std::path::PathBuf;

use ocd_reward::RewardPolicy;

use crate::OcdDb;
use crate::error::DatabaseError;
use crate::trail::writer::TrailWriter;

/// Orchestrates database mutations with audit trail and JSONL trail.
///
/// Every mutation method follows this protocol:
/// 1. Execute SQL
/// 2. Append audit entry
/// 3. Append JSONL trail operation (file I/O)
pub struct OcdService {
    db: OcdDb,
    trail: TrailWriter,
    policy: RewardPolicy,
}

impl OcdService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `trail_dir` - Directory for JSONL trail files. `None` disables trail writing.
    /// * `policy` - Weights and focus tuning for reward computation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(
        db_path: &str,
        trail_dir: Option<PathBuf>,
        policy: RewardPolicy,
    ) -> Result<Self, DatabaseError> {
        let db = OcdDb::open_local(db_path).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self { db, trail, policy })
    }

    /// Create from an existing `OcdDb`.
    #[must_use]
    pub const fn from_db(db: OcdDb, trail: TrailWriter, policy: RewardPolicy) -> Self {
        Self { db, trail, policy }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &OcdDb {
        &self.db
    }

    /// Access the trail writer mutably (e.g., to disable it for a bulk job).
    pub const fn trail_mut(&mut self) -> &mut TrailWriter {
        &mut self.trail
    }

    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    /// The scoring policy applied on every recompute.
    #[must_use]
    pub const fn policy(&self) -> &RewardPolicy {
        &self.policy
    }

    /// Swap the scoring policy. Stored rewards are untouched until recomputed.
    pub fn set_policy(&mut self, policy: RewardPolicy) {
        self.policy = policy;
    }
}
