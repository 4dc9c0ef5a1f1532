//! Training-export query: selects decisions with an `ExportFilter` in SQL and
//! formats them with `ocd_reward::export`.

use std::io::Write;
use std::path::Path;

use ocd_core::entities::Decision;
use ocd_reward::export::{ExportFilter, ExportSplit, TrainingExample, build_examples};

use crate::error::DatabaseError;
use crate::repos::decision::Conditions;
use crate::service::OcdService;

impl OcdService {
    /// Decisions selected by `filter`, in its order and up to its limit.
    pub async fn export_decisions(
        &self,
        filter: &ExportFilter,
    ) -> Result<Vec<Decision>, DatabaseError> {
        let mut conditions = Conditions::default();
        if let Some(agent) = filter.agent_type {
            conditions.bind(agent.as_str(), |i| format!("agent_type = ?{i}"));
        }
        if let Some(ref user_id) = filter.user_id {
            conditions.bind(user_id.clone(), |i| format!("user_id = ?{i}"));
        }
        conditions.bind(filter.min_reward, |i| {
            format!("(reward IS NULL OR reward >= ?{i})")
        });
        if filter.require_reward {
            conditions.raw("reward IS NOT NULL");
        }
        if filter.require_feedback {
            conditions.raw("user_feedback IS NOT NULL");
        }
        match filter.split {
            ExportSplit::Training => conditions.raw("is_training_data = 1"),
            ExportSplit::Validation => conditions.raw("is_validation_data = 1"),
            ExportSplit::All => {}
        }

        self.select_decisions(conditions, filter.order, filter.limit)
            .await
    }

    /// Export records for the decisions selected by `filter`.
    pub async fn export_examples(
        &self,
        filter: &ExportFilter,
    ) -> Result<Vec<TrainingExample>, DatabaseError> {
        let decisions = self.export_decisions(filter).await?;
        build_examples(&decisions).map_err(|e| DatabaseError::Other(e.into()))
    }

    /// Write the export as JSONL to `path`, returning the number of lines.
    pub async fn export_to_file(
        &self,
        filter: &ExportFilter,
        path: &Path,
    ) -> Result<usize, DatabaseError> {
        let examples = self.export_examples(filter).await?;
        ocd_reward::export::write_jsonl_file(path, &examples)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        tracing::info!(path = %path.display(), written = examples.len(), "Exported training data");
        Ok(examples.len())
    }

    /// Write the export as JSONL to any writer (e.g. stdout).
    pub async fn export_to_writer<W: Write + Send>(
        &self,
        filter: &ExportFilter,
        writer: W,
    ) -> Result<usize, DatabaseError> {
        let examples = self.export_examples(filter).await?;
        ocd_reward::export::write_jsonl(writer, &examples)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(examples.len())
    }
}
