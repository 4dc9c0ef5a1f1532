use clap::{Args, Subcommand};

/// Decision commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DecisionCommands {
    /// Record a decision made by an agent.
    Record(RecordArgs),
    /// Attach human feedback and recompute the reward.
    Feedback {
        id: String,
        /// confirmed, corrected, ignored, overridden
        value: String,
        /// Corrected action as a JSON object (corrected/overridden only)
        #[arg(long)]
        correction: Option<String>,
    },
    /// Merge observed outcome metrics and recompute the reward.
    Outcome {
        id: String,
        /// Outcome metrics as a JSON object
        metrics: String,
    },
    /// Get a decision by ID.
    Get { id: String },
    /// List decisions.
    List {
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        item: Option<String>,
        #[arg(long)]
        user: Option<String>,
        /// Only decisions that have (true) or lack (false) a reward
        #[arg(long)]
        rewarded: Option<bool>,
        /// Only decisions that have (true) or lack (false) feedback
        #[arg(long)]
        reviewed: Option<bool>,
        #[arg(long)]
        oldest_first: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Clone, Debug, Args)]
pub struct RecordArgs {
    /// filer, librarian, prioritizer, storer, retriever
    #[arg(long)]
    pub agent: String,
    /// Agent input as a JSON object
    #[arg(long)]
    pub state: String,
    /// Agent output as a JSON object
    #[arg(long)]
    pub action: String,
    #[arg(long)]
    pub model_version: String,
    #[arg(long)]
    pub user: String,
    /// Subject item ID
    #[arg(long)]
    pub item: Option<String>,
    /// Linked orchestrator record
    #[arg(long)]
    pub opus: Option<String>,
    #[arg(long)]
    pub confidence: Option<f64>,
    #[arg(long)]
    pub reasoning: Option<String>,
    /// Alternatives the agent considered, as a JSON array
    #[arg(long)]
    pub alternatives: Option<String>,
    /// Hold the decision out for validation instead of training
    #[arg(long)]
    pub validation: bool,
}
