use clap::{Args, Subcommand};

use crate::cli::subcommands::{DecisionCommands, ItemCommands, RewardCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Agent decisions.
    Decision {
        #[command(subcommand)]
        action: DecisionCommands,
    },
    /// Subject items on the board.
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },
    /// Reward computation.
    Reward {
        #[command(subcommand)]
        action: RewardCommands,
    },
    /// Export decisions as chat-formatted JSONL training data.
    Export(ExportArgs),
    /// Show the effective reward weights.
    Weights(WeightsArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    /// Destination file. Lines go to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<String>,
    /// Only this agent (filer, librarian, prioritizer, storer, retriever)
    #[arg(long)]
    pub agent: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    /// Drop rewarded decisions below this value (defaults to export.min_reward)
    #[arg(long, allow_hyphen_values = true)]
    pub min_reward: Option<f64>,
    /// Also drop decisions without a reward
    #[arg(long)]
    pub require_reward: bool,
    #[arg(long)]
    pub require_feedback: bool,
    /// training, validation, all
    #[arg(long, default_value = "training")]
    pub split: String,
    /// newest-first, oldest-first
    #[arg(long, default_value = "newest-first")]
    pub order: String,
}

#[derive(Clone, Debug, Args)]
pub struct WeightsArgs {
    /// Only this agent's weights
    #[arg(long)]
    pub agent: Option<String>,
}
