use clap::Subcommand;

/// Reward commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RewardCommands {
    /// Recompute and store the reward of one decision.
    Compute { id: String },
    /// Score every decision that has a signal but no reward yet.
    Pending {
        /// Decisions fetched per page (defaults to reward.batch_page_size)
        #[arg(long)]
        page_size: Option<u32>,
    },
}
