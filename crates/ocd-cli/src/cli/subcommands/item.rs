use clap::Subcommand;

/// Subject item commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ItemCommands {
    /// Create an item.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        user: String,
        /// Starting column (defaults to inbox)
        #[arg(long)]
        status: Option<String>,
        /// expedite, project, habit, home
        #[arg(long)]
        swimlane: Option<String>,
        /// high, medium, low
        #[arg(long)]
        priority: Option<String>,
        /// Repeatable label
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Move an item to another column. Reaching done or cold-storage scores
    /// the outcome of every linked decision.
    Move { id: String, status: String },
    /// Get an item by ID.
    Get { id: String },
}
