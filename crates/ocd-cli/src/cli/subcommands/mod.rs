mod decision;
mod item;
mod reward;

pub use decision::{DecisionCommands, RecordArgs};
pub use item::ItemCommands;
pub use reward::RewardCommands;
