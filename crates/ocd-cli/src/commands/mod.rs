pub mod decision;
pub mod dispatch;
pub mod export;
pub mod item;
pub mod reward;
pub mod shared;
pub mod weights;
