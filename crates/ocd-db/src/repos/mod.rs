//! Repository modules for the decision ledger.
//!
//! Each module adds methods to `OcdService` via `impl OcdService` blocks.

pub mod audit;
pub mod decision;
pub mod export;
pub mod item;
pub mod reward;
