//! Savings computation: fee policy, regional prices, engine, and history.

pub mod engine;
pub mod history;
pub mod models;
pub mod policy;

pub use engine::SavingsEngine;
pub use history::{SavingsHistory, HISTORY_CAPACITY};
pub use models::{FeeBreakdown, SavingsOpportunity, SavingsRecord, SavingsReport};
pub use policy::{FeePolicy, RegionalPriceTable};
