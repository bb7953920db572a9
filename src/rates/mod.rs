//! Exchange-rate tables, providers, persistence, and the resolution chain.

pub mod convert;
pub mod models;
pub mod providers;
pub mod service;
pub mod store;

pub use convert::convert;
pub use models::{RateOrigin, RateTable};
pub use providers::{ExchangeRateApiSource, FrankfurterSource, RateSource};
pub use service::{builtin_table, RateLookup, RateService};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};
