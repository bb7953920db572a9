//! Price models and text extraction.

pub mod models;
pub mod parser;

pub use models::{DetectedPrice, Money};
pub use parser::{parse, parse_with_default, scan, scan_with_default};
