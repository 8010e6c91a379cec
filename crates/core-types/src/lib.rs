//! # Layer 0 record types for the COMPAS audit
//!
//! Every downstream crate operates on these fixed shapes. Tabular input is
//! converted into `LabeledExample`s once, at the loading boundary, and never
//! looked up by column name again.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::RiskBand;
pub use error::CoreError;
pub use structs::{Group, LabeledExample, ScoredExample};
