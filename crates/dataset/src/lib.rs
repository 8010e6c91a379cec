//! Loading and splitting the ProPublica COMPAS two-year recidivism data.
//!
//! The CSV is read once, filtered the way the original ProPublica analysis
//! filtered it, and turned into typed `LabeledExample`s. Nothing downstream
//! looks at column names.

pub mod error;
pub mod loader;
pub mod split;

pub use error::DatasetError;
pub use loader::{examples_from_frame, load_compas};
pub use split::{Split, split_calibration_holdout};
