//! # COMPAS Audit Analytics Engine
//!
//! Confusion-matrix fairness metrics for binary predictions partitioned by a
//! sensitive attribute, plus group-specific threshold calibration for equal
//! opportunity.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   configuration or rendering. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function takes its inputs by reference and
//!   returns fresh values. Undefined rates are `None`; unreachable thresholds are
//!   `ThresholdOutcome::Unreachable`.
//!
//! ## Public API
//!
//! - `build_confusion_matrix`, `derive_rates`: the counting and rate primitives.
//! - `find_threshold_for_target_tpr`, `compute_group_thresholds`,
//!   `apply_group_thresholds`: equal-opportunity post-processing.
//! - `roc_curve`, `auc`, `calibration_curve`: per-group curve comparison.
//! - `AnalyticsEngine`: the orchestrating calculator used by the CLI.

// Declare the modules that constitute this crate.
pub mod confusion;
pub mod curves;
pub mod engine;
pub mod error;
pub mod report;
pub mod threshold;

// Re-export the key components to create a clean, public-facing API.
pub use confusion::{
    build_confusion_matrix, build_confusion_matrix_from_labels, derive_rates, group_reports,
    overall_report,
};
pub use curves::{CalibrationBin, RocPoint, auc, calibration_curve, roc_curve};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    AuditReport, ConfusionMatrix, DerivedMetrics, EqualOpportunityReport, GroupCurves,
    GroupReport,
};
pub use threshold::{
    GroupThreshold, ThresholdOutcome, apply_group_thresholds, compute_group_thresholds,
    find_threshold_for_target_tpr, scored_by_group,
};
