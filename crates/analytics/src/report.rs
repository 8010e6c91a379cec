use crate::curves::{CalibrationBin, RocPoint};
use crate::threshold::GroupThreshold;
use core_types::Group;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts of the four (predicted, actual) quadrants.
///
/// Quadrant names read predicted-then-actual: a false positive was predicted
/// positive and is actually negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: u64,
    pub false_positives: u64,
    pub true_negatives: u64,
    pub false_negatives: u64,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one (predicted, actual) observation to the matching quadrant.
    pub fn record(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.true_positives += 1,
            (true, false) => self.false_positives += 1,
            (false, false) => self.true_negatives += 1,
            (false, true) => self.false_negatives += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// Number of actual positives (TP + FN).
    pub fn actual_positives(&self) -> u64 {
        self.true_positives + self.false_negatives
    }

    /// Number of actual negatives (TN + FP).
    pub fn actual_negatives(&self) -> u64 {
        self.true_negatives + self.false_positives
    }

    /// Number of predicted positives (TP + FP).
    pub fn predicted_positives(&self) -> u64 {
        self.true_positives + self.false_positives
    }

    /// The 2x2 table with rows = predicted (negative, positive) and
    /// columns = actual (negative, positive).
    pub fn crosstab(&self) -> [[u64; 2]; 2] {
        [
            [self.true_negatives, self.false_negatives],
            [self.false_positives, self.true_positives],
        ]
    }
}

/// Rates derived from a [`ConfusionMatrix`].
///
/// `None` marks a rate whose denominator is zero. It is never folded into
/// `0.0` or `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub accuracy: Option<f64>,
    pub ppv: Option<f64>,
    pub fpr: Option<f64>,
    pub fnr: Option<f64>,
    pub tpr: Option<f64>,
}

impl DerivedMetrics {
    /// Specificity, `1 - fpr`. Undefined exactly when `fpr` is.
    pub fn tnr(&self) -> Option<f64> {
        self.fpr.map(|fpr| 1.0 - fpr)
    }
}

/// Group-conditional summary: base rate, prediction rate and error rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReport {
    pub count: u64,
    /// Share of examples that are actually positive (e.g. recidivated).
    pub base_rate: Option<f64>,
    /// Share of examples predicted positive (e.g. labelled high risk).
    pub predicted_positive_rate: Option<f64>,
    pub confusion: ConfusionMatrix,
    pub metrics: DerivedMetrics,
}

/// The overall report plus one report per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub overall: GroupReport,
    pub groups: BTreeMap<Group, GroupReport>,
}

/// Outcome of equal-opportunity post-processing: cutoffs fitted on the
/// calibration split and the holdout split before and after applying them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualOpportunityReport {
    pub thresholds: GroupThreshold,
    pub holdout_before: AuditReport,
    pub holdout_after: AuditReport,
}

/// ROC and calibration curves for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCurves {
    pub roc: Vec<RocPoint>,
    pub auc: Option<f64>,
    pub calibration: Vec<CalibrationBin>,
}
