use crate::confusion::{group_reports, overall_report};
use crate::curves::{auc, calibration_curve, roc_curve};
use crate::error::AnalyticsError;
use crate::report::{AuditReport, EqualOpportunityReport, GroupCurves};
use crate::threshold::{apply_group_thresholds, compute_group_thresholds, scored_by_group};
use core_types::{Group, LabeledExample};
use std::collections::BTreeMap;

/// A stateless calculator for group-conditional fairness metrics.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the overall and per-group confusion-matrix report.
    ///
    /// # Arguments
    ///
    /// * `examples` - Labelled examples carrying the prediction under audit.
    pub fn calculate(&self, examples: &[LabeledExample]) -> AuditReport {
        tracing::debug!(examples = examples.len(), "Calculating audit report.");
        AuditReport {
            overall: overall_report(examples),
            groups: group_reports(examples),
        }
    }

    /// Fits per-group cutoffs reaching `target_tpr` on `calibration`, then
    /// reports `holdout` with its original predictions and with the cutoffs
    /// applied.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `EqualOpportunityReport` or an `AnalyticsError`
    /// when a score or the target is not a number.
    pub fn equal_opportunity(
        &self,
        calibration: &[LabeledExample],
        holdout: &[LabeledExample],
        target_tpr: f64,
    ) -> Result<EqualOpportunityReport, AnalyticsError> {
        let thresholds = compute_group_thresholds(&scored_by_group(calibration), target_tpr)?;

        for (group, outcome) in thresholds.iter() {
            match outcome.cutoff() {
                Some(cutoff) => tracing::info!(group = %group, cutoff, "Fitted group cutoff."),
                None => tracing::debug!(group = %group, "No cutoff reaches the target."),
            }
        }

        let relabeled = apply_group_thresholds(holdout, &thresholds);
        Ok(EqualOpportunityReport {
            thresholds,
            holdout_before: self.calculate(holdout),
            holdout_after: self.calculate(&relabeled),
        })
    }

    /// ROC and calibration curves for every group with at least one score.
    pub fn curves(
        &self,
        examples: &[LabeledExample],
        bins: usize,
    ) -> Result<BTreeMap<Group, GroupCurves>, AnalyticsError> {
        let mut curves = BTreeMap::new();
        for (group, scored) in scored_by_group(examples) {
            let roc = roc_curve(&scored)?;
            let calibration = calibration_curve(&scored, bins)?;
            curves.insert(
                group,
                GroupCurves {
                    auc: auc(&roc),
                    roc,
                    calibration,
                },
            );
        }
        Ok(curves)
    }
}
