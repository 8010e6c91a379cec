use crate::error::AnalyticsError;
use crate::report::{ConfusionMatrix, DerivedMetrics, GroupReport};
use core_types::{Group, LabeledExample};
use std::collections::BTreeMap;

/// Counts every example into one of the four quadrants.
///
/// An empty slice yields an all-zero matrix.
pub fn build_confusion_matrix(examples: &[LabeledExample]) -> ConfusionMatrix {
    let mut cm = ConfusionMatrix::new();
    for example in examples {
        cm.record(example.predicted(), example.actual());
    }
    cm
}

/// Builds a matrix from two parallel label sequences.
///
/// Fails before counting anything if the sequences differ in length.
pub fn build_confusion_matrix_from_labels(
    predicted: &[bool],
    actual: &[bool],
) -> Result<ConfusionMatrix, AnalyticsError> {
    if predicted.len() != actual.len() {
        return Err(AnalyticsError::InputShapeMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }

    let mut cm = ConfusionMatrix::new();
    for (&p, &a) in predicted.iter().zip(actual) {
        cm.record(p, a);
    }
    Ok(cm)
}

/// Derives accuracy, PPV, FPR, FNR and TPR. Zero denominators give `None`.
pub fn derive_rates(cm: &ConfusionMatrix) -> DerivedMetrics {
    DerivedMetrics {
        accuracy: ratio(cm.true_positives + cm.true_negatives, cm.total()),
        ppv: ratio(cm.true_positives, cm.predicted_positives()),
        fpr: ratio(cm.false_positives, cm.actual_negatives()),
        fnr: ratio(cm.false_negatives, cm.actual_positives()),
        tpr: ratio(cm.true_positives, cm.actual_positives()),
    }
}

/// Summarises a set of examples as a single group.
pub fn overall_report(examples: &[LabeledExample]) -> GroupReport {
    report_for(build_confusion_matrix(examples))
}

/// Partitions examples by group and summarises each partition.
pub fn group_reports(examples: &[LabeledExample]) -> BTreeMap<Group, GroupReport> {
    let mut matrices: BTreeMap<Group, ConfusionMatrix> = BTreeMap::new();
    for example in examples {
        matrices
            .entry(example.group().clone())
            .or_default()
            .record(example.predicted(), example.actual());
    }

    matrices
        .into_iter()
        .map(|(group, cm)| (group, report_for(cm)))
        .collect()
}

fn report_for(cm: ConfusionMatrix) -> GroupReport {
    GroupReport {
        count: cm.total(),
        base_rate: ratio(cm.actual_positives(), cm.total()),
        predicted_positive_rate: ratio(cm.predicted_positives(), cm.total()),
        confusion: cm,
        metrics: derive_rates(&cm),
    }
}

pub(crate) fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(numerator as f64 / denominator as f64)
}
