use crate::confusion::derive_rates;
use crate::error::AnalyticsError;
use crate::report::ConfusionMatrix;
use core_types::{Group, LabeledExample, ScoredExample};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a threshold search for one set of scored examples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThresholdOutcome {
    /// `predicted = score >= cutoff` reaches the target; `achieved_tpr` is the
    /// TPR that cutoff actually produces.
    Reached { cutoff: f64, achieved_tpr: f64 },
    /// No observed score reaches the target TPR.
    Unreachable,
}

impl ThresholdOutcome {
    pub fn cutoff(&self) -> Option<f64> {
        match self {
            ThresholdOutcome::Reached { cutoff, .. } => Some(*cutoff),
            ThresholdOutcome::Unreachable => None,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, ThresholdOutcome::Reached { .. })
    }
}

/// Per-group cutoffs computed for a common target TPR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupThreshold {
    pub target_tpr: f64,
    pub cutoffs: BTreeMap<Group, ThresholdOutcome>,
}

impl GroupThreshold {
    pub fn get(&self, group: &Group) -> Option<&ThresholdOutcome> {
        self.cutoffs.get(group)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Group, &ThresholdOutcome)> {
        self.cutoffs.iter()
    }
}

/// Finds the highest cutoff whose TPR is at least `target_tpr`.
///
/// Candidates are the distinct observed scores, swept from highest to
/// lowest. TPR only grows as the cutoff drops, so the first candidate that
/// meets the target is both the closest from above and the most
/// conservative.
pub fn find_threshold_for_target_tpr(
    scored: &[ScoredExample],
    target_tpr: f64,
) -> Result<ThresholdOutcome, AnalyticsError> {
    if target_tpr.is_nan() {
        return Err(AnalyticsError::InvalidInput(
            "target TPR must be a number".to_string(),
        ));
    }

    for (cutoff, cm) in sweep_cutoffs(scored)? {
        if let Some(tpr) = derive_rates(&cm).tpr {
            if tpr >= target_tpr {
                tracing::debug!(cutoff, tpr, target_tpr, "Threshold search reached target.");
                return Ok(ThresholdOutcome::Reached {
                    cutoff,
                    achieved_tpr: tpr,
                });
            }
        }
    }

    tracing::debug!(
        target_tpr,
        examples = scored.len(),
        "Threshold search could not reach target."
    );
    Ok(ThresholdOutcome::Unreachable)
}

/// Runs the threshold search independently for every group.
pub fn compute_group_thresholds(
    scored_by_group: &BTreeMap<Group, Vec<ScoredExample>>,
    target_tpr: f64,
) -> Result<GroupThreshold, AnalyticsError> {
    let mut cutoffs = BTreeMap::new();
    for (group, scored) in scored_by_group {
        let outcome = find_threshold_for_target_tpr(scored, target_tpr)?;
        if !outcome.is_reached() {
            tracing::warn!(group = %group, target_tpr, "Target TPR is unreachable for group.");
        }
        cutoffs.insert(group.clone(), outcome);
    }

    Ok(GroupThreshold {
        target_tpr,
        cutoffs,
    })
}

/// Re-labels examples with their group's cutoff.
///
/// A group whose target was unreachable falls back to the most permissive
/// cutoff, i.e. every scored example becomes a positive prediction.
/// Unscored examples and groups with no entry keep their prediction.
pub fn apply_group_thresholds(
    examples: &[LabeledExample],
    thresholds: &GroupThreshold,
) -> Vec<LabeledExample> {
    for (group, outcome) in thresholds.iter() {
        if !outcome.is_reached() {
            tracing::debug!(group = %group, "Falling back to the most permissive cutoff.");
        }
    }

    examples
        .iter()
        .map(|example| match (example.score(), thresholds.get(example.group())) {
            (Some(score), Some(ThresholdOutcome::Reached { cutoff, .. })) => {
                example.with_prediction(score >= *cutoff)
            }
            (Some(_), Some(ThresholdOutcome::Unreachable)) => example.with_prediction(true),
            _ => example.clone(),
        })
        .collect()
}

/// Collects the scored projection of each example, keyed by group.
pub fn scored_by_group(examples: &[LabeledExample]) -> BTreeMap<Group, Vec<ScoredExample>> {
    let mut by_group: BTreeMap<Group, Vec<ScoredExample>> = BTreeMap::new();
    for example in examples {
        if let Some(scored) = example.scored() {
            by_group
                .entry(example.group().clone())
                .or_default()
                .push(scored);
        }
    }
    by_group
}

/// For each distinct score (descending), the confusion matrix produced by
/// `predicted = score >= cutoff`.
pub(crate) fn sweep_cutoffs(
    scored: &[ScoredExample],
) -> Result<Vec<(f64, ConfusionMatrix)>, AnalyticsError> {
    if let Some(bad) = scored.iter().find(|s| !s.score.is_finite()) {
        return Err(AnalyticsError::InvalidInput(format!(
            "score {} is not finite",
            bad.score
        )));
    }

    let mut sorted = scored.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

    // Start above every score: everything is predicted negative.
    let mut cm = ConfusionMatrix::new();
    for s in &sorted {
        cm.record(false, s.actual);
    }

    let mut points = Vec::new();
    let mut idx = 0;
    while idx < sorted.len() {
        let cutoff = sorted[idx].score;
        while idx < sorted.len() && sorted[idx].score == cutoff {
            if sorted[idx].actual {
                cm.false_negatives -= 1;
                cm.true_positives += 1;
            } else {
                cm.true_negatives -= 1;
                cm.false_positives += 1;
            }
            idx += 1;
        }
        points.push((cutoff, cm));
    }

    Ok(points)
}
