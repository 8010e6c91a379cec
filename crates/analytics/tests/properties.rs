//! Property tests for the metric invariants.

use analytics::{
    ThresholdOutcome, apply_group_thresholds, build_confusion_matrix, calibration_curve,
    compute_group_thresholds, derive_rates, find_threshold_for_target_tpr, group_reports,
    roc_curve, scored_by_group,
};
use approx::assert_abs_diff_eq;
use core_types::{LabeledExample, ScoredExample};
use proptest::prelude::*;

fn arb_pairs() -> impl Strategy<Value = Vec<(bool, bool)>> {
    proptest::collection::vec((any::<bool>(), any::<bool>()), 0..200)
}

/// Scores on a 0.01 grid so duplicates are common.
fn arb_scored() -> impl Strategy<Value = Vec<ScoredExample>> {
    proptest::collection::vec((0u32..=100, any::<bool>()), 0..120).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(s, actual)| ScoredExample::new(f64::from(s) / 100.0, actual))
            .collect()
    })
}

/// Scored examples spread over three groups.
fn arb_grouped() -> impl Strategy<Value = Vec<LabeledExample>> {
    proptest::collection::vec((0usize..3, 0u32..=10, any::<bool>(), any::<bool>()), 0..150)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(g, s, predicted, actual)| {
                    let group = ["A", "B", "C"][g];
                    LabeledExample::new(Some(f64::from(s) / 10.0), predicted, actual, group)
                        .unwrap()
                })
                .collect()
        })
}

fn to_examples(pairs: &[(bool, bool)]) -> Vec<LabeledExample> {
    pairs
        .iter()
        .map(|&(predicted, actual)| LabeledExample::unscored(predicted, actual, "G"))
        .collect()
}

fn tpr_at(scored: &[ScoredExample], cutoff: f64) -> Option<f64> {
    let examples: Vec<LabeledExample> = scored
        .iter()
        .map(|s| LabeledExample::unscored(s.score >= cutoff, s.actual, "G"))
        .collect();
    derive_rates(&build_confusion_matrix(&examples)).tpr
}

proptest! {
    #[test]
    fn quadrants_sum_to_input_length(pairs in arb_pairs()) {
        let cm = build_confusion_matrix(&to_examples(&pairs));
        prop_assert_eq!(cm.total(), pairs.len() as u64);
    }

    #[test]
    fn complementary_rates_sum_to_one(pairs in arb_pairs()) {
        let cm = build_confusion_matrix(&to_examples(&pairs));
        let rates = derive_rates(&cm);

        prop_assert_eq!(rates.tpr.is_some(), cm.actual_positives() > 0);
        prop_assert_eq!(rates.fpr.is_some(), cm.actual_negatives() > 0);
        if let (Some(tpr), Some(fnr)) = (rates.tpr, rates.fnr) {
            assert_abs_diff_eq!(tpr + fnr, 1.0, epsilon = 1e-12);
        }
        if let (Some(fpr), Some(tnr)) = (rates.fpr, rates.tnr()) {
            assert_abs_diff_eq!(fpr + tnr, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn derive_rates_is_idempotent(pairs in arb_pairs()) {
        let cm = build_confusion_matrix(&to_examples(&pairs));
        prop_assert_eq!(derive_rates(&cm), derive_rates(&cm));
    }

    #[test]
    fn raising_target_never_raises_cutoff(
        scored in arb_scored(),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_outcome = find_threshold_for_target_tpr(&scored, low).unwrap();
        let high_outcome = find_threshold_for_target_tpr(&scored, high).unwrap();

        if let Some(high_cutoff) = high_outcome.cutoff() {
            let low_cutoff = low_outcome.cutoff();
            prop_assert!(low_cutoff.is_some());
            prop_assert!(high_cutoff <= low_cutoff.unwrap());
        }
    }

    #[test]
    fn reached_cutoff_is_the_highest_meeting_target(
        scored in arb_scored(),
        target in 0.0f64..=1.0,
    ) {
        match find_threshold_for_target_tpr(&scored, target).unwrap() {
            ThresholdOutcome::Reached { cutoff, achieved_tpr } => {
                prop_assert_eq!(tpr_at(&scored, cutoff), Some(achieved_tpr));
                prop_assert!(achieved_tpr >= target);
                for higher in scored.iter().map(|s| s.score).filter(|&s| s > cutoff) {
                    prop_assert!(tpr_at(&scored, higher).unwrap() < target);
                }
            }
            ThresholdOutcome::Unreachable => {
                let positives = scored.iter().filter(|s| s.actual).count();
                prop_assert!(positives == 0 || target > 1.0);
            }
        }
    }

    #[test]
    fn all_negative_groups_are_unreachable(
        scores in proptest::collection::vec(0u32..=100, 0..50),
        target in 0.01f64..=1.0,
    ) {
        let scored: Vec<ScoredExample> = scores
            .into_iter()
            .map(|s| ScoredExample::new(f64::from(s) / 100.0, false))
            .collect();
        prop_assert_eq!(
            find_threshold_for_target_tpr(&scored, target).unwrap(),
            ThresholdOutcome::Unreachable
        );
    }

    #[test]
    fn roc_curve_is_monotone(scored in arb_scored()) {
        let points = roc_curve(&scored).unwrap();
        for pair in points.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].fpr, pair[1].fpr) {
                prop_assert!(a <= b);
            }
            if let (Some(a), Some(b)) = (pair[0].tpr, pair[1].tpr) {
                prop_assert!(a <= b);
            }
        }
    }

    #[test]
    fn calibration_counts_cover_all_scores(scored in arb_scored(), bins in 1usize..20) {
        let curve = calibration_curve(&scored, bins).unwrap();
        prop_assert_eq!(curve.len(), bins);
        prop_assert_eq!(curve.iter().map(|b| b.count).sum::<u64>(), scored.len() as u64);
    }

    #[test]
    fn applied_cutoffs_reach_target_on_calibration_data(
        examples in arb_grouped(),
        target in 0.0f64..=1.0,
    ) {
        let thresholds = compute_group_thresholds(&scored_by_group(&examples), target).unwrap();
        let reports = group_reports(&apply_group_thresholds(&examples, &thresholds));

        for (group, outcome) in thresholds.iter() {
            if let ThresholdOutcome::Reached { achieved_tpr, .. } = outcome {
                let tpr = reports[group].metrics.tpr.unwrap();
                prop_assert!(tpr >= target);
                prop_assert_eq!(tpr, *achieved_tpr);
            }
        }
    }
}
