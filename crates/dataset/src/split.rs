use crate::error::DatasetError;
use core_types::{Group, LabeledExample};
use std::collections::HashMap;

/// A calibration split for fitting thresholds and a held-out split for
/// evaluating them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Split {
    pub calibration: Vec<LabeledExample>,
    pub holdout: Vec<LabeledExample>,
}

/// Deterministically interleaves each group's examples into the two splits.
///
/// Within every group, the running holdout count tracks
/// `floor(seen * holdout_fraction)`, so each group contributes the same share
/// to the holdout and input order is preserved in both splits.
pub fn split_calibration_holdout(
    examples: &[LabeledExample],
    holdout_fraction: f64,
) -> Result<Split, DatasetError> {
    if !(holdout_fraction > 0.0 && holdout_fraction < 1.0) {
        return Err(DatasetError::InvalidSplit(format!(
            "holdout fraction must be within (0, 1), got {holdout_fraction}"
        )));
    }

    let mut seen: HashMap<&Group, usize> = HashMap::new();
    let mut split = Split::default();
    for example in examples {
        let count = seen.entry(example.group()).or_insert(0);
        let before = (*count as f64 * holdout_fraction).floor();
        *count += 1;
        let after = (*count as f64 * holdout_fraction).floor();

        if after > before {
            split.holdout.push(example.clone());
        } else {
            split.calibration.push(example.clone());
        }
    }

    tracing::debug!(
        calibration = split.calibration.len(),
        holdout = split.holdout.len(),
        "Split examples."
    );
    Ok(split)
}
