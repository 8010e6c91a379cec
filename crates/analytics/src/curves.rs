use crate::confusion::{derive_rates, ratio};
use crate::error::AnalyticsError;
use crate::report::ConfusionMatrix;
use crate::threshold::sweep_cutoffs;
use core_types::ScoredExample;
use serde::{Deserialize, Serialize};

/// One operating point of a ROC curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    /// `None` for the origin point, where the cutoff sits above every score.
    pub threshold: Option<f64>,
    pub fpr: Option<f64>,
    pub tpr: Option<f64>,
}

/// Observed outcome rate for scores falling in `[lower, upper)`.
/// The last bin is closed on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
    pub mean_score: Option<f64>,
    pub positive_rate: Option<f64>,
}

/// Builds the ROC curve, one point per distinct score from highest to lowest.
pub fn roc_curve(scored: &[ScoredExample]) -> Result<Vec<RocPoint>, AnalyticsError> {
    let sweep = sweep_cutoffs(scored)?;

    let mut origin = ConfusionMatrix::new();
    for s in scored {
        origin.record(false, s.actual);
    }
    let origin_rates = derive_rates(&origin);

    let mut points = Vec::with_capacity(sweep.len() + 1);
    points.push(RocPoint {
        threshold: None,
        fpr: origin_rates.fpr,
        tpr: origin_rates.tpr,
    });
    points.extend(sweep.into_iter().map(|(cutoff, cm)| {
        let rates = derive_rates(&cm);
        RocPoint {
            threshold: Some(cutoff),
            fpr: rates.fpr,
            tpr: rates.tpr,
        }
    }));

    Ok(points)
}

/// Trapezoidal area under a ROC curve.
///
/// Undefined when any point lacks a rate, i.e. one class is empty.
pub fn auc(points: &[RocPoint]) -> Option<f64> {
    let coords: Option<Vec<(f64, f64)>> = points
        .iter()
        .map(|p| Some((p.fpr?, p.tpr?)))
        .collect();
    let coords = coords?;
    if coords.len() < 2 {
        return None;
    }

    Some(
        coords
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum(),
    )
}

/// Groups scores into `bins` equal-width bins over `[0, 1]` and reports the
/// observed positive rate in each.
pub fn calibration_curve(
    scored: &[ScoredExample],
    bins: usize,
) -> Result<Vec<CalibrationBin>, AnalyticsError> {
    if bins == 0 {
        return Err(AnalyticsError::InvalidInput(
            "calibration curve needs at least one bin".to_string(),
        ));
    }
    if let Some(bad) = scored
        .iter()
        .find(|s| s.score.is_nan() || !(0.0..=1.0).contains(&s.score))
    {
        return Err(AnalyticsError::InvalidInput(format!(
            "score {} is outside [0, 1]",
            bad.score
        )));
    }

    let mut counts = vec![0u64; bins];
    let mut positives = vec![0u64; bins];
    let mut score_sums = vec![0.0f64; bins];
    for s in scored {
        let idx = ((s.score * bins as f64) as usize).min(bins - 1);
        counts[idx] += 1;
        score_sums[idx] += s.score;
        if s.actual {
            positives[idx] += 1;
        }
    }

    let width = 1.0 / bins as f64;
    Ok((0..bins)
        .map(|i| CalibrationBin {
            lower: i as f64 * width,
            upper: if i + 1 == bins { 1.0 } else { (i + 1) as f64 * width },
            count: counts[i],
            mean_score: (counts[i] > 0).then(|| score_sums[i] / counts[i] as f64),
            positive_rate: ratio(positives[i], counts[i]),
        })
        .collect())
}
