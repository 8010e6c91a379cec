use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sensitive attribute value, e.g. a race category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(String);

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Group {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Group {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One defendant: an optional risk score, the binary prediction made from it,
/// the observed outcome and the group it belongs to.
///
/// Values are immutable once built; re-labelling produces a new example via
/// [`LabeledExample::with_prediction`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledExample {
    score: Option<f64>,
    predicted: bool,
    actual: bool,
    group: Group,
}

impl LabeledExample {
    /// Builds an example, rejecting scores that are NaN or outside `[0, 1]`.
    pub fn new(
        score: Option<f64>,
        predicted: bool,
        actual: bool,
        group: impl Into<Group>,
    ) -> Result<Self, CoreError> {
        if let Some(s) = score {
            validate_score(s)?;
        }
        Ok(Self {
            score,
            predicted,
            actual,
            group: group.into(),
        })
    }

    /// An example that carries only the (predicted, actual) pair.
    pub fn unscored(predicted: bool, actual: bool, group: impl Into<Group>) -> Self {
        Self {
            score: None,
            predicted,
            actual,
            group: group.into(),
        }
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn predicted(&self) -> bool {
        self.predicted
    }

    pub fn actual(&self) -> bool {
        self.actual
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Returns a copy of this example with a different prediction.
    pub fn with_prediction(&self, predicted: bool) -> Self {
        Self {
            predicted,
            ..self.clone()
        }
    }

    /// The (score, actual) projection used for threshold search, if scored.
    pub fn scored(&self) -> Option<ScoredExample> {
        self.score.map(|score| ScoredExample {
            score,
            actual: self.actual,
        })
    }
}

/// A continuous score paired with the ground-truth label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredExample {
    pub score: f64,
    pub actual: bool,
}

impl ScoredExample {
    pub fn new(score: f64, actual: bool) -> Self {
        Self { score, actual }
    }
}

fn validate_score(score: f64) -> Result<(), CoreError> {
    if score.is_nan() || !(0.0..=1.0).contains(&score) {
        return Err(CoreError::InvalidInput(
            "score".to_string(),
            format!("{score} is not a probability in [0, 1]"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_scores() {
        assert!(LabeledExample::new(Some(1.2), true, true, "A").is_err());
        assert!(LabeledExample::new(Some(-0.1), true, true, "A").is_err());
        assert!(LabeledExample::new(Some(f64::NAN), true, true, "A").is_err());
        assert!(LabeledExample::new(None, true, true, "A").is_ok());
        assert!(LabeledExample::new(Some(0.0), false, true, "A").is_ok());
        assert!(LabeledExample::new(Some(1.0), false, true, "A").is_ok());
    }

    #[test]
    fn with_prediction_leaves_original_untouched() {
        let original = LabeledExample::new(Some(0.4), false, true, "A").unwrap();
        let relabeled = original.with_prediction(true);

        assert!(!original.predicted());
        assert!(relabeled.predicted());
        assert_eq!(relabeled.score(), Some(0.4));
        assert_eq!(relabeled.group(), &Group::new("A"));
    }

    #[test]
    fn scored_projection_requires_a_score() {
        let scored = LabeledExample::new(Some(0.7), true, false, "B").unwrap();
        assert_eq!(scored.scored(), Some(ScoredExample::new(0.7, false)));
        assert_eq!(LabeledExample::unscored(true, false, "B").scored(), None);
    }

    #[test]
    fn group_serializes_as_plain_string() {
        let json = serde_json::to_string(&Group::new("Caucasian")).unwrap();
        assert_eq!(json, "\"Caucasian\"");
    }
}
