use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The categorical risk label COMPAS attaches to each defendant (`score_text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Medium and High are both treated as a prediction of recidivism.
    pub fn is_high_risk(&self) -> bool {
        match self {
            RiskBand::Low => false,
            RiskBand::Medium | RiskBand::High => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Medium => "Medium",
            RiskBand::High => "High",
        }
    }
}

impl FromStr for RiskBand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Low" => Ok(RiskBand::Low),
            "Medium" => Ok(RiskBand::Medium),
            "High" => Ok(RiskBand::High),
            other => Err(CoreError::UnknownRiskBand(other.to_string())),
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compas_score_text() {
        assert_eq!("Low".parse::<RiskBand>(), Ok(RiskBand::Low));
        assert_eq!(" Medium ".parse::<RiskBand>(), Ok(RiskBand::Medium));
        assert_eq!("High".parse::<RiskBand>(), Ok(RiskBand::High));
    }

    #[test]
    fn rejects_unknown_labels() {
        assert_eq!(
            "N/A".parse::<RiskBand>(),
            Err(CoreError::UnknownRiskBand("N/A".to_string()))
        );
    }

    #[test]
    fn only_low_is_not_high_risk() {
        assert!(!RiskBand::Low.is_high_risk());
        assert!(RiskBand::Medium.is_high_risk());
        assert!(RiskBand::High.is_high_risk());
    }
}
