use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section may be omitted from `audit.toml`; missing sections fall back
/// to the defaults of the original ProPublica analysis.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub fairness: FairnessSettings,
    pub logging: LoggingSettings,
}

/// Where the COMPAS data lives and which rows to keep.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path to `compas-scores-two-years.csv`.
    pub path: PathBuf,
    /// Rows whose charge and screening dates are further apart than this are
    /// dropped as likely data-entry mismatches.
    pub max_screening_gap_days: u32,
    /// Groups (values of `race`) to keep. Empty keeps every group.
    pub groups: Vec<String>,
}

/// Parameters for the equal-opportunity and curve computations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FairnessSettings {
    /// TPR every group's cutoff must reach on the calibration split.
    pub target_tpr: f64,
    /// Share of each group held out to evaluate the fitted cutoffs.
    pub holdout_fraction: f64,
    /// Number of equal-width bins in calibration curves.
    pub calibration_bins: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs go to a daily rolling file here instead of stderr.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

// --- Default Implementations ---

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/compas-scores-two-years.csv"),
            max_screening_gap_days: 30,
            groups: vec!["African-American".to_string(), "Caucasian".to_string()],
        }
    }
}

impl Default for FairnessSettings {
    fn default() -> Self {
        Self {
            target_tpr: 0.6,
            holdout_fraction: 0.3,
            calibration_bins: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}

impl Settings {
    /// Rejects values the downstream computations cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fairness.validate()
    }
}

impl FairnessSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.target_tpr) {
            return Err(ConfigError::ValidationError(format!(
                "fairness.target_tpr must be within [0, 1], got {}",
                self.target_tpr
            )));
        }
        if !(self.holdout_fraction > 0.0 && self.holdout_fraction < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "fairness.holdout_fraction must be within (0, 1), got {}",
                self.holdout_fraction
            )));
        }
        if self.calibration_bins == 0 {
            return Err(ConfigError::ValidationError(
                "fairness.calibration_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
