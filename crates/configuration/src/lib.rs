use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatasetSettings, FairnessSettings, LogFormat, LoggingSettings, Settings};

/// Prefix for environment overrides, e.g. `COMPAS_AUDIT_FAIRNESS__TARGET_TPR=0.7`.
pub const ENV_PREFIX: &str = "COMPAS_AUDIT";

/// Loads the application configuration.
///
/// Sources are layered in order: built-in defaults, the TOML file at `path`
/// (or an optional `audit.toml` in the working directory when `path` is
/// `None`), then `COMPAS_AUDIT_*` environment variables. The merged result is
/// validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file_source = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("audit").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file_source)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};

    // `load_config` reads the process environment, so tests that load must not
    // interleave with the one that sets a variable.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn file_values_override_defaults() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.toml");
        fs::write(
            &path,
            r#"
[dataset]
path = "/tmp/compas.csv"
groups = []

[fairness]
target_tpr = 0.75
"#,
        )
        .unwrap();

        let settings = load_config(Some(path.as_path())).unwrap();
        assert_eq!(settings.dataset.path, PathBuf::from("/tmp/compas.csv"));
        assert!(settings.dataset.groups.is_empty());
        assert_eq!(settings.dataset.max_screening_gap_days, 30);
        assert_eq!(settings.fairness.target_tpr, 0.75);
        assert_eq!(settings.fairness.holdout_fraction, 0.3);
        assert_eq!(settings.logging, LoggingSettings::default());
    }

    #[test]
    fn logging_format_is_parsed_lowercase() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.toml");
        fs::write(&path, "[logging]\nformat = \"json\"\nlevel = \"debug\"\n").unwrap();

        let settings = load_config(Some(path.as_path())).unwrap();
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.toml");
        fs::write(&path, "[fairness]\ntarget_tpr = 1.5\n").unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.toml");
        fs::write(&path, "[fairness]\ntarget_tpr = 0.75\nholdout_fraction = 0.25\n").unwrap();

        let key = "COMPAS_AUDIT_FAIRNESS__TARGET_TPR";
        unsafe { std::env::set_var(key, "0.7") };
        let loaded = load_config(Some(path.as_path()));
        unsafe { std::env::remove_var(key) };

        let settings = loaded.unwrap();
        assert_eq!(settings.fairness.target_tpr, 0.7);
        assert_eq!(settings.fairness.holdout_fraction, 0.25);
    }

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.fairness.calibration_bins, 10);
    }

    #[test]
    fn degenerate_holdout_fraction_is_rejected() {
        let mut fairness = FairnessSettings::default();
        fairness.holdout_fraction = 1.0;
        assert!(fairness.validate().is_err());
        fairness.holdout_fraction = 0.0;
        assert!(fairness.validate().is_err());
    }
}
