use analytics::{AnalyticsEngine, ConfusionMatrix};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use configuration::{LogFormat, Settings, init_tracing, load_config};
use core_types::{Group, LabeledExample};
use dataset::{load_compas, split_calibration_holdout};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

mod render;

/// The main entry point for the COMPAS fairness audit.
fn main() -> Result<()> {
    // A missing .env file is fine; it only supplies optional overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings =
        load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut settings, &cli);
    settings
        .validate()
        .context("Invalid settings after command-line overrides")?;

    let _log_guard = init_tracing(&settings.logging).context("Failed to initialise logging")?;
    tracing::debug!(?settings, "Configuration loaded.");

    let examples = load_compas(&settings.dataset).with_context(|| {
        format!(
            "Failed to load dataset from {}",
            settings.dataset.path.display()
        )
    })?;
    let engine = AnalyticsEngine::new();

    match cli.command {
        Commands::Audit => handle_audit(&engine, &examples, cli.json),
        Commands::Crosstab => handle_crosstab(&engine, &examples, cli.json),
        Commands::Thresholds(_) => handle_thresholds(&engine, &examples, &settings, cli.json),
        Commands::Curves(_) => handle_curves(&engine, &examples, &settings, cli.json),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Group fairness audit of the ProPublica COMPAS recidivism scores.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./audit.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to compas-scores-two-years.csv, overriding the configuration.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Log output format, overriding the configuration.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Base rates and confusion-matrix metrics of the COMPAS high-risk label, per group.
    Audit,
    /// Predicted-by-actual 2x2 tables per group.
    Crosstab,
    /// Fit per-group cutoffs reaching a target TPR and evaluate them on a holdout split.
    Thresholds(ThresholdsArgs),
    /// ROC AUC and calibration curves per group.
    Curves(CurvesArgs),
}

#[derive(Args)]
struct ThresholdsArgs {
    /// TPR every group must reach on the calibration split.
    #[arg(long)]
    target_tpr: Option<f64>,

    /// Share of each group held out for evaluation.
    #[arg(long)]
    holdout_fraction: Option<f64>,
}

#[derive(Args)]
struct CurvesArgs {
    /// Number of equal-width score bins in the calibration curve.
    #[arg(long)]
    bins: Option<usize>,
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(path) = &cli.data {
        settings.dataset.path = path.clone();
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    match &cli.command {
        Commands::Thresholds(args) => {
            if let Some(target) = args.target_tpr {
                settings.fairness.target_tpr = target;
            }
            if let Some(fraction) = args.holdout_fraction {
                settings.fairness.holdout_fraction = fraction;
            }
        }
        Commands::Curves(args) => {
            if let Some(bins) = args.bins {
                settings.fairness.calibration_bins = bins;
            }
        }
        Commands::Audit | Commands::Crosstab => {}
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_audit(engine: &AnalyticsEngine, examples: &[LabeledExample], json: bool) -> Result<()> {
    let report = engine.calculate(examples);
    if json {
        return print_json(&report);
    }

    println!("COMPAS high-risk label (Medium or High) vs. two-year recidivism");
    println!("{}", render::audit_table(&report));
    Ok(())
}

fn handle_crosstab(
    engine: &AnalyticsEngine,
    examples: &[LabeledExample],
    json: bool,
) -> Result<()> {
    let report = engine.calculate(examples);
    if json {
        let mut tables: BTreeMap<String, CrosstabJson> = report
            .groups
            .iter()
            .map(|(group, r)| (group.to_string(), CrosstabJson::from(&r.confusion)))
            .collect();
        tables.insert("All".to_string(), CrosstabJson::from(&report.overall.confusion));
        return print_json(&tables);
    }

    for (label, table) in render::crosstab_tables(&report) {
        println!("{label}");
        println!("{table}");
    }
    Ok(())
}

fn handle_thresholds(
    engine: &AnalyticsEngine,
    examples: &[LabeledExample],
    settings: &Settings,
    json: bool,
) -> Result<()> {
    let split = split_calibration_holdout(examples, settings.fairness.holdout_fraction)
        .context("Failed to split the dataset")?;
    tracing::info!(
        calibration = split.calibration.len(),
        holdout = split.holdout.len(),
        target_tpr = settings.fairness.target_tpr,
        "Fitting group cutoffs."
    );

    let report = engine
        .equal_opportunity(
            &split.calibration,
            &split.holdout,
            settings.fairness.target_tpr,
        )
        .context("Failed to compute group thresholds")?;
    if json {
        return print_json(&report);
    }

    println!(
        "Group cutoffs on the decile score / 10 for target TPR {:.3}",
        settings.fairness.target_tpr
    );
    println!("{}", render::threshold_table(&report));
    println!("Holdout split: COMPAS label before, group cutoffs after");
    println!("{}", render::holdout_comparison_table(&report));
    Ok(())
}

fn handle_curves(
    engine: &AnalyticsEngine,
    examples: &[LabeledExample],
    settings: &Settings,
    json: bool,
) -> Result<()> {
    let curves: BTreeMap<Group, _> = engine
        .curves(examples, settings.fairness.calibration_bins)
        .context("Failed to compute curves")?;
    if json {
        return print_json(&curves);
    }

    println!("{}", render::auc_table(&curves));
    println!("Observed recidivism rate per score bin");
    println!("{}", render::calibration_table(&curves));
    Ok(())
}

/// The crosstab in JSON keeps the predicted-then-actual naming explicit.
#[derive(Serialize)]
struct CrosstabJson {
    predicted_negative: ActualCounts,
    predicted_positive: ActualCounts,
}

#[derive(Serialize)]
struct ActualCounts {
    actual_negative: u64,
    actual_positive: u64,
}

impl From<&ConfusionMatrix> for CrosstabJson {
    fn from(cm: &ConfusionMatrix) -> Self {
        let [[nn, np], [pn, pp]] = cm.crosstab();
        Self {
            predicted_negative: ActualCounts {
                actual_negative: nn,
                actual_positive: np,
            },
            predicted_positive: ActualCounts {
                actual_negative: pn,
                actual_positive: pp,
            },
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}
