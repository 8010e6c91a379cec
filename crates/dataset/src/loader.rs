use crate::error::DatasetError;
use configuration::DatasetSettings;
use core_types::{LabeledExample, RiskBand};
use polars::prelude::*;

const DECILE_SCORE: &str = "decile_score";
const SCORE_TEXT: &str = "score_text";
const TWO_YEAR_RECID: &str = "two_year_recid";
const RACE: &str = "race";
const IS_RECID: &str = "is_recid";
const SCREENING_GAP: &str = "days_b_screening_arrest";
const CHARGE_DEGREE: &str = "c_charge_degree";

/// Loads `compas-scores-two-years.csv` and applies the ProPublica row filters.
///
/// Kept rows have a screening date within `max_screening_gap_days` of the
/// arrest, a known recidivism flag (`is_recid != -1`), a non-ordinary-traffic
/// charge (`c_charge_degree != "O"`) and a COMPAS label (`score_text != "N/A"`).
/// Each row becomes a `LabeledExample` with
/// - score: `decile_score / 10`
/// - predicted: `score_text` is Medium or High
/// - actual: `two_year_recid == 1`
/// - group: `race`
pub fn load_compas(settings: &DatasetSettings) -> Result<Vec<LabeledExample>, DatasetError> {
    tracing::info!(path = %settings.path.display(), "Loading COMPAS dataset.");

    let gap = i64::from(settings.max_screening_gap_days);
    let df = LazyCsvReader::new(&settings.path)
        .has_header(true)
        .finish()?
        .filter(
            col(SCREENING_GAP)
                .lt_eq(lit(gap))
                .and(col(SCREENING_GAP).gt_eq(lit(-gap)))
                .and(col(IS_RECID).neq(lit(-1)))
                .and(col(CHARGE_DEGREE).neq(lit("O")))
                .and(col(SCORE_TEXT).neq(lit("N/A"))),
        )
        .select([col(DECILE_SCORE), col(SCORE_TEXT), col(TWO_YEAR_RECID), col(RACE)])
        .drop_nulls(None)
        .collect()?;

    let examples = examples_from_frame(&df, &settings.groups)?;
    tracing::info!(
        filtered_rows = df.height(),
        examples = examples.len(),
        "COMPAS dataset loaded."
    );
    Ok(examples)
}

/// Converts an already-filtered frame into typed examples.
///
/// Only rows whose `race` is listed in `groups` are kept, unless `groups` is
/// empty.
pub fn examples_from_frame(
    df: &DataFrame,
    groups: &[String],
) -> Result<Vec<LabeledExample>, DatasetError> {
    let deciles = df.column(DECILE_SCORE)?.cast(&DataType::Int64)?;
    let deciles = deciles.i64()?;
    let labels = df.column(SCORE_TEXT)?.cast(&DataType::String)?;
    let labels = labels.str()?;
    let outcomes = df.column(TWO_YEAR_RECID)?.cast(&DataType::Int64)?;
    let outcomes = outcomes.i64()?;
    let races = df.column(RACE)?.cast(&DataType::String)?;
    let races = races.str()?;

    let mut examples = Vec::with_capacity(df.height());
    for (row, (((decile, label), outcome), race)) in deciles
        .into_iter()
        .zip(labels)
        .zip(outcomes)
        .zip(races)
        .enumerate()
    {
        let race = race.ok_or(DatasetError::MissingValue { column: RACE, row })?;
        if !groups.is_empty() && !groups.iter().any(|g| g == race) {
            continue;
        }

        let decile = decile.ok_or(DatasetError::MissingValue {
            column: DECILE_SCORE,
            row,
        })?;
        let band: RiskBand = label
            .ok_or(DatasetError::MissingValue {
                column: SCORE_TEXT,
                row,
            })?
            .parse()?;
        let actual = match outcome {
            Some(1) => true,
            Some(0) => false,
            Some(other) => {
                return Err(core_types::CoreError::InvalidInput(
                    TWO_YEAR_RECID.to_string(),
                    format!("row {row} has label {other}, expected 0 or 1"),
                )
                .into());
            }
            None => {
                return Err(DatasetError::MissingValue {
                    column: TWO_YEAR_RECID,
                    row,
                });
            }
        };

        examples.push(LabeledExample::new(
            Some(decile as f64 / 10.0),
            band.is_high_risk(),
            actual,
            race,
        )?);
    }

    Ok(examples)
}
