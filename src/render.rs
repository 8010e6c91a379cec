use analytics::{AuditReport, EqualOpportunityReport, GroupCurves, GroupReport, ThresholdOutcome};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use core_types::Group;
use std::collections::BTreeMap;

/// Undefined rates are shown as `n/a`, never as zero.
pub fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{value:.3}"),
        None => "n/a".to_string(),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn report_row(label: &str, report: &GroupReport) -> Vec<Cell> {
    let cm = &report.confusion;
    let m = &report.metrics;
    vec![
        Cell::new(label),
        Cell::new(report.count),
        Cell::new(fmt_rate(report.base_rate)),
        Cell::new(fmt_rate(report.predicted_positive_rate)),
        Cell::new(cm.true_positives),
        Cell::new(cm.false_positives),
        Cell::new(cm.true_negatives),
        Cell::new(cm.false_negatives),
        Cell::new(fmt_rate(m.accuracy)),
        Cell::new(fmt_rate(m.ppv)),
        Cell::new(fmt_rate(m.fpr)),
        Cell::new(fmt_rate(m.fnr)),
        Cell::new(fmt_rate(m.tpr)),
    ]
}

pub fn audit_table(report: &AuditReport) -> Table {
    let mut table = new_table(vec![
        "Group", "N", "Base rate", "Pred. pos.", "TP", "FP", "TN", "FN", "Accuracy", "PPV", "FPR",
        "FNR", "TPR",
    ]);
    for (group, group_report) in &report.groups {
        table.add_row(report_row(group.as_str(), group_report));
    }
    table.add_row(report_row("All", &report.overall));
    table
}

/// One 2x2 table per group: rows are predicted, columns are actual.
pub fn crosstab_tables(report: &AuditReport) -> Vec<(String, Table)> {
    report
        .groups
        .iter()
        .map(|(group, group_report)| (group.to_string(), crosstab_table(group_report)))
        .chain(std::iter::once((
            "All".to_string(),
            crosstab_table(&report.overall),
        )))
        .collect()
}

fn crosstab_table(report: &GroupReport) -> Table {
    let [[pred_neg_actual_neg, pred_neg_actual_pos], [pred_pos_actual_neg, pred_pos_actual_pos]] =
        report.confusion.crosstab();
    let mut table = new_table(vec!["Predicted \\ Actual", "Did not reoffend", "Reoffended"]);
    table.add_row(vec![
        Cell::new("Low risk"),
        Cell::new(pred_neg_actual_neg),
        Cell::new(pred_neg_actual_pos),
    ]);
    table.add_row(vec![
        Cell::new("High risk"),
        Cell::new(pred_pos_actual_neg),
        Cell::new(pred_pos_actual_pos),
    ]);
    table
}

pub fn threshold_table(report: &EqualOpportunityReport) -> Table {
    let mut table = new_table(vec!["Group", "Cutoff", "Calibration TPR"]);
    for (group, outcome) in report.thresholds.iter() {
        let (cutoff, tpr) = match outcome {
            ThresholdOutcome::Reached {
                cutoff,
                achieved_tpr,
            } => (format!("{cutoff:.3}"), fmt_rate(Some(*achieved_tpr))),
            ThresholdOutcome::Unreachable => ("unreachable".to_string(), "n/a".to_string()),
        };
        table.add_row(vec![Cell::new(group.as_str()), Cell::new(cutoff), Cell::new(tpr)]);
    }
    table
}

/// Holdout error rates per group before and after applying group cutoffs.
pub fn holdout_comparison_table(report: &EqualOpportunityReport) -> Table {
    let mut table = new_table(vec![
        "Group", "TPR before", "TPR after", "FPR before", "FPR after", "PPV before", "PPV after",
    ]);
    for (group, after) in &report.holdout_after.groups {
        let before = report.holdout_before.groups.get(group);
        let before_rate = |pick: fn(&GroupReport) -> Option<f64>| fmt_rate(before.and_then(pick));
        table.add_row(vec![
            Cell::new(group.as_str()),
            Cell::new(before_rate(|r| r.metrics.tpr)),
            Cell::new(fmt_rate(after.metrics.tpr)),
            Cell::new(before_rate(|r| r.metrics.fpr)),
            Cell::new(fmt_rate(after.metrics.fpr)),
            Cell::new(before_rate(|r| r.metrics.ppv)),
            Cell::new(fmt_rate(after.metrics.ppv)),
        ]);
    }
    table
}

pub fn auc_table(curves: &BTreeMap<Group, GroupCurves>) -> Table {
    let mut table = new_table(vec!["Group", "ROC points", "AUC"]);
    for (group, group_curves) in curves {
        table.add_row(vec![
            Cell::new(group.as_str()),
            Cell::new(group_curves.roc.len()),
            Cell::new(fmt_rate(group_curves.auc)),
        ]);
    }
    table
}

/// Observed positive rate per score bin, one column per group.
pub fn calibration_table(curves: &BTreeMap<Group, GroupCurves>) -> Table {
    let mut header = vec!["Score bin".to_string()];
    header.extend(curves.keys().map(|g| g.to_string()));
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);

    let bins = curves.values().map(|c| c.calibration.len()).max().unwrap_or(0);
    for i in 0..bins {
        let mut row = Vec::with_capacity(curves.len() + 1);
        let label = curves
            .values()
            .find_map(|c| c.calibration.get(i))
            .map(|b| format!("[{:.2}, {:.2}]", b.lower, b.upper))
            .unwrap_or_default();
        row.push(Cell::new(label));
        for group_curves in curves.values() {
            let cell = match group_curves.calibration.get(i) {
                Some(bin) if bin.count > 0 => {
                    format!("{} (n={})", fmt_rate(bin.positive_rate), bin.count)
                }
                _ => "n/a".to_string(),
            };
            row.push(Cell::new(cell));
        }
        table.add_row(row);
    }
    table
}
