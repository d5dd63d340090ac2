//! Console rendering for report outcomes
//!
//! Formatting policy: rates and scores always carry exactly 2 decimal
//! places; the headline high-risk percentage is integer-rounded. The two
//! precisions are deliberate (detail rows vs. headline KPI) and must not be
//! unified.

use super::sections::{SummaryStats, high_risk_percentage};
use super::{ReportOutcome, SectionResult};

const BANNER: &str = "========================================";

/// Format a rate or score with exactly 2 decimal places
pub fn format_rate(value: f64) -> String {
    format!("{value:.2}")
}

/// Render a row-oriented table with columns sized to their widest cell
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    out.push_str(&format!("  {}\n", header_line.join("  ")));

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", separator.join("  ")));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ")));
    }
    out
}

/// Render the full report as one console-ready string
pub fn render_report(outcome: &ReportOutcome) -> String {
    let mut out = String::new();

    out.push_str("Patient Risk Distribution:\n");
    out.push_str(&render_table(
        &["risk_category", "patients", "avg_risk"],
        &outcome
            .risk_distribution
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    b.patient_count.to_string(),
                    format_rate(b.avg_risk),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    out.push_str("\nMedication Adherence Trends (Last 5 Weeks):\n");
    out.push_str(&render_table(
        &["week", "adherence_rate", "total_doses", "doses_taken", "doses_missed"],
        &outcome
            .adherence_trend
            .iter()
            .map(|b| {
                vec![
                    b.week.clone(),
                    format_rate(b.adherence_rate),
                    b.total_doses.to_string(),
                    b.doses_taken.to_string(),
                    b.doses_missed.to_string(),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    out.push_str("\nRisk Model Comparison (DS vs AI):\n");
    match &outcome.model_comparison {
        SectionResult::Rows(agreements) => {
            out.push_str(&render_table(
                &["model_alignment", "patients", "avg_difference"],
                &agreements
                    .iter()
                    .map(|a| {
                        vec![
                            a.alignment.clone(),
                            a.patient_count.to_string(),
                            format_rate(a.avg_difference),
                        ]
                    })
                    .collect::<Vec<_>>(),
            ));
        }
        SectionResult::Absent(note) => {
            out.push_str(&format!("  {note}\n"));
        }
    }

    out.push_str("\nHigh-Risk Patients (Top 10):\n");
    out.push_str(&render_table(
        &[
            "patient_name",
            "risk_score",
            "risk_category",
            "active_symptoms",
            "active_prescriptions",
            "adherence_pct",
        ],
        &outcome
            .high_risk
            .iter()
            .map(|p| {
                vec![
                    p.patient_name.clone(),
                    format_rate(p.risk_score),
                    p.risk_category.clone(),
                    p.active_symptoms.to_string(),
                    p.active_prescriptions.to_string(),
                    format_rate(p.adherence_percentage),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    out.push_str("\nTop 5 Most Effective Medications:\n");
    out.push_str(&render_table(
        &[
            "med_name",
            "condition",
            "prescriptions",
            "adherence_rate",
            "symptoms_resolved",
            "effectiveness",
        ],
        &outcome
            .effectiveness
            .iter()
            .map(|m| {
                vec![
                    m.med_name.clone(),
                    m.condition_name.clone(),
                    m.total_prescriptions.to_string(),
                    format_rate(m.adherence_rate),
                    m.symptoms_resolved.to_string(),
                    format_rate(m.effectiveness),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    out.push_str("\nTop Disease Comorbidities:\n");
    out.push_str(&render_table(
        &["condition_1", "condition_2", "co_occurrence", "prevalence_pct"],
        &outcome
            .comorbidity
            .iter()
            .map(|c| {
                vec![
                    c.condition_1.clone(),
                    c.condition_2.clone(),
                    c.co_occurrence_count.to_string(),
                    format_rate(c.prevalence_percentage),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    // KPI payload shape varies per group, so each group is expanded rather
    // than flattened into a table.
    out.push_str("\nDashboard KPIs:\n");
    for group in &outcome.kpis {
        out.push_str(&format!("\n{}:\n", group.metric_group.to_uppercase()));
        let pretty = serde_json::to_string_pretty(&group.metrics)
            .unwrap_or_else(|_| group.metrics.to_string());
        out.push_str(&pretty);
        out.push('\n');
        out.push_str(&format!("  last updated: {}\n", group.last_updated));
    }

    out.push('\n');
    out.push_str(&render_summary(&outcome.summary));
    out
}

/// Render the final fixed label: value summary block
pub fn render_summary(summary: &SummaryStats) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("Analytics Summary\n");
    out.push_str(BANNER);
    out.push('\n');

    out.push_str(&format!(
        "Total Patients Analyzed: {}\n",
        summary.total_patients
    ));
    out.push_str(&format!(
        "High-Risk Patients: {} ({}%)\n",
        summary.high_risk_patients,
        high_risk_percentage(summary.high_risk_patients, summary.total_patients)
    ));
    out.push_str(&format!(
        "Average Adherence Rate: {}%\n",
        format_rate(summary.avg_adherence)
    ));
    out.push_str(&format!(
        "Medications Tracked: {}\n",
        summary.tracked_medications
    ));
    out.push_str(&format!(
        "Comorbidity Patterns: {}\n",
        summary.comorbidity_patterns
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate_two_decimals() {
        assert_eq!(format_rate(0.7), "0.70");
        assert_eq!(format_rate(82.456), "82.46");
        assert_eq!(format_rate(0.0), "0.00");
    }

    #[test]
    fn test_format_rate_round_trip() {
        for value in [0.126, 3.14159, 99.995, 0.004, 42.0] {
            let displayed = format_rate(value);
            let parsed: f64 = displayed.parse().unwrap();
            assert!(
                (parsed - value).abs() <= 0.005,
                "{displayed} drifted from {value}"
            );
        }
    }

    #[test]
    fn test_render_table_alignment() {
        let table = render_table(
            &["name", "count"],
            &[
                vec!["a-long-name".to_string(), "1".to_string()],
                vec!["b".to_string(), "200".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        // All lines padded to the widest cell per column
        assert!(lines[0].contains("name"));
        assert!(lines[1].starts_with("  ---"));
        assert!(lines[2].contains("a-long-name"));
    }

    #[test]
    fn test_render_summary_pinned_rounding() {
        let summary = SummaryStats {
            total_patients: 200,
            high_risk_patients: 37,
            avg_adherence: 76.5,
            tracked_medications: 24,
            comorbidity_patterns: 6,
        };
        let text = render_summary(&summary);
        assert!(text.contains("High-Risk Patients: 37 (19%)"));
        assert!(text.contains("Average Adherence Rate: 76.50%"));
    }

    #[test]
    fn test_render_summary_empty_population() {
        let summary = SummaryStats {
            total_patients: 0,
            high_risk_patients: 0,
            avg_adherence: 0.0,
            tracked_medications: 0,
            comorbidity_patterns: 0,
        };
        let text = render_summary(&summary);
        assert!(text.contains("High-Risk Patients: 0 (0%)"));
    }
}
