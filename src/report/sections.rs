//! Section queries, typed result rows, and the pure helpers behind them

use chrono::NaiveDate;
use serde::Serialize;

/// Risk categories from most to least severe.
///
/// The distribution section is ordered by this rank so the report reads
/// top-to-bottom by clinical urgency, never by count or score.
pub const RISK_SEVERITY_ORDER: [&str; 5] = [
    "CRITICAL RISK",
    "HIGH RISK",
    "MEDIUM RISK",
    "LOW RISK",
    "MINIMAL RISK",
];

/// Comorbidity pairs only count as a pattern at this co-occurrence level
pub const MATERIALITY_THRESHOLD: i64 = 3;

pub(crate) const RISK_DISTRIBUTION_SQL: &str = "
    SELECT ds_risk_category AS risk_category,
           COUNT(*)::bigint AS patient_count,
           COALESCE(AVG(ds_risk_score), 0)::float8 AS avg_risk
    FROM analytics.v_patient_risk_assessment
    GROUP BY ds_risk_category
";

pub(crate) const ADHERENCE_TREND_SQL: &str = "
    SELECT TO_CHAR(week, 'YYYY-MM-DD') AS week,
           adherence_rate::float8 AS adherence_rate,
           total_doses::bigint AS total_doses,
           doses_taken::bigint AS doses_taken,
           doses_missed::bigint AS doses_missed
    FROM analytics.v_adherence_trends
    ORDER BY week DESC
    LIMIT 5
";

pub(crate) const MODEL_COMPARISON_SQL: &str = "
    SELECT model_alignment,
           COUNT(*)::bigint AS patient_count,
           COALESCE(AVG(risk_difference), 0)::float8 AS avg_difference
    FROM analytics.v_risk_model_comparison
    GROUP BY model_alignment
    ORDER BY COUNT(*) DESC
";

pub(crate) const HIGH_RISK_SQL: &str = "
    SELECT patient_name,
           ds_risk_score::float8 AS risk_score,
           ds_risk_category AS risk_category,
           active_symptoms::bigint AS active_symptoms,
           active_prescriptions::bigint AS active_prescriptions,
           adherence_percentage::float8 AS adherence_percentage
    FROM analytics.v_patient_risk_assessment
    WHERE ds_risk_category IN ('CRITICAL RISK', 'HIGH RISK')
    ORDER BY ds_risk_score DESC
    LIMIT 10
";

pub(crate) const EFFECTIVENESS_SQL: &str = "
    SELECT med_name,
           condition_name,
           total_prescriptions::bigint AS total_prescriptions,
           avg_adherence_rate::float8 AS adherence_rate,
           symptoms_resolved::bigint AS symptoms_resolved,
           effectiveness_score::float8 AS effectiveness
    FROM analytics.v_medication_effectiveness
    ORDER BY effectiveness_score DESC
    LIMIT 5
";

pub(crate) const COMORBIDITY_SQL: &str = "
    SELECT condition_1,
           condition_2,
           co_occurrence_count::bigint AS co_occurrence_count,
           prevalence_percentage::float8 AS prevalence_percentage
    FROM analytics.v_condition_correlations
    ORDER BY co_occurrence_count DESC
    LIMIT 5
";

pub(crate) const DASHBOARD_KPI_SQL: &str = "
    SELECT metric_group,
           metrics,
           TO_CHAR(last_updated, 'YYYY-MM-DD HH24:MI:SS') AS last_updated
    FROM analytics.mv_dashboard_kpis
";

pub(crate) const SUMMARY_SQL: &str = "
    SELECT
      (SELECT COUNT(*)::bigint
         FROM analytics.v_patient_risk_assessment) AS total_patients,
      (SELECT COUNT(*)::bigint
         FROM analytics.v_patient_risk_assessment
        WHERE ds_risk_category IN ('CRITICAL RISK', 'HIGH RISK')) AS high_risk_patients,
      (SELECT COALESCE(AVG(adherence_percentage), 0)::float8
         FROM analytics.v_patient_risk_assessment) AS avg_adherence,
      (SELECT COUNT(*)::bigint
         FROM analytics.v_medication_effectiveness) AS tracked_medications
";

pub(crate) const COMORBIDITY_COUNTS_SQL: &str = "
    SELECT co_occurrence_count::bigint AS co_occurrence_count
    FROM analytics.v_condition_correlations
";

/// One bucket of the risk distribution
#[derive(Debug, Clone, Serialize)]
pub struct RiskBucket {
    pub category: String,
    pub patient_count: i64,
    pub avg_risk: f64,
}

/// One weekly bucket of the adherence trend
#[derive(Debug, Clone, Serialize)]
pub struct AdherenceBucket {
    pub week: String,
    pub adherence_rate: f64,
    pub total_doses: i64,
    pub doses_taken: i64,
    pub doses_missed: i64,
}

/// One agreement bucket of the model comparison
#[derive(Debug, Clone, Serialize)]
pub struct ModelAgreement {
    pub alignment: String,
    pub patient_count: i64,
    pub avg_difference: f64,
}

/// One roster row of the high-risk section
#[derive(Debug, Clone, Serialize)]
pub struct HighRiskPatient {
    pub patient_name: String,
    pub risk_score: f64,
    pub risk_category: String,
    pub active_symptoms: i64,
    pub active_prescriptions: i64,
    pub adherence_percentage: f64,
}

/// One ranked row of the medication effectiveness section
#[derive(Debug, Clone, Serialize)]
pub struct MedicationEffectiveness {
    pub med_name: String,
    pub condition_name: String,
    pub total_prescriptions: i64,
    pub adherence_rate: f64,
    pub symptoms_resolved: i64,
    pub effectiveness: f64,
}

/// One condition pair of the comorbidity section
#[derive(Debug, Clone, Serialize)]
pub struct ComorbidityPair {
    pub condition_1: String,
    pub condition_2: String,
    pub co_occurrence_count: i64,
    pub prevalence_percentage: f64,
}

/// One named metric group with its nested payload
#[derive(Debug, Clone, Serialize)]
pub struct KpiGroup {
    pub metric_group: String,
    pub metrics: serde_json::Value,
    pub last_updated: String,
}

/// The single aggregate summary row
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub total_patients: i64,
    pub high_risk_patients: i64,
    pub avg_adherence: f64,
    pub tracked_medications: i64,
    pub comorbidity_patterns: i64,
}

/// Rank a category against [`RISK_SEVERITY_ORDER`]; unknown labels sort last
pub fn severity_rank(category: &str) -> usize {
    RISK_SEVERITY_ORDER
        .iter()
        .position(|c| c.eq_ignore_ascii_case(category.trim()))
        .unwrap_or(RISK_SEVERITY_ORDER.len())
}

/// Sort risk buckets into fixed severity order, regardless of query order
pub fn sort_by_severity(buckets: &mut [RiskBucket]) {
    buckets.sort_by_key(|b| severity_rank(&b.category));
}

/// Normalize the adherence trend: strictly most-recent-first, at most 5 buckets
pub fn normalize_trend(mut buckets: Vec<AdherenceBucket>) -> Vec<AdherenceBucket> {
    buckets.sort_by(|a, b| parse_week(&b.week).cmp(&parse_week(&a.week)));
    buckets.truncate(5);
    buckets
}

fn parse_week(week: &str) -> (Option<NaiveDate>, String) {
    // Unparseable buckets fall back to string order after all dated ones
    match NaiveDate::parse_from_str(week, "%Y-%m-%d") {
        Ok(date) => (Some(date), String::new()),
        Err(_) => (None, week.to_string()),
    }
}

/// Integer-rounded high-risk percentage, half away from zero.
///
/// An empty patient population is a valid database state, so a zero total
/// yields 0 rather than a division error.
pub fn high_risk_percentage(high_risk: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    (high_risk as f64 / total as f64 * 100.0).round() as i64
}

/// Count comorbidity pairs at or above the materiality threshold
pub fn material_pattern_count(co_occurrence_counts: &[i64]) -> i64 {
    co_occurrence_counts
        .iter()
        .filter(|&&count| count >= MATERIALITY_THRESHOLD)
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(category: &str, patient_count: i64, avg_risk: f64) -> RiskBucket {
        RiskBucket {
            category: category.to_string(),
            patient_count,
            avg_risk,
        }
    }

    #[test]
    fn test_severity_rank() {
        assert_eq!(severity_rank("CRITICAL RISK"), 0);
        assert_eq!(severity_rank("high risk"), 1);
        assert_eq!(severity_rank("MINIMAL RISK"), 4);
        // Unknown labels sort after all known categories
        assert_eq!(severity_rank("UNSCORED"), 5);
    }

    #[test]
    fn test_sort_by_severity_ignores_input_order() {
        // Skewed input: sorted by count, which must not leak into the output
        let mut buckets = vec![
            bucket("LOW RISK", 90, 21.0),
            bucket("MEDIUM RISK", 40, 48.5),
            bucket("CRITICAL RISK", 3, 91.2),
            bucket("HIGH RISK", 12, 74.0),
        ];
        sort_by_severity(&mut buckets);

        let order: Vec<&str> = buckets.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(
            order,
            vec!["CRITICAL RISK", "HIGH RISK", "MEDIUM RISK", "LOW RISK"]
        );
    }

    #[test]
    fn test_normalize_trend_caps_and_orders() {
        let weeks = [
            "2025-06-02",
            "2025-07-14",
            "2025-06-30",
            "2025-07-07",
            "2025-06-16",
            "2025-06-23",
        ];
        let buckets: Vec<AdherenceBucket> = weeks
            .iter()
            .map(|w| AdherenceBucket {
                week: w.to_string(),
                adherence_rate: 0.8,
                total_doses: 100,
                doses_taken: 80,
                doses_missed: 20,
            })
            .collect();

        let trend = normalize_trend(buckets);
        assert_eq!(trend.len(), 5);
        let got: Vec<&str> = trend.iter().map(|b| b.week.as_str()).collect();
        assert_eq!(
            got,
            vec!["2025-07-14", "2025-07-07", "2025-06-30", "2025-06-23", "2025-06-16"]
        );
    }

    #[test]
    fn test_high_risk_percentage_rounds_half_away_from_zero() {
        // 37 / 200 = 18.5% -> 19
        assert_eq!(high_risk_percentage(37, 200), 19);
        assert_eq!(high_risk_percentage(1, 3), 33);
        assert_eq!(high_risk_percentage(2, 3), 67);
    }

    #[test]
    fn test_high_risk_percentage_empty_population() {
        assert_eq!(high_risk_percentage(0, 0), 0);
    }

    #[test]
    fn test_material_pattern_count() {
        assert_eq!(material_pattern_count(&[5, 4, 3, 2, 1]), 3);
        assert_eq!(material_pattern_count(&[]), 0);
        assert_eq!(material_pattern_count(&[2, 1, 2]), 0);
    }
}
