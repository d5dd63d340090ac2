//! Report pipeline over the precomputed analytics views
//!
//! Eight sections run strictly in order against one exclusively-owned
//! connection. Every database error aborts the run; the single recovered
//! condition is the optional model-comparison view being reachable but
//! empty, which renders as an explanatory note instead of a table.

pub mod render;
pub mod sections;

use crate::db::Db;
use crate::error::AnalyticsError;

pub use sections::{
    AdherenceBucket, ComorbidityPair, HighRiskPatient, KpiGroup, MedicationEffectiveness,
    ModelAgreement, RiskBucket, SummaryStats,
};

use sections::{
    ADHERENCE_TREND_SQL, COMORBIDITY_COUNTS_SQL, COMORBIDITY_SQL, DASHBOARD_KPI_SQL,
    EFFECTIVENESS_SQL, HIGH_RISK_SQL, MODEL_COMPARISON_SQL, RISK_DISTRIBUTION_SQL, SUMMARY_SQL,
    material_pattern_count, normalize_trend, sort_by_severity,
};

/// Note rendered in place of the optional model-comparison table
pub const MODEL_COMPARISON_ABSENT_NOTE: &str =
    "No model comparison data available. The AI risk extension may not be installed in this deployment.";

/// Outcome of an optional report section.
///
/// Absent is distinct from empty-but-mandatory: it means the backing view
/// was reachable but had nothing to compare, and the run continues.
#[derive(Debug, Clone)]
pub enum SectionResult<T> {
    Rows(Vec<T>),
    Absent(&'static str),
}

impl<T> SectionResult<T> {
    /// Classify an optional section's rows: zero rows means absent
    pub fn from_rows(rows: Vec<T>, absent_note: &'static str) -> Self {
        if rows.is_empty() {
            SectionResult::Absent(absent_note)
        } else {
            SectionResult::Rows(rows)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SectionResult::Absent(_))
    }
}

/// All section results for one pipeline run.
///
/// Constructed fresh per run, rendered once, then discarded.
#[derive(Debug)]
pub struct ReportOutcome {
    pub risk_distribution: Vec<RiskBucket>,
    pub adherence_trend: Vec<AdherenceBucket>,
    pub model_comparison: SectionResult<ModelAgreement>,
    pub high_risk: Vec<HighRiskPatient>,
    pub effectiveness: Vec<MedicationEffectiveness>,
    pub comorbidity: Vec<ComorbidityPair>,
    pub kpis: Vec<KpiGroup>,
    pub summary: SummaryStats,
}

/// Run all eight report sections in order
pub async fn run_report(db: &Db) -> Result<ReportOutcome, AnalyticsError> {
    // 1. Risk distribution, re-sorted into fixed severity order
    tracing::debug!("querying risk distribution");
    let mut risk_distribution: Vec<RiskBucket> = db
        .query(RISK_DISTRIBUTION_SQL, &[])
        .await?
        .iter()
        .map(|row| RiskBucket {
            category: row.get("risk_category"),
            patient_count: row.get("patient_count"),
            avg_risk: row.get("avg_risk"),
        })
        .collect();
    sort_by_severity(&mut risk_distribution);

    // 2. Adherence trend, defensively capped at 5 most-recent-first buckets
    tracing::debug!("querying adherence trend");
    let adherence_trend = normalize_trend(
        db.query(ADHERENCE_TREND_SQL, &[])
            .await?
            .iter()
            .map(|row| AdherenceBucket {
                week: row.get("week"),
                adherence_rate: row.get("adherence_rate"),
                total_doses: row.get("total_doses"),
                doses_taken: row.get("doses_taken"),
                doses_missed: row.get("doses_missed"),
            })
            .collect(),
    );

    // 3. Model comparison: the one optional section. A failing query is
    //    still fatal; only the reachable-but-empty view is recovered.
    tracing::debug!("querying model comparison");
    let agreements: Vec<ModelAgreement> = db
        .query(MODEL_COMPARISON_SQL, &[])
        .await?
        .iter()
        .map(|row| ModelAgreement {
            alignment: row.get("model_alignment"),
            patient_count: row.get("patient_count"),
            avg_difference: row.get("avg_difference"),
        })
        .collect();
    let model_comparison = SectionResult::from_rows(agreements, MODEL_COMPARISON_ABSENT_NOTE);
    if model_comparison.is_absent() {
        tracing::info!("model comparison view is empty; continuing without it");
    }

    // 4. High-risk roster
    tracing::debug!("querying high-risk roster");
    let high_risk = db
        .query(HIGH_RISK_SQL, &[])
        .await?
        .iter()
        .map(|row| HighRiskPatient {
            patient_name: row.get("patient_name"),
            risk_score: row.get("risk_score"),
            risk_category: row.get("risk_category"),
            active_symptoms: row.get("active_symptoms"),
            active_prescriptions: row.get("active_prescriptions"),
            adherence_percentage: row.get("adherence_percentage"),
        })
        .collect();

    // 5. Medication effectiveness
    tracing::debug!("querying medication effectiveness");
    let effectiveness = db
        .query(EFFECTIVENESS_SQL, &[])
        .await?
        .iter()
        .map(|row| MedicationEffectiveness {
            med_name: row.get("med_name"),
            condition_name: row.get("condition_name"),
            total_prescriptions: row.get("total_prescriptions"),
            adherence_rate: row.get("adherence_rate"),
            symptoms_resolved: row.get("symptoms_resolved"),
            effectiveness: row.get("effectiveness"),
        })
        .collect();

    // 6. Comorbidity pairs
    tracing::debug!("querying comorbidity pairs");
    let comorbidity = db
        .query(COMORBIDITY_SQL, &[])
        .await?
        .iter()
        .map(|row| ComorbidityPair {
            condition_1: row.get("condition_1"),
            condition_2: row.get("condition_2"),
            co_occurrence_count: row.get("co_occurrence_count"),
            prevalence_percentage: row.get("prevalence_percentage"),
        })
        .collect();

    // 7. Dashboard KPIs: payload shape varies per group
    tracing::debug!("querying dashboard KPIs");
    let kpis = db
        .query(DASHBOARD_KPI_SQL, &[])
        .await?
        .iter()
        .map(|row| KpiGroup {
            metric_group: row.get("metric_group"),
            metrics: row.get("metrics"),
            last_updated: row.get("last_updated"),
        })
        .collect();

    // 8. Summary. The comorbidity pattern count applies the materiality
    //    threshold in Rust so the cutoff stays a tested constant.
    tracing::debug!("querying summary");
    let summary_row = db.query_one(SUMMARY_SQL, &[]).await?;
    let co_occurrence_counts: Vec<i64> = db
        .query(COMORBIDITY_COUNTS_SQL, &[])
        .await?
        .iter()
        .map(|row| row.get("co_occurrence_count"))
        .collect();

    let summary = SummaryStats {
        total_patients: summary_row.get("total_patients"),
        high_risk_patients: summary_row.get("high_risk_patients"),
        avg_adherence: summary_row.get("avg_adherence"),
        tracked_medications: summary_row.get("tracked_medications"),
        comorbidity_patterns: material_pattern_count(&co_occurrence_counts),
    };

    Ok(ReportOutcome {
        risk_distribution,
        adherence_trend,
        model_comparison,
        high_risk,
        effectiveness,
        comorbidity,
        kpis,
        summary,
    })
}
