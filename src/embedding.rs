//! Synthetic embedding seeder and similarity lookup
//!
//! Embeddings here are random placeholders for demo data; real embedding
//! computation is out of scope. The lookup relies on the database's native
//! vector distance operator.

use pgvector::Vector;
use rand::Rng;

use crate::config::Config;
use crate::db::Db;
use crate::error::AnalyticsError;

/// Fixed pool of note snippets cycled through while seeding
pub const NOTE_POOL: [&str; 5] = [
    "Patient reports mild headache and nausea for 2 days.",
    "Prescribed medication for high blood pressure; take twice daily.",
    "Follow-up: symptoms improved after therapy.",
    "Patient reports allergy to penicillin.",
    "Medication adherence low; missed last 2 scheduled doses.",
];

/// Number of nearest snippets returned by the lookup
pub const LOOKUP_LIMIT: i64 = 5;

/// One planned synthetic row before the vector is drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRow {
    pub snippet: String,
    pub source_id: Option<i64>,
}

/// Plan `num_inserts` rows: snippets cycle through the note pool and source
/// ids are assigned round-robin over the patient sample.
pub fn seed_plan(num_inserts: usize, patient_ids: &[i64]) -> Vec<PlannedRow> {
    (0..num_inserts)
        .map(|i| PlannedRow {
            snippet: format!("{} (synthetic {i})", NOTE_POOL[i % NOTE_POOL.len()]),
            source_id: if patient_ids.is_empty() {
                None
            } else {
                Some(patient_ids[i % patient_ids.len()])
            },
        })
        .collect()
}

/// Draw `dim` values uniformly from [-1, 1] for a placeholder embedding
pub fn random_vector(dim: usize, rng: &mut impl Rng) -> Vec<f32> {
    (0..dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Insert `config.num_inserts` synthetic embedding rows, returning the count
pub async fn seed_embeddings(db: &Db, config: &Config) -> Result<usize, AnalyticsError> {
    let sample = db
        .query("SELECT id FROM app.patient ORDER BY id LIMIT 50", &[])
        .await?;
    let patient_ids: Vec<i64> = sample.iter().map(|row| row.get("id")).collect();
    if patient_ids.is_empty() {
        tracing::warn!("no patients found; seeding embeddings without source ids");
    }

    let plan = seed_plan(config.num_inserts, &patient_ids);
    let mut rng = rand::thread_rng();

    for (i, planned) in plan.iter().enumerate() {
        let embedding = Vector::from(random_vector(config.embedding_dim, &mut rng));
        db.execute(
            "INSERT INTO app.embedding (source_table, source_id, text_snippet, embedding)
             VALUES ($1, $2, $3, $4)",
            &[&"patient_note", &planned.source_id, &planned.snippet, &embedding],
        )
        .await?;

        if i % 50 == 0 {
            tracing::info!(inserted = i, "seeding embeddings");
        }
    }

    // Refresh planner statistics so the vector index gets used
    db.batch_execute("ANALYZE app.embedding").await?;

    Ok(plan.len())
}

/// Retrieve the snippets of the 5 stored embeddings nearest to a fresh
/// placeholder query vector.
///
/// The patient id and note are logged for traceability only; in this demo
/// the query vector is random rather than derived from the note.
pub async fn suggest(
    db: &Db,
    config: &Config,
    patient_id: &str,
    note: &str,
) -> Result<Vec<String>, AnalyticsError> {
    tracing::debug!(patient_id, note, "running suggestion lookup");

    let mut rng = rand::thread_rng();
    let query_vector = Vector::from(random_vector(config.embedding_dim, &mut rng));

    let rows = db
        .query(
            "SELECT source_table, source_id, text_snippet
             FROM app.embedding
             ORDER BY embedding <-> $1
             LIMIT $2",
            &[&query_vector, &LOOKUP_LIMIT],
        )
        .await?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get::<_, Option<String>>("text_snippet"))
        .filter(|snippet| !snippet.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_seed_plan_cycles_sources() {
        let plan = seed_plan(10, &[101, 102, 103]);
        assert_eq!(plan.len(), 10);

        // Round-robin over the 3-patient sample
        assert_eq!(plan[0].source_id, Some(101));
        assert_eq!(plan[1].source_id, Some(102));
        assert_eq!(plan[2].source_id, Some(103));
        assert_eq!(plan[3].source_id, Some(101));
        assert_eq!(plan[4].source_id, Some(102));
        assert_eq!(plan[9].source_id, Some(101));
    }

    #[test]
    fn test_seed_plan_cycles_notes() {
        let plan = seed_plan(7, &[1]);
        assert_eq!(plan[0].snippet, format!("{} (synthetic 0)", NOTE_POOL[0]));
        assert_eq!(plan[5].snippet, format!("{} (synthetic 5)", NOTE_POOL[0]));
        assert_eq!(plan[6].snippet, format!("{} (synthetic 6)", NOTE_POOL[1]));
    }

    #[test]
    fn test_seed_plan_empty_sample() {
        let plan = seed_plan(3, &[]);
        assert!(plan.iter().all(|row| row.source_id.is_none()));
    }

    #[test]
    fn test_random_vector_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = random_vector(8, &mut rng);
        assert_eq!(values.len(), 8);
        assert!(values.iter().all(|v| (-1.0..1.0).contains(v)));
    }

    #[test]
    fn test_random_vector_converts_to_pgvector() {
        // The driver binds the pgvector type directly; a text parameter
        // would be rejected once the server describes the column as vector.
        let mut rng = StdRng::seed_from_u64(7);
        let vector = Vector::from(random_vector(4, &mut rng));
        assert_eq!(vector.to_vec().len(), 4);
    }
}
