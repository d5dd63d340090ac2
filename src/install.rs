//! Ordered SQL statement installer
//!
//! View definitions live in numbered files (`01_...sql`, `02_...sql`);
//! later files may depend on relations created by earlier ones, so the
//! numeric prefix is the install order. Each file is applied whole; the
//! first failure aborts the remainder of the run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::db::Db;
use crate::error::AnalyticsError;

/// Presence of the objects the AI schema extension creates
#[derive(Debug, Clone)]
pub struct AiVerification {
    pub embedding_table: bool,
    pub health_risk_column: bool,
    pub audit_table: bool,
}

impl AiVerification {
    pub fn all_present(&self) -> bool {
        self.embedding_table && self.health_risk_column && self.audit_table
    }
}

/// Discover `NN_*.sql` files in `dir`, sorted by their numeric prefix
pub fn discover_sql_files(dir: &Path) -> Result<Vec<PathBuf>, AnalyticsError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| has_ordered_prefix(path))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(AnalyticsError::NoSqlFiles(dir.to_path_buf()));
    }
    Ok(files)
}

fn has_ordered_prefix(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let bytes = name.as_bytes();
    name.ends_with(".sql")
        && bytes.len() > 7
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'_'
}

/// Apply every ordered statement file in `dir`, returning the applied names.
///
/// A failing file aborts installation with the file named in the error;
/// already-applied files stay applied (no rollback beyond what the database
/// itself provides).
pub async fn apply_sql_dir(db: &Db, dir: &Path) -> Result<Vec<String>, AnalyticsError> {
    let files = discover_sql_files(dir)?;
    let mut applied = Vec::with_capacity(files.len());

    for path in files {
        let name = display_name(&path);
        tracing::info!("installing {name}");
        let sql = fs::read_to_string(&path)?;
        db.batch_execute(&sql)
            .await
            .map_err(|e| match e {
                AnalyticsError::Database(source) => AnalyticsError::Install {
                    file: name.clone(),
                    source,
                },
                other => other,
            })?;
        applied.push(name);
    }

    Ok(applied)
}

/// Apply the AI schema extension file, then verify the objects it creates
pub async fn install_ai(db: &Db, sql_file: &Path) -> Result<AiVerification, AnalyticsError> {
    let name = display_name(sql_file);
    tracing::info!("installing {name}");
    let sql = fs::read_to_string(sql_file)?;
    db.batch_execute(&sql).await.map_err(|e| match e {
        AnalyticsError::Database(source) => AnalyticsError::Install { file: name, source },
        other => other,
    })?;

    verify_ai_schema(db).await
}

/// Check `information_schema` for the embedding table, the risk score
/// column, and the audit table
pub async fn verify_ai_schema(db: &Db) -> Result<AiVerification, AnalyticsError> {
    Ok(AiVerification {
        embedding_table: table_exists(db, "app", "embedding").await?,
        health_risk_column: column_exists(db, "app", "patient", "health_risk_score").await?,
        audit_table: table_exists(db, "app", "ai_audit_log").await?,
    })
}

async fn table_exists(db: &Db, schema: &str, table: &str) -> Result<bool, AnalyticsError> {
    let row = db
        .query_one(
            "SELECT COUNT(*)::bigint
             FROM information_schema.tables
             WHERE table_schema = $1 AND table_name = $2",
            &[&schema, &table],
        )
        .await?;
    Ok(row.get::<_, i64>(0) == 1)
}

async fn column_exists(
    db: &Db,
    schema: &str,
    table: &str,
    column: &str,
) -> Result<bool, AnalyticsError> {
    let row = db
        .query_one(
            "SELECT COUNT(*)::bigint
             FROM information_schema.columns
             WHERE table_schema = $1 AND table_name = $2 AND column_name = $3",
            &[&schema, &table, &column],
        )
        .await?;
    Ok(row.get::<_, i64>(0) == 1)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_ordered_prefix() {
        assert!(has_ordered_prefix(Path::new("01_base_views.sql")));
        assert!(has_ordered_prefix(Path::new("99_ai_extensions.sql")));
        assert!(!has_ordered_prefix(Path::new("views.sql")));
        assert!(!has_ordered_prefix(Path::new("1_short.sql")));
        assert!(!has_ordered_prefix(Path::new("01_readme.md")));
        assert!(!has_ordered_prefix(Path::new("01_.sql")));
    }
}
