//! `install-views` and `install-ai` commands

use std::path::Path;

use anyhow::Result;

use care_analytics::install::{apply_sql_dir, install_ai};
use care_analytics::{Config, Db};

pub async fn run_views(config: &Config, dir: &Path) -> Result<()> {
    println!("Installing analytics views from {}", dir.display());

    let db = Db::connect(config).await?;
    let result = apply_sql_dir(&db, dir).await;
    db.close().await;
    let applied = result?;

    println!();
    println!("Installed {} file(s):", applied.len());
    for name in &applied {
        println!("  - {name}");
    }
    Ok(())
}

pub async fn run_ai(config: &Config, file: &Path) -> Result<()> {
    println!("Installing AI enhancement from {}", file.display());

    let db = Db::connect(config).await?;
    let result = install_ai(&db, file).await;
    db.close().await;
    let verification = result?;

    println!();
    println!("Verification:");
    println!(
        "  app.embedding table: {}",
        status(verification.embedding_table)
    );
    println!(
        "  patient.health_risk_score column: {}",
        status(verification.health_risk_column)
    );
    println!(
        "  app.ai_audit_log table: {}",
        status(verification.audit_table)
    );

    if verification.all_present() {
        println!();
        println!("AI enhancement installed. Next steps:");
        println!("  1. care-analytics seed                      # generate embeddings");
        println!("  2. care-analytics suggest 1 \"chest pain\"    # test search");
    }
    Ok(())
}

fn status(present: bool) -> &'static str {
    if present { "Created" } else { "Missing" }
}
