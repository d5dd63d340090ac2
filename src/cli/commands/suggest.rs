//! `suggest` command: nearest-neighbor lookup plus fixed advisory text

use anyhow::Result;

use care_analytics::embedding::suggest;
use care_analytics::{Config, Db};

pub async fn run(config: &Config, patient_id: &str, note: &str) -> Result<()> {
    let db = Db::connect(config).await?;
    let result = suggest(&db, config, patient_id, note).await;
    db.close().await;
    let snippets = result?;

    println!("Top retrieved snippets:");
    for (i, snippet) in snippets.iter().enumerate() {
        println!("{}. {snippet}", i + 1);
    }

    println!();
    println!("Suggested Actions:");
    println!("- Check current medications for interactions");
    println!("- Review adherence logs and missed doses");
    println!("- Consider follow-up if health_risk_score is high");
    Ok(())
}
