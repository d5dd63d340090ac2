//! `seed` command: insert synthetic embedding rows

use anyhow::Result;

use care_analytics::embedding::seed_embeddings;
use care_analytics::{Config, Db};

pub async fn run(config: &Config) -> Result<()> {
    println!(
        "Seeding {} synthetic embeddings ({} dimensions)",
        config.num_inserts, config.embedding_dim
    );

    let db = Db::connect(config).await?;
    let result = seed_embeddings(&db, config).await;
    db.close().await;
    let inserted = result?;

    println!("Inserted {inserted} synthetic embeddings.");
    Ok(())
}
