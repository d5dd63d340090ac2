//! `report` command: run the analytics pipeline and print the report

use anyhow::Result;

use care_analytics::report::render::render_report;
use care_analytics::{Config, Db, run_report};

pub async fn run(config: &Config) -> Result<()> {
    println!("========================================");
    println!("Care Analytics Report");
    println!("========================================");
    println!();

    let db = Db::connect(config).await?;
    // Close exactly once on both the success and the failure path
    let outcome = run_report(&db).await;
    db.close().await;
    let outcome = outcome?;

    print!("{}", render_report(&outcome));

    println!();
    println!("========================================");
    println!("Analytics report completed");
    println!("========================================");
    Ok(())
}
