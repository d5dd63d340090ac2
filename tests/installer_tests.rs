//! Integration tests for installer file discovery

use std::fs::File;
use std::io::Write;

use tempfile::TempDir;

use care_analytics::AnalyticsError;
use care_analytics::install::discover_sql_files;

fn write_file(dir: &TempDir, name: &str, body: &str) {
    let mut file = File::create(dir.path().join(name)).expect("create file");
    writeln!(file, "{body}").expect("write file");
}

#[test]
fn discovers_ordered_files_sorted_by_prefix() {
    let dir = TempDir::new().expect("temp dir");
    // Written out of order on purpose
    write_file(&dir, "03_dashboard_kpis.sql", "CREATE VIEW c AS SELECT 1;");
    write_file(&dir, "01_risk_views.sql", "CREATE VIEW a AS SELECT 1;");
    write_file(&dir, "02_adherence_views.sql", "CREATE VIEW b AS SELECT 1;");

    let files = discover_sql_files(dir.path()).expect("discover");
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        names,
        vec![
            "01_risk_views.sql",
            "02_adherence_views.sql",
            "03_dashboard_kpis.sql"
        ]
    );
}

#[test]
fn ignores_files_without_numeric_prefix() {
    let dir = TempDir::new().expect("temp dir");
    write_file(&dir, "01_risk_views.sql", "CREATE VIEW a AS SELECT 1;");
    write_file(&dir, "notes.sql", "-- scratch");
    write_file(&dir, "README.md", "# docs");
    write_file(&dir, "02_views.txt", "not sql");

    let files = discover_sql_files(dir.path()).expect("discover");
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("01_risk_views.sql"));
}

#[test]
fn empty_directory_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    write_file(&dir, "README.md", "# docs");

    let err = discover_sql_files(dir.path()).unwrap_err();
    assert!(matches!(err, AnalyticsError::NoSqlFiles(_)));
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("does-not-exist");

    let err = discover_sql_files(&missing).unwrap_err();
    assert!(matches!(err, AnalyticsError::Io(_)));
}
