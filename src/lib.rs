//! Care Analytics - Console analytics toolkit for the care platform demo database
//!
//! Provides:
//! - Report pipeline over the precomputed `analytics.*` views
//! - Ordered SQL view installer + AI schema extension installer
//! - Synthetic embedding seeder and nearest-neighbor suggestion lookup

pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod install;
pub mod report;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use db::Db;
pub use error::AnalyticsError;
pub use report::{ReportOutcome, SectionResult, run_report};
