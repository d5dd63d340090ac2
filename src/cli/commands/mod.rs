//! CLI command handlers

pub mod embed;
pub mod install;
pub mod report;
pub mod suggest;
