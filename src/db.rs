//! PostgreSQL connection handle
//!
//! The connection is an exclusively-owned resource for the duration of one
//! run: opened once, threaded through the pipeline by reference, and closed
//! exactly once at the call boundary.

use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Row};

use crate::config::Config;
use crate::error::AnalyticsError;

/// An open database session plus its spawned connection driver
pub struct Db {
    client: Client,
    driver: JoinHandle<()>,
}

impl Db {
    /// Connect to the database described by `config`
    pub async fn connect(config: &Config) -> Result<Self, AnalyticsError> {
        let (client, connection) =
            tokio_postgres::connect(&config.connection_string(), NoTls).await?;

        // Drive the connection until the client is dropped
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {e}");
            }
        });

        Ok(Self { client, driver })
    }

    /// Execute a parameterized query, returning all rows
    pub async fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, AnalyticsError> {
        Ok(self.client.query(sql, params).await?)
    }

    /// Execute a parameterized query expected to return exactly one row
    pub async fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Row, AnalyticsError> {
        Ok(self.client.query_one(sql, params).await?)
    }

    /// Execute a parameterized statement, returning the affected row count
    pub async fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, AnalyticsError> {
        Ok(self.client.execute(sql, params).await?)
    }

    /// Execute a batch of semicolon-separated statements
    pub async fn batch_execute(&self, sql: &str) -> Result<(), AnalyticsError> {
        Ok(self.client.batch_execute(sql).await?)
    }

    /// Close the session.
    ///
    /// Consumes the handle so it can only happen once; dropping the client
    /// terminates the driver task, which is awaited before returning.
    pub async fn close(self) {
        drop(self.client);
        let _ = self.driver.await;
    }
}
