//! Record sources
//!
//! A [`RecordSource`] turns a configured SQL query (host variable
//! substitution already applied) into an ordered sequence of records.
//! Two back ends exist: a per-invocation connection built from connection
//! parameters, and a caller-supplied connection pool.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool};
use sqlx::{Connection, PgConnection};

use flowsift_core::Record;

use crate::error::Result;
use crate::row::row_to_record;

/// Parameters for building a per-invocation database connection
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Database server host
    pub host: String,

    /// Database server port
    pub port: u16,

    /// Catalog/database to query
    pub database: String,

    /// Login user
    pub user: String,

    /// Login password, if the server requires one
    pub password: Option<String>,
}

impl ConnectionParams {
    /// Build driver connect options from these parameters
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user);
        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

/// Source of reference records for the duplicate-check plugins
///
/// Implementations must return rows in result-set order and report a
/// zero-row result as an empty sequence.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Execute the query and return all rows as records
    async fn fetch(&self, query: &str) -> Result<Vec<Record>>;
}

/// Record source that opens a fresh connection per fetch
///
/// The connection lives for exactly one invocation: opened at the start,
/// closed after the query completes, dropped (and thereby released) if
/// the query fails.
pub struct EngineSource {
    params: ConnectionParams,
}

impl EngineSource {
    /// Create a source from connection parameters
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl RecordSource for EngineSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Record>> {
        tracing::debug!(
            host = %self.params.host,
            database = %self.params.database,
            "Connecting for reference query"
        );
        let mut conn = PgConnection::connect_with(&self.params.connect_options()).await?;

        let rows = sqlx::query(query).fetch_all(&mut conn).await;
        let closed = conn.close().await;
        let rows = rows?;
        closed?;

        tracing::debug!(rows = rows.len(), "Reference query returned rows");
        Ok(rows.iter().map(row_to_record).collect())
    }
}

/// Record source backed by a caller-supplied connection pool
///
/// The pool handle is the host's controller-service analogue. Each fetch
/// acquires a connection in a scope that returns it to the pool when the
/// guard drops, query failure included.
pub struct PooledSource {
    pool: PgPool,
}

impl PooledSource {
    /// Create a source over an established pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSource for PooledSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Record>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(query).fetch_all(&mut *conn).await?;

        tracing::debug!(rows = rows.len(), "Reference query returned rows");
        Ok(rows.iter().map(row_to_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParams {
        ConnectionParams {
            host: "db.example.com".to_string(),
            port: 5439,
            database: "warehouse".to_string(),
            user: "loader".to_string(),
            password: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_connect_options_carry_parameters() {
        let options = params().connect_options();
        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 5439);
        assert_eq!(options.get_database(), Some("warehouse"));
        assert_eq!(options.get_username(), "loader");
    }

    #[test]
    fn test_connect_options_without_password() {
        let mut params = params();
        params.password = None;
        // Password is not inspectable through the options API; building
        // without one must simply not panic.
        let options = params.connect_options();
        assert_eq!(options.get_username(), "loader");
    }
}
