//! Duplicate-check plugins
//!
//! Both variants run the same per-invocation pipeline: parse the flowfile
//! batch, parse the column mapping, fetch the reference records, classify,
//! and emit one partition per the routing policy. They differ only in how
//! reference rows are acquired. Failures are not caught here; a bad batch,
//! a bad mapping, or a query failure fails the whole invocation and
//! propagates to the host runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use flowsift_core::{
    classify, parse_records, FieldMapping, FlowFile, FlowFileTransform, Result, TransformResult,
};
use flowsift_db::{ConnectionParams, EngineSource, PooledSource, RecordSource};

/// Configuration shared by both duplicate-check variants
///
/// Values arrive with host variable substitution already applied. The
/// column mapping stays in its JSON-encoded form and is parsed per
/// invocation, so a malformed mapping fails the invocation it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckDuplicatesConfig {
    /// Query executed against the reference database
    pub query: String,

    /// JSON mapping between flowfile fields and database columns
    #[serde(default = "default_column_mapping")]
    pub column_mapping: String,
}

fn default_column_mapping() -> String {
    "{}".to_string()
}

/// Run the duplicate check for one flowfile against the given source.
///
/// Exposed so hosts (and tests) can drive the pipeline with any
/// [`RecordSource`] implementation.
pub async fn check_against_source<S: RecordSource>(
    source: &S,
    config: &CheckDuplicatesConfig,
    flowfile: &FlowFile,
) -> Result<Option<TransformResult>> {
    let incoming = parse_records(flowfile.content_str()?)?;
    let mapping = FieldMapping::from_json(&config.column_mapping)?;
    let reference = source.fetch(&config.query).await?;

    let classification = classify(incoming, &reference, &mapping);
    tracing::debug!(
        matched = classification.matched.len(),
        unmatched = classification.unmatched.len(),
        "Classified batch against {} reference records",
        reference.len()
    );

    classification.into_transform_result()
}

/// Duplicate check that connects per invocation from connection parameters
pub struct CheckDuplicates {
    config: CheckDuplicatesConfig,
    connection: ConnectionParams,
}

impl CheckDuplicates {
    /// Create the plugin from its resolved configuration
    pub fn new(config: CheckDuplicatesConfig, connection: ConnectionParams) -> Self {
        Self { config, connection }
    }
}

#[async_trait]
impl FlowFileTransform for CheckDuplicates {
    async fn transform(&self, flowfile: &FlowFile) -> Result<Option<TransformResult>> {
        let source = EngineSource::new(self.connection.clone());
        check_against_source(&source, &self.config, flowfile).await
    }
}

/// Duplicate check over a host-managed connection pool
///
/// The pool is the injected collaborator standing in for the host's
/// connection-pool service; the plugin itself holds no other state.
pub struct PooledCheckDuplicates {
    config: CheckDuplicatesConfig,
    pool: PgPool,
}

impl PooledCheckDuplicates {
    /// Create the plugin over an established pool
    pub fn new(config: CheckDuplicatesConfig, pool: PgPool) -> Self {
        Self { config, pool }
    }
}

#[async_trait]
impl FlowFileTransform for PooledCheckDuplicates {
    async fn transform(&self, flowfile: &FlowFile) -> Result<Option<TransformResult>> {
        let source = PooledSource::new(self.pool.clone());
        check_against_source(&source, &self.config, flowfile).await
    }
}
