//! End-to-end tests for scanlite.
//!
//! Requests are sent as JSON bodies through [`ScanliteHandler`], the same
//! path a transport layer would use. Each test creates its own tables with
//! unique names.

use std::sync::{Arc, Once};

use anyhow::Context;
use serde_json::Value;
use tracing::debug;

use scanlite_core::storage::KeySchema;
use scanlite_core::{ScanliteConfig, ScanliteHandler, ScanliteProvider};
use scanlite_model::DynamoDBError;
use scanlite_model::attribute_value::ScalarType;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scanlite=debug")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create a handler configured from `SCANLITE_*` variables, with no tables.
#[must_use]
pub fn handler() -> ScanliteHandler {
    handler_with(ScanliteConfig::from_env())
}

/// Create a handler with the given configuration and no tables.
#[must_use]
pub fn handler_with(config: ScanliteConfig) -> ScanliteHandler {
    init_tracing();
    ScanliteHandler::new(Arc::new(ScanliteProvider::new(config)))
}

/// Generate a unique table name for a test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a table keyed by a string `pk` and return its name.
pub fn create_hash_table(handler: &ScanliteHandler, prefix: &str) -> anyhow::Result<String> {
    let name = test_table_name(prefix);
    handler
        .provider()
        .state
        .create_table(&name, KeySchema::hash("pk", ScalarType::S))
        .context("create hash table")?;
    Ok(name)
}

/// Create a table keyed by a string `pk` and a numeric `sk`.
pub fn create_composite_table(handler: &ScanliteHandler, prefix: &str) -> anyhow::Result<String> {
    let name = test_table_name(prefix);
    handler
        .provider()
        .state
        .create_table(
            &name,
            KeySchema::composite("pk", ScalarType::S, "sk", ScalarType::N),
        )
        .context("create composite table")?;
    Ok(name)
}

/// Send a request and decode the JSON response.
pub fn call(handler: &ScanliteHandler, operation: &str, body: &Value) -> anyhow::Result<Value> {
    let bytes = serde_json::to_vec(body)?;
    let out = handler.handle_request(operation, &bytes)?;
    Ok(serde_json::from_slice(&out)?)
}

/// Send a request that must fail and return the error.
pub fn call_err(
    handler: &ScanliteHandler,
    operation: &str,
    body: &Value,
) -> anyhow::Result<DynamoDBError> {
    let bytes = serde_json::to_vec(body)?;
    match handler.handle_request(operation, &bytes) {
        Ok(out) => anyhow::bail!(
            "{operation} unexpectedly succeeded: {}",
            String::from_utf8_lossy(&out)
        ),
        Err(e) => {
            debug!(operation, error = %e, "request failed as expected");
            Ok(e)
        }
    }
}

/// Write items to a table through `BatchWriteItem`.
pub fn put_items(handler: &ScanliteHandler, table: &str, items: &[Value]) -> anyhow::Result<()> {
    for chunk in items.chunks(25) {
        let requests: Vec<Value> = chunk
            .iter()
            .map(|item| serde_json::json!({"PutRequest": {"Item": item}}))
            .collect();
        call(
            handler,
            "BatchWriteItem",
            &serde_json::json!({"RequestItems": {table: requests}}),
        )?;
    }
    Ok(())
}

mod test_batch_write;
mod test_scan;
mod test_validation;
