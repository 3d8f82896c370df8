//! Operation execution against the in-memory tables.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use scanlite_model::attribute_value::Item;
use scanlite_model::error::DynamoDBError;
use scanlite_model::output::{BatchWriteItemOutput, ScanOutput};
use scanlite_model::request::{BatchWriteItemRequest, ScanRequest, WriteRequest};
use scanlite_model::types::Select;

use crate::config::ScanliteConfig;
use crate::error::storage_error_to_dynamodb;
use crate::filter::evaluate_filter;
use crate::state::{DynamoDBServiceState, DynamoDBTable};
use crate::storage::{
    PrimaryKey, extract_exact_key, extract_primary_key, partition_key_segment,
};
use crate::validation::TypedRequest;
use crate::validation::aggregate::starting_key_invalid;

/// Runs checked requests against the service state.
#[derive(Debug)]
pub struct ScanliteProvider {
    /// Service state owning all tables.
    pub state: Arc<DynamoDBServiceState>,
    /// Configuration.
    pub config: Arc<ScanliteConfig>,
}

impl ScanliteProvider {
    /// Create a provider with no tables.
    #[must_use]
    pub fn new(config: ScanliteConfig) -> Self {
        Self {
            state: Arc::new(DynamoDBServiceState::new()),
            config: Arc::new(config),
        }
    }

    /// Reset all state (for testing).
    pub fn reset(&self) {
        self.state.reset();
    }

    /// Run a validated request and render its output as JSON.
    pub fn execute(&self, request: TypedRequest) -> Result<serde_json::Value, DynamoDBError> {
        match request {
            TypedRequest::Scan(input) => to_json(&self.handle_scan(input)?),
            TypedRequest::BatchWriteItem(input) => to_json(&self.handle_batch_write_item(input)?),
        }
    }
}

fn to_json<T: serde::Serialize>(output: &T) -> Result<serde_json::Value, DynamoDBError> {
    serde_json::to_value(output)
        .map_err(|e| DynamoDBError::internal_error(format!("Failed to serialize response: {e}")))
}

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

impl ScanliteProvider {
    /// Handle `Scan`.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle_scan(&self, request: ScanRequest) -> Result<ScanOutput, DynamoDBError> {
        let table = self.state.require_table(&request.table_name)?;

        let exclusive_start = request
            .exclusive_start_key
            .as_ref()
            .map(|key| extract_exact_key(table.key_schema(), key).map_err(starting_key_invalid))
            .transpose()?;

        if let (Some(start), Some(parallel)) = (&exclusive_start, request.parallel) {
            if partition_key_segment(&start.partition_key, parallel.total_segments)
                != parallel.segment
            {
                return Err(DynamoDBError::validation(
                    "The provided Exclusive start key does not map to the provided Segment and \
                     TotalSegments values.",
                ));
            }
        }

        let page = table
            .storage
            .scan(request.limit, exclusive_start.as_ref(), request.parallel);
        let scanned_count = page.items.len();

        let items: Vec<Item> = page
            .items
            .into_iter()
            .filter(|item| evaluate_filter(&request.scan_filter, item))
            .map(|item| project(item, request.attributes_to_get.as_deref()))
            .collect();
        let count = items.len();

        let last_evaluated_key = page
            .last_evaluated_key
            .map(|key| key.to_item(table.key_schema()));

        Ok(ScanOutput {
            items: (request.select != Select::Count).then_some(items),
            count,
            scanned_count,
            last_evaluated_key,
        })
    }
}

/// Keeps only the listed attributes that exist on the item.
fn project(mut item: Item, attributes_to_get: Option<&[String]>) -> Item {
    if let Some(names) = attributes_to_get {
        item.retain(|name, _| names.contains(name));
    }
    item
}

// ---------------------------------------------------------------------------
// Batch operations
// ---------------------------------------------------------------------------

impl ScanliteProvider {
    /// Handle `BatchWriteItem`.
    ///
    /// Every request is checked against its table before any is applied.
    pub fn handle_batch_write_item(
        &self,
        request: BatchWriteItemRequest,
    ) -> Result<BatchWriteItemOutput, DynamoDBError> {
        let mut planned: Vec<(Arc<DynamoDBTable>, Vec<(PrimaryKey, WriteRequest)>)> = Vec::new();

        for (table_name, write_requests) in request.request_items {
            let table = self.state.require_table(&table_name)?;
            let mut seen = HashSet::new();
            let mut writes = Vec::with_capacity(write_requests.len());

            for write in write_requests {
                let key = match &write {
                    WriteRequest::Put(put) => extract_primary_key(table.key_schema(), &put.item),
                    WriteRequest::Delete(delete) => {
                        extract_exact_key(table.key_schema(), &delete.key)
                    }
                }
                .map_err(storage_error_to_dynamodb)?;

                if !seen.insert(key.clone()) {
                    return Err(DynamoDBError::validation(
                        "Provided list of item keys contains duplicates",
                    ));
                }
                writes.push((key, write));
            }
            planned.push((table, writes));
        }

        for (table, writes) in planned {
            for (key, write) in writes {
                match write {
                    WriteRequest::Put(put) => {
                        table
                            .storage
                            .put_item(put.item)
                            .map_err(storage_error_to_dynamodb)?;
                    }
                    WriteRequest::Delete(_) => {
                        table.storage.delete_item(&key);
                    }
                }
            }
        }

        Ok(BatchWriteItemOutput {
            unprocessed_items: HashMap::new(),
        })
    }
}
