//! Checked operation requests, produced by request validation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::attribute_value::Item;
use crate::types::{Condition, ReturnConsumedCapacity, ReturnItemCollectionMetrics, Select};

/// A segment of a parallel scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelScan {
    /// Zero-based segment number.
    pub segment: u32,
    /// Total number of segments.
    pub total_segments: u32,
}

/// A checked `Scan` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub table_name: String,
    /// Maximum number of items to evaluate.
    pub limit: Option<usize>,
    pub parallel: Option<ParallelScan>,
    pub select: Select,
    /// Projection, `None` for all attributes.
    pub attributes_to_get: Option<Vec<String>>,
    /// Filter conditions keyed by attribute name.
    pub scan_filter: BTreeMap<String, Condition>,
    pub exclusive_start_key: Option<Item>,
    pub return_consumed_capacity: ReturnConsumedCapacity,
}

impl ScanRequest {
    /// A request scanning a whole table with no options.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            limit: None,
            parallel: None,
            select: Select::AllAttributes,
            attributes_to_get: None,
            scan_filter: BTreeMap::new(),
            exclusive_start_key: None,
            return_consumed_capacity: ReturnConsumedCapacity::None,
        }
    }
}

/// A put request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    pub item: Item,
}

/// A delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    pub key: Item,
}

/// A checked write request: exactly one of put or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WriteRequest {
    /// Insert or replace an item.
    #[serde(rename = "PutRequest")]
    Put(PutRequest),
    /// Delete an item by key.
    #[serde(rename = "DeleteRequest")]
    Delete(DeleteRequest),
}

/// A checked `BatchWriteItem` request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchWriteItemRequest {
    /// Write requests keyed by table name.
    pub request_items: BTreeMap<String, Vec<WriteRequest>>,
    pub return_consumed_capacity: ReturnConsumedCapacity,
    pub return_item_collection_metrics: ReturnItemCollectionMetrics,
}

impl BatchWriteItemRequest {
    /// Total number of write requests across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.request_items.values().map(Vec::len).sum()
    }

    /// Returns `true` if there are no write requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
