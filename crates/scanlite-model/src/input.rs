//! Wire-level operation inputs.
//!
//! These mirror the request JSON after its shape has been checked: enum
//! fields are still plain strings and attribute values are still in their
//! raw form. The checked counterparts live in [`crate::request`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::RawAttributeValue;
use crate::types::RawCondition;

/// Input for the `Scan` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanInput {
    #[serde(default)]
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_segments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_to_get: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_filter: Option<BTreeMap<String, RawCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<BTreeMap<String, RawAttributeValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

/// Input for the `BatchWriteItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemInput {
    #[serde(default)]
    pub request_items: BTreeMap<String, Vec<Option<RawWriteRequest>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<String>,
}

/// Wire form of one write request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawWriteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put_request: Option<RawPutRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<RawDeleteRequest>,
}

/// Wire form of a put request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPutRequest {
    #[serde(default)]
    pub item: BTreeMap<String, RawAttributeValue>,
}

/// Wire form of a delete request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDeleteRequest {
    #[serde(default)]
    pub key: BTreeMap<String, RawAttributeValue>,
}
