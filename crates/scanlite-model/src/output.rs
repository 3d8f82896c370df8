//! Operation outputs.

use std::collections::HashMap;

use serde::Serialize;

use crate::attribute_value::Item;
use crate::request::WriteRequest;

/// Output for the `Scan` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanOutput {
    /// Matching items. Omitted when only a count was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    /// Number of items that passed the filter.
    pub count: usize,
    /// Number of items evaluated before filtering.
    pub scanned_count: usize,
    /// Key to resume from when more items remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<Item>,
}

/// Output for the `BatchWriteItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemOutput {
    /// Requests that were not applied, keyed by table name.
    pub unprocessed_items: HashMap<String, Vec<WriteRequest>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute_value::AttributeValue;

    #[test]
    fn test_should_omit_items_when_counting() {
        let output = ScanOutput {
            items: None,
            count: 2,
            scanned_count: 3,
            last_evaluated_key: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json, serde_json::json!({"Count": 2, "ScannedCount": 3}));
    }

    #[test]
    fn test_should_include_last_evaluated_key() {
        let mut key = Item::new();
        key.insert("id".to_owned(), AttributeValue::S("a".to_owned()));
        let output = ScanOutput {
            items: Some(Vec::new()),
            count: 0,
            scanned_count: 1,
            last_evaluated_key: Some(key),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["Items"], serde_json::json!([]));
        assert_eq!(json["LastEvaluatedKey"], serde_json::json!({"id": {"S": "a"}}));
    }

    #[test]
    fn test_should_serialize_empty_unprocessed_items() {
        let json = serde_json::to_value(BatchWriteItemOutput::default()).unwrap();
        assert_eq!(json, serde_json::json!({"UnprocessedItems": {}}));
    }
}
