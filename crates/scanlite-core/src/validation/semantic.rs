//! Value-dependent checks that turn wire inputs into checked requests.
//!
//! Every check here fails fast: the first problem becomes the whole error.

use std::collections::{BTreeMap, HashSet};

use scanlite_model::attribute_value::{AttributeValue, Item, RawAttributeValue};
use scanlite_model::input::{BatchWriteItemInput, RawWriteRequest, ScanInput};
use scanlite_model::request::{
    BatchWriteItemRequest, DeleteRequest, ParallelScan, PutRequest, ScanRequest, WriteRequest,
};
use scanlite_model::types::{
    ComparisonOperator, Condition, RawCondition, ReturnConsumedCapacity,
    ReturnItemCollectionMetrics, Select,
};
use scanlite_model::{AttributeValueError, DynamoDBError};

use super::aggregate::starting_key_invalid;
use crate::compare::{ValueOrdering, compare_values};
use crate::config::ScanliteConfig;

/// Checks a `Scan` input and builds the request the provider runs.
pub fn check_scan(input: ScanInput, config: &ScanliteConfig) -> Result<ScanRequest, DynamoDBError> {
    let exclusive_start_key = input
        .exclusive_start_key
        .as_ref()
        .map(|key| attribute_map(key, config).map_err(starting_key_invalid))
        .transpose()?;

    let mut scan_filter = BTreeMap::new();
    for (name, raw) in input.scan_filter.unwrap_or_default() {
        scan_filter.insert(name, check_condition(&raw, config)?);
    }

    if let Some(names) = &input.attributes_to_get {
        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(DynamoDBError::validation(format!(
                "One or more parameter values were invalid: Duplicate value in attribute name: {dup}"
            )));
        }
    }

    let select = check_select(input.select.as_deref(), input.attributes_to_get.is_some())?;
    let parallel = check_segments(input.segment, input.total_segments)?;
    let limit = input
        .limit
        .map(|limit| {
            usize::try_from(limit)
                .map_err(|_| DynamoDBError::internal_error(format!("invalid limit {limit}")))
        })
        .transpose()?;

    Ok(ScanRequest {
        table_name: input.table_name,
        limit,
        parallel,
        select,
        attributes_to_get: input.attributes_to_get,
        scan_filter,
        exclusive_start_key,
        return_consumed_capacity: input
            .return_consumed_capacity
            .as_deref()
            .and_then(ReturnConsumedCapacity::from_name)
            .unwrap_or_default(),
    })
}

/// Checks a `BatchWriteItem` input and builds the request the provider runs.
pub fn check_batch_write_item(
    input: BatchWriteItemInput,
    config: &ScanliteConfig,
) -> Result<BatchWriteItemRequest, DynamoDBError> {
    let mut request_items = BTreeMap::new();
    let mut total = 0usize;
    for (table, requests) in input.request_items {
        if requests.is_empty() {
            return Err(DynamoDBError::validation(format!(
                "The batch write request list for a table cannot be null or empty: {table}"
            )));
        }
        let checked = requests
            .iter()
            .map(|request| check_write_request(request.as_ref(), config))
            .collect::<Result<Vec<_>, _>>()?;
        total += checked.len();
        request_items.insert(table, checked);
    }

    if total > config.max_batch_write_items {
        return Err(DynamoDBError::validation(
            "Too many items requested for the BatchWriteItem call",
        ));
    }

    Ok(BatchWriteItemRequest {
        request_items,
        return_consumed_capacity: input
            .return_consumed_capacity
            .as_deref()
            .and_then(ReturnConsumedCapacity::from_name)
            .unwrap_or_default(),
        return_item_collection_metrics: input
            .return_item_collection_metrics
            .as_deref()
            .and_then(ReturnItemCollectionMetrics::from_name)
            .unwrap_or_default(),
    })
}

fn check_write_request(
    request: Option<&RawWriteRequest>,
    config: &ScanliteConfig,
) -> Result<WriteRequest, DynamoDBError> {
    let invalid = || DynamoDBError::validation(AttributeValueError::MultipleTypes.to_string());
    let request = request.ok_or_else(invalid)?;
    match (&request.put_request, &request.delete_request) {
        (Some(put), None) => Ok(WriteRequest::Put(PutRequest {
            item: attribute_map(&put.item, config).map_err(DynamoDBError::validation)?,
        })),
        (None, Some(delete)) => Ok(WriteRequest::Delete(DeleteRequest {
            key: attribute_map(&delete.key, config).map_err(DynamoDBError::validation)?,
        })),
        _ => Err(invalid()),
    }
}

fn check_condition(raw: &RawCondition, config: &ScanliteConfig) -> Result<Condition, DynamoDBError> {
    let op = raw
        .comparison_operator
        .as_deref()
        .and_then(ComparisonOperator::from_name)
        .ok_or_else(|| DynamoDBError::internal_error("comparison operator was not checked"))?;

    let operands = raw
        .attribute_value_list
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|value| match value {
            Some(raw) => attribute_value(raw, config).map_err(DynamoDBError::validation),
            None => Err(DynamoDBError::validation(AttributeValueError::Empty.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !op.arity().accepts(operands.len()) {
        return Err(DynamoDBError::validation(
            "The attempted filter operation is not supported for the provided filter argument count",
        ));
    }
    if !operands.iter().all(|value| op.accepts_operand(value)) {
        return Err(DynamoDBError::validation(
            "The attempted filter operation is not supported for the provided type",
        ));
    }

    if let [low, high] = operands.as_slice() {
        if op == ComparisonOperator::Between {
            if low.type_descriptor() != high.type_descriptor() {
                return Err(DynamoDBError::validation(
                    "One or more parameter values were invalid: AttributeValues inside AttributeValueList must be of same type",
                ));
            }
            if compare_values(low, high) == ValueOrdering::Greater {
                return Err(DynamoDBError::validation(
                    "The BETWEEN condition was provided a range where the lower bound is greater than the upper bound",
                ));
            }
        }
    }

    Ok(Condition::new(op, operands))
}

fn check_select(select: Option<&str>, has_projection: bool) -> Result<Select, DynamoDBError> {
    let select = match select.and_then(Select::from_name) {
        Some(select) => select,
        None if has_projection => Select::SpecificAttributes,
        None => Select::AllAttributes,
    };
    match select {
        Select::SpecificAttributes if !has_projection => Err(DynamoDBError::validation(
            "Must specify the AttributesToGet when choosing to get SPECIFIC_ATTRIBUTES",
        )),
        Select::SpecificAttributes => Ok(select),
        _ if has_projection => Err(DynamoDBError::validation(format!(
            "Cannot specify the AttributesToGet when choosing to get {select}"
        ))),
        Select::AllProjectedAttributes => Err(DynamoDBError::validation(
            "ALL_PROJECTED_ATTRIBUTES can be used only when Querying using an IndexName",
        )),
        _ => Ok(select),
    }
}

fn check_segments(
    segment: Option<i64>,
    total_segments: Option<i64>,
) -> Result<Option<ParallelScan>, DynamoDBError> {
    match (segment, total_segments) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(DynamoDBError::validation(
            "The TotalSegments parameter is required but was not present in the request when parameter Segment is present",
        )),
        (None, Some(_)) => Err(DynamoDBError::validation(
            "The Segment parameter is required but was not present in the request when parameter TotalSegments is present",
        )),
        (Some(segment), Some(total)) => {
            if segment >= total {
                return Err(DynamoDBError::validation(format!(
                    "The Segment parameter is zero-indexed and must be less than parameter TotalSegments. Segment: {segment}, TotalSegments: {total}"
                )));
            }
            let to_u32 = |n: i64| {
                u32::try_from(n)
                    .map_err(|_| DynamoDBError::internal_error(format!("invalid segment {n}")))
            };
            Ok(Some(ParallelScan {
                segment: to_u32(segment)?,
                total_segments: to_u32(total)?,
            }))
        }
    }
}

fn attribute_value(
    raw: &RawAttributeValue,
    config: &ScanliteConfig,
) -> Result<AttributeValue, String> {
    let value = AttributeValue::from_raw(raw).map_err(|e| e.to_string())?;
    if config.enforce_number_limits {
        value.check_number_limits().map_err(|e| e.to_string())?;
    }
    Ok(value)
}

fn attribute_map(
    raw: &BTreeMap<String, RawAttributeValue>,
    config: &ScanliteConfig,
) -> Result<Item, String> {
    raw.iter()
        .map(|(name, value)| Ok((name.clone(), attribute_value(value, config)?)))
        .collect()
}
