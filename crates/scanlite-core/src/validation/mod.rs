//! Request validation.
//!
//! A raw request goes through four phases:
//!
//! 1. [`shape`]: wire types, fatal on the first mismatch, and normalization.
//! 2. [`constraint`]: required members first, then every declared value
//!    constraint, aggregated into one message.
//! 3. Deserialization into the operation's wire input.
//! 4. [`semantic`]: value-dependent rules, fail-fast, producing the checked
//!    request.

pub mod aggregate;
pub mod constraint;
pub mod semantic;
pub mod shape;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use scanlite_model::request::{BatchWriteItemRequest, ScanRequest};
use scanlite_model::{DynamoDBError, DynamoDBOperation};

use crate::config::ScanliteConfig;
use crate::error::shape_error_to_dynamodb;
use crate::schema::schema_for;

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedRequest {
    Scan(ScanRequest),
    BatchWriteItem(BatchWriteItemRequest),
}

impl TypedRequest {
    /// The operation this request is for.
    #[must_use]
    pub fn operation(&self) -> DynamoDBOperation {
        match self {
            Self::Scan(_) => DynamoDBOperation::Scan,
            Self::BatchWriteItem(_) => DynamoDBOperation::BatchWriteItem,
        }
    }
}

/// Validates a decoded request for the named operation.
///
/// # Errors
///
/// `UnknownOperationException` for an unknown name, `SerializationException`
/// for a wire type mismatch, and `ValidationException` for everything else.
pub fn validate_request(
    operation_name: &str,
    request: &Value,
    config: &ScanliteConfig,
) -> Result<TypedRequest, DynamoDBError> {
    let op = DynamoDBOperation::from_name(operation_name)
        .ok_or_else(|| DynamoDBError::unknown_operation(operation_name))?;
    validate_operation(op, request, config).inspect_err(|e| {
        debug!(operation = %op, code = %e.code, message = %e.message, "rejected request");
    })
}

fn validate_operation(
    op: DynamoDBOperation,
    request: &Value,
    config: &ScanliteConfig,
) -> Result<TypedRequest, DynamoDBError> {
    let schema = schema_for(op);
    let normalized = shape::check_shape(schema, request).map_err(shape_error_to_dynamodb)?;

    constraint::check_required(schema, &normalized)?;
    let violations = constraint::collect_violations(schema, &normalized);
    if let Some(err) = aggregate::aggregate(violations, config.max_validation_errors) {
        return Err(err);
    }

    match op {
        DynamoDBOperation::Scan => {
            semantic::check_scan(wire_input(normalized)?, config).map(TypedRequest::Scan)
        }
        DynamoDBOperation::BatchWriteItem => {
            semantic::check_batch_write_item(wire_input(normalized)?, config)
                .map(TypedRequest::BatchWriteItem)
        }
    }
}

/// Reads a shape-checked request into its wire input.
fn wire_input<T: DeserializeOwned>(normalized: Value) -> Result<T, DynamoDBError> {
    serde_json::from_value(normalized).map_err(|e| {
        DynamoDBError::internal_error(format!("Failed to read checked request: {e}"))
    })
}
