//! Conversions from component errors into service errors.

use scanlite_model::error::{DynamoDBError, DynamoDBErrorCode};

use crate::storage::StorageError;
use crate::validation::shape::ShapeError;

/// Convert a storage error into a validation error.
#[must_use]
pub fn storage_error_to_dynamodb(e: StorageError) -> DynamoDBError {
    DynamoDBError::with_message(DynamoDBErrorCode::ValidationException, e.to_string())
        .with_source(e)
}

/// Convert a wire shape error into a serialization error.
#[must_use]
pub fn shape_error_to_dynamodb(e: ShapeError) -> DynamoDBError {
    DynamoDBError::with_message(DynamoDBErrorCode::SerializationException, e.to_string())
        .with_source(e)
}
