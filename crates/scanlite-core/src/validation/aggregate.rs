//! Rendering of validation failures into user-visible errors.

use std::fmt;

use scanlite_model::DynamoDBError;

/// Prefix for failures inside an `ExclusiveStartKey`.
pub const STARTING_KEY_PREFIX: &str = "The provided starting key is invalid: ";

/// One constraint violation found while walking a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted lower-camel path, e.g. `scanFilter.b.member.comparisonOperator`.
    pub field_path: String,
    /// Rendered offending value, `None` when the value was null or absent.
    pub value: Option<String>,
    pub message: String,
}

impl ValidationError {
    /// Whether this reports a missing value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "Value '{value}'")?,
            None => f.write_str("Value null")?,
        }
        write!(
            f,
            " at '{}' failed to satisfy constraint: {}",
            self.field_path, self.message
        )
    }
}

/// Renders the combined message for a non-empty list of violations.
#[must_use]
pub fn combined_message(errors: &[ValidationError]) -> String {
    let noun = if errors.len() == 1 { "error" } else { "errors" };
    let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!(
        "{} validation {noun} detected: {}",
        errors.len(),
        joined.join("; ")
    )
}

/// Turns collected violations into one error, keeping at most `max_errors`.
#[must_use]
pub fn aggregate(mut errors: Vec<ValidationError>, max_errors: usize) -> Option<DynamoDBError> {
    if errors.is_empty() {
        return None;
    }
    errors.truncate(max_errors.max(1));
    Some(DynamoDBError::validation(combined_message(&errors)))
}

/// A failure in the `ExclusiveStartKey`.
#[must_use]
pub fn starting_key_invalid(reason: impl fmt::Display) -> DynamoDBError {
    DynamoDBError::validation(format!("{STARTING_KEY_PREFIX}{reason}"))
}
