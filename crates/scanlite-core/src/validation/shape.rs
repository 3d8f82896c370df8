//! Wire shape checks.
//!
//! The shape phase walks the schema against the decoded request and fails on
//! the first value whose JSON type cannot be read as the declared kind. The
//! messages mirror the ones a JVM JSON reader produces for the same mistakes.
//!
//! On success it returns a normalized copy of the request: members the
//! schema does not declare are dropped, `null` structure and map members are
//! dropped, and fractional integers are truncated toward zero.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Number, Value};

use crate::schema::{SchemaNode, ShapeKind};

/// A wire type mismatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ShapeError(pub String);

impl ShapeError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

const START_OF_LIST: &str = "Start of list found where not expected";
const START_OF_STRUCTURE: &str = "Start of structure or map found where not expected.";

/// Checks `value` against `node` and returns its normalized form.
pub fn check_shape(node: &SchemaNode, value: &Value) -> Result<Value, ShapeError> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match &node.kind {
        ShapeKind::String => check_string(value),
        ShapeKind::Integer => check_integer(value),
        ShapeKind::Boolean => check_boolean(value),
        ShapeKind::Blob => check_blob(value),
        ShapeKind::Structure(fields) => {
            let obj = match value {
                Value::Object(obj) => obj,
                Value::Array(_) => return Err(ShapeError::new(START_OF_LIST)),
                _ => return Err(ShapeError::new("Expected null")),
            };
            let mut out = Map::new();
            for field in fields {
                if let Some(member) = obj.get(field.name) {
                    let checked = check_shape(&field.node, member)?;
                    if !checked.is_null() {
                        out.insert(field.name.to_owned(), checked);
                    }
                }
            }
            Ok(Value::Object(out))
        }
        ShapeKind::List(member) => {
            let items = match value {
                Value::Array(items) => items,
                Value::Object(_) => return Err(ShapeError::new(START_OF_STRUCTURE)),
                _ => return Err(ShapeError::new("Expected list or null")),
            };
            items
                .iter()
                .map(|item| check_shape(member, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        ShapeKind::Map(member) => {
            let obj = match value {
                Value::Object(obj) => obj,
                Value::Array(_) => return Err(ShapeError::new(START_OF_LIST)),
                _ => return Err(ShapeError::new("Expected map or null")),
            };
            let mut out = Map::new();
            for (key, entry) in obj {
                let checked = check_shape(member, entry)?;
                if !checked.is_null() {
                    out.insert(key.clone(), checked);
                }
            }
            Ok(Value::Object(out))
        }
    }
}

/// JVM class name a JSON number would be read as.
fn number_class(n: &Number) -> &'static str {
    if let Some(i) = n.as_i64() {
        if i16::try_from(i).is_ok() {
            "Short"
        } else if i32::try_from(i).is_ok() {
            "Integer"
        } else {
            "Long"
        }
    } else {
        "Double"
    }
}

fn structural_mismatch(value: &Value) -> Option<ShapeError> {
    match value {
        Value::Array(_) => Some(ShapeError::new(START_OF_LIST)),
        Value::Object(_) => Some(ShapeError::new(START_OF_STRUCTURE)),
        _ => None,
    }
}

fn check_string(value: &Value) -> Result<Value, ShapeError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Bool(_) => Err(ShapeError::new(
            "class java.lang.Boolean can not be converted to a String",
        )),
        Value::Number(n) => Err(ShapeError::new(format!(
            "class java.lang.{} can not be converted to a String",
            number_class(n)
        ))),
        _ => Err(structural_mismatch(value).unwrap_or_else(|| ShapeError::new("Expected null"))),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn check_integer(value: &Value) -> Result<Value, ShapeError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else {
                let truncated = n.as_f64().unwrap_or_default().trunc();
                Ok(Value::from(truncated as i64))
            }
        }
        Value::String(_) => Err(ShapeError::new(
            "class java.lang.String can not be converted to an Integer",
        )),
        Value::Bool(_) => Err(ShapeError::new(
            "class java.lang.Boolean can not be converted to an Integer",
        )),
        _ => Err(structural_mismatch(value).unwrap_or_else(|| ShapeError::new("Expected null"))),
    }
}

fn check_boolean(value: &Value) -> Result<Value, ShapeError> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(_) => Err(ShapeError::new(
            "class java.lang.String can not be converted to an Boolean",
        )),
        Value::Number(n) => Err(ShapeError::new(format!(
            "class java.lang.{} can not be converted to an Boolean",
            number_class(n)
        ))),
        _ => Err(structural_mismatch(value).unwrap_or_else(|| ShapeError::new("Expected null"))),
    }
}

fn check_blob(value: &Value) -> Result<Value, ShapeError> {
    match value {
        Value::String(text) => {
            check_base64(text)?;
            Ok(value.clone())
        }
        Value::Bool(_) | Value::Number(_) => Err(ShapeError::new(
            "only base-64-encoded strings are convertible to bytes",
        )),
        _ => Err(structural_mismatch(value).unwrap_or_else(|| ShapeError::new("Expected null"))),
    }
}

fn check_base64(text: &str) -> Result<(), ShapeError> {
    let prefix = format!("'{text}' can not be converted to a Blob");
    let length = text.chars().count();
    if length % 4 != 0 {
        return Err(ShapeError::new(format!(
            "{prefix}: Base64 encoded length is expected a multiple of 4 bytes but found: {length}"
        )));
    }

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let allowed = c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=');
        let misplaced_pad = c == '=' && chars.peek().is_some_and(|next| *next != '=');
        if !allowed || misplaced_pad {
            return Err(ShapeError::new(format!(
                "{prefix}: Invalid Base64 character: '{c}'"
            )));
        }
    }

    let canonical = BASE64
        .decode(text)
        .ok()
        .is_some_and(|bytes| BASE64.encode(bytes) == text);
    if !canonical {
        return Err(ShapeError::new(format!(
            "{prefix}: Invalid last non-pad Base64 character dectected"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::schema_for;
    use scanlite_model::DynamoDBOperation;

    fn scan_shape(value: Value) -> Result<Value, String> {
        check_shape(schema_for(DynamoDBOperation::Scan), &value).map_err(|e| e.to_string())
    }

    #[test]
    fn test_should_reject_wrong_scalar_types() {
        assert_eq!(
            scan_shape(json!({"TableName": true})).unwrap_err(),
            "class java.lang.Boolean can not be converted to a String"
        );
        assert_eq!(
            scan_shape(json!({"TableName": 12})).unwrap_err(),
            "class java.lang.Short can not be converted to a String"
        );
        assert_eq!(
            scan_shape(json!({"TableName": 1.5})).unwrap_err(),
            "class java.lang.Double can not be converted to a String"
        );
        assert_eq!(
            scan_shape(json!({"Limit": "1"})).unwrap_err(),
            "class java.lang.String can not be converted to an Integer"
        );
        assert_eq!(
            scan_shape(json!({"Segment": false})).unwrap_err(),
            "class java.lang.Boolean can not be converted to an Integer"
        );
    }

    #[test]
    fn test_should_reject_wrong_container_types() {
        assert_eq!(
            scan_shape(json!({"TableName": []})).unwrap_err(),
            "Start of list found where not expected"
        );
        assert_eq!(
            scan_shape(json!({"TableName": {}})).unwrap_err(),
            "Start of structure or map found where not expected."
        );
        assert_eq!(
            scan_shape(json!({"AttributesToGet": "a"})).unwrap_err(),
            "Expected list or null"
        );
        assert_eq!(
            scan_shape(json!({"ScanFilter": 1})).unwrap_err(),
            "Expected map or null"
        );
        assert_eq!(
            scan_shape(json!({"ScanFilter": {"a": "x"}})).unwrap_err(),
            "Expected null"
        );
        assert_eq!(
            scan_shape(json!({"ExclusiveStartKey": {"a": {"SS": {}}}})).unwrap_err(),
            "Start of structure or map found where not expected."
        );
    }

    #[test]
    fn test_should_reject_malformed_blobs() {
        assert_eq!(
            scan_shape(json!({"ExclusiveStartKey": {"a": {"B": 1}}})).unwrap_err(),
            "only base-64-encoded strings are convertible to bytes"
        );
        assert_eq!(
            scan_shape(json!({"ExclusiveStartKey": {"a": {"B": "abc"}}})).unwrap_err(),
            "'abc' can not be converted to a Blob: Base64 encoded length is expected a multiple of 4 bytes but found: 3"
        );
        assert_eq!(
            scan_shape(json!({"ExclusiveStartKey": {"a": {"B": "ab~d"}}})).unwrap_err(),
            "'ab~d' can not be converted to a Blob: Invalid Base64 character: '~'"
        );
        assert_eq!(
            scan_shape(json!({"ExclusiveStartKey": {"a": {"B": "a=cd"}}})).unwrap_err(),
            "'a=cd' can not be converted to a Blob: Invalid Base64 character: '='"
        );
        assert_eq!(
            scan_shape(json!({"ExclusiveStartKey": {"a": {"B": "YQ=="}}}))
                .unwrap()["ExclusiveStartKey"]["a"]["B"],
            "YQ=="
        );
        assert_eq!(
            scan_shape(json!({"ExclusiveStartKey": {"a": {"BS": ["YR=="]}}})).unwrap_err(),
            "'YR==' can not be converted to a Blob: Invalid last non-pad Base64 character dectected"
        );
    }

    #[test]
    fn test_should_normalize_request() {
        let normalized = scan_shape(json!({
            "TableName": "abc",
            "Limit": 2.7,
            "Unknown": [1, 2],
            "Select": null,
            "ScanFilter": {"a": {"ComparisonOperator": "NULL", "Extra": true}, "b": null}
        }))
        .unwrap();
        assert_eq!(
            normalized,
            json!({
                "TableName": "abc",
                "Limit": 2,
                "ScanFilter": {"a": {"ComparisonOperator": "NULL"}}
            })
        );

        let normalized =
            scan_shape(json!({"Limit": -0.5, "Segment": -1.5, "TotalSegments": 3.99})).unwrap();
        assert_eq!(
            normalized,
            json!({"Limit": 0, "Segment": -1, "TotalSegments": 3})
        );
    }

    #[test]
    fn test_should_keep_null_list_members() {
        let normalized = scan_shape(json!({"AttributesToGet": ["a", null]})).unwrap();
        assert_eq!(normalized["AttributesToGet"], json!(["a", null]));
    }
}
