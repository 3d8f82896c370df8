//! Schema-declared value constraints.
//!
//! Runs on the normalized request produced by the shape phase. Required
//! members and table-name lengths are reported on their own, before anything
//! else. Every other constraint violation is collected; nothing here stops at
//! the first problem.
//!
//! Order of the collected violations: fields in schema declaration order, map
//! entries by key, list members by index. Missing-value violations come after
//! all other violations.

use serde_json::Value;

use scanlite_model::DynamoDBError;

use super::aggregate::ValidationError;
use crate::schema::{
    Constraint, MAX_TABLE_NAME_LENGTH, MIN_TABLE_NAME_LENGTH, SchemaNode, ShapeKind,
};

/// Reports the first missing required member or badly sized table name.
pub fn check_required(node: &SchemaNode, request: &Value) -> Result<(), DynamoDBError> {
    for field in node.fields() {
        let value = request.get(field.name).filter(|v| !v.is_null());
        if field.node.required && value.is_none() {
            return Err(DynamoDBError::validation(format!(
                "The paramater '{}' is required but was not present in the request",
                lower_first(field.name)
            )));
        }
        if field.node.table_name {
            if let Some(name) = value.and_then(Value::as_str) {
                if !valid_table_name_length(name) {
                    return Err(DynamoDBError::validation(format!(
                        "{} must be at least {MIN_TABLE_NAME_LENGTH} characters long and at most \
                         {MAX_TABLE_NAME_LENGTH} characters long",
                        field.name
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Collects every constraint violation in the request.
#[must_use]
pub fn collect_violations(node: &SchemaNode, request: &Value) -> Vec<ValidationError> {
    let mut collector = Collector::default();
    for field in node.fields() {
        collector.visit(&field.node, request.get(field.name), &lower_first(field.name));
    }
    collector.finish()
}

#[derive(Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    /// Value violations in visit order, then the null ones.
    fn finish(self) -> Vec<ValidationError> {
        let (mut missing, mut errors): (Vec<_>, Vec<_>) =
            self.errors.into_iter().partition(ValidationError::is_null);
        errors.append(&mut missing);
        errors
    }

    fn visit(&mut self, node: &SchemaNode, value: Option<&Value>, path: &str) {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            if node.constraints.contains(&Constraint::NotNull) {
                self.errors.push(ValidationError {
                    field_path: path.to_owned(),
                    value: None,
                    message: Constraint::NotNull.describe(),
                });
            }
            return;
        };

        for constraint in &node.constraints {
            if violates(constraint, value) {
                self.errors.push(ValidationError {
                    field_path: path.to_owned(),
                    value: Some(render(value)),
                    message: constraint.describe(),
                });
            }
        }

        match (&node.kind, value) {
            (ShapeKind::Structure(fields), Value::Object(obj)) => {
                for field in fields {
                    let child = format!("{path}.{}", lower_first(field.name));
                    self.visit(&field.node, obj.get(field.name), &child);
                }
            }
            (ShapeKind::List(member), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.visit(member, Some(item), &format!("{path}.{}.member", i + 1));
                }
            }
            (ShapeKind::Map(member), Value::Object(obj)) => {
                let mut keys: Vec<&String> = obj.keys().collect();
                keys.sort();
                for key in keys {
                    self.visit(member, obj.get(key), &format!("{path}.{key}.member"));
                }
            }
            _ => {}
        }
    }
}

fn violates(constraint: &Constraint, value: &Value) -> bool {
    match constraint {
        Constraint::NotNull => false,
        Constraint::Enum(allowed) => value.as_str().is_some_and(|s| !allowed.contains(&s)),
        Constraint::MinLength(min) => length(value).is_some_and(|len| len < *min),
        Constraint::MaxLength(max) => length(value).is_some_and(|len| len > *max),
        Constraint::TableNamePattern => value.as_str().is_some_and(|s| !matches_table_pattern(s)),
        Constraint::MinValue(min) => value.as_i64().is_some_and(|n| n < *min),
        Constraint::MaxValue(max) => value.as_i64().is_some_and(|n| n > *max),
        Constraint::TableNameKeys => value.as_object().is_some_and(|obj| {
            obj.keys()
                .any(|k| !valid_table_name_length(k) || !matches_table_pattern(k))
        }),
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(obj) => Some(obj.len()),
        _ => None,
    }
}

fn valid_table_name_length(name: &str) -> bool {
    (MIN_TABLE_NAME_LENGTH..=MAX_TABLE_NAME_LENGTH).contains(&name.chars().count())
}

fn matches_table_pattern(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders a value the way it is quoted in violation messages.
fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(obj) => {
            let mut parts: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("{k}={}", render(v)))
                .collect();
            parts.sort();
            format!("{{{}}}", parts.join(", "))
        }
    }
}
