//! Filter evaluation for legacy `ScanFilter` conditions.
//!
//! Conditions reaching this module have already passed request validation,
//! so operand counts and operand types are trusted. Evaluation never fails:
//! an operand that does not fit the attribute simply makes the condition
//! false (or true, for the negated operators).

use std::collections::BTreeMap;

use scanlite_model::AttributeValue;
use scanlite_model::attribute_value::Item;
use scanlite_model::types::{ComparisonOperator, Condition};

use crate::compare::{CompareOp, satisfies, values_equal};

/// Returns `true` if the item passes every condition.
#[must_use]
pub fn evaluate_filter(conditions: &BTreeMap<String, Condition>, item: &Item) -> bool {
    conditions
        .iter()
        .all(|(name, condition)| evaluate_condition(condition, item.get(name)))
}

/// Evaluates one condition against an attribute, `None` when absent.
#[must_use]
pub fn evaluate_condition(condition: &Condition, attr: Option<&AttributeValue>) -> bool {
    let operands = &condition.attribute_value_list;
    match condition.comparison_operator {
        ComparisonOperator::Null => attr.is_none(),
        ComparisonOperator::NotNull => attr.is_some(),
        ComparisonOperator::Eq => with_operand(attr, operands, |a, o| satisfies(a, o, CompareOp::Eq)),
        ComparisonOperator::Ne => match (attr, operands.first()) {
            (Some(a), Some(o)) => satisfies(a, o, CompareOp::Ne),
            _ => true,
        },
        ComparisonOperator::Lt => with_operand(attr, operands, |a, o| satisfies(a, o, CompareOp::Lt)),
        ComparisonOperator::Le => with_operand(attr, operands, |a, o| satisfies(a, o, CompareOp::Le)),
        ComparisonOperator::Gt => with_operand(attr, operands, |a, o| satisfies(a, o, CompareOp::Gt)),
        ComparisonOperator::Ge => with_operand(attr, operands, |a, o| satisfies(a, o, CompareOp::Ge)),
        ComparisonOperator::Contains => with_operand(attr, operands, contains),
        ComparisonOperator::NotContains => !with_operand(attr, operands, contains),
        ComparisonOperator::BeginsWith => with_operand(attr, operands, begins_with),
        ComparisonOperator::In => {
            attr.is_some_and(|a| operands.iter().any(|o| values_equal(a, o)))
        }
        ComparisonOperator::Between => match (attr, operands.as_slice()) {
            (Some(a), [low, high]) => {
                satisfies(a, low, CompareOp::Ge) && satisfies(a, high, CompareOp::Le)
            }
            _ => false,
        },
    }
}

fn with_operand(
    attr: Option<&AttributeValue>,
    operands: &[AttributeValue],
    predicate: impl Fn(&AttributeValue, &AttributeValue) -> bool,
) -> bool {
    match (attr, operands.first()) {
        (Some(a), Some(o)) => predicate(a, o),
        _ => false,
    }
}

/// Set membership for sets, contiguous subsequence for strings and binaries.
///
/// Number scalars never contain anything.
fn contains(attr: &AttributeValue, operand: &AttributeValue) -> bool {
    match (attr, operand) {
        (AttributeValue::S(a), AttributeValue::S(o)) => a.contains(o.as_str()),
        (AttributeValue::B(a), AttributeValue::B(o)) => {
            o.is_empty() || a.windows(o.len()).any(|w| w == &o[..])
        }
        (AttributeValue::Ss(set), AttributeValue::S(o)) => set.contains(o),
        (AttributeValue::Ns(set), AttributeValue::N(o)) => set.contains(o),
        (AttributeValue::Bs(set), AttributeValue::B(o)) => set.contains(o),
        _ => false,
    }
}

fn begins_with(attr: &AttributeValue, operand: &AttributeValue) -> bool {
    match (attr, operand) {
        (AttributeValue::S(a), AttributeValue::S(o)) => a.starts_with(o.as_str()),
        (AttributeValue::B(a), AttributeValue::B(o)) => a.starts_with(o),
        _ => false,
    }
}
