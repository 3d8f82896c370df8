//! Type-aware comparison of attribute values.
//!
//! Values only order against values of the same scalar type. Comparing
//! across types is never an error; the result is simply
//! [`ValueOrdering::Incomparable`], which fails every ordering predicate and
//! every equality test.

use std::cmp::Ordering;

use scanlite_model::AttributeValue;

/// Result of comparing two attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrdering {
    /// Left sorts before right.
    Less,
    /// Values are equal.
    Equal,
    /// Left sorts after right.
    Greater,
    /// Different types, or two distinct sets.
    Incomparable,
}

impl From<Ordering> for ValueOrdering {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Less,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::Greater,
        }
    }
}

impl ValueOrdering {
    /// Converts back into a standard ordering, if comparable.
    #[must_use]
    pub fn as_ordering(self) -> Option<Ordering> {
        match self {
            Self::Less => Some(Ordering::Less),
            Self::Equal => Some(Ordering::Equal),
            Self::Greater => Some(Ordering::Greater),
            Self::Incomparable => None,
        }
    }
}

/// Ordering predicates used by filter conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Compares two values.
///
/// Strings compare by UTF-8 bytes, binaries by bytes, numbers exactly.
/// Sets are equal when they hold the same members, otherwise incomparable.
#[must_use]
pub fn compare_values(left: &AttributeValue, right: &AttributeValue) -> ValueOrdering {
    match (left, right) {
        (AttributeValue::S(a), AttributeValue::S(b)) => a.as_bytes().cmp(b.as_bytes()).into(),
        (AttributeValue::N(a), AttributeValue::N(b)) => a.cmp(b).into(),
        (AttributeValue::B(a), AttributeValue::B(b)) => a[..].cmp(&b[..]).into(),
        (AttributeValue::Ss(a), AttributeValue::Ss(b)) => set_ordering(a, b),
        (AttributeValue::Ns(a), AttributeValue::Ns(b)) => set_ordering(a, b),
        (AttributeValue::Bs(a), AttributeValue::Bs(b)) => set_ordering(a, b),
        _ => ValueOrdering::Incomparable,
    }
}

/// Typed equality: same type and equal value.
#[must_use]
pub fn values_equal(left: &AttributeValue, right: &AttributeValue) -> bool {
    compare_values(left, right) == ValueOrdering::Equal
}

/// Evaluates `left <op> right`.
///
/// Only `Ne` holds for incomparable values.
#[must_use]
pub fn satisfies(left: &AttributeValue, right: &AttributeValue, op: CompareOp) -> bool {
    match compare_values(left, right).as_ordering() {
        Some(ordering) => match op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        },
        None => op == CompareOp::Ne,
    }
}

fn set_ordering<T: PartialEq>(a: &[T], b: &[T]) -> ValueOrdering {
    let same = a.len() == b.len() && a.iter().all(|x| b.contains(x));
    if same {
        ValueOrdering::Equal
    } else {
        ValueOrdering::Incomparable
    }
}
