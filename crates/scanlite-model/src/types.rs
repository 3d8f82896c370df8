//! Shared enums and condition types.

use serde::{Deserialize, Serialize};

use crate::attribute_value::{AttributeValue, RawAttributeValue, ScalarType};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Attributes returned by a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Select {
    /// All attributes of the item.
    #[default]
    #[serde(rename = "ALL_ATTRIBUTES")]
    AllAttributes,
    /// All projected attributes (for index reads).
    #[serde(rename = "ALL_PROJECTED_ATTRIBUTES")]
    AllProjectedAttributes,
    /// Only the attributes listed in `AttributesToGet`.
    #[serde(rename = "SPECIFIC_ATTRIBUTES")]
    SpecificAttributes,
    /// Only the count of matching items (no item data).
    #[serde(rename = "COUNT")]
    Count,
}

impl Select {
    /// Allowed wire values, in the order error messages list them.
    pub const WIRE_VALUES: &'static [&'static str] = &[
        "SPECIFIC_ATTRIBUTES",
        "COUNT",
        "ALL_ATTRIBUTES",
        "ALL_PROJECTED_ATTRIBUTES",
    ];

    /// Returns the wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllAttributes => "ALL_ATTRIBUTES",
            Self::AllProjectedAttributes => "ALL_PROJECTED_ATTRIBUTES",
            Self::SpecificAttributes => "SPECIFIC_ATTRIBUTES",
            Self::Count => "COUNT",
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ALL_ATTRIBUTES" => Some(Self::AllAttributes),
            "ALL_PROJECTED_ATTRIBUTES" => Some(Self::AllProjectedAttributes),
            "SPECIFIC_ATTRIBUTES" => Some(Self::SpecificAttributes),
            "COUNT" => Some(Self::Count),
            _ => None,
        }
    }
}

impl std::fmt::Display for Select {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether consumed capacity is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReturnConsumedCapacity {
    /// Total capacity.
    #[serde(rename = "TOTAL")]
    Total,
    /// No capacity details.
    #[default]
    #[serde(rename = "NONE")]
    None,
}

impl ReturnConsumedCapacity {
    /// Allowed wire values.
    pub const WIRE_VALUES: &'static [&'static str] = &["TOTAL", "NONE"];

    /// Parses a wire value.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TOTAL" => Some(Self::Total),
            "NONE" => Some(Self::None),
            _ => None,
        }
    }
}

/// Whether item collection metrics are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReturnItemCollectionMetrics {
    /// Item collection sizes.
    #[serde(rename = "SIZE")]
    Size,
    /// No metrics.
    #[default]
    #[serde(rename = "NONE")]
    None,
}

impl ReturnItemCollectionMetrics {
    /// Allowed wire values.
    pub const WIRE_VALUES: &'static [&'static str] = &["SIZE", "NONE"];

    /// Parses a wire value.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SIZE" => Some(Self::Size),
            "NONE" => Some(Self::None),
            _ => None,
        }
    }
}

/// Number of operands a comparison operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No operands.
    Zero,
    /// Exactly one operand.
    One,
    /// Exactly two operands.
    Two,
    /// One or more operands.
    AtLeastOne,
}

impl Arity {
    /// Returns `true` if `count` operands are allowed.
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Zero => count == 0,
            Self::One => count == 1,
            Self::Two => count == 2,
            Self::AtLeastOne => count >= 1,
        }
    }
}

/// Comparison operators for filter conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Equal to.
    #[serde(rename = "EQ")]
    Eq,
    /// Not equal to.
    #[serde(rename = "NE")]
    Ne,
    /// Less than or equal to.
    #[serde(rename = "LE")]
    Le,
    /// Less than.
    #[serde(rename = "LT")]
    Lt,
    /// Greater than or equal to.
    #[serde(rename = "GE")]
    Ge,
    /// Greater than.
    #[serde(rename = "GT")]
    Gt,
    /// Attribute exists.
    #[serde(rename = "NOT_NULL")]
    NotNull,
    /// Attribute does not exist.
    #[serde(rename = "NULL")]
    Null,
    /// Attribute value contains the operand as a substring or set member.
    #[serde(rename = "CONTAINS")]
    Contains,
    /// Attribute value does not contain the operand.
    #[serde(rename = "NOT_CONTAINS")]
    NotContains,
    /// Attribute value begins with the operand.
    #[serde(rename = "BEGINS_WITH")]
    BeginsWith,
    /// Attribute value equals one of the operands.
    #[serde(rename = "IN")]
    In,
    /// Attribute value is between two operands (inclusive).
    #[serde(rename = "BETWEEN")]
    Between,
}

impl ComparisonOperator {
    /// Allowed wire values, in the order error messages list them.
    pub const WIRE_VALUES: &'static [&'static str] = &[
        "IN",
        "NULL",
        "BETWEEN",
        "LT",
        "NOT_CONTAINS",
        "EQ",
        "GT",
        "NOT_NULL",
        "NE",
        "LE",
        "BEGINS_WITH",
        "GE",
        "CONTAINS",
    ];

    /// Returns the wire-format string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Le => "LE",
            Self::Lt => "LT",
            Self::Ge => "GE",
            Self::Gt => "GT",
            Self::NotNull => "NOT_NULL",
            Self::Null => "NULL",
            Self::Contains => "CONTAINS",
            Self::NotContains => "NOT_CONTAINS",
            Self::BeginsWith => "BEGINS_WITH",
            Self::In => "IN",
            Self::Between => "BETWEEN",
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "EQ" => Some(Self::Eq),
            "NE" => Some(Self::Ne),
            "LE" => Some(Self::Le),
            "LT" => Some(Self::Lt),
            "GE" => Some(Self::Ge),
            "GT" => Some(Self::Gt),
            "NOT_NULL" => Some(Self::NotNull),
            "NULL" => Some(Self::Null),
            "CONTAINS" => Some(Self::Contains),
            "NOT_CONTAINS" => Some(Self::NotContains),
            "BEGINS_WITH" => Some(Self::BeginsWith),
            "IN" => Some(Self::In),
            "BETWEEN" => Some(Self::Between),
            _ => None,
        }
    }

    /// Number of operands the operator takes.
    #[must_use]
    pub fn arity(&self) -> Arity {
        match self {
            Self::NotNull | Self::Null => Arity::Zero,
            Self::In => Arity::AtLeastOne,
            Self::Between => Arity::Two,
            Self::Eq
            | Self::Ne
            | Self::Le
            | Self::Lt
            | Self::Ge
            | Self::Gt
            | Self::Contains
            | Self::NotContains
            | Self::BeginsWith => Arity::One,
        }
    }

    /// Returns `true` if an operand of this type is legal for the operator.
    ///
    /// Set operands are never legal; `BEGINS_WITH` takes only strings and
    /// binaries.
    #[must_use]
    pub fn accepts_operand(&self, value: &AttributeValue) -> bool {
        match (self, value.scalar_type()) {
            (_, None) | (Self::BeginsWith, Some(ScalarType::N)) => false,
            (_, Some(_)) => true,
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A checked filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// The comparison operator.
    pub comparison_operator: ComparisonOperator,
    /// Operands, already checked for arity and type.
    pub attribute_value_list: Vec<AttributeValue>,
}

impl Condition {
    /// Creates a condition.
    #[must_use]
    pub fn new(comparison_operator: ComparisonOperator, operands: Vec<AttributeValue>) -> Self {
        Self {
            comparison_operator,
            attribute_value_list: operands,
        }
    }
}

/// Wire form of a filter condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_operator: Option<String>,
    /// Operands; a `null` entry is kept so validation can reject it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_value_list: Option<Vec<Option<RawAttributeValue>>>,
}
