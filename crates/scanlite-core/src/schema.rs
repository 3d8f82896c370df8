//! Declarative request schemas.
//!
//! Each operation has one immutable [`SchemaNode`] tree describing the wire
//! shape of its request and the value constraints of every field. The trees
//! are built once, on first use, and shared by every request.

use std::collections::HashMap;
use std::sync::LazyLock;

use scanlite_model::DynamoDBOperation;
use scanlite_model::types::{
    ComparisonOperator, ReturnConsumedCapacity, ReturnItemCollectionMetrics, Select,
};

/// Maximum value accepted for `TotalSegments`.
pub const MAX_TOTAL_SEGMENTS: i64 = 1_000_000;

/// Pattern table names must match, as quoted in error messages.
pub const TABLE_NAME_PATTERN: &str = "[a-zA-Z0-9_.-]+";

/// Shortest allowed table name.
pub const MIN_TABLE_NAME_LENGTH: usize = 3;

/// Longest allowed table name.
pub const MAX_TABLE_NAME_LENGTH: usize = 255;

// ---------------------------------------------------------------------------
// Schema nodes
// ---------------------------------------------------------------------------

/// Wire kind of a schema node.
#[derive(Debug)]
pub enum ShapeKind {
    String,
    Integer,
    Boolean,
    /// Base64-encoded binary.
    Blob,
    /// Named fields, visited in declaration order.
    Structure(Vec<Field>),
    /// Homogeneous list.
    List(Box<SchemaNode>),
    /// String-keyed map.
    Map(Box<SchemaNode>),
}

/// A named structure member.
#[derive(Debug)]
pub struct Field {
    /// Wire name, e.g. `TableName`.
    pub name: &'static str,
    pub node: SchemaNode,
}

/// A value constraint checked by the constraint phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The member must be present.
    NotNull,
    /// String value must be one of the listed values.
    Enum(&'static [&'static str]),
    /// Minimum string, list or map length.
    MinLength(usize),
    /// Maximum string, list or map length.
    MaxLength(usize),
    /// String must match [`TABLE_NAME_PATTERN`].
    TableNamePattern,
    /// Minimum integer value.
    MinValue(i64),
    /// Maximum integer value.
    MaxValue(i64),
    /// Every map key must be a valid table name.
    TableNameKeys,
}

impl Constraint {
    /// The constraint text used in validation messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::NotNull => "Member must not be null".to_owned(),
            Self::Enum(values) => {
                format!("Member must satisfy enum value set: [{}]", values.join(", "))
            }
            Self::MinLength(n) => format!("Member must have length greater than or equal to {n}"),
            Self::MaxLength(n) => format!("Member must have length less than or equal to {n}"),
            Self::TableNamePattern => {
                format!("Member must satisfy regular expression pattern: {TABLE_NAME_PATTERN}")
            }
            Self::MinValue(n) => format!("Member must have value greater than or equal to {n}"),
            Self::MaxValue(n) => format!("Member must have value less than or equal to {n}"),
            Self::TableNameKeys => format!(
                "Map keys must satisfy constraint: [{}, {}, {}]",
                Self::MaxLength(MAX_TABLE_NAME_LENGTH).describe(),
                Self::MinLength(MIN_TABLE_NAME_LENGTH).describe(),
                Self::TableNamePattern.describe(),
            ),
        }
    }
}

/// One node of a request schema.
#[derive(Debug)]
pub struct SchemaNode {
    pub kind: ShapeKind,
    /// Absence is reported on its own, before any other validation.
    pub required: bool,
    /// Holds a table name; length bounds are reported on their own.
    pub table_name: bool,
    /// Value constraints, checked in declaration order.
    pub constraints: Vec<Constraint>,
}

impl SchemaNode {
    fn of(kind: ShapeKind) -> Self {
        Self {
            kind,
            required: false,
            table_name: false,
            constraints: Vec::new(),
        }
    }

    /// A string leaf.
    #[must_use]
    pub fn string() -> Self {
        Self::of(ShapeKind::String)
    }

    /// An integer leaf.
    #[must_use]
    pub fn integer() -> Self {
        Self::of(ShapeKind::Integer)
    }

    /// A boolean leaf.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(ShapeKind::Boolean)
    }

    /// A base64 blob leaf.
    #[must_use]
    pub fn blob() -> Self {
        Self::of(ShapeKind::Blob)
    }

    /// A structure with fields in visiting order.
    #[must_use]
    pub fn structure(fields: Vec<(&'static str, SchemaNode)>) -> Self {
        Self::of(ShapeKind::Structure(
            fields
                .into_iter()
                .map(|(name, node)| Field { name, node })
                .collect(),
        ))
    }

    /// A list of `member`.
    #[must_use]
    pub fn list(member: SchemaNode) -> Self {
        Self::of(ShapeKind::List(Box::new(member)))
    }

    /// A map with `member` values.
    #[must_use]
    pub fn map(member: SchemaNode) -> Self {
        Self::of(ShapeKind::Map(Box::new(member)))
    }

    /// The wire shape of an attribute value.
    #[must_use]
    pub fn attribute_value() -> Self {
        Self::structure(vec![
            ("S", Self::string()),
            ("B", Self::blob()),
            ("N", Self::string()),
            ("BS", Self::list(Self::blob())),
            ("NS", Self::list(Self::string())),
            ("SS", Self::list(Self::string())),
        ])
    }

    /// Marks the node as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the node as a table name.
    #[must_use]
    pub fn table_name(mut self) -> Self {
        self.table_name = true;
        self.constraints.push(Constraint::TableNamePattern);
        self
    }

    /// Adds a constraint.
    #[must_use]
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Structure fields, empty for other kinds.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            ShapeKind::Structure(fields) => fields,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Operation schemas
// ---------------------------------------------------------------------------

static SCHEMAS: LazyLock<HashMap<DynamoDBOperation, SchemaNode>> = LazyLock::new(|| {
    DynamoDBOperation::ALL
        .into_iter()
        .map(|op| (op, build_schema(op)))
        .collect()
});

/// Returns the request schema of an operation.
#[must_use]
pub fn schema_for(op: DynamoDBOperation) -> &'static SchemaNode {
    // Every operation is inserted when the table is built.
    &SCHEMAS[&op]
}

fn build_schema(op: DynamoDBOperation) -> SchemaNode {
    match op {
        DynamoDBOperation::Scan => scan_schema(),
        DynamoDBOperation::BatchWriteItem => batch_write_item_schema(),
    }
}

/// Field order is the order violations are reported in.
fn scan_schema() -> SchemaNode {
    SchemaNode::structure(vec![
        ("Limit", SchemaNode::integer().with(Constraint::MinValue(1))),
        (
            "TotalSegments",
            SchemaNode::integer()
                .with(Constraint::MinValue(1))
                .with(Constraint::MaxValue(MAX_TOTAL_SEGMENTS)),
        ),
        (
            "ReturnConsumedCapacity",
            SchemaNode::string().with(Constraint::Enum(ReturnConsumedCapacity::WIRE_VALUES)),
        ),
        (
            "AttributesToGet",
            SchemaNode::list(SchemaNode::string().with(Constraint::NotNull))
                .with(Constraint::MinLength(1)),
        ),
        (
            "Select",
            SchemaNode::string().with(Constraint::Enum(Select::WIRE_VALUES)),
        ),
        ("TableName", SchemaNode::string().required().table_name()),
        (
            "Segment",
            SchemaNode::integer()
                .with(Constraint::MinValue(0))
                .with(Constraint::MaxValue(MAX_TOTAL_SEGMENTS - 1)),
        ),
        (
            "ScanFilter",
            SchemaNode::map(SchemaNode::structure(vec![
                (
                    "AttributeValueList",
                    SchemaNode::list(SchemaNode::attribute_value()),
                ),
                (
                    "ComparisonOperator",
                    SchemaNode::string()
                        .with(Constraint::NotNull)
                        .with(Constraint::Enum(ComparisonOperator::WIRE_VALUES)),
                ),
            ])),
        ),
        (
            "ExclusiveStartKey",
            SchemaNode::map(SchemaNode::attribute_value()),
        ),
        ("ConsistentRead", SchemaNode::boolean()),
    ])
}

fn batch_write_item_schema() -> SchemaNode {
    let write_request = SchemaNode::structure(vec![
        (
            "DeleteRequest",
            SchemaNode::structure(vec![(
                "Key",
                SchemaNode::map(SchemaNode::attribute_value()).with(Constraint::NotNull),
            )]),
        ),
        (
            "PutRequest",
            SchemaNode::structure(vec![(
                "Item",
                SchemaNode::map(SchemaNode::attribute_value()).with(Constraint::NotNull),
            )]),
        ),
    ]);

    SchemaNode::structure(vec![
        (
            "RequestItems",
            SchemaNode::map(SchemaNode::list(write_request))
                .with(Constraint::NotNull)
                .with(Constraint::MinLength(1))
                .with(Constraint::TableNameKeys),
        ),
        (
            "ReturnConsumedCapacity",
            SchemaNode::string().with(Constraint::Enum(ReturnConsumedCapacity::WIRE_VALUES)),
        ),
        (
            "ReturnItemCollectionMetrics",
            SchemaNode::string().with(Constraint::Enum(ReturnItemCollectionMetrics::WIRE_VALUES)),
        ),
    ])
}
