//! Operation enum.

use std::fmt;

/// All supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamoDBOperation {
    /// Scan all items in a table.
    Scan,
    /// Batch write (put/delete) items to multiple tables.
    BatchWriteItem,
}

impl DynamoDBOperation {
    /// Every supported operation.
    pub const ALL: [Self; 2] = [Self::Scan, Self::BatchWriteItem];

    /// Returns the wire operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "Scan",
            Self::BatchWriteItem => "BatchWriteItem",
        }
    }

    /// Parse an operation name string into a `DynamoDBOperation`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Scan" => Some(Self::Scan),
            "BatchWriteItem" => Some(Self::BatchWriteItem),
            _ => None,
        }
    }
}

impl fmt::Display for DynamoDBOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
