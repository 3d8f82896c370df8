//! In-memory storage engine for tables.
//!
//! Provides ordered storage with concurrent partition-level access via
//! [`DashMap`]. Each partition key maps to a [`BTreeMap`] of sort keys to items.
//!
//! # Architecture
//!
//! ```text
//! DashMap<SortableAttributeValue, BTreeMap<SortableAttributeValue, StoredItem>>
//! ```
//!
//! - Partition-level concurrency: different partitions can be read and written
//!   concurrently without contention.
//! - Scans enumerate partitions in ascending key order, then sort keys in
//!   ascending order within each partition.
//! - For tables without a sort key, a sentinel value is used as the single
//!   BTreeMap key per partition.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use bytes::Bytes;
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

use scanlite_model::attribute_value::{AttributeValue, Item, ScalarType};
use scanlite_model::number::Number;
use scanlite_model::request::ParallelScan;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A required key attribute was not found in the item.
    #[error("One or more parameter values were invalid: Missing the key {attr} in the item")]
    MissingKeyAttribute {
        /// The name of the missing attribute.
        attr: String,
    },
    /// A key attribute has the wrong type.
    #[error(
        "One or more parameter values were invalid: Type mismatch for key {attr} expected: {expected} actual: {actual}"
    )]
    InvalidKeyType {
        /// The name of the attribute.
        attr: String,
        /// The expected type descriptor.
        expected: String,
        /// The actual type descriptor.
        actual: String,
    },
    /// A key map does not hold exactly the key attributes of the table.
    #[error("The provided key element does not match the schema")]
    KeyMismatch,
}

// ---------------------------------------------------------------------------
// Key types
// ---------------------------------------------------------------------------

/// Key schema for a table: a partition key and an optional sort key.
#[derive(Debug, Clone)]
pub struct KeySchema {
    /// Partition (HASH) key name and type.
    pub partition_key: KeyAttribute,
    /// Optional sort (RANGE) key name and type.
    pub sort_key: Option<KeyAttribute>,
}

impl KeySchema {
    /// A schema with only a partition key.
    #[must_use]
    pub fn hash(name: impl Into<String>, attr_type: ScalarType) -> Self {
        Self {
            partition_key: KeyAttribute::new(name, attr_type),
            sort_key: None,
        }
    }

    /// A schema with a partition key and a sort key.
    #[must_use]
    pub fn composite(
        partition: impl Into<String>,
        partition_type: ScalarType,
        sort: impl Into<String>,
        sort_type: ScalarType,
    ) -> Self {
        Self {
            partition_key: KeyAttribute::new(partition, partition_type),
            sort_key: Some(KeyAttribute::new(sort, sort_type)),
        }
    }

    /// Key attributes in schema order.
    pub fn attributes(&self) -> impl Iterator<Item = &KeyAttribute> {
        std::iter::once(&self.partition_key).chain(self.sort_key.as_ref())
    }
}

/// A single key attribute definition with its name and scalar type.
#[derive(Debug, Clone)]
pub struct KeyAttribute {
    /// The attribute name.
    pub name: String,
    /// The scalar type (S, N, or B).
    pub attr_type: ScalarType,
}

impl KeyAttribute {
    /// Creates a key attribute definition.
    #[must_use]
    pub fn new(name: impl Into<String>, attr_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            attr_type,
        }
    }
}

/// A primary key consisting of a partition key and an optional sort key.
///
/// Keys order by partition key, then sort key, which is the scan order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimaryKey {
    /// The partition (HASH) key value.
    pub partition_key: SortableAttributeValue,
    /// The optional sort (RANGE) key value.
    pub sort_key: Option<SortableAttributeValue>,
}

impl PrimaryKey {
    /// Renders the key as an item holding only the key attributes.
    #[must_use]
    pub fn to_item(&self, key_schema: &KeySchema) -> Item {
        let mut item = Item::new();
        if let Some(value) = self.partition_key.to_attribute_value() {
            item.insert(key_schema.partition_key.name.clone(), value);
        }
        if let (Some(def), Some(value)) = (
            &key_schema.sort_key,
            self.sort_key
                .as_ref()
                .and_then(SortableAttributeValue::to_attribute_value),
        ) {
            item.insert(def.name.clone(), value);
        }
        item
    }

    fn sort_slot(&self) -> &SortableAttributeValue {
        self.sort_key
            .as_ref()
            .map_or(&SortableAttributeValue::Sentinel, |sk| sk)
    }
}

// ---------------------------------------------------------------------------
// SortableAttributeValue
// ---------------------------------------------------------------------------

/// A key-eligible [`AttributeValue`] that implements [`Ord`] for use as a
/// `BTreeMap` key.
///
/// - **Strings (S)**: UTF-8 byte ordering.
/// - **Numbers (N)**: exact decimal ordering.
/// - **Binary (B)**: byte-by-byte unsigned ordering.
/// - **Sentinel**: used when the table has no sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortableAttributeValue {
    /// String key.
    S(String),
    /// Number key.
    N(Number),
    /// Binary key.
    B(Bytes),
    /// Sentinel value for tables without a sort key.
    Sentinel,
}

impl SortableAttributeValue {
    /// Converts this sortable value back into an [`AttributeValue`].
    ///
    /// Returns `None` for the `Sentinel` variant.
    #[must_use]
    pub fn to_attribute_value(&self) -> Option<AttributeValue> {
        match self {
            Self::S(s) => Some(AttributeValue::S(s.clone())),
            Self::N(n) => Some(AttributeValue::N(n.clone())),
            Self::B(b) => Some(AttributeValue::B(b.clone())),
            Self::Sentinel => None,
        }
    }

    /// Creates a `SortableAttributeValue` from an `AttributeValue`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKeyType` if the attribute value is a set.
    pub fn from_attribute_value(
        attr_name: &str,
        value: &AttributeValue,
    ) -> Result<Self, StorageError> {
        match value {
            AttributeValue::S(s) => Ok(Self::S(s.clone())),
            AttributeValue::N(n) => Ok(Self::N(n.clone())),
            AttributeValue::B(b) => Ok(Self::B(b.clone())),
            other => Err(StorageError::InvalidKeyType {
                attr: attr_name.to_owned(),
                expected: "S, N, or B".to_owned(),
                actual: other.type_descriptor().to_owned(),
            }),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::S(_) => 0,
            Self::N(_) => 1,
            Self::B(_) => 2,
            Self::Sentinel => 3,
        }
    }
}

impl PartialOrd for SortableAttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortableAttributeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::S(a), Self::S(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Self::N(a), Self::N(b)) => a.cmp(b),
            (Self::B(a), Self::B(b)) => a[..].cmp(&b[..]),
            // Mixed types never share a table; keep the order total anyway.
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

// ---------------------------------------------------------------------------
// Parallel scan segments
// ---------------------------------------------------------------------------

/// Returns the parallel-scan segment a partition key belongs to.
///
/// The key's type tag and bytes are hashed with CRC-32 and the hash is
/// scaled into `0..total_segments`.
#[must_use]
pub fn partition_key_segment(partition_key: &SortableAttributeValue, total_segments: u32) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    match partition_key {
        SortableAttributeValue::S(s) => {
            hasher.update(b"S");
            hasher.update(s.as_bytes());
        }
        SortableAttributeValue::N(n) => {
            hasher.update(b"N");
            hasher.update(n.canonical().as_bytes());
        }
        SortableAttributeValue::B(b) => {
            hasher.update(b"B");
            hasher.update(b);
        }
        SortableAttributeValue::Sentinel => {}
    }
    let scaled = (u64::from(hasher.finalize()) * u64::from(total_segments)) >> 32;
    // `scaled < total_segments` because the hash is below 2^32.
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// StoredItem
// ---------------------------------------------------------------------------

/// An item stored in the table, containing all attributes.
#[derive(Debug, Clone)]
struct StoredItem {
    attributes: Item,
}

// ---------------------------------------------------------------------------
// TableStorage
// ---------------------------------------------------------------------------

/// One page of scanned items.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    /// Items in scan order, before filtering.
    pub items: Vec<Item>,
    /// Key of the last returned item, set only when more items remain.
    pub last_evaluated_key: Option<PrimaryKey>,
}

/// In-memory storage for a single table.
///
/// Uses [`DashMap`] for concurrent partition-level access and [`BTreeMap`]
/// for sort key ordering within each partition.
#[derive(Debug)]
pub struct TableStorage {
    /// Partition key -> sorted items within that partition.
    data: DashMap<SortableAttributeValue, BTreeMap<SortableAttributeValue, StoredItem>>,
    /// The key schema for this table.
    key_schema: KeySchema,
    /// Total number of items in the table.
    item_count: AtomicU64,
}

impl TableStorage {
    /// Creates a new empty `TableStorage` with the given key schema.
    #[must_use]
    pub fn new(key_schema: KeySchema) -> Self {
        Self {
            data: DashMap::new(),
            key_schema,
            item_count: AtomicU64::new(0),
        }
    }

    /// Returns a reference to the key schema.
    #[must_use]
    pub fn key_schema(&self) -> &KeySchema {
        &self.key_schema
    }

    /// Returns the current item count.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.item_count.load(AtomicOrdering::Relaxed)
    }

    /// Inserts or replaces an item in the table.
    ///
    /// Returns the previously stored item if one existed with the same key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::MissingKeyAttribute` if a required key attribute
    /// is missing from the item, or `StorageError::InvalidKeyType` if a key
    /// attribute has the wrong type.
    pub fn put_item(&self, item: Item) -> Result<Option<Item>, StorageError> {
        let primary_key = extract_primary_key(&self.key_schema, &item)?;
        let sort_key = primary_key
            .sort_key
            .unwrap_or(SortableAttributeValue::Sentinel);

        let old_item = {
            let mut partition = self.data.entry(primary_key.partition_key).or_default();
            partition.insert(sort_key, StoredItem { attributes: item })
        };

        if let Some(old) = old_item {
            debug!("replaced existing item");
            Ok(Some(old.attributes))
        } else {
            self.item_count.fetch_add(1, AtomicOrdering::Relaxed);
            debug!("inserted new item");
            Ok(None)
        }
    }

    /// Retrieves an item by its primary key.
    #[must_use]
    pub fn get_item(&self, key: &PrimaryKey) -> Option<Item> {
        self.data.get(&key.partition_key).and_then(|partition| {
            partition
                .get(key.sort_slot())
                .map(|item| item.attributes.clone())
        })
    }

    /// Deletes an item by its primary key.
    ///
    /// Returns the deleted item if it existed.
    pub fn delete_item(&self, key: &PrimaryKey) -> Option<Item> {
        let removed = {
            let mut partition = self.data.get_mut(&key.partition_key)?;
            partition.remove(key.sort_slot())?
        };
        self.data
            .remove_if(&key.partition_key, |_, partition| partition.is_empty());

        self.item_count.fetch_sub(1, AtomicOrdering::Relaxed);
        debug!("deleted item");
        Some(removed.attributes)
    }

    /// Scans items in primary-key order.
    ///
    /// Enumeration starts after `exclusive_start_key` and stops after `limit`
    /// items. With `segment`, only partitions of that parallel-scan segment
    /// are visited.
    #[must_use]
    pub fn scan(
        &self,
        limit: Option<usize>,
        exclusive_start_key: Option<&PrimaryKey>,
        segment: Option<ParallelScan>,
    ) -> ScanPage {
        let mut partitions: Vec<_> = self
            .data
            .iter()
            .filter(|entry| {
                segment.is_none_or(|p| {
                    partition_key_segment(entry.key(), p.total_segments) == p.segment
                })
            })
            .collect();
        partitions.sort_by(|a, b| a.key().cmp(b.key()));

        let effective_limit = limit.unwrap_or(usize::MAX);
        let mut page = ScanPage::default();
        let mut last_key = None;

        for entry in &partitions {
            for (sk, item) in entry.value() {
                let key = PrimaryKey {
                    partition_key: entry.key().clone(),
                    sort_key: match sk {
                        SortableAttributeValue::Sentinel => None,
                        other => Some(other.clone()),
                    },
                };
                if exclusive_start_key.is_some_and(|start| key <= *start) {
                    continue;
                }
                if page.items.len() == effective_limit {
                    page.last_evaluated_key = last_key;
                    debug!(scanned = page.items.len(), "scan page truncated by limit");
                    return page;
                }
                page.items.push(item.attributes.clone());
                last_key = Some(key);
            }
        }

        debug!(scanned = page.items.len(), "scan reached end of table");
        page
    }
}

// ---------------------------------------------------------------------------
// Key extraction
// ---------------------------------------------------------------------------

/// Extracts the primary key from an item according to the key schema.
///
/// # Errors
///
/// Returns `StorageError::MissingKeyAttribute` if a required key attribute
/// is missing, or `StorageError::InvalidKeyType` if a key attribute has
/// the wrong type.
pub fn extract_primary_key(key_schema: &KeySchema, item: &Item) -> Result<PrimaryKey, StorageError> {
    let partition_key = key_attribute(&key_schema.partition_key, item)?;
    let sort_key = key_schema
        .sort_key
        .as_ref()
        .map(|sk_def| key_attribute(sk_def, item))
        .transpose()?;

    Ok(PrimaryKey {
        partition_key,
        sort_key,
    })
}

/// Extracts a primary key from a map that must hold exactly the key
/// attributes, with their declared types.
///
/// # Errors
///
/// Returns `StorageError::KeyMismatch` on extra, missing, or mistyped key
/// attributes.
pub fn extract_exact_key(key_schema: &KeySchema, key: &Item) -> Result<PrimaryKey, StorageError> {
    if key.len() != key_schema.attributes().count() {
        return Err(StorageError::KeyMismatch);
    }
    extract_primary_key(key_schema, key).map_err(|_| StorageError::KeyMismatch)
}

fn key_attribute(def: &KeyAttribute, item: &Item) -> Result<SortableAttributeValue, StorageError> {
    let value = item
        .get(&def.name)
        .ok_or_else(|| StorageError::MissingKeyAttribute {
            attr: def.name.clone(),
        })?;
    validate_key_type(&def.name, def.attr_type, value)?;
    SortableAttributeValue::from_attribute_value(&def.name, value)
}

/// Validates that an attribute value matches the expected scalar type.
fn validate_key_type(
    attr_name: &str,
    expected: ScalarType,
    value: &AttributeValue,
) -> Result<(), StorageError> {
    if value.scalar_type() == Some(expected) {
        Ok(())
    } else {
        Err(StorageError::InvalidKeyType {
            attr: attr_name.to_owned(),
            expected: expected.as_str().to_owned(),
            actual: value.type_descriptor().to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
