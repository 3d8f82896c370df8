//! Table registry.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use scanlite_model::dynamodb_error;
use scanlite_model::error::DynamoDBError;

use crate::storage::{KeySchema, TableStorage};

/// All tables served by one provider.
#[derive(Debug)]
pub struct DynamoDBServiceState {
    /// All tables keyed by name.
    tables: DashMap<String, Arc<DynamoDBTable>>,
}

impl DynamoDBServiceState {
    /// Create a new empty service state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
        }
    }

    /// Get a table by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<Arc<DynamoDBTable>> {
        self.tables.get(name).map(|r| Arc::clone(r.value()))
    }

    /// Get a table or return `ResourceNotFoundException`.
    pub fn require_table(&self, name: &str) -> Result<Arc<DynamoDBTable>, DynamoDBError> {
        self.get_table(name).ok_or_else(|| {
            debug!(table = name, "table not found");
            table_not_found()
        })
    }

    /// Create an empty table. Returns error if the table already exists.
    pub fn create_table(
        &self,
        name: &str,
        key_schema: KeySchema,
    ) -> Result<Arc<DynamoDBTable>, DynamoDBError> {
        match self.tables.entry(name.to_owned()) {
            dashmap::mapref::entry::Entry::Occupied(e) => Err(DynamoDBError::resource_in_use(
                format!("Table already exists: {}", e.key()),
            )),
            dashmap::mapref::entry::Entry::Vacant(e) => {
                let table = Arc::new(DynamoDBTable {
                    name: name.to_owned(),
                    storage: TableStorage::new(key_schema),
                });
                e.insert(Arc::clone(&table));
                info!(table = name, "created table");
                Ok(table)
            }
        }
    }

    /// Remove a table by name. Returns the removed table.
    pub fn delete_table(&self, name: &str) -> Result<Arc<DynamoDBTable>, DynamoDBError> {
        self.tables.remove(name).map(|(_, t)| t).ok_or_else(|| {
            debug!(table = name, "table not found");
            table_not_found()
        })
    }

    /// List all table names (sorted).
    #[must_use]
    pub fn list_table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Reset all state (remove all tables).
    pub fn reset(&self) {
        self.tables.clear();
    }
}

impl Default for DynamoDBServiceState {
    fn default() -> Self {
        Self::new()
    }
}

/// A single table and its items.
#[derive(Debug)]
pub struct DynamoDBTable {
    /// Table name.
    pub name: String,
    /// Item storage engine.
    pub storage: TableStorage,
}

impl DynamoDBTable {
    /// The table's key schema.
    #[must_use]
    pub fn key_schema(&self) -> &KeySchema {
        self.storage.key_schema()
    }
}

fn table_not_found() -> DynamoDBError {
    dynamodb_error!(ResourceNotFoundException, "Requested resource not found")
}
