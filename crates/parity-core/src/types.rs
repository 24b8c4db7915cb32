//! Core types for Catalog Parity
//!
//! Defines the vocabulary shared by the dispatcher and its backends:
//! - Qualified table names and entry coordinates
//! - Logical requests, one per verified operation
//! - Execution paths and per-path resolutions
//! - Mutation target handles and concurrency tokens

use parity_value::ResultValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend executes a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPath {
    /// Authoritative, optimized backend; its results are returned
    Direct,
    /// Generic backend used only to validate the direct path
    Indirect,
}

impl fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Indirect => f.write_str("indirect"),
        }
    }
}

/// Fully qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName {
    /// Catalog
    pub catalog: String,
    /// Database within the catalog
    pub database: String,
    /// Table within the database
    pub table: String,
}

impl TableName {
    /// Create a table name
    #[inline]
    #[must_use]
    pub fn new(
        catalog: impl Into<String>,
        database: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            database: database.into(),
            table: table.into(),
        }
    }

    /// Trimmed, lower-cased copy
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            catalog: normalize_identifier(&self.catalog),
            database: normalize_identifier(&self.database),
            table: normalize_identifier(&self.table),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.database, self.table)
    }
}

/// Trim and lower-case a catalog identifier
#[inline]
#[must_use]
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// Exact key of a single entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryCoordinates {
    /// Owning table
    pub table: TableName,
    /// Key values, in key-column order
    pub key_values: Vec<String>,
}

impl EntryCoordinates {
    /// Create coordinates
    #[inline]
    #[must_use]
    pub fn new(table: TableName, key_values: Vec<String>) -> Self {
        Self { table, key_values }
    }
}

/// A logical operation with its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum LogicalRequest {
    /// Single entry by exact key
    PointLookup(EntryCoordinates),

    /// Entries matching a predicate, possibly capped
    ListByFilter {
        /// Owning table
        table: TableName,
        /// Predicate expression, opaque to this layer
        predicate: String,
        /// Cap on returned entries; `None` for all
        max: Option<u32>,
    },

    /// Entries by encoded name; unmatched names are omitted
    ListByNames {
        /// Owning table
        table: TableName,
        /// Encoded entry names
        names: Vec<String>,
    },

    /// Every entry of a table
    ListAll {
        /// Owning table
        table: TableName,
        /// Cap on returned entries; `None` for all
        max: Option<u32>,
    },

    /// Column statistics of a table
    TableStatistics {
        /// Owning table
        table: TableName,
        /// Columns of interest
        columns: Vec<String>,
        /// Engine the statistics belong to
        engine: String,
    },

    /// Column statistics per entry
    EntryStatistics {
        /// Owning table
        table: TableName,
        /// Encoded entry names
        entry_names: Vec<String>,
        /// Columns of interest
        columns: Vec<String>,
        /// Engine the statistics belong to
        engine: String,
    },
}

impl LogicalRequest {
    /// Operation name used in diagnostics
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::PointLookup(_) => "point_lookup",
            Self::ListByFilter { .. } => "list_by_filter",
            Self::ListByNames { .. } => "list_by_names",
            Self::ListAll { .. } => "list_all",
            Self::TableStatistics { .. } => "get_statistics",
            Self::EntryStatistics { .. } => "get_entry_statistics",
        }
    }

    /// Table the request targets
    #[must_use]
    pub fn table(&self) -> &TableName {
        match self {
            Self::PointLookup(coordinates) => &coordinates.table,
            Self::ListByFilter { table, .. }
            | Self::ListByNames { table, .. }
            | Self::ListAll { table, .. }
            | Self::TableStatistics { table, .. }
            | Self::EntryStatistics { table, .. } => table,
        }
    }
}

/// One backend's answer to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// The result value
    pub value: ResultValue,
    /// Whether the result was capped rather than exhaustive
    #[serde(default)]
    pub truncated: bool,
}

impl Resolution {
    /// An exhaustive result
    #[inline]
    #[must_use]
    pub fn complete(value: ResultValue) -> Self {
        Self {
            value,
            truncated: false,
        }
    }

    /// A capped result
    #[inline]
    #[must_use]
    pub fn capped(value: ResultValue) -> Self {
        Self {
            value,
            truncated: true,
        }
    }
}

/// Verified result of a filtered listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredListing {
    /// Matching entries from the direct path
    pub items: Vec<ResultValue>,
    /// Whether the listing was capped
    pub truncated: bool,
}

/// Resolved mutation target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetHandle {
    /// Qualified name the handle was resolved from
    pub name: TableName,
    /// Key columns, in order
    pub key_columns: Vec<String>,
}

impl TargetHandle {
    /// Create a handle
    #[inline]
    #[must_use]
    pub fn new(name: TableName, key_columns: Vec<String>) -> Self {
        Self { name, key_columns }
    }
}

/// Concurrency token accompanying a mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyToken {
    /// Write id stamped on mutated records when positive
    pub write_id: i64,
    /// Encoded snapshot of valid write ids, opaque to this layer
    pub valid_write_ids: Option<String>,
}

impl ConcurrencyToken {
    /// Token with a write id
    #[inline]
    #[must_use]
    pub fn with_write_id(write_id: i64) -> Self {
        Self {
            write_id,
            valid_write_ids: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_normalizes() {
        let name = TableName::new(" Hive ", "Sales", "ORDERS ");
        assert_eq!(name.normalized(), TableName::new("hive", "sales", "orders"));
        assert_eq!(name.normalized().to_string(), "hive.sales.orders");
    }

    #[test]
    fn paths_render_lowercase() {
        assert_eq!(ExecutionPath::Direct.to_string(), "direct");
        assert_eq!(ExecutionPath::Indirect.to_string(), "indirect");
    }

    #[test]
    fn request_names_operation_and_table() {
        let table = TableName::new("hive", "db", "t");
        let request = LogicalRequest::TableStatistics {
            table: table.clone(),
            columns: vec!["a".into()],
            engine: "hive".into(),
        };
        assert_eq!(request.operation(), "get_statistics");
        assert_eq!(request.table(), &table);
    }
}
