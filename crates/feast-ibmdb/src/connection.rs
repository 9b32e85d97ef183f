//! Query layer interface
//!
//! The DB2 driver lives outside this crate. A data source only needs two
//! things from it: column descriptions for a table in the current schema, and
//! the ability to run a statement and look at the first row plus the result
//! set description. Calls are blocking; no retry or timeout is applied here.

use crate::config::IbmDbOfflineStoreConfig;
use crate::error::EngineResult;

/// A single result row
pub type Row = Vec<serde_json::Value>;

/// Name and DB2 type name of a result or table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    pub type_name: String,
}

impl ColumnDescription {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// `(name, type_name)` pair as handed to the Feast host
    pub fn into_pair(self) -> (String, String) {
        (self.name, self.type_name)
    }
}

/// Result of an executed statement
pub trait ResultHandle {
    /// Fetch the next row, `None` once the result set is exhausted
    fn fetch_one(&mut self) -> EngineResult<Option<Row>>;

    /// Describe the columns of the result set
    fn column_descriptions(&self) -> Vec<ColumnDescription>;
}

/// An open DB2 connection
pub trait Connection {
    /// Execute a SQL statement
    fn execute(&mut self, sql: &str) -> EngineResult<Box<dyn ResultHandle + '_>>;

    /// Columns of `table`, resolved in `database` when given, else in the
    /// connection's current schema
    ///
    /// An empty result means the table does not exist.
    fn current_schema_columns(
        &mut self,
        database: Option<&str>,
        table: &str,
    ) -> EngineResult<Vec<ColumnDescription>>;
}

/// Opens connections for an offline store configuration
pub trait Connector: Send + Sync {
    fn connect(&self, config: &IbmDbOfflineStoreConfig) -> EngineResult<Box<dyn Connection>>;
}
