//! In-memory query layer
//!
//! Serves table columns and query results from fixtures and records every
//! call it receives. Useful for dry-running `validate` and for tests.
//!
//! Identifiers are matched case-insensitively, as DB2 folds unquoted names to
//! upper case. Statements are matched against registered queries by
//! containment, so a fixture for `SELECT * FROM T` also answers the probe
//! `SELECT * FROM (SELECT * FROM T) AS t LIMIT 1`.

use crate::config::IbmDbOfflineStoreConfig;
use crate::connection::{ColumnDescription, Connection, Connector, ResultHandle, Row};
use crate::error::{EngineError, EngineResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// SQLSTATE DB2 reports for an undefined object name
const SQLSTATE_UNDEFINED_NAME: &str = "42704";

/// A call the in-memory query layer received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// Credentials are not recorded
    Connect { host: String, port: u16, database: String },
    Execute { sql: String },
    SchemaColumns { database: Option<String>, table: String },
}

#[derive(Debug, Clone, Default)]
struct Catalog {
    /// Keyed by (upper-cased database, upper-cased table)
    tables: HashMap<(Option<String>, String), Vec<ColumnDescription>>,
    table_errors: HashMap<(Option<String>, String), EngineError>,
    queries: Vec<QueryFixture>,
    connect_error: Option<EngineError>,
}

#[derive(Debug, Clone)]
struct QueryFixture {
    query: String,
    outcome: std::result::Result<(Vec<ColumnDescription>, Vec<Row>), EngineError>,
    fetch_error: Option<EngineError>,
}

/// Connector backed by in-memory fixtures
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    catalog: Arc<Catalog>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under `[database.]table`
    pub fn with_table(mut self, table: &str, columns: &[(&str, &str)]) -> Self {
        Arc::make_mut(&mut self.catalog)
            .tables
            .insert(table_key(table), describe(columns));
        self
    }

    /// Make column lookups for `[database.]table` fail
    pub fn with_table_error(mut self, table: &str, error: EngineError) -> Self {
        Arc::make_mut(&mut self.catalog)
            .table_errors
            .insert(table_key(table), error);
        self
    }

    /// Register the result of a query
    pub fn with_query_result(mut self, query: &str, columns: &[(&str, &str)], rows: Vec<Row>) -> Self {
        Arc::make_mut(&mut self.catalog).queries.push(QueryFixture {
            query: query.to_string(),
            outcome: Ok((describe(columns), rows)),
            fetch_error: None,
        });
        self
    }

    /// Make statements containing `query` execute, then fail on fetch
    pub fn with_query_fetch_error(
        mut self,
        query: &str,
        columns: &[(&str, &str)],
        error: EngineError,
    ) -> Self {
        Arc::make_mut(&mut self.catalog).queries.push(QueryFixture {
            query: query.to_string(),
            outcome: Ok((describe(columns), Vec::new())),
            fetch_error: Some(error),
        });
        self
    }

    /// Make statements containing `query` fail
    pub fn with_query_error(mut self, query: &str, error: EngineError) -> Self {
        Arc::make_mut(&mut self.catalog).queries.push(QueryFixture {
            query: query.to_string(),
            outcome: Err(error),
            fetch_error: None,
        });
        self
    }

    /// Make every connection attempt fail
    pub fn with_connect_error(mut self, error: EngineError) -> Self {
        Arc::make_mut(&mut self.catalog).connect_error = Some(error);
        self
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Statements passed to `execute` so far
    pub fn executed_statements(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Execute { sql } => Some(sql),
                _ => None,
            })
            .collect()
    }
}

impl Connector for InMemoryConnector {
    fn connect(&self, config: &IbmDbOfflineStoreConfig) -> EngineResult<Box<dyn Connection>> {
        record(
            &self.calls,
            RecordedCall::Connect {
                host: config.host.clone(),
                port: config.port,
                database: config.database.clone(),
            },
        );

        if let Some(ref error) = self.catalog.connect_error {
            return Err(error.clone());
        }

        Ok(Box::new(InMemoryConnection {
            catalog: Arc::clone(&self.catalog),
            calls: Arc::clone(&self.calls),
            current_schema: config.schema.as_deref().map(str::to_uppercase),
        }))
    }
}

struct InMemoryConnection {
    catalog: Arc<Catalog>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    current_schema: Option<String>,
}

impl Connection for InMemoryConnection {
    fn execute(&mut self, sql: &str) -> EngineResult<Box<dyn ResultHandle + '_>> {
        record(&self.calls, RecordedCall::Execute { sql: sql.to_string() });

        // Longest match wins so nested fixtures resolve to the most specific one
        let fixture = self
            .catalog
            .queries
            .iter()
            .filter(|f| sql.contains(&f.query))
            .max_by_key(|f| f.query.len())
            .ok_or_else(|| {
                EngineError::new(format!("SQL0204N  statement references an undefined name: {}", sql))
                    .with_sqlstate(SQLSTATE_UNDEFINED_NAME)
            })?;

        match &fixture.outcome {
            Ok((columns, rows)) => Ok(Box::new(InMemoryResult {
                columns: columns.clone(),
                rows: rows.iter().cloned().collect(),
                fetch_error: fixture.fetch_error.clone(),
            })),
            Err(error) => Err(error.clone()),
        }
    }

    fn current_schema_columns(
        &mut self,
        database: Option<&str>,
        table: &str,
    ) -> EngineResult<Vec<ColumnDescription>> {
        record(
            &self.calls,
            RecordedCall::SchemaColumns {
                database: database.map(str::to_string),
                table: table.to_string(),
            },
        );

        let exact = (database.map(str::to_uppercase), table.to_uppercase());
        // Unqualified names also resolve in the connection's current schema
        let fallback = match exact.0 {
            None => Some((self.current_schema.clone(), exact.1.clone())),
            Some(_) => None,
        };
        let keys = std::iter::once(exact).chain(fallback);

        for key in keys {
            if let Some(error) = self.catalog.table_errors.get(&key) {
                return Err(error.clone());
            }
            if let Some(columns) = self.catalog.tables.get(&key) {
                return Ok(columns.clone());
            }
        }

        Ok(Vec::new())
    }
}

struct InMemoryResult {
    columns: Vec<ColumnDescription>,
    rows: std::collections::VecDeque<Row>,
    fetch_error: Option<EngineError>,
}

impl ResultHandle for InMemoryResult {
    fn fetch_one(&mut self) -> EngineResult<Option<Row>> {
        if let Some(ref error) = self.fetch_error {
            return Err(error.clone());
        }
        Ok(self.rows.pop_front())
    }

    fn column_descriptions(&self) -> Vec<ColumnDescription> {
        self.columns.clone()
    }
}

fn describe(columns: &[(&str, &str)]) -> Vec<ColumnDescription> {
    columns
        .iter()
        .map(|(name, type_name)| ColumnDescription::new(*name, *type_name))
        .collect()
}

/// Upper-cased `(database, table)` key for `[database.]table`
fn table_key(table: &str) -> (Option<String>, String) {
    let (database, table_name) = crate::source::split_table_ref(table);
    (database.map(str::to_uppercase), table_name.to_uppercase())
}

fn record(calls: &Mutex<Vec<RecordedCall>>, call: RecordedCall) {
    calls
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(call);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> IbmDbOfflineStoreConfig {
        IbmDbOfflineStoreConfig::new("localhost", "TESTDB").with_schema("feast")
    }

    #[test]
    fn test_table_lookup_is_case_insensitive() {
        let connector =
            InMemoryConnector::new().with_table("FEAST.DRIVER_STATS", &[("DRIVER_ID", "BIGINT")]);
        let mut conn = connector.connect(&store()).unwrap();

        let columns = conn
            .current_schema_columns(Some("feast"), "driver_stats")
            .unwrap();
        assert_eq!(columns, vec![ColumnDescription::new("DRIVER_ID", "BIGINT")]);
    }

    #[test]
    fn test_unqualified_table_uses_current_schema() {
        let connector =
            InMemoryConnector::new().with_table("FEAST.DRIVER_STATS", &[("DRIVER_ID", "BIGINT")]);
        let mut conn = connector.connect(&store()).unwrap();

        assert_eq!(
            conn.current_schema_columns(None, "DRIVER_STATS").unwrap().len(),
            1
        );
        assert!(conn
            .current_schema_columns(Some("OTHER"), "DRIVER_STATS")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_execute_matches_most_specific_fixture() {
        let connector = InMemoryConnector::new()
            .with_query_result("SELECT * FROM T", &[("A", "INTEGER")], vec![vec![json!(1)]])
            .with_query_result(
                "SELECT * FROM T WHERE A > 1",
                &[("A", "INTEGER")],
                vec![],
            );
        let mut conn = connector.connect(&store()).unwrap();

        let mut result = conn
            .execute("SELECT * FROM (SELECT * FROM T WHERE A > 1) AS t LIMIT 1")
            .unwrap();
        assert!(result.fetch_one().unwrap().is_none());
    }

    #[test]
    fn test_unknown_statement_fails() {
        let connector = InMemoryConnector::new();
        let mut conn = connector.connect(&store()).unwrap();

        let err = conn.execute("SELECT * FROM NOPE").err().unwrap();
        assert_eq!(err.sqlstate.as_deref(), Some("42704"));
    }

    #[test]
    fn test_records_calls_without_credentials() {
        let connector = InMemoryConnector::new().with_connect_error(EngineError::new("refused"));
        let config = store().with_credentials("db2inst1", "s3cret");
        assert!(connector.connect(&config).is_err());

        assert_eq!(
            connector.calls(),
            vec![RecordedCall::Connect {
                host: "localhost".to_string(),
                port: 50000,
                database: "TESTDB".to_string(),
            }]
        );
        assert!(!format!("{:?}", connector.calls()).contains("s3cret"));
    }

    #[test]
    fn test_calls_survive_poisoned_lock() {
        let connector = InMemoryConnector::new();
        connector.connect(&store()).unwrap();

        let calls = Arc::clone(&connector.calls);
        let _ = std::thread::spawn(move || {
            let _guard = calls.lock().unwrap();
            panic!("poison the call log");
        })
        .join();

        assert!(connector.calls.is_poisoned());
        connector.connect(&store()).unwrap();
        assert_eq!(connector.calls().len(), 2);
    }

    #[test]
    fn test_table_error_fixture() {
        let connector = InMemoryConnector::new().with_table_error(
            "FEAST.LOCKED",
            EngineError::new("SQL0551N  no privilege").with_sqlstate("42501"),
        );
        let mut conn = connector.connect(&store()).unwrap();

        let err = conn.current_schema_columns(None, "locked").unwrap_err();
        assert_eq!(err.sqlstate.as_deref(), Some("42501"));
    }

    #[test]
    fn test_fetch_error_fixture() {
        let connector = InMemoryConnector::new().with_query_fetch_error(
            "SELECT * FROM T",
            &[("A", "INTEGER")],
            EngineError::new("SQL0802N  arithmetic overflow").with_sqlstate("22003"),
        );
        let mut conn = connector.connect(&store()).unwrap();

        let mut result = conn.execute("SELECT * FROM T").unwrap();
        assert_eq!(result.column_descriptions().len(), 1);
        assert!(result.fetch_one().is_err());
    }
}
