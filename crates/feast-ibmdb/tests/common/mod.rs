//! Common test utilities for DB2 source integration tests

#![allow(dead_code)]

use feast_ibmdb::{IbmDbOfflineStoreConfig, InMemoryConnector, RepoConfig};
use serde_json::json;

pub const DRIVER_STATS_QUERY: &str =
    "SELECT DRIVER_ID, CONV_RATE, EVENT_TIMESTAMP FROM FEAST.DRIVER_STATS WHERE CONV_RATE > 0.5";

pub const EMPTY_QUERY: &str = "SELECT DRIVER_ID FROM FEAST.DRIVER_STATS WHERE 1 = 0";

/// Repository config pointing at a local DB2 instance with schema FEAST
pub fn repo_config() -> RepoConfig {
    RepoConfig::new(
        "driver_ranking",
        IbmDbOfflineStoreConfig::new("localhost", "TESTDB")
            .with_credentials("db2inst1", "password")
            .with_schema("FEAST"),
    )
}

/// Connector serving the driver stats fixtures
pub fn driver_stats_connector() -> InMemoryConnector {
    InMemoryConnector::new()
        .with_table(
            "FEAST.DRIVER_STATS",
            &[
                ("DRIVER_ID", "BIGINT"),
                ("CONV_RATE", "DOUBLE"),
                ("ACC_RATE", "REAL"),
                ("AVG_DAILY_TRIPS", "INTEGER"),
                ("EVENT_TIMESTAMP", "TIMESTAMP"),
                ("CREATED", "TIMESTAMP"),
            ],
        )
        .with_table(
            "AUDIT.DRIVER_STATS",
            &[("DRIVER_ID", "BIGINT"), ("PAYLOAD", "XML")],
        )
        .with_query_result(
            DRIVER_STATS_QUERY,
            &[
                ("DRIVER_ID", "BIGINT"),
                ("CONV_RATE", "DOUBLE"),
                ("EVENT_TIMESTAMP", "TIMESTAMP"),
            ],
            vec![vec![json!(1001), json!(0.83), json!("2021-04-12 10:59:42")]],
        )
        .with_query_result(EMPTY_QUERY, &[("DRIVER_ID", "BIGINT")], vec![])
}
