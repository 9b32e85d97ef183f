//! Integration tests for loading feature_store.yaml

use feast_ibmdb::{ConfigError, RepoConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_from_file() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"project: driver_ranking
provider: local
offline_store:
  type: feast_ibmdb.IBMdbOfflineStore
  host: db2.internal
  port: 50001
  database: BLUDB
  user: feast
  password: secret
  security: SSL
"#
    )?;

    let config = RepoConfig::from_path(file.path())?;
    assert_eq!(config.offline_store.port, 50001);
    assert_eq!(config.offline_store.security.as_deref(), Some("SSL"));
    assert!(config
        .offline_store
        .connection_string()
        .ends_with("SECURITY=SSL;"));
    Ok(())
}

#[test]
fn test_missing_file() {
    let err = RepoConfig::from_path("does/not/exist/feature_store.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("feature_store.yaml"));
}

#[test]
fn test_invalid_yaml() {
    let err = RepoConfig::from_yaml_str("project: [unterminated").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_missing_project() {
    let yaml = r#"
project: ""
offline_store:
  host: localhost
  database: TESTDB
"#;
    let err = RepoConfig::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { ref field, .. } if field == "project"));
}
