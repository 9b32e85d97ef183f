//! Feature repository configuration
//!
//! The Feast host describes the offline store in `feature_store.yaml`:
//!
//! ```yaml
//! project: driver_ranking
//! provider: local
//! registry: data/registry.db
//! offline_store:
//!   type: feast_ibmdb.IBMdbOfflineStore
//!   host: db2.internal
//!   port: 50000
//!   database: BLUDB
//!   user: feast
//!   password: secret
//!   schema: FEAST
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// `type` value that selects this offline store
pub const IBMDB_OFFLINE_STORE_TYPE: &str = "feast_ibmdb.IBMdbOfflineStore";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field '{field}' in {section}")]
    MissingField { section: String, field: String },

    /// Field present but unusable
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Offline store `type` names a different store
    #[error("Unsupported offline store type: {0}")]
    UnsupportedStoreType(String),
}

/// Feature repository configuration, as read from `feature_store.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Feast project name
    pub project: String,

    /// Feast provider
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Registry location
    #[serde(default)]
    pub registry: Option<String>,

    /// DB2 offline store settings
    pub offline_store: IbmDbOfflineStoreConfig,
}

impl RepoConfig {
    /// Create a configuration for a project
    pub fn new(project: impl Into<String>, offline_store: IbmDbOfflineStoreConfig) -> Self {
        Self {
            project: project.into(),
            provider: default_provider(),
            registry: None,
            offline_store,
        }
    }

    /// Set the registry location
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Parse and validate a configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: RepoConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded repository config from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.trim().is_empty() {
            return Err(ConfigError::MissingField {
                section: "repository".to_string(),
                field: "project".to_string(),
            });
        }
        self.offline_store.validate()
    }
}

/// DB2 offline store configuration
///
/// Connection and credential handling belong to the query layer; this struct
/// only carries the values it needs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct IbmDbOfflineStoreConfig {
    /// Offline store selector
    #[serde(rename = "type", default = "default_store_type")]
    pub store_type: String,

    /// DB2 server hostname
    pub host: String,

    /// DB2 server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name
    pub database: String,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Schema unqualified table names resolve against
    #[serde(default)]
    pub schema: Option<String>,

    /// Network protocol
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Set to `SSL` for encrypted connections
    #[serde(default)]
    pub security: Option<String>,

    /// Extra CLI keywords appended to the connection string
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl IbmDbOfflineStoreConfig {
    /// Create a configuration for a host and database
    pub fn new(host: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            store_type: default_store_type(),
            host: host.into(),
            port: default_port(),
            database: database.into(),
            user: None,
            password: None,
            schema: None,
            protocol: default_protocol(),
            security: None,
            options: HashMap::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_type != IBMDB_OFFLINE_STORE_TYPE {
            return Err(ConfigError::UnsupportedStoreType(self.store_type.clone()));
        }

        for (field, value) in [("host", &self.host), ("database", &self.database)] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    section: "offline_store".to_string(),
                    field: field.to_string(),
                });
            }
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if self.password.is_some() && self.user.is_none() {
            return Err(ConfigError::MissingField {
                section: "offline_store".to_string(),
                field: "user".to_string(),
            });
        }

        Ok(())
    }

    /// DB2 CLI connection string for this store
    ///
    /// Extra options are appended in key order so the string is stable.
    pub fn connection_string(&self) -> String {
        let mut parts = vec![
            format!("DATABASE={}", self.database),
            format!("HOSTNAME={}", self.host),
            format!("PORT={}", self.port),
            format!("PROTOCOL={}", self.protocol),
        ];

        if let Some(ref user) = self.user {
            parts.push(format!("UID={}", user));
        }
        if let Some(ref password) = self.password {
            parts.push(format!("PWD={}", password));
        }
        if let Some(ref schema) = self.schema {
            parts.push(format!("CURRENTSCHEMA={}", schema));
        }
        if let Some(ref security) = self.security {
            parts.push(format!("SECURITY={}", security));
        }

        let mut extra: Vec<_> = self.options.iter().collect();
        extra.sort();
        for (key, value) in extra {
            parts.push(format!("{}={}", key.to_uppercase(), value));
        }

        let mut dsn = parts.join(";");
        dsn.push(';');
        dsn
    }
}

impl fmt::Debug for IbmDbOfflineStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmDbOfflineStoreConfig")
            .field("store_type", &self.store_type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("schema", &self.schema)
            .field("protocol", &self.protocol)
            .field("security", &self.security)
            .field("options", &self.options)
            .finish()
    }
}

// Default value functions
fn default_provider() -> String {
    "local".to_string()
}

fn default_store_type() -> String {
    IBMDB_OFFLINE_STORE_TYPE.to_string()
}

fn default_port() -> u16 {
    50000
}

fn default_protocol() -> String {
    "TCPIP".to_string()
}
