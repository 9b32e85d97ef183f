//! Error types for the DB2 data source

use crate::config::ConfigError;
use feast_ibmdb_core::CoreError;
use thiserror::Error;

/// Result type for data source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Result type for calls into the query layer
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Error reported by the DB2 query layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", .sqlstate.as_ref().map(|s| format!(" (SQLSTATE {})", s)).unwrap_or_default())]
pub struct EngineError {
    /// Five character SQLSTATE, when the driver reported one
    pub sqlstate: Option<String>,

    /// Driver message
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            sqlstate: None,
            message: message.into(),
        }
    }

    pub fn with_sqlstate(mut self, sqlstate: impl Into<String>) -> Self {
        self.sqlstate = Some(sqlstate.into());
        self
    }
}

/// Errors that can occur while building, loading or probing a DB2 source
#[derive(Error, Debug)]
pub enum SourceError {
    /// Neither a table nor a query was supplied
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Envelope is not a DB2 custom source or its payload cannot be decoded
    #[error("Malformed data source envelope: {0}")]
    MalformedEnvelope(String),

    /// Table or query could not be resolved by DB2
    #[error("Data source not found: {source_ref}")]
    SourceNotFound {
        source_ref: String,
        #[source]
        cause: Option<EngineError>,
    },

    /// Column type has no mapping
    #[error(transparent)]
    UnknownType(#[from] CoreError),

    /// Comparison against a different kind of data source
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Connection to DB2 could not be opened
    #[error("Connection error: {0}")]
    Connection(#[source] EngineError),

    /// Offline store configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SourceError {
    pub(crate) fn not_found(source_ref: impl Into<String>, cause: Option<EngineError>) -> Self {
        SourceError::SourceNotFound {
            source_ref: source_ref.into(),
            cause,
        }
    }
}

impl From<prost::DecodeError> for SourceError {
    fn from(err: prost::DecodeError) -> Self {
        SourceError::MalformedEnvelope(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_engine_error_display() {
        let error = EngineError::new("table not found");
        assert_eq!(error.to_string(), "table not found");

        let error = EngineError::new("SQL0204N  \"FEAST.NOPE\" is an undefined name.")
            .with_sqlstate("42704");
        assert_eq!(
            error.to_string(),
            "SQL0204N  \"FEAST.NOPE\" is an undefined name. (SQLSTATE 42704)"
        );
    }

    #[test]
    fn test_source_not_found_keeps_cause() {
        let error = SourceError::not_found(
            "FEAST.NOPE",
            Some(EngineError::new("undefined name").with_sqlstate("42704")),
        );
        assert_eq!(error.to_string(), "Data source not found: FEAST.NOPE");

        let cause = error.source().expect("cause should be preserved");
        assert!(cause.to_string().contains("42704"));

        let error = SourceError::not_found("SELECT 1", None);
        assert!(error.source().is_none());
    }

    #[test]
    fn test_unknown_type_is_transparent() {
        let core = feast_ibmdb_core::ibmdb_to_feast_value_type("xml").unwrap_err();
        let error: SourceError = core.into();
        assert_eq!(error.to_string(), "Unknown DB2 type: xml");
    }

    #[test]
    fn test_decode_error_conversion() {
        use prost::Message;

        let decoded = crate::proto::DataSourceProto::decode(&[0xff_u8, 0xff, 0xff][..]);
        let error: SourceError = decoded.unwrap_err().into();
        assert!(matches!(error, SourceError::MalformedEnvelope(_)));
    }
}
