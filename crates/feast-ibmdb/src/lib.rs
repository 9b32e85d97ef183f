//! IBM DB2 data source for the Feast offline store
//!
//! This crate lets Feast read feature data from a DB2 table or query:
//! - [`IbmDbSource`]: the table/query reference plus Feast's source metadata
//! - Envelope (de)serialization through [`DataSourceProto`]
//! - Column discovery through a pluggable query layer ([`Connector`])
//! - Type mapping via [`feast_ibmdb_core`]
//!
//! # Quick Start
//!
//! ```rust
//! use feast_ibmdb::{
//!     DataSource, IbmDbOfflineStoreConfig, IbmDbSource, InMemoryConnector, RepoConfig,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = IbmDbSource::from_table("FEAST.DRIVER_STATS")?
//!     .with_event_timestamp_column("EVENT_TIMESTAMP");
//!
//! // Envelopes written at apply time load back as an equal source
//! let loaded = IbmDbSource::from_proto(&source.to_proto())?;
//! assert_eq!(loaded, source);
//!
//! let config = RepoConfig::new(
//!     "driver_ranking",
//!     IbmDbOfflineStoreConfig::new("localhost", "TESTDB"),
//! );
//! let connector = InMemoryConnector::new().with_table(
//!     "FEAST.DRIVER_STATS",
//!     &[("DRIVER_ID", "BIGINT"), ("EVENT_TIMESTAMP", "TIMESTAMP")],
//! );
//! source.validate(&config, &connector)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod memory;
pub mod options;
pub mod proto;
pub mod source;
pub mod traits;

// Re-exports - Configuration
pub use config::{ConfigError, IbmDbOfflineStoreConfig, RepoConfig, IBMDB_OFFLINE_STORE_TYPE};

// Re-exports - Query layer
pub use connection::{ColumnDescription, Connection, Connector, ResultHandle, Row};
pub use memory::{InMemoryConnector, RecordedCall};

// Re-exports - Error
pub use error::{EngineError, EngineResult, Result, SourceError};

// Re-exports - Sources
pub use options::IbmDbOptions;
pub use proto::{DataSourceProto, IbmDbOptionsProto};
pub use source::{split_table_ref, IbmDbSource, IBMDB_SOURCE_CLASS};
pub use traits::{data_source_from_proto, DataSource, ValueTypeMapper};

pub use feast_ibmdb_core::{type_map, ValueType};
