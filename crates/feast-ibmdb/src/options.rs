//! DB2 source options
//!
//! `IbmDbOptions` identifies where feature rows come from: a named table or
//! an arbitrary query. It is serialized into the `configuration` bytes of the
//! envelope's custom source options as an [`IbmDbOptionsProto`].

use crate::error::{Result, SourceError};
use crate::proto::data_source_proto::CustomSourceOptions;
use crate::proto::{IbmDbOptionsProto, IBMDB_OPTIONS_VERSION};
use prost::Message;

/// Table or query a DB2 source reads from
///
/// Both may be set; the table then takes precedence. Values are kept as
/// given, so an empty table name still counts as set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbmDbOptions {
    table: Option<String>,
    query: Option<String>,
}

impl IbmDbOptions {
    /// Create options, requiring at least one of `table` or `query`
    pub fn new(table: Option<String>, query: Option<String>) -> Result<Self> {
        if table.is_none() && query.is_none() {
            return Err(SourceError::ConfigurationError(
                "\"table\" or \"query\" is required for IBMdbSource".to_string(),
            ));
        }

        Ok(Self { table, query })
    }

    /// Qualified table name (`[database.]table`)
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// SQL query
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Replace the table reference
    ///
    /// Not validated: clearing both table and query leaves a source that
    /// fails when probed.
    pub fn set_table(&mut self, table: Option<String>) {
        self.table = table;
    }

    /// Replace the query
    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query;
    }

    /// Versioned wire message for these options
    pub fn to_proto(&self) -> IbmDbOptionsProto {
        IbmDbOptionsProto {
            version: IBMDB_OPTIONS_VERSION,
            table: self.table.clone(),
            query: self.query.clone(),
        }
    }

    /// Rebuild options from a wire message
    pub fn from_proto(proto: IbmDbOptionsProto) -> Result<Self> {
        if proto.version == 0 || proto.version > IBMDB_OPTIONS_VERSION {
            return Err(SourceError::MalformedEnvelope(format!(
                "unsupported IBMdbSource options version {}",
                proto.version
            )));
        }

        Self::new(proto.table, proto.query).map_err(|_| {
            SourceError::MalformedEnvelope(
                "IBMdbSource options name neither a table nor a query".to_string(),
            )
        })
    }

    /// Custom source options carrying the encoded options
    pub fn to_custom_options(&self) -> CustomSourceOptions {
        CustomSourceOptions {
            configuration: self.to_proto().encode_to_vec(),
        }
    }

    /// Decode options from custom source options
    pub fn from_custom_options(options: &CustomSourceOptions) -> Result<Self> {
        let proto = IbmDbOptionsProto::decode(options.configuration.as_slice())?;
        Self::from_proto(proto)
    }
}
