//! Data source capability set
//!
//! The Feast host works with every offline source through the same set of
//! operations. [`DataSource`] is that set; [`data_source_from_proto`] picks the
//! concrete source for an envelope.

use crate::config::RepoConfig;
use crate::connection::Connector;
use crate::error::{Result, SourceError};
use crate::proto::data_source_proto::{Options, SourceType};
use crate::proto::DataSourceProto;
use crate::source::{IbmDbSource, IBMDB_SOURCE_CLASS};
use feast_ibmdb_core::ValueType;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Lookup from a source's native column type name to a Feast value type
pub type ValueTypeMapper = fn(&str) -> feast_ibmdb_core::Result<ValueType>;

/// Operations the Feast host needs from an offline data source
pub trait DataSource: fmt::Debug + Send + Sync {
    /// Serialize into the generic envelope
    fn to_proto(&self) -> DataSourceProto;

    /// Check that the source resolves against the offline store
    fn validate(&self, config: &RepoConfig, connector: &dyn Connector) -> Result<()>;

    /// SQL fragment usable verbatim in a FROM clause
    fn get_table_query_string(&self) -> String;

    /// Mapper for the native type names returned by
    /// [`get_table_column_names_and_types`](DataSource::get_table_column_names_and_types)
    fn source_datatype_to_feast_value_type(&self) -> ValueTypeMapper;

    /// `(name, native type)` for every column of the source
    fn get_table_column_names_and_types(
        &self,
        config: &RepoConfig,
        connector: &dyn Connector,
    ) -> Result<Vec<(String, String)>>;

    fn event_timestamp_column(&self) -> &str;

    fn created_timestamp_column(&self) -> &str;

    fn date_partition_column(&self) -> &str;

    fn field_mapping(&self) -> &HashMap<String, String>;

    fn as_any(&self) -> &dyn Any;

    /// Compare with another source
    ///
    /// Comparing sources of different kinds is an error rather than `false`.
    fn equals(&self, other: &dyn DataSource) -> Result<bool>;
}

/// Rebuild a data source from its envelope
pub fn data_source_from_proto(proto: &DataSourceProto) -> Result<Box<dyn DataSource>> {
    match (&proto.options, proto.r#type()) {
        (Some(Options::CustomOptions(_)), SourceType::CustomSource)
            if proto.data_source_class_type.is_empty()
                || proto.data_source_class_type == IBMDB_SOURCE_CLASS =>
        {
            Ok(Box::new(IbmDbSource::from_proto(proto)?))
        }
        (Some(Options::CustomOptions(_)), SourceType::CustomSource) => {
            Err(SourceError::MalformedEnvelope(format!(
                "unsupported custom source class: {}",
                proto.data_source_class_type
            )))
        }
        (_, source_type) => Err(SourceError::MalformedEnvelope(format!(
            "unsupported data source type: {:?}",
            source_type
        ))),
    }
}
