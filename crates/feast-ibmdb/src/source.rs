//! IBM DB2 data source
//!
//! `IbmDbSource` is the framework-facing descriptor: the table/query options
//! plus the timestamp, partition and field-mapping metadata Feast attaches to
//! every batch source.
//!
//! Sources are plain owned values. Setters take `&mut self` and are not
//! synchronized; share a source across threads only behind your own lock.

use crate::config::RepoConfig;
use crate::connection::{ColumnDescription, Connector};
use crate::error::{Result, SourceError};
use crate::options::IbmDbOptions;
use crate::proto::data_source_proto::{Options, SourceType};
use crate::proto::DataSourceProto;
use crate::traits::{DataSource, ValueTypeMapper};
use feast_ibmdb_core::{ibmdb_to_feast_value_type, ValueType};
use prost::Message;
use std::any::Any;
use std::collections::HashMap;

/// Class name recorded in envelopes written by this source
pub const IBMDB_SOURCE_CLASS: &str = "feast_ibmdb.IBMdbSource";

/// DB2 table or query used as a Feast batch source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbmDbSource {
    options: IbmDbOptions,
    event_timestamp_column: String,
    created_timestamp_column: String,
    field_mapping: HashMap<String, String>,
    date_partition_column: String,
}

impl IbmDbSource {
    /// Create a source; at least one of `table` or `query` is required
    pub fn new(table: Option<String>, query: Option<String>) -> Result<Self> {
        Ok(Self::with_options(IbmDbOptions::new(table, query)?))
    }

    /// Source reading a `[database.]table`
    pub fn from_table(table: impl Into<String>) -> Result<Self> {
        Self::new(Some(table.into()), None)
    }

    /// Source reading the rows of a query
    pub fn from_query(query: impl Into<String>) -> Result<Self> {
        Self::new(None, Some(query.into()))
    }

    /// Source over existing options, with empty metadata
    pub fn with_options(options: IbmDbOptions) -> Self {
        Self {
            options,
            event_timestamp_column: String::new(),
            created_timestamp_column: String::new(),
            field_mapping: HashMap::new(),
            date_partition_column: String::new(),
        }
    }

    pub fn with_event_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.event_timestamp_column = column.into();
        self
    }

    pub fn with_created_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.created_timestamp_column = column.into();
        self
    }

    pub fn with_date_partition_column(mut self, column: impl Into<String>) -> Self {
        self.date_partition_column = column.into();
        self
    }

    /// Map source column names to feature names
    pub fn with_field_mapping(mut self, field_mapping: HashMap<String, String>) -> Self {
        self.field_mapping = field_mapping;
        self
    }

    pub fn table(&self) -> Option<&str> {
        self.options.table()
    }

    pub fn query(&self) -> Option<&str> {
        self.options.query()
    }

    pub fn options(&self) -> &IbmDbOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut IbmDbOptions {
        &mut self.options
    }

    pub fn set_options(&mut self, options: IbmDbOptions) {
        self.options = options;
    }

    /// Rebuild a source from its envelope
    pub fn from_proto(proto: &DataSourceProto) -> Result<Self> {
        if proto.r#type() != SourceType::CustomSource {
            return Err(SourceError::MalformedEnvelope(format!(
                "expected a custom source, found {:?}",
                proto.r#type()
            )));
        }

        let custom_options = match &proto.options {
            Some(Options::CustomOptions(custom_options)) => custom_options,
            _ => {
                return Err(SourceError::MalformedEnvelope(
                    "envelope has no custom_options".to_string(),
                ))
            }
        };

        let options = IbmDbOptions::from_custom_options(custom_options)?;

        Ok(Self {
            options,
            event_timestamp_column: proto.event_timestamp_column.clone(),
            created_timestamp_column: proto.created_timestamp_column.clone(),
            field_mapping: proto.field_mapping.clone(),
            date_partition_column: proto.date_partition_column.clone(),
        })
    }

    /// Encode the envelope as protobuf bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    /// Decode a source from protobuf envelope bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let proto = DataSourceProto::decode(bytes)?;
        Self::from_proto(&proto)
    }

    /// Columns of the source with their Feast value types
    ///
    /// Fails on the first column whose DB2 type has no mapping.
    pub fn get_table_column_value_types(
        &self,
        config: &RepoConfig,
        connector: &dyn Connector,
    ) -> Result<Vec<(String, ValueType)>> {
        self.get_table_column_names_and_types(config, connector)?
            .into_iter()
            .map(|(name, type_name)| Ok((name, ibmdb_to_feast_value_type(&type_name)?)))
            .collect()
    }

    fn source_ref(&self) -> &str {
        self.table().or(self.query()).unwrap_or_default()
    }
}

impl DataSource for IbmDbSource {
    fn to_proto(&self) -> DataSourceProto {
        DataSourceProto {
            r#type: SourceType::CustomSource as i32,
            field_mapping: self.field_mapping.clone(),
            event_timestamp_column: self.event_timestamp_column.clone(),
            date_partition_column: self.date_partition_column.clone(),
            created_timestamp_column: self.created_timestamp_column.clone(),
            data_source_class_type: IBMDB_SOURCE_CLASS.to_string(),
            options: Some(Options::CustomOptions(self.options.to_custom_options())),
        }
    }

    fn validate(&self, config: &RepoConfig, connector: &dyn Connector) -> Result<()> {
        tracing::info!("Validating IBMdbSource {}", self.source_ref());
        self.get_table_column_names_and_types(config, connector)?;
        Ok(())
    }

    fn get_table_query_string(&self) -> String {
        match self.table().filter(|table| !table.is_empty()) {
            Some(table) => format!("`{}`", table),
            None => format!("({})", self.query().unwrap_or_default()),
        }
    }

    fn source_datatype_to_feast_value_type(&self) -> ValueTypeMapper {
        ibmdb_to_feast_value_type
    }

    fn get_table_column_names_and_types(
        &self,
        config: &RepoConfig,
        connector: &dyn Connector,
    ) -> Result<Vec<(String, String)>> {
        if self.table().is_none() && self.query().is_none() {
            return Err(SourceError::ConfigurationError(
                "\"table\" or \"query\" is required for IBMdbSource".to_string(),
            ));
        }

        let mut conn = connector
            .connect(&config.offline_store)
            .map_err(SourceError::Connection)?;

        if let Some(table) = self.table() {
            let (database, table_name) = split_table_ref(table);
            tracing::debug!(
                "Resolving columns of table {} (database: {:?})",
                table_name,
                database
            );

            let columns = conn
                .current_schema_columns(database, table_name)
                .map_err(|e| {
                    tracing::warn!("Column lookup for {} failed: {}", table, e);
                    SourceError::not_found(table, Some(e))
                })?;

            if columns.is_empty() {
                tracing::warn!("Table {} not found in current schema", table);
                return Err(SourceError::not_found(table, None));
            }

            return Ok(columns.into_iter().map(ColumnDescription::into_pair).collect());
        }

        let query = self.query().unwrap_or_default();

        let sql = format!("SELECT * FROM ({}) AS t LIMIT 1", query);
        tracing::debug!("Probing query source: {}", sql);

        let mut result = conn.execute(&sql).map_err(|e| {
            tracing::warn!("Query probe failed: {}", e);
            SourceError::not_found(query, Some(e))
        })?;

        let row = result
            .fetch_one()
            .map_err(|e| SourceError::not_found(query, Some(e)))?;
        if row.is_none() {
            tracing::warn!("Query source returned no rows: {}", query);
            return Err(SourceError::not_found(query, None));
        }

        Ok(result
            .column_descriptions()
            .into_iter()
            .map(ColumnDescription::into_pair)
            .collect())
    }

    fn event_timestamp_column(&self) -> &str {
        &self.event_timestamp_column
    }

    fn created_timestamp_column(&self) -> &str {
        &self.created_timestamp_column
    }

    fn date_partition_column(&self) -> &str {
        &self.date_partition_column
    }

    fn field_mapping(&self) -> &HashMap<String, String> {
        &self.field_mapping
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn DataSource) -> Result<bool> {
        match other.as_any().downcast_ref::<IbmDbSource>() {
            Some(other) => Ok(self == other),
            None => Err(SourceError::TypeMismatch(
                "Comparisons should only involve IBMdbSource class objects.".to_string(),
            )),
        }
    }
}

/// Split `[database.]table` on the last `.`
pub fn split_table_ref(table: &str) -> (Option<&str>, &str) {
    match table.rsplit_once('.') {
        Some((database, table_name)) => (Some(database), table_name),
        None => (None, table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver_stats() -> IbmDbSource {
        IbmDbSource::from_table("FEAST.DRIVER_STATS")
            .unwrap()
            .with_event_timestamp_column("EVENT_TIMESTAMP")
            .with_created_timestamp_column("CREATED")
            .with_date_partition_column("EVENT_DATE")
            .with_field_mapping(HashMap::from([(
                "CONV_RATE".to_string(),
                "conv_rate".to_string(),
            )]))
    }

    #[test]
    fn test_requires_table_or_query() {
        assert!(matches!(
            IbmDbSource::new(None, None),
            Err(SourceError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_query_string_prefers_table() {
        let source = IbmDbSource::new(
            Some("FEAST.DRIVER_STATS".to_string()),
            Some("SELECT * FROM OTHER".to_string()),
        )
        .unwrap();
        assert_eq!(source.get_table_query_string(), "`FEAST.DRIVER_STATS`");

        let source = IbmDbSource::from_query("SELECT * FROM OTHER").unwrap();
        assert_eq!(source.get_table_query_string(), "(SELECT * FROM OTHER)");
    }

    #[test]
    fn test_empty_table_is_kept() {
        let source = IbmDbSource::new(Some(String::new()), Some("SELECT 1".to_string())).unwrap();
        assert_eq!(source.table(), Some(""));

        // An empty table name falls through to the query in the FROM fragment
        assert_eq!(source.get_table_query_string(), "(SELECT 1)");

        let query_only = IbmDbSource::from_query("SELECT 1").unwrap();
        assert_ne!(source, query_only);
        assert!(!source.equals(&query_only).unwrap());

        let loaded = IbmDbSource::from_proto(&source.to_proto()).unwrap();
        assert_eq!(loaded, source);
    }

    #[test]
    fn test_envelope_fields() {
        let proto = driver_stats().to_proto();

        assert_eq!(proto.r#type(), SourceType::CustomSource);
        assert_eq!(proto.event_timestamp_column, "EVENT_TIMESTAMP");
        assert_eq!(proto.created_timestamp_column, "CREATED");
        assert_eq!(proto.date_partition_column, "EVENT_DATE");
        assert_eq!(proto.data_source_class_type, IBMDB_SOURCE_CLASS);
        assert_eq!(proto.field_mapping.get("CONV_RATE").unwrap(), "conv_rate");
        assert!(matches!(proto.options, Some(Options::CustomOptions(_))));
    }

    #[test]
    fn test_proto_round_trip() {
        let source = driver_stats();
        let loaded = IbmDbSource::from_proto(&source.to_proto()).unwrap();
        assert_eq!(loaded, source);

        let loaded = IbmDbSource::from_bytes(&source.to_bytes()).unwrap();
        assert_eq!(loaded, source);
    }

    #[test]
    fn test_from_proto_requires_custom_source() {
        let mut proto = driver_stats().to_proto();
        proto.set_type(SourceType::BatchFile);
        assert!(matches!(
            IbmDbSource::from_proto(&proto),
            Err(SourceError::MalformedEnvelope(_))
        ));

        let mut proto = driver_stats().to_proto();
        proto.options = None;
        assert!(matches!(
            IbmDbSource::from_proto(&proto),
            Err(SourceError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            IbmDbSource::from_bytes(&[0x0a, 0xff]),
            Err(SourceError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_equality_per_field() {
        let base = driver_stats();
        assert_eq!(base, base.clone());

        let variants = vec![
            base.clone().with_event_timestamp_column("TS"),
            base.clone().with_created_timestamp_column(""),
            base.clone().with_date_partition_column("DT"),
            base.clone().with_field_mapping(HashMap::new()),
            {
                let mut s = base.clone();
                s.options_mut().set_query(Some("SELECT 1".to_string()));
                s
            },
            {
                let mut s = base.clone();
                s.options_mut().set_table(Some("FEAST.OTHER".to_string()));
                s
            },
        ];

        for variant in variants {
            assert_ne!(variant, base);
            assert!(!base.equals(&variant).unwrap());
        }
    }

    #[test]
    fn test_split_table_ref() {
        assert_eq!(split_table_ref("DRIVER_STATS"), (None, "DRIVER_STATS"));
        assert_eq!(
            split_table_ref("FEAST.DRIVER_STATS"),
            (Some("FEAST"), "DRIVER_STATS")
        );
        assert_eq!(split_table_ref("A.B.C"), (Some("A.B"), "C"));
    }

    #[test]
    fn test_value_type_mapper() {
        let mapper = driver_stats().source_datatype_to_feast_value_type();
        assert_eq!(mapper("BIGINT").unwrap(), ValueType::Int64);
        assert!(mapper("XML").is_err());
    }
}
