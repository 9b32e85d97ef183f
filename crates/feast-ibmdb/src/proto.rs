//! Protobuf wire types
//!
//! `DataSourceProto` mirrors the generic Feast data source envelope (only the
//! arms this crate needs to recognise). `IbmDbOptionsProto` is the payload a
//! DB2 source stores in `custom_options.configuration`.

use prost::Message;
use std::collections::HashMap;

/// Current version of [`IbmDbOptionsProto`]
pub const IBMDB_OPTIONS_VERSION: u32 = 1;

/// Generic data source envelope
#[derive(Clone, PartialEq, Message)]
pub struct DataSourceProto {
    #[prost(enumeration = "data_source_proto::SourceType", tag = "1")]
    pub r#type: i32,

    #[prost(map = "string, string", tag = "2")]
    pub field_mapping: HashMap<String, String>,

    #[prost(string, tag = "3")]
    pub event_timestamp_column: String,

    #[prost(string, tag = "4")]
    pub date_partition_column: String,

    #[prost(string, tag = "5")]
    pub created_timestamp_column: String,

    /// Fully qualified class of the source that wrote a custom envelope
    #[prost(string, tag = "17")]
    pub data_source_class_type: String,

    #[prost(oneof = "data_source_proto::Options", tags = "11, 12, 16")]
    pub options: Option<data_source_proto::Options>,
}

pub mod data_source_proto {
    use prost::{Enumeration, Message, Oneof};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
    #[repr(i32)]
    pub enum SourceType {
        Invalid = 0,
        BatchFile = 1,
        BatchBigquery = 2,
        StreamKafka = 3,
        StreamKinesis = 4,
        BatchRedshift = 5,
        CustomSource = 6,
        BatchSnowflake = 8,
    }

    #[derive(Clone, PartialEq, Oneof)]
    pub enum Options {
        #[prost(message, tag = "11")]
        FileOptions(FileOptions),

        #[prost(message, tag = "12")]
        BigqueryOptions(BigQueryOptions),

        #[prost(message, tag = "16")]
        CustomOptions(CustomSourceOptions),
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FileOptions {
        #[prost(string, tag = "2")]
        pub file_url: String,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct BigQueryOptions {
        #[prost(string, tag = "1")]
        pub table_ref: String,

        #[prost(string, tag = "2")]
        pub query: String,
    }

    /// Options for sources defined outside of Feast itself
    #[derive(Clone, PartialEq, Message)]
    pub struct CustomSourceOptions {
        /// Source-specific payload
        #[prost(bytes = "vec", tag = "1")]
        pub configuration: Vec<u8>,
    }
}

/// Table/query reference of a DB2 source
#[derive(Clone, PartialEq, Message)]
pub struct IbmDbOptionsProto {
    #[prost(uint32, tag = "1")]
    pub version: u32,

    #[prost(string, optional, tag = "2")]
    pub table: Option<String>,

    #[prost(string, optional, tag = "3")]
    pub query: Option<String>,
}
