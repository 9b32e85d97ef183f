//! Feast canonical value types
//!
//! The `ValueType` enum is the closed set of feature data types the Feast
//! framework understands, independent of any storage engine. Discriminants
//! match the numbers Feast uses on the wire.

use crate::error::{CoreError, Result, TypeVocabulary};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feast value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum ValueType {
    Unknown = 0,
    Bytes = 1,
    String = 2,
    Int32 = 3,
    Int64 = 4,
    Double = 5,
    Float = 6,
    Bool = 7,
    UnixTimestamp = 8,
    BytesList = 11,
    StringList = 12,
    Int32List = 13,
    Int64List = 14,
    DoubleList = 15,
    FloatList = 16,
    BoolList = 17,
    UnixTimestampList = 18,
    Null = 19,
}

const ALL: [ValueType; 18] = [
    ValueType::Unknown,
    ValueType::Bytes,
    ValueType::String,
    ValueType::Int32,
    ValueType::Int64,
    ValueType::Double,
    ValueType::Float,
    ValueType::Bool,
    ValueType::UnixTimestamp,
    ValueType::BytesList,
    ValueType::StringList,
    ValueType::Int32List,
    ValueType::Int64List,
    ValueType::DoubleList,
    ValueType::FloatList,
    ValueType::BoolList,
    ValueType::UnixTimestampList,
    ValueType::Null,
];

impl ValueType {
    /// Upper-case name as Feast spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Unknown => "UNKNOWN",
            ValueType::Bytes => "BYTES",
            ValueType::String => "STRING",
            ValueType::Int32 => "INT32",
            ValueType::Int64 => "INT64",
            ValueType::Double => "DOUBLE",
            ValueType::Float => "FLOAT",
            ValueType::Bool => "BOOL",
            ValueType::UnixTimestamp => "UNIX_TIMESTAMP",
            ValueType::BytesList => "BYTES_LIST",
            ValueType::StringList => "STRING_LIST",
            ValueType::Int32List => "INT32_LIST",
            ValueType::Int64List => "INT64_LIST",
            ValueType::DoubleList => "DOUBLE_LIST",
            ValueType::FloatList => "FLOAT_LIST",
            ValueType::BoolList => "BOOL_LIST",
            ValueType::UnixTimestampList => "UNIX_TIMESTAMP_LIST",
            ValueType::Null => "NULL",
        }
    }

    /// Resolve a Feast wire number
    pub fn from_i32(value: i32) -> Result<Self> {
        ALL.iter()
            .copied()
            .find(|t| *t as i32 == value)
            .ok_or_else(|| CoreError::unknown(TypeVocabulary::Feast, value.to_string()))
    }

    /// Element type of a list type, or `None` for scalars
    pub fn element_type(&self) -> Option<ValueType> {
        match self {
            ValueType::BytesList => Some(ValueType::Bytes),
            ValueType::StringList => Some(ValueType::String),
            ValueType::Int32List => Some(ValueType::Int32),
            ValueType::Int64List => Some(ValueType::Int64),
            ValueType::DoubleList => Some(ValueType::Double),
            ValueType::FloatList => Some(ValueType::Float),
            ValueType::BoolList => Some(ValueType::Bool),
            ValueType::UnixTimestampList => Some(ValueType::UnixTimestamp),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        ALL.iter()
            .copied()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| CoreError::unknown(TypeVocabulary::Feast, s))
    }
}
