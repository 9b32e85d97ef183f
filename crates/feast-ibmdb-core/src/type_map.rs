//! DB2 type mapping
//!
//! Three lookups connect the vocabularies the connector deals with:
//! - DB2 column type name -> Feast [`ValueType`]
//! - Arrow type string -> DB2 column type name
//! - DB2 column type name -> Arrow [`DataType`]
//!
//! Every input is lower-cased before lookup. A name that is not in the table
//! is an error; nothing falls back to a default type.

use crate::error::{CoreError, Result, TypeVocabulary};
use crate::types::ValueType;
use arrow_schema::{DataType, TimeUnit};
use std::collections::HashMap;
use std::sync::OnceLock;

const ENGINE_TO_VALUE_TYPE: &[(&str, ValueType)] = &[
    ("smallint", ValueType::Int32),
    ("int", ValueType::Int32),
    ("integer", ValueType::Int32),
    ("bigint", ValueType::Int64),
    ("real", ValueType::Float),
    ("double", ValueType::Double),
    ("numeric", ValueType::Double),
    ("timestamp", ValueType::UnixTimestamp),
    ("string", ValueType::String),
    ("varchar", ValueType::String),
    ("char", ValueType::String),
    ("boolean", ValueType::Bool),
];

const COLUMNAR_TO_ENGINE: &[(&str, &str)] = &[
    ("null", "null"),
    ("bool", "boolean"),
    ("int8", "tinyint"),
    ("int16", "smallint"),
    ("int32", "int"),
    ("int64", "bigint"),
    ("uint8", "smallint"),
    ("uint16", "int"),
    ("uint32", "bigint"),
    ("uint64", "decimal"),
    ("float", "float"),
    ("double", "double"),
    ("binary", "binary"),
    ("string", "string"),
];

fn engine_to_value_type() -> &'static HashMap<&'static str, ValueType> {
    static TABLE: OnceLock<HashMap<&'static str, ValueType>> = OnceLock::new();
    TABLE.get_or_init(|| ENGINE_TO_VALUE_TYPE.iter().copied().collect())
}

fn columnar_to_engine() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| COLUMNAR_TO_ENGINE.iter().copied().collect())
}

// TODO: add decimal once precision/scale are carried through column descriptions
fn engine_to_arrow() -> &'static HashMap<&'static str, DataType> {
    static TABLE: OnceLock<HashMap<&'static str, DataType>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("null", DataType::Null),
            ("boolean", DataType::Boolean),
            ("timestamp", DataType::Timestamp(TimeUnit::Microsecond, None)),
            ("date", DataType::Date32),
            ("smallint", DataType::Int16),
            ("int", DataType::Int32),
            ("bigint", DataType::Int64),
            ("float", DataType::Float32),
            ("double", DataType::Float64),
            ("binary", DataType::Binary),
            ("string", DataType::Utf8),
            ("varchar", DataType::Utf8),
        ])
    })
}

/// Map a DB2 column type name to a Feast value type
///
/// # Examples
///
/// ```rust
/// use feast_ibmdb_core::{ibmdb_to_feast_value_type, ValueType};
///
/// assert_eq!(ibmdb_to_feast_value_type("BIGINT").unwrap(), ValueType::Int64);
/// assert!(ibmdb_to_feast_value_type("hyperloglog").is_err());
/// ```
pub fn ibmdb_to_feast_value_type(ibmdb_type: &str) -> Result<ValueType> {
    let key = ibmdb_type.to_lowercase();
    engine_to_value_type()
        .get(key.as_str())
        .copied()
        .ok_or_else(|| CoreError::unknown(TypeVocabulary::Engine, ibmdb_type))
}

/// Map an Arrow type string (as rendered by [`arrow_type_name`]) to a DB2 type name
///
/// Parameterized types are matched by prefix before the exact-match table:
/// timestamps and dates collapse to their base DB2 type, decimals keep their
/// precision and scale verbatim, and dictionary-encoded strings become strings.
pub fn pa_to_ibmdb_value_type(pa_type: &str) -> Result<String> {
    let pa_type = pa_type.to_lowercase();

    if pa_type.starts_with("timestamp") {
        return Ok("timestamp".to_string());
    }

    if pa_type.starts_with("date") {
        return Ok("date".to_string());
    }

    if pa_type.starts_with("decimal") {
        return Ok(pa_type);
    }

    if pa_type.starts_with("dictionary<values=string,") {
        return Ok("string".to_string());
    }

    columnar_to_engine()
        .get(pa_type.as_str())
        .map(|t| t.to_string())
        .ok_or_else(|| CoreError::unknown(TypeVocabulary::Columnar, pa_type))
}

/// Map a DB2 column type name to the Arrow type used for batch transfer
pub fn ibmdb_to_pa_value_type(ibmdb_type: &str) -> Result<DataType> {
    let key = ibmdb_type.to_lowercase();
    engine_to_arrow()
        .get(key.as_str())
        .cloned()
        .ok_or_else(|| CoreError::unknown(TypeVocabulary::Engine, ibmdb_type))
}

/// Render an Arrow type in the string vocabulary [`pa_to_ibmdb_value_type`] reads
///
/// The spelling follows the Arrow C++/Python type names (`int64`,
/// `timestamp[us]`, `decimal128(10, 2)`), which is what the Feast host sends.
pub fn arrow_type_name(data_type: &DataType) -> Result<String> {
    let name = match data_type {
        DataType::Null => "null".to_string(),
        DataType::Boolean => "bool".to_string(),
        DataType::Int8 => "int8".to_string(),
        DataType::Int16 => "int16".to_string(),
        DataType::Int32 => "int32".to_string(),
        DataType::Int64 => "int64".to_string(),
        DataType::UInt8 => "uint8".to_string(),
        DataType::UInt16 => "uint16".to_string(),
        DataType::UInt32 => "uint32".to_string(),
        DataType::UInt64 => "uint64".to_string(),
        DataType::Float16 => "halffloat".to_string(),
        DataType::Float32 => "float".to_string(),
        DataType::Float64 => "double".to_string(),
        DataType::Binary => "binary".to_string(),
        DataType::LargeBinary => "large_binary".to_string(),
        DataType::Utf8 => "string".to_string(),
        DataType::LargeUtf8 => "large_string".to_string(),
        DataType::Date32 => "date32[day]".to_string(),
        DataType::Date64 => "date64[ms]".to_string(),
        DataType::Timestamp(unit, None) => format!("timestamp[{}]", time_unit_suffix(unit)),
        DataType::Timestamp(unit, Some(tz)) => {
            format!("timestamp[{}, tz={}]", time_unit_suffix(unit), tz)
        }
        DataType::Decimal128(precision, scale) => format!("decimal128({}, {})", precision, scale),
        DataType::Decimal256(precision, scale) => format!("decimal256({}, {})", precision, scale),
        DataType::Dictionary(key, value) => format!(
            "dictionary<values={}, indices={}, ordered=0>",
            arrow_type_name(value)?,
            arrow_type_name(key)?
        ),
        other => {
            return Err(CoreError::unknown(
                TypeVocabulary::Columnar,
                other.to_string(),
            ))
        }
    };
    Ok(name)
}

/// Map an Arrow type to a DB2 type name
pub fn arrow_to_ibmdb_value_type(data_type: &DataType) -> Result<String> {
    pa_to_ibmdb_value_type(&arrow_type_name(data_type)?)
}

/// DB2 type names that resolve to a Feast value type
pub fn engine_type_names() -> impl Iterator<Item = &'static str> {
    ENGINE_TO_VALUE_TYPE.iter().map(|(name, _)| *name)
}

fn time_unit_suffix(unit: &TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "s",
        TimeUnit::Millisecond => "ms",
        TimeUnit::Microsecond => "us",
        TimeUnit::Nanosecond => "ns",
    }
}
