//! Feast IBM DB2 Core - Type vocabularies for the DB2 offline store
//!
//! This crate provides the pieces of the connector that do not touch a database:
//! - The Feast canonical value type enumeration
//! - DB2 / Arrow / Feast type mapping tables and lookups
//! - Error types

pub mod error;
pub mod type_map;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result, TypeVocabulary};
pub use type_map::{
    arrow_to_ibmdb_value_type, arrow_type_name, ibmdb_to_feast_value_type,
    ibmdb_to_pa_value_type, pa_to_ibmdb_value_type,
};
pub use types::ValueType;
