//! Type system shared with the Feast host
//!
//! This module contains the canonical value type enumeration features are
//! declared with. DB2 and Arrow types are resolved to it by [`crate::type_map`].

pub mod value_type;

pub use value_type::ValueType;
