//! Error types for the DB2 type vocabularies

use std::fmt;
use thiserror::Error;

/// The lookup table a type name was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeVocabulary {
    /// DB2 column type names
    Engine,
    /// Arrow type descriptors
    Columnar,
    /// Feast value type names and wire numbers
    Feast,
}

impl fmt::Display for TypeVocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeVocabulary::Engine => write!(f, "DB2"),
            TypeVocabulary::Columnar => write!(f, "Arrow"),
            TypeVocabulary::Feast => write!(f, "Feast value"),
        }
    }
}

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A type name has no entry in the relevant mapping table
    #[error("Unknown {vocabulary} type: {type_name}")]
    UnknownType {
        vocabulary: TypeVocabulary,
        type_name: String,
    },
}

impl CoreError {
    pub(crate) fn unknown(vocabulary: TypeVocabulary, type_name: impl Into<String>) -> Self {
        CoreError::UnknownType {
            vocabulary,
            type_name: type_name.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
