use thiserror::Error;

use crate::entity::{EntityKind, Scalar};

/// Graph-value text that does not conform to the agtype grammar.
///
/// `line` is 1-based, `column` is the 0-based character offset within that
/// line. `offending_text` is the token at which parsing stopped, or `<EOF>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at {line}:{column} near '{offending_text}': {message}")]
pub struct SyntaxError {
    pub offending_text: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// A vertex, edge or path whose reserved structure is broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {kind}: {reason}")]
pub struct MalformedEntity {
    pub kind: EntityKind,
    pub reason: String,
}

impl MalformedEntity {
    pub fn new(kind: EntityKind, reason: impl Into<String>) -> Self {
        MalformedEntity {
            kind,
            reason: reason.into(),
        }
    }
}

/// A path position that is out of bounds or holds the other element variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("path index {index} does not address a {expected} (path has {len} elements)")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
    pub expected: EntityKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("property[{key}] value[{value}] type is not convertible to {expected_type}")]
    TypeMismatch {
        key: String,
        value: Scalar,
        expected_type: String,
    },

    #[error("cannot project a {0} onto a record")]
    UnsupportedEntity(EntityKind),
}

/// Everything that can go wrong while decoding one graph-value text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnmarshalError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    MalformedEntity(#[from] MalformedEntity),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("column {index}: {source}")]
    Column {
        index: usize,
        source: Box<UnmarshalError>,
    },
}

impl UnmarshalError {
    /// Strip any `Column` wrappers.
    pub fn root_cause(&self) -> &UnmarshalError {
        match self {
            UnmarshalError::Column { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
