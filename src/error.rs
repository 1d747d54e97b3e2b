//! The error taxonomy shared by the reader, parser, and evaluator.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RagnarokError {
    #[error("{0}")]
    ReadError(String),

    #[error("{0}")]
    ParseError(String),

    #[error("no such identifier {0}")]
    UnboundName(String),

    #[error("no such module {0}")]
    UnknownModule(String),

    #[error("{callee} - wrong number of arguments {got}")]
    ArityMismatch { callee: String, got: usize },

    #[error("{primitive} - wrong argument type {kind}")]
    WrongType { primitive: String, kind: String },

    #[error("{0} - malformed list")]
    MalformedList(String),

    #[error("{primitive} - index {index} out of bound")]
    OutOfBounds { primitive: String, index: i64 },

    #[error("value not applicable: {0}")]
    NotApplicable(String),

    #[error("no such key {0}")]
    DictKeyMissing(String),
}

impl RagnarokError {
    pub fn wrong_type(primitive: &str, kind: &str) -> RagnarokError {
        RagnarokError::WrongType { primitive: primitive.to_string(), kind: kind.to_string() }
    }

    pub fn arity(callee: &str, got: usize) -> RagnarokError {
        RagnarokError::ArityMismatch { callee: callee.to_string(), got }
    }
}
