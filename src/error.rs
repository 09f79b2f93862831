use std::io;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_NOT_FOUND: &str = "BLD-NOT-FOUND";
pub const ERR_OPERATION_FAILED: &str = "BLD-OP-FAILED";
pub const ERR_PARSE: &str = "BLD-PARSE";
pub const ERR_IO: &str = "BLD-IO";
pub const ERR_MALFORMED_NODE: &str = "BLD-MALFORMED";
pub const ERR_CONFIG: &str = "BLD-CONFIG";

pub type BuilderResult<T> = Result<T, BuilderError>;

#[derive(Error, Debug)]
pub enum BuilderError {
    /// A node id or parent id did not resolve in the current tree.
    #[error("Node with ID {id} not found")]
    NotFound { id: String },

    /// An internal consistency check failed.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// Serialized tree data or source text was not well-formed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Persistence write failure, passed through from the output sink.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Only raised by the generator in strict mode.
    #[error("Malformed node: {0}")]
    MalformedNode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl BuilderError {
    pub fn not_found(id: impl Into<String>) -> Self {
        BuilderError::NotFound { id: id.into() }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BuilderError::NotFound { .. } => ERR_NOT_FOUND,
            BuilderError::OperationFailed(_) => ERR_OPERATION_FAILED,
            BuilderError::Parse(_) => ERR_PARSE,
            BuilderError::Io(_) => ERR_IO,
            BuilderError::MalformedNode(_) => ERR_MALFORMED_NODE,
            BuilderError::Config(_) => ERR_CONFIG,
        }
    }
}

impl From<serde_json::Error> for BuilderError {
    fn from(err: serde_json::Error) -> Self {
        BuilderError::Parse(err.to_string())
    }
}

#[cfg(feature = "napi")]
impl From<BuilderError> for napi::Error {
    fn from(err: BuilderError) -> Self {
        napi::Error::from_reason(format!("[{}] {}", err.code(), err))
    }
}
