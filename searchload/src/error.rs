use crate::operation::{EntityKind, Operation};

/// Boxed source error used by transports, which may sit on any HTTP stack.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong between picking an operation and returning its
/// [`Statistics`](crate::Statistics).
///
/// A non-2xx response is **not** an error: the status code is reported as data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported operation: {operation} on {entity}")]
    UnsupportedOperation {
        operation: Operation,
        entity: EntityKind,
    },

    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    #[error("failed to read response body: {0}")]
    BodyRead(#[source] BoxError),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("invalid cluster address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build client: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Short, stable label for counting failures by kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UnsupportedOperation { .. } => "unsupported_operation",
            Error::Transport(_) => "transport",
            Error::BodyRead(_) => "body_read",
            Error::Encode(_) => "encode",
            Error::UnknownOperation(_) => "unknown_operation",
            Error::InvalidAddress { .. } => "invalid_address",
            Error::Connect(_) => "connect",
            Error::Config(_) => "config",
        }
    }

    pub(crate) fn transport(source: impl Into<BoxError>) -> Self {
        Error::Transport(source.into())
    }

    pub(crate) fn body_read(source: impl Into<BoxError>) -> Self {
        Error::BodyRead(source.into())
    }
}
