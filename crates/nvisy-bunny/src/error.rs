//! Error types for the Bunny storage adapter.

use crate::capability::Capability;
use crate::range::ByteRange;

/// Result type alias for adapter operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Result type alias for remote client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by [`BunnyStorage`](crate::BunnyStorage).
///
/// Upload failures are collapsed into [`Error::Integrity`]. Every other
/// failure raised by the remote client is passed through as
/// [`Error::Client`] without translation.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// The upload or the cache purge that follows it failed.
    ///
    /// Transport failures, backend rejections and purge failures all end up
    /// here; the underlying cause is kept as the source.
    #[error("integrity check failed for object '{key}'")]
    Integrity {
        /// Key of the object being uploaded.
        key: String,
        /// Underlying client failure.
        #[source]
        source: ClientError,
    },

    /// Failure reported by the remote object client, unchanged.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The object key is empty.
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// The byte range has `start > end`.
    #[error("invalid byte range: start {start} is past end {end}")]
    InvalidRange {
        /// Requested start offset.
        start: u64,
        /// Requested end offset.
        end: u64,
    },

    /// The operation needs a capability the backend lacks and strict
    /// capability checking is enabled.
    #[error("{0} is not supported by the bunny storage backend")]
    Unsupported(Capability),

    /// Invalid configuration or HTTP client construction failure.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wraps a client failure from the upload path.
    pub(crate) fn integrity(key: impl Into<String>, source: ClientError) -> Self {
        Self::Integrity {
            key: key.into(),
            source,
        }
    }

    /// Returns whether this is an upload integrity failure.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }

    /// Returns whether the client reported a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client(ClientError::NotFound { .. }))
    }

    /// Returns whether the client rejected the requested byte range.
    pub fn is_range_not_satisfiable(&self) -> bool {
        matches!(self, Self::Client(ClientError::RangeNotSatisfiable { .. }))
    }

    /// Returns whether the operation was refused for lack of a capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// Errors raised by an [`ObjectClient`](crate::client::ObjectClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No object is stored under the key.
    #[error("object not found: {key}")]
    NotFound {
        /// Requested key.
        key: String,
    },

    /// The backend refused the requested byte range.
    #[error("range {range} not satisfiable for object {key}")]
    RangeNotSatisfiable {
        /// Requested key.
        key: String,
        /// Requested range.
        range: ByteRange,
    },

    /// The access key or API key was rejected.
    #[error("access denied for object {key}")]
    Unauthorized {
        /// Requested key.
        key: String,
    },

    /// Any other non-success response.
    #[error("storage responded with {status} for object {key}: {message}")]
    Status {
        /// Requested key.
        key: String,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// HTTP transport failure (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// I/O failure while reading an upload body.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
