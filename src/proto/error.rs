use std::io;

use thiserror::Error;

/// Result type alias for driver level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a Redis server.
///
/// This is the root error carried by
/// [`RedisError::RedisError`](crate::types::RedisError::RedisError).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An IO error occurred.
    #[error("IO error: {source}")]
    Io {
        /// The underlying IO error.
        #[from]
        source: io::Error,
    },

    /// A protocol error occurred.
    #[error("protocol error: {message}")]
    Protocol {
        /// Description of the error.
        message: String,
    },

    /// The server returned an error.
    #[error("server error: {message}")]
    Server {
        /// Error message from server.
        message: String,
    },

    /// Authentication failed.
    #[error("authentication failed: {message}")]
    Auth {
        /// Error message from server.
        message: String,
    },

    /// Invalid argument provided.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of invalid argument.
        message: String,
    },

    /// Decoding failed.
    #[error("decode error: {source}")]
    Decode {
        /// Underlying decode error.
        #[from]
        source: DecodeError,
    },

    /// A connect, read or write did not finish in the configured time.
    #[error("operation timed out")]
    Timeout,

    /// The reply could not be converted into the requested type.
    #[error("response type not compatible: {message}")]
    TypeMismatch {
        /// Description of the mismatch.
        message: String,
    },
}

impl Error {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Error::Protocol {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        Error::TypeMismatch {
            message: message.into(),
        }
    }

    pub(crate) fn server(message: &[u8]) -> Self {
        Error::Server {
            message: String::from_utf8_lossy(message).into_owned(),
        }
    }

    /// Returns true if the error means the connection can no longer be used.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Error::Io { .. } | Error::Protocol { .. } | Error::Decode { .. } | Error::Timeout
        )
    }
}

/// Error returned when the byte stream is not valid RESP.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Creates a new decode error with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
