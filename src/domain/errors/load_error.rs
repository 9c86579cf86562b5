//! Image load error types.

use thiserror::Error;

/// Failure raised by a transport before any response was received.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to read local resource: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported URL scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("transport failure: {message}")]
    Other { message: String },
}

impl TransportError {
    /// Creates a transport error from a free-form message.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Returns whether the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout(),
            Self::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

/// Failure to decode bytes into an image.
#[derive(Debug, Error)]
#[error("failed to decode image: {message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Creates a decode error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a single `load` call failed.
///
/// Every variant is terminal for the call and leaves the cache untouched.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum LoadError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid response")]
    InvalidResponse,

    #[error("invalid response code: {code}")]
    InvalidStatus { code: u16 },

    #[error("invalid data")]
    InvalidData,
}

impl LoadError {
    /// Creates an invalid status error.
    #[must_use]
    pub const fn invalid_status(code: u16) -> Self {
        Self::InvalidStatus { code }
    }

    /// Returns the status code carried by [`LoadError::InvalidStatus`].
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::InvalidStatus { code } => Some(*code),
            _ => None,
        }
    }

    /// Returns whether the caller may retry the load later.
    ///
    /// All load failures are per-call; none poison the loader or the cache.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        true
    }

    /// Returns whether the failure happened before a response arrived.
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
