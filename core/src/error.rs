use std::fmt;
use thiserror::Error;

/// The error type for signing operations.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request can't be canonicalized: empty method, header names with
    /// control characters, unparseable URL and so on.
    MalformedRequest,

    /// The payload sentinel or precomputed payload hash is not recognized.
    UnsupportedBody,

    /// Credentials exist but are empty or malformed.
    InvalidCredentials,

    /// The requested digest/HMAC pair is not part of the supported set.
    UnsupportedAlgorithm,

    /// No signing timestamp was supplied.
    MissingTimestamp,

    /// Presigning was asked for with a non-positive expiry.
    InvalidExpiry,

    /// Configuration error (missing region/service, invalid values).
    ConfigInvalid,

    /// A received signature doesn't match the one computed locally.
    SignatureMismatch,

    /// A received request carries a timestamp too far from the verifier's clock.
    RequestTimeSkewed,

    /// Unexpected errors.
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this error is caused by the request the caller supplied.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedRequest | ErrorKind::UnsupportedBody
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a malformed request error
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRequest, message)
    }

    /// Create an unsupported body error
    pub fn unsupported_body(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedBody, message)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedAlgorithm, message)
    }

    /// Create a missing timestamp error
    pub fn missing_timestamp(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingTimestamp, message)
    }

    /// Create an invalid expiry error
    pub fn invalid_expiry(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidExpiry, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a signature mismatch error
    pub fn signature_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignatureMismatch, message)
    }

    /// Create a request time skewed error
    pub fn request_time_skewed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestTimeSkewed, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedRequest => write!(f, "malformed request"),
            ErrorKind::UnsupportedBody => write!(f, "unsupported body"),
            ErrorKind::InvalidCredentials => write!(f, "invalid credentials"),
            ErrorKind::UnsupportedAlgorithm => write!(f, "unsupported algorithm"),
            ErrorKind::MissingTimestamp => write!(f, "missing timestamp"),
            ErrorKind::InvalidExpiry => write!(f, "invalid expiry"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::SignatureMismatch => write!(f, "signature mismatch"),
            ErrorKind::RequestTimeSkewed => write!(f, "request time skewed"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
