//! Error types for SharePoint integration.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Result type for SharePoint operations.
pub type SharePointResult<T> = Result<T, SharePointError>;

/// Top-level error type for the SharePoint integration.
#[derive(Debug, Error)]
pub enum SharePointError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Authorization error.
    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Resource error.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Quota error.
    #[error("Quota error: {0}")]
    Quota(#[from] QuotaError),

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Server error.
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Response error.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Response shape validation error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Local file system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SharePointError {
    /// Creates a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        SharePointError::Configuration(ConfigurationError::InvalidConfiguration(msg.into()))
    }

    /// Creates an authentication error.
    pub fn authentication(msg: impl Into<String>) -> Self {
        SharePointError::Authentication(AuthenticationError::InvalidToken(msg.into()))
    }

    /// Creates a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        SharePointError::Request(RequestError::ValidationError(msg.into()))
    }

    /// Creates a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        SharePointError::Resource(ResourceError::ItemNotFound(msg.into()))
    }

    /// Creates a deserialization error.
    pub fn deserialization(msg: impl Into<String>) -> Self {
        SharePointError::Response(ResponseError::DeserializationError(msg.into()))
    }

    /// Creates an unexpected format error.
    pub fn unexpected_format(msg: impl Into<String>) -> Self {
        SharePointError::Response(ResponseError::UnexpectedFormat(msg.into()))
    }

    /// Returns true if the error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SharePointError::Quota(QuotaError::TooManyRequests { .. })
                | SharePointError::Network(NetworkError::Timeout(_))
                | SharePointError::Network(NetworkError::ConnectionFailed(_))
                | SharePointError::Server(ServerError::InternalError(_))
                | SharePointError::Server(ServerError::ServiceUnavailable { .. })
                | SharePointError::Server(ServerError::BadGateway(_))
        )
    }

    /// Returns the retry delay hint if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SharePointError::Quota(QuotaError::TooManyRequests { retry_after, .. }) => {
                *retry_after
            }
            SharePointError::Server(ServerError::ServiceUnavailable { retry_after, .. }) => {
                *retry_after
            }
            _ => None,
        }
    }

    /// Returns the HTTP status code if applicable.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            SharePointError::Authentication(_) => Some(StatusCode::UNAUTHORIZED),
            SharePointError::Authorization(_) => Some(StatusCode::FORBIDDEN),
            SharePointError::Request(_) => Some(StatusCode::BAD_REQUEST),
            SharePointError::Resource(ResourceError::ItemNotFound(_)) => {
                Some(StatusCode::NOT_FOUND)
            }
            SharePointError::Resource(ResourceError::AlreadyExists(_)) => {
                Some(StatusCode::CONFLICT)
            }
            SharePointError::Resource(ResourceError::Locked(_)) => Some(StatusCode::LOCKED),
            SharePointError::Quota(QuotaError::TooManyRequests { .. }) => {
                Some(StatusCode::TOO_MANY_REQUESTS)
            }
            SharePointError::Quota(QuotaError::InsufficientStorage(_)) => {
                Some(StatusCode::INSUFFICIENT_STORAGE)
            }
            SharePointError::Server(ServerError::InternalError(_)) => {
                Some(StatusCode::INTERNAL_SERVER_ERROR)
            }
            SharePointError::Server(ServerError::ServiceUnavailable { .. }) => {
                Some(StatusCode::SERVICE_UNAVAILABLE)
            }
            SharePointError::Server(ServerError::BadGateway(_)) => Some(StatusCode::BAD_GATEWAY),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing credentials.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// Invalid token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Expired token.
    #[error("Expired token: {0}")]
    ExpiredToken(String),

    /// Token request failed.
    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),

    /// Invalid client credentials.
    #[error("Invalid client: {0}")]
    InvalidClient(String),
}

/// Authorization errors.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// Forbidden.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Access denied by the service.
    #[error("Access denied: {0}")]
    AccessDenied(String),
}

/// Request errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Missing parameter.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
}

/// Resource errors.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Item not found.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// An item with the same name already exists.
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// The item is locked (checked out or being edited).
    #[error("Resource locked: {0}")]
    Locked(String),
}

/// Quota errors.
#[derive(Debug, Error)]
pub enum QuotaError {
    /// Request throttled.
    #[error("Too many requests: {message}")]
    TooManyRequests {
        /// Error message.
        message: String,
        /// Retry after duration.
        retry_after: Option<Duration>,
    },

    /// Drive storage exhausted.
    #[error("Insufficient storage: {0}")]
    InsufficientStorage(String),
}

/// Network errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Internal error.
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// Service unavailable.
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Error message.
        message: String,
        /// Retry after duration.
        retry_after: Option<Duration>,
    },

    /// Bad gateway.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Any other unexpected status.
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },
}

/// Response errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Unexpected format.
    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors raised while normalizing a raw response object into a shape.
///
/// Each variant names the shape and the remote field involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A required field is absent (or `null`).
    #[error("{shape}: missing required field `{field}`")]
    MissingRequiredField {
        /// Shape being constructed.
        shape: &'static str,
        /// Remote field name.
        field: &'static str,
    },

    /// A field is present but cannot be read as its declared type.
    #[error("{shape}: field `{field}` expected {expected}, found {found}")]
    TypeMismatch {
        /// Shape being constructed.
        shape: &'static str,
        /// Remote field name.
        field: &'static str,
        /// Declared semantic type.
        expected: &'static str,
        /// What was found instead.
        found: String,
    },

    /// Strict derivation could not resolve a derived field.
    #[error("{shape}: cannot derive `{field}`: {reason}")]
    DerivationAmbiguity {
        /// Shape being constructed.
        shape: &'static str,
        /// Normalized name of the derived field.
        field: &'static str,
        /// Why the derivation input was insufficient.
        reason: String,
    },
}

impl SchemaError {
    /// Shape the error was raised for.
    pub fn shape(&self) -> &'static str {
        match self {
            SchemaError::MissingRequiredField { shape, .. }
            | SchemaError::TypeMismatch { shape, .. }
            | SchemaError::DerivationAmbiguity { shape, .. } => shape,
        }
    }

    /// Field the error was raised for.
    pub fn field(&self) -> &'static str {
        match self {
            SchemaError::MissingRequiredField { field, .. }
            | SchemaError::TypeMismatch { field, .. }
            | SchemaError::DerivationAmbiguity { field, .. } => field,
        }
    }
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

impl From<TransportError> for SharePointError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(msg) => SharePointError::Network(NetworkError::Timeout(msg)),
            TransportError::Network(msg) => {
                SharePointError::Network(NetworkError::ConnectionFailed(msg))
            }
            TransportError::Http(msg) | TransportError::Serialization(msg) => {
                SharePointError::Response(ResponseError::UnexpectedFormat(msg))
            }
        }
    }
}
