//! Error types for resource calls.
//!
//! Two kinds of failure exist. Precondition violations (a missing endpoint, a
//! missing body, a missing id) surface synchronously as [`Error`] before any
//! request is made. Failures reported by the transport surface asynchronously,
//! exactly once per call, as an [`ApiError`].

use http::{Method, StatusCode};
use std::fmt;
use std::sync::Arc;

/// The error type for synchronous faults raised while building a client or a call.
///
/// # Examples
///
/// ```
/// use rest_resource::{Error, ResourceClient};
///
/// let result = ResourceClient::new("");
/// assert!(matches!(result, Err(Error::Argument(_))));
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A call or constructor precondition was violated.
    ///
    /// This is always returned directly from the method that was called and is
    /// never delivered through a pending handle or a callback.
    #[error("ArgumentError: {0}")]
    Argument(String),

    /// Invalid configuration was provided.
    ///
    /// This covers unknown case names, invalid header names or values and an
    /// unusable proxy URL.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The endpoint template is not a valid absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Failed to decode a response body into the requested type.
    ///
    /// # Fields
    ///
    /// * `raw_response` - The raw response body as a string
    /// * `serde_error` - The error message from serde
    /// * `status` - The HTTP status code
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A normalized API failure, so callers can use `?` across both channels.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Returns `true` for argument faults.
    pub fn is_argument(&self) -> bool {
        matches!(self, Error::Argument(_))
    }

    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Error::Argument(message.into())
    }
}

/// A specialized `Result` type for synchronous faults.
pub type Result<T> = std::result::Result<T, Error>;

/// The code attached to a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// The transport received a response with this status.
    Http(StatusCode),
    /// The transport failed before a status was available, e.g. `"connect"`.
    Transport(String),
}

impl ErrorCode {
    /// Returns the HTTP status, if the failure carried one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ErrorCode::Http(status) => Some(*status),
            ErrorCode::Transport(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Http(status) => write!(f, "{}", status.as_u16()),
            ErrorCode::Transport(code) => f.write_str(code),
        }
    }
}

/// The method and URL of the call that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// The HTTP method of the failed call.
    pub method: Method,
    /// The request URL, without the query string.
    pub url: String,
}

/// A failed call, normalized from whatever the transport reported.
///
/// Created exactly once per failed call, either by the default constructor or
/// by a configured [`ErrorFactory`].
///
/// # Examples
///
/// ```no_run
/// use rest_resource::{CallParams, ResourceClient};
///
/// # async fn example() -> Result<(), rest_resource::Error> {
/// let client = ResourceClient::new("https://api.example.com/users/:id")?;
///
/// match client.get(CallParams::new().with("id", 7))?.await {
///     Ok(response) => println!("user: {}", response.data),
///     Err(err) => eprintln!("{} ({:?}): {}", err.name, err.status_code, err.message),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug, Clone)]
#[error("{name}: {message}")]
pub struct ApiError {
    /// The error name, resolved through the error formatter.
    pub name: String,
    /// The error message, resolved through the error formatter.
    pub message: String,
    /// The transport status, or a transport error code when no status exists.
    pub status_code: Option<ErrorCode>,
    /// The method and URL of the failed call.
    pub request_info: RequestInfo,
    /// The failure as reported before normalization.
    #[source]
    pub original_error: Arc<dyn std::error::Error + Send + Sync>,
}

impl ApiError {
    /// Returns the HTTP status of the failure, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.status_code.as_ref().and_then(ErrorCode::status)
    }
}

/// Builds the [`ApiError`] for a failed call.
///
/// The factory receives the same five values the default constructor does and
/// may rewrite any of them.
pub trait ErrorFactory: Send + Sync {
    /// Constructs the error delivered to the caller.
    fn build(
        &self,
        name: String,
        message: String,
        status_code: Option<ErrorCode>,
        request_info: RequestInfo,
        original_error: Arc<dyn std::error::Error + Send + Sync>,
    ) -> ApiError;
}

/// The standard constructor: stores the five values unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorFactory;

impl ErrorFactory for DefaultErrorFactory {
    fn build(
        &self,
        name: String,
        message: String,
        status_code: Option<ErrorCode>,
        request_info: RequestInfo,
        original_error: Arc<dyn std::error::Error + Send + Sync>,
    ) -> ApiError {
        ApiError {
            name,
            message,
            status_code,
            request_info,
            original_error,
        }
    }
}

impl<F> ErrorFactory for F
where
    F: Fn(
            String,
            String,
            Option<ErrorCode>,
            RequestInfo,
            Arc<dyn std::error::Error + Send + Sync>,
        ) -> ApiError
        + Send
        + Sync,
{
    fn build(
        &self,
        name: String,
        message: String,
        status_code: Option<ErrorCode>,
        request_info: RequestInfo,
        original_error: Arc<dyn std::error::Error + Send + Sync>,
    ) -> ApiError {
        self(name, message, status_code, request_info, original_error)
    }
}
