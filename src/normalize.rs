//! Turns transport outcomes into a [`Response`] or an [`ApiError`].

use crate::{
    case::CaseConvention,
    customizer::CustomizerError,
    error::{ApiError, ErrorCode, ErrorFactory, RequestInfo},
    template::value_to_string,
    transport::{TransportError, TransportResponse},
    Response,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The name given to errors when nothing else resolves.
pub const DEFAULT_ERROR_NAME: &str = "APIError";

/// The name given to calls aborted by a customizer.
pub const CUSTOMIZER_ERROR_NAME: &str = "CustomizerError";

/// Where to find an error field in a failure body.
#[derive(Clone)]
pub enum ErrorField {
    /// A dotted path such as `error.details.0.message`. Numeric segments index arrays.
    Path(String),
    /// A function of the parsed body.
    Func(Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>),
}

impl ErrorField {
    /// Wraps a function of the parsed failure body.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        ErrorField::Func(Arc::new(f))
    }

    fn extract(&self, body: &Value) -> Option<Value> {
        match self {
            ErrorField::Path(path) => lookup_path(path, body).cloned(),
            ErrorField::Func(f) => f(body),
        }
    }
}

impl From<&str> for ErrorField {
    fn from(path: &str) -> Self {
        ErrorField::Path(path.to_string())
    }
}

impl From<String> for ErrorField {
    fn from(path: String) -> Self {
        ErrorField::Path(path)
    }
}

impl fmt::Debug for ErrorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorField::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ErrorField::Func(_) => f.write_str("Func"),
        }
    }
}

/// Rules for extracting an error's name and message from a failure body.
///
/// Each field is tried in order: the extractor, then the fallbacks, then the
/// built-in default (`"APIError"` for the name, the transport message for the
/// message).
///
/// # Examples
///
/// ```
/// use rest_resource::ErrorFormatter;
///
/// let formatter = ErrorFormatter::new()
///     .name("error.type")
///     .message("error.message")
///     .name_fallback("RemoteError");
/// # let _ = formatter;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorFormatter {
    name: Option<ErrorField>,
    message: Option<ErrorField>,
    name_fallbacks: Vec<String>,
    message_fallbacks: Vec<String>,
}

impl ErrorFormatter {
    /// A formatter with no rules: every error is `"APIError"` with the transport message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule for the error name.
    pub fn name(mut self, field: impl Into<ErrorField>) -> Self {
        self.name = Some(field.into());
        self
    }

    /// Sets the rule for the error message.
    pub fn message(mut self, field: impl Into<ErrorField>) -> Self {
        self.message = Some(field.into());
        self
    }

    /// Adds a literal name used when the rule yields nothing.
    pub fn name_fallback(mut self, name: impl Into<String>) -> Self {
        self.name_fallbacks.push(name.into());
        self
    }

    /// Adds a literal message used when the rule yields nothing.
    pub fn message_fallback(mut self, message: impl Into<String>) -> Self {
        self.message_fallbacks.push(message.into());
        self
    }
}

/// Follows a dotted path through objects and arrays.
///
/// # Examples
///
/// ```
/// use rest_resource::lookup_path;
/// use serde_json::json;
///
/// let body = json!({ "abc": { "def": [{ "g": true }] } });
/// assert_eq!(lookup_path("abc.def.0.g", &body), Some(&json!(true)));
/// assert_eq!(lookup_path("abc.missing", &body), None);
/// ```
pub fn lookup_path<'a>(path: &str, value: &'a Value) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Resolves one error field to a string.
///
/// A null or absent value counts as unresolved, and the first fallback is used.
/// Objects and arrays are rendered as JSON text.
pub fn resolve_error_field<S: AsRef<str>>(
    field: Option<&ErrorField>,
    body: &Value,
    fallbacks: &[S],
) -> Option<String> {
    field
        .and_then(|f| f.extract(body))
        .filter(|v| !v.is_null())
        .map(|v| value_to_string(&v))
        .or_else(|| fallbacks.first().map(|s| s.as_ref().to_string()))
}

/// Parses a raw body: empty is `Null`, JSON is decoded, anything else stays text.
pub(crate) fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Normalizes a successful transport response.
pub(crate) fn normalize_success(
    response: TransportResponse,
    case: Option<CaseConvention>,
    latency: Duration,
) -> Response {
    let mut data = parse_body(&response.body);
    if let Some(case) = case {
        data = case.convert_value(data);
    }

    Response::new(data, response.body, response.status, response.headers, latency)
}

/// Normalizes a transport failure.
pub(crate) fn normalize_failure(
    error: TransportError,
    formatter: &ErrorFormatter,
    factory: &dyn ErrorFactory,
    request_info: RequestInfo,
) -> ApiError {
    let body = error.body.clone().unwrap_or(Value::Null);

    let name = resolve_error_field(
        formatter.name.as_ref(),
        &body,
        formatter.name_fallbacks.as_slice(),
    )
    .unwrap_or_else(|| DEFAULT_ERROR_NAME.to_string());
    let message = resolve_error_field(
        formatter.message.as_ref(),
        &body,
        formatter.message_fallbacks.as_slice(),
    )
    .unwrap_or_else(|| error.message.clone());

    let status_code = error
        .status
        .map(ErrorCode::Http)
        .or_else(|| error.code.clone().map(ErrorCode::Transport));

    factory.build(name, message, status_code, request_info, Arc::new(error))
}

/// Normalizes a call aborted by a customizer.
pub(crate) fn customizer_failure(
    error: CustomizerError,
    factory: &dyn ErrorFactory,
    request_info: RequestInfo,
) -> ApiError {
    factory.build(
        CUSTOMIZER_ERROR_NAME.to_string(),
        error.to_string(),
        None,
        request_info,
        Arc::from(error),
    )
}
