//! Per-call request data: parameters, the request descriptor and query building.

use crate::{case::CaseConvention, customizer::Customizer, template::value_to_string, Error};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use url::Url;

/// The reserved parameter key for a per-call customizer. Never sent as a query value.
pub const REQUEST_CUSTOMIZER_KEY: &str = "_requestCustomizer";

/// How a request body is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// `application/json`
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
}

impl RequestType {
    /// The content type sent with a body of this encoding.
    pub fn content_type(&self) -> &'static str {
        match self {
            RequestType::Json => "application/json",
            RequestType::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// Parameters supplied to a single call.
///
/// Entries named by a path placeholder are substituted into the URL; the rest
/// become query parameters. An optional per-call [`Customizer`] travels alongside.
///
/// # Examples
///
/// ```
/// use rest_resource::CallParams;
///
/// let params = CallParams::new().with("id", 5).with("fields", "name,email");
/// assert_eq!(params.get("id"), Some(&serde_json::json!(5)));
/// ```
#[derive(Clone, Default)]
pub struct CallParams {
    values: Map<String, Value>,
    customizer: Option<Customizer>,
}

impl CallParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Attaches a customizer that runs for this call only, after the client-level one.
    pub fn with_customizer(mut self, customizer: Customizer) -> Self {
        self.customizer = Some(customizer);
        self
    }

    /// Inserts a parameter, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Returns a parameter by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The parameter values.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns `true` if a non-null value is present under `key`.
    pub fn has(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(|v| !v.is_null())
    }

    pub(crate) fn into_parts(self) -> (Map<String, Value>, Option<Customizer>) {
        (self.values, self.customizer)
    }
}

impl fmt::Debug for CallParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallParams")
            .field("values", &self.values)
            .field("customizer", &self.customizer)
            .finish()
    }
}

impl From<Map<String, Value>> for CallParams {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
            customizer: None,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for CallParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<Map<String, Value>>()
            .into()
    }
}

/// A request about to be submitted.
///
/// Assembled once per call, handed to customizers for inspection or mutation,
/// then consumed by the transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: Method,
    /// The resolved URL, without the query string.
    pub url: Url,
    /// Query pairs in order. A key appears once per value when arrays repeat.
    pub query: Vec<(String, String)>,
    /// The body, if any. A string body is sent verbatim.
    pub body: Option<Value>,
    /// The declared body encoding.
    pub request_type: RequestType,
    /// Request headers.
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    /// Sets a header, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<(), Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Appends a query pair.
    pub fn push_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Returns the first query value for `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Checks that `body` can be sent URL-encoded.
///
/// Pre-serialized strings go out as-is. Otherwise the body must be an object
/// whose values are strings, numbers or booleans.
pub(crate) fn check_form_body(body: &Value) -> Result<(), Error> {
    match body {
        Value::String(_) => Ok(()),
        Value::Object(fields) => match fields
            .iter()
            .find(|(_, v)| !matches!(v, Value::String(_) | Value::Number(_) | Value::Bool(_)))
        {
            Some((key, _)) => Err(Error::argument(format!(
                "The form field '{}' must be a string, number or boolean",
                key
            ))),
            None => Ok(()),
        },
        _ => Err(Error::argument("A form body must be an object")),
    }
}

/// Turns the unconsumed call parameters into query pairs.
///
/// The reserved customizer key and null values are skipped. Keys go through
/// `case` when set. Arrays expand into one pair per element when `repeat_params`
/// is on, otherwise they are joined with commas.
pub(crate) fn build_query(
    params: &Map<String, Value>,
    case: Option<CaseConvention>,
    repeat_params: bool,
) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(params.len());

    for (key, value) in params {
        if key == REQUEST_CUSTOMIZER_KEY || value.is_null() {
            continue;
        }

        let key = match case {
            Some(case) => case.convert(key),
            None => key.clone(),
        };

        match value {
            Value::Array(items) if repeat_params => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    query.push((key.clone(), value_to_string(item)));
                }
            }
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(value_to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                query.push((key, joined));
            }
            other => query.push((key, value_to_string(other))),
        }
    }

    query
}
