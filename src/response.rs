//! Response wrapper that preserves both the normalized body and raw response details.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// A successful call.
///
/// `data` holds the parsed body after any response case conversion; the raw
/// text, status, headers and latency are kept alongside it.
///
/// # Examples
///
/// ```no_run
/// use rest_resource::{CallParams, ResourceClient};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), rest_resource::Error> {
/// let client = ResourceClient::new("https://api.example.com/users/:id")?;
///
/// let response = client.get(CallParams::new().with("id", 123))?.await?;
/// let user: User = response.json()?;
///
/// println!("User: {}", user.name);
/// println!("Request took {:?}", response.latency);
/// println!("Server: {:?}", response.header("server"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    /// The parsed response body.
    ///
    /// `Null` for an empty body, a string if the body was not JSON.
    pub data: Value,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers, unchanged.
    pub headers: HeaderMap,

    /// Time from submission to the transport reporting completion.
    pub latency: Duration,
}

impl Response {
    /// Creates a new `Response`.
    pub fn new(
        data: Value,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Decodes the (case-converted) body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeserializationFailed`] if the body does not match `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rest_resource::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     serde_json::json!([1, 2, 3]),
    ///     "[1,2,3]".to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(10),
    /// );
    ///
    /// let numbers: Vec<u32> = response.json().unwrap();
    /// assert_eq!(numbers, vec![1, 2, 3]);
    /// ```
    pub fn json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        T::deserialize(&self.data).map_err(|e| {
            tracing::error!(
                error = %e,
                raw_response = %self.raw_body,
                "Failed to deserialize response"
            );

            Error::DeserializationFailed {
                raw_response: self.raw_body.clone(),
                serde_error: e.to_string(),
                status: self.status,
            }
        })
    }

    /// Returns a reference to a header value by name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rest_resource::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::new(
    ///     serde_json::Value::Null,
    ///     String::new(),
    ///     StatusCode::OK,
    ///     headers,
    ///     Duration::from_millis(100),
    /// );
    ///
    /// assert_eq!(
    ///     response.header("content-type").unwrap(),
    ///     "application/json"
    /// );
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Splits the response into its body and headers.
    pub fn into_parts(self) -> (Value, HeaderMap) {
        (self.data, self.headers)
    }
}

impl AsRef<Value> for Response {
    fn as_ref(&self) -> &Value {
        &self.data
    }
}

impl std::ops::Deref for Response {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
