//! Client options.
//!
//! [`Options`] is the plain-data part of the configuration and can be
//! deserialized, e.g. from a JSON config file:
//!
//! ```
//! use rest_resource::Options;
//!
//! let options: Options = serde_json::from_str(r#"{
//!     "query": { "convertCase": "snakeCase", "repeatParams": false },
//!     "request": { "body": { "convertCase": "snakeCase" }, "type": "form" },
//!     "response": { "body": { "convertCase": "camelCase" } },
//!     "headers": { "x-api-version": "2" },
//!     "keepAlive": true
//! }"#).unwrap();
//!
//! assert!(!options.query.repeat_params);
//! ```
//!
//! Functions (customizers, error rules, error factories, a custom transport)
//! are set on the [`ClientBuilder`](crate::ClientBuilder).

use crate::{
    case::{self, CaseConvention},
    customizer::Customizer,
    error::ErrorFactory,
    metadata::RequestType,
    normalize::ErrorFormatter,
    template::EndpointTemplate,
    transport::Transport,
    Error, Result,
};
use http::{header::ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Plain-data client options. Defaults leave all conversions off and repeat array query keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Query string options.
    pub query: QueryOptions,
    /// Outgoing request options.
    pub request: RequestOptions,
    /// Incoming response options.
    pub response: ResponseOptions,
    /// Headers sent with every request.
    pub headers: BTreeMap<String, String>,
    /// Proxy URL for every request.
    pub proxy: Option<String>,
    /// Keep connections alive between calls.
    pub keep_alive: bool,
}

/// Query string options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryOptions {
    /// Case name applied to query keys.
    pub convert_case: Option<String>,
    /// Send arrays as repeated keys (`a=1&a=2`) rather than `a=1,2`.
    pub repeat_params: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            convert_case: None,
            repeat_params: true,
        }
    }
}

/// Outgoing request options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Body options.
    pub body: BodyOptions,
    /// Body encoding.
    #[serde(rename = "type")]
    pub request_type: RequestType,
}

/// Incoming response options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResponseOptions {
    /// Body options.
    pub body: BodyOptions,
}

/// Body key conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyOptions {
    /// Case name applied to top-level body keys.
    pub convert_case: Option<String>,
}

/// The resolved, immutable configuration shared by every call on one client.
pub(crate) struct ClientConfig {
    pub(crate) template: EndpointTemplate,
    pub(crate) query_case: Option<CaseConvention>,
    pub(crate) repeat_params: bool,
    pub(crate) request_body_case: Option<CaseConvention>,
    pub(crate) response_body_case: Option<CaseConvention>,
    pub(crate) request_type: RequestType,
    pub(crate) headers: HeaderMap,
    pub(crate) customizer: Option<Customizer>,
    pub(crate) error_formatter: ErrorFormatter,
    pub(crate) error_factory: Arc<dyn ErrorFactory>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl ClientConfig {
    /// Validates `options` and combines them with the non-data capabilities.
    pub(crate) fn resolve(
        template: EndpointTemplate,
        options: &Options,
        customizer: Option<Customizer>,
        error_formatter: ErrorFormatter,
        error_factory: Arc<dyn ErrorFactory>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        Ok(Self {
            template,
            query_case: case::parse_optional(options.query.convert_case.as_deref())?,
            repeat_params: options.query.repeat_params,
            request_body_case: case::parse_optional(options.request.body.convert_case.as_deref())?,
            response_body_case: case::parse_optional(
                options.response.body.convert_case.as_deref(),
            )?,
            request_type: options.request.request_type,
            headers: header_map(&options.headers)?,
            customizer,
            error_formatter,
            error_factory,
            transport,
        })
    }
}

/// Builds the default headers: `Accept: application/json` unless overridden.
fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len() + 1);
    map.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (name, value) in headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        map.insert(name, value);
    }

    Ok(map)
}
