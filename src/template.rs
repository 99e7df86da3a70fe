//! Endpoint templates and URL building.
//!
//! A template is an absolute URL whose path may contain `:name` placeholders,
//! e.g. `https://api.example.com/users/:userId/posts/:id`. Resolving it against a
//! parameter map substitutes present values and drops path segments whose
//! placeholders have no value. A query string in the template is kept and sent
//! ahead of the call's own query pairs.

use crate::{Error, Result};
use serde_json::{Map, Value};
use url::Url;

/// A parsed endpoint template.
///
/// Immutable once built; owned by a client for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    origin: String,
    path: String,
    query: Option<String>,
}

impl EndpointTemplate {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] for an empty template and
    /// [`Error::InvalidUrl`] when it is not an absolute URL with a host.
    ///
    /// # Examples
    ///
    /// ```
    /// use rest_resource::EndpointTemplate;
    ///
    /// let template = EndpointTemplate::parse("http://domain.com/users/:id").unwrap();
    /// assert_eq!(template.path(), "/users/:id");
    /// ```
    pub fn parse(template: &str) -> Result<Self> {
        if template.trim().is_empty() {
            return Err(Error::argument("Missing REST endpoint URL"));
        }

        let url = Url::parse(template)?;
        let host = url.host_str().ok_or(url::ParseError::EmptyHost)?;

        let mut origin = format!("{}://{}", url.scheme(), host);
        if let Some(port) = url.port() {
            origin.push_str(&format!(":{}", port));
        }

        Ok(Self {
            origin,
            path: url.path().to_string(),
            query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
        })
    }

    /// The scheme and host (with port, if any).
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The path, placeholders included.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The fixed query string written into the template, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Resolves the template into a concrete URL.
    ///
    /// The template's own query string, if any, is carried over unchanged; call
    /// parameters are not added to it.
    ///
    /// Every placeholder with a non-null value in `params` is substituted verbatim
    /// and its key is removed from `params`, so only unconsumed entries remain for
    /// the query string. Segments holding an unresolved placeholder are removed
    /// together with their leading `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rest_resource::EndpointTemplate;
    /// use serde_json::json;
    ///
    /// let template = EndpointTemplate::parse("http://domain.com/users/:userId/posts/:id").unwrap();
    ///
    /// let mut params = json!({ "userId": 3, "page": 2 }).as_object().unwrap().clone();
    /// let url = template.build_url(&mut params);
    ///
    /// assert_eq!(url, "http://domain.com/users/3/posts");
    /// assert!(params.contains_key("page"));
    /// assert!(!params.contains_key("userId"));
    /// ```
    pub fn build_url(&self, params: &mut Map<String, Value>) -> String {
        let mut path = String::with_capacity(self.path.len());

        for segment in self.path.split('/').skip(1) {
            if let Some(resolved) = resolve_segment(segment, params) {
                path.push('/');
                path.push_str(&resolved);
            }
        }

        match &self.query {
            Some(query) => format!("{}{}?{}", self.origin, path, query),
            None => format!("{}{}", self.origin, path),
        }
    }
}

/// Substitutes the placeholders of one path segment.
///
/// Returns `None` when any placeholder in the segment has no value. Values are
/// only removed from `params` once the whole segment resolves.
fn resolve_segment(segment: &str, params: &mut Map<String, Value>) -> Option<String> {
    if !segment.contains(':') {
        return Some(segment.to_string());
    }

    let mut resolved = String::with_capacity(segment.len());
    let mut consumed = Vec::new();
    let mut rest = segment;

    while let Some(start) = rest.find(':') {
        resolved.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if len == 0 {
            // A bare colon is literal text.
            resolved.push(':');
            rest = after;
            continue;
        }

        let name = &after[..len];
        match params.get(name) {
            Some(value) if !value.is_null() => {
                resolved.push_str(&value_to_string(value));
                consumed.push(name.to_string());
            }
            _ => return None,
        }
        rest = &after[len..];
    }
    resolved.push_str(rest);

    for name in consumed {
        params.remove(&name);
    }
    Some(resolved)
}

/// Renders a JSON value as plain text: strings unquoted, everything else as JSON.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
