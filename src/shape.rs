//! Call-shape resolution for positional invocations.
//!
//! [`ResourceClient::invoke`](crate::ResourceClient::invoke) accepts a loose list
//! of positional arguments. [`CallShape::resolve`] maps that list onto
//! `(params, data, callback)` once, before anything else happens:
//!
//! | verb                       | positional forms                                 |
//! |----------------------------|--------------------------------------------------|
//! | `GetAll`, `Get`            | `()`, `(params)`                                 |
//! | `Create`                   | `(data)`, `(params, data)`                       |
//! | `Update`, `Patch`          | `(params)`, `(params, data)`                     |
//! | `Delete`                   | `()`, `(params)`, `(params, body)`               |
//!
//! A trailing [`Arg::Callback`] may follow any form.

use crate::{metadata::CallParams, ApiError, Error, Response, Result};
use http::Method;
use serde_json::{Map, Value};
use std::fmt;

/// The completion callback of a positional invocation. Called exactly once.
pub type Callback = Box<dyn FnOnce(std::result::Result<Response, ApiError>) + Send + 'static>;

/// A resource operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// List the collection (GET).
    GetAll,
    /// Fetch a resource (GET).
    Get,
    /// Create a resource (POST).
    Create,
    /// Replace a resource (PUT).
    Update,
    /// Partially update a resource (PATCH).
    Patch,
    /// Delete a resource (DELETE).
    Delete,
}

impl Verb {
    /// The HTTP method this verb is sent with.
    pub fn method(&self) -> Method {
        match self {
            Verb::GetAll | Verb::Get => Method::GET,
            Verb::Create => Method::POST,
            Verb::Update => Method::PUT,
            Verb::Patch => Method::PATCH,
            Verb::Delete => Method::DELETE,
        }
    }

    /// The verb name as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::GetAll => "getAll",
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
        }
    }

    fn max_positional(&self) -> usize {
        match self {
            Verb::GetAll | Verb::Get => 1,
            Verb::Create | Verb::Update | Verb::Patch | Verb::Delete => 2,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positional argument.
pub enum Arg {
    /// A JSON value: params, data or body depending on position.
    Value(Value),
    /// A parameter set, possibly carrying a per-call customizer.
    Params(CallParams),
    /// The completion callback.
    Callback(Callback),
}

impl Arg {
    /// Wraps a completion callback.
    pub fn callback<F>(f: F) -> Self
    where
        F: FnOnce(std::result::Result<Response, ApiError>) + Send + 'static,
    {
        Arg::Callback(Box::new(f))
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Arg::Params(p) => f.debug_tuple("Params").field(p).finish(),
            Arg::Callback(_) => f.write_str("Callback"),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Map<String, Value>> for Arg {
    fn from(map: Map<String, Value>) -> Self {
        Arg::Value(Value::Object(map))
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Value(Value::String(text.to_string()))
    }
}

impl From<CallParams> for Arg {
    fn from(params: CallParams) -> Self {
        Arg::Params(params)
    }
}

/// The resolved form of one invocation.
#[derive(Default)]
pub struct CallShape {
    /// Path and query parameters.
    pub params: CallParams,
    /// The body, for verbs that carry one.
    pub data: Option<Value>,
    /// The completion callback, if the caller supplied one.
    pub callback: Option<Callback>,
}

impl CallShape {
    pub(crate) fn new(params: CallParams, data: Option<Value>) -> Self {
        Self {
            params,
            data,
            callback: None,
        }
    }

    /// Resolves positional arguments for `verb` and checks the call preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] for too many arguments, a callback that is not
    /// last, params that are not an object, a missing or non-object payload, or a
    /// missing id.
    ///
    /// # Examples
    ///
    /// ```
    /// use rest_resource::{CallShape, Verb};
    /// use serde_json::json;
    ///
    /// let shape = CallShape::resolve(Verb::Create, vec![json!({ "name": "x" }).into()]).unwrap();
    /// assert_eq!(shape.data, Some(json!({ "name": "x" })));
    /// assert!(shape.params.values().is_empty());
    ///
    /// let err = CallShape::resolve(Verb::Update, vec![json!({ "id": 1 }).into()]);
    /// assert!(err.is_err());
    /// ```
    pub fn resolve(verb: Verb, mut args: Vec<Arg>) -> Result<Self> {
        let callback = match args.last() {
            Some(Arg::Callback(_)) => match args.pop() {
                Some(Arg::Callback(cb)) => Some(cb),
                _ => None,
            },
            _ => None,
        };

        if args.iter().any(|a| matches!(a, Arg::Callback(_))) {
            return Err(Error::argument(format!(
                "The callback must be the last argument to {}",
                verb
            )));
        }
        if args.len() > verb.max_positional() {
            return Err(Error::argument(format!(
                "Too many arguments to {}: expected at most {}, got {}",
                verb,
                verb.max_positional(),
                args.len()
            )));
        }

        let mut args = args.into_iter();
        let mut shape = match (verb, args.next(), args.next()) {
            (_, None, _) => CallShape::default(),
            (Verb::Create, Some(data), None) => {
                let (params, data) = into_data(data);
                CallShape::new(params, data)
            }
            (_, Some(params), None) => CallShape::new(into_params(params)?, None),
            (_, Some(params), Some(data)) => {
                let params = into_params(params)?;
                let (extra, data) = into_data(data);
                CallShape::new(merge_customizer(params, extra), data)
            }
        };

        shape.validate(verb)?;
        shape.callback = callback;
        Ok(shape)
    }

    /// Checks the preconditions of `verb` against this shape.
    pub(crate) fn validate(&self, verb: Verb) -> Result<()> {
        match verb {
            Verb::GetAll | Verb::Get => Ok(()),
            Verb::Create => match &self.data {
                None => Err(Error::argument("Missing data object")),
                Some(data) if !is_payload(data) => {
                    Err(Error::argument("The data must be an object"))
                }
                Some(_) => Ok(()),
            },
            Verb::Update | Verb::Patch => {
                if verb == Verb::Update && !self.params.has("id") {
                    return Err(Error::argument("A resource ID is required"));
                }
                match &self.data {
                    Some(data) if is_payload(data) => Ok(()),
                    _ => Err(Error::argument("The data must be an object")),
                }
            }
            Verb::Delete => {
                if !self.params.has("id") {
                    return Err(Error::argument(
                        "The resource ID cannot be null or undefined",
                    ));
                }
                match &self.data {
                    Some(body) if !is_payload(body) => {
                        Err(Error::argument("The body must be an object"))
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

impl fmt::Debug for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallShape")
            .field("params", &self.params)
            .field("data", &self.data)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// A payload is an object, an array or a pre-serialized string.
fn is_payload(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_) | Value::String(_))
}

fn into_params(arg: Arg) -> Result<CallParams> {
    match arg {
        Arg::Params(params) => Ok(params),
        Arg::Value(Value::Object(map)) => Ok(map.into()),
        Arg::Value(Value::Null) => Ok(CallParams::new()),
        _ => Err(Error::argument("The params must be an object")),
    }
}

/// Splits a data argument into its body and any customizer it carried.
fn into_data(arg: Arg) -> (CallParams, Option<Value>) {
    match arg {
        Arg::Value(Value::Null) => (CallParams::new(), None),
        Arg::Value(value) => (CallParams::new(), Some(value)),
        Arg::Params(params) => {
            let (values, customizer) = params.into_parts();
            let carrier = match customizer {
                Some(c) => CallParams::new().with_customizer(c),
                None => CallParams::new(),
            };
            (carrier, Some(Value::Object(values)))
        }
        Arg::Callback(_) => (CallParams::new(), None),
    }
}

fn merge_customizer(params: CallParams, extra: CallParams) -> CallParams {
    match extra.into_parts().1 {
        Some(customizer) => params.with_customizer(customizer),
        None => params,
    }
}
