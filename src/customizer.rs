//! Request customizers.
//!
//! A customizer sees every request of a client (or of one call) just before it
//! is submitted. Synchronous customizers mutate the request in place.
//! Continuation-style customizers take ownership of the request and hand it back
//! through [`Next`], which lets them do asynchronous work first or abort the call.

use crate::metadata::RequestDescriptor;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// The error a customizer aborts a call with.
pub type CustomizerError = Box<dyn std::error::Error + Send + Sync>;

type SyncFn = dyn Fn(&mut RequestDescriptor, &Map<String, Value>) + Send + Sync;
type ContinuationFn = dyn Fn(RequestDescriptor, Map<String, Value>, Next) + Send + Sync;

/// A function that can inspect or mutate a request before it is submitted.
///
/// Both forms receive the call parameters as they were supplied.
///
/// # Examples
///
/// ```
/// use rest_resource::Customizer;
///
/// let sync = Customizer::sync(|request, _params| {
///     request.push_query("api_key", "secret");
/// });
///
/// let deferred = Customizer::with_continuation(|mut request, _params, next| {
///     tokio::spawn(async move {
///         let _ = request.set_header("authorization", "Bearer token");
///         next.proceed(request);
///     });
/// });
/// # let _ = (sync, deferred);
/// ```
#[derive(Clone)]
pub enum Customizer {
    /// Mutates the request and returns.
    Sync(Arc<SyncFn>),
    /// Must call [`Next::proceed`] or [`Next::abort`] exactly once.
    Continuation(Arc<ContinuationFn>),
}

impl Customizer {
    /// Wraps a synchronous customizer.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&mut RequestDescriptor, &Map<String, Value>) + Send + Sync + 'static,
    {
        Customizer::Sync(Arc::new(f))
    }

    /// Wraps a continuation-style customizer.
    ///
    /// If the customizer holds on to [`Next`] without ever calling it, the call
    /// never completes. Dropping it aborts the call instead.
    pub fn with_continuation<F>(f: F) -> Self
    where
        F: Fn(RequestDescriptor, Map<String, Value>, Next) + Send + Sync + 'static,
    {
        Customizer::Continuation(Arc::new(f))
    }

    /// Runs the customizer over `request`.
    pub(crate) async fn apply(
        &self,
        mut request: RequestDescriptor,
        params: &Map<String, Value>,
    ) -> Result<RequestDescriptor, CustomizerError> {
        match self {
            Customizer::Sync(f) => {
                f(&mut request, params);
                Ok(request)
            }
            Customizer::Continuation(f) => {
                let (tx, rx) = oneshot::channel();
                f(request, params.clone(), Next { tx });
                rx.await.unwrap_or_else(|_| {
                    Err("request customizer dropped its continuation without calling it".into())
                })
            }
        }
    }
}

impl fmt::Debug for Customizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Customizer::Sync(_) => f.write_str("Customizer::Sync"),
            Customizer::Continuation(_) => f.write_str("Customizer::Continuation"),
        }
    }
}

/// The continuation handed to a continuation-style customizer.
#[derive(Debug)]
pub struct Next {
    tx: oneshot::Sender<Result<RequestDescriptor, CustomizerError>>,
}

impl Next {
    /// Continues the call with `request`.
    pub fn proceed(self, request: RequestDescriptor) {
        // The receiver is gone only if the call itself was dropped.
        let _ = self.tx.send(Ok(request));
    }

    /// Aborts the call before anything is submitted.
    pub fn abort(self, error: impl Into<CustomizerError>) {
        let _ = self.tx.send(Err(error.into()));
    }
}
