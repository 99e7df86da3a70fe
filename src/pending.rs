//! The pending-result handle returned by every verb.

use crate::{ApiError, Error, Response};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

type CallFuture = Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send + 'static>>;

/// One in-flight call.
///
/// Await it to get the outcome, or hand it a callback with
/// [`on_complete`](Pending::on_complete). Both observe the same single execution.
/// Nothing is sent until the handle is polled or a callback is registered.
///
/// # Examples
///
/// ```no_run
/// use rest_resource::{CallParams, ResourceClient};
///
/// # async fn example() -> Result<(), rest_resource::Error> {
/// let client = ResourceClient::new("https://api.example.com/users/:id")?;
///
/// // Await the handle...
/// let user = client.get(CallParams::new().with("id", 1))?.await?;
/// println!("{}", user.data);
///
/// // ...or register a callback.
/// client
///     .get(CallParams::new().with("id", 2))?
///     .on_complete(|result| match result {
///         Ok(user) => println!("{}", user.data),
///         Err(err) => eprintln!("{}", err),
///     })?;
/// # Ok(())
/// # }
/// ```
#[must_use = "a pending call does nothing unless awaited or given a callback"]
pub struct Pending {
    inner: CallFuture,
}

impl Pending {
    pub(crate) fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<Response, ApiError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(future),
        }
    }

    /// Drives the call on the current Tokio runtime and invokes `callback` exactly
    /// once with its outcome.
    ///
    /// The returned handle only signals that the callback has run; the outcome
    /// itself goes to the callback alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] when called outside a Tokio runtime.
    /// Nothing is sent and the callback is dropped without being called.
    pub fn on_complete<F>(self, callback: F) -> crate::Result<JoinHandle<()>>
    where
        F: FnOnce(Result<Response, ApiError>) + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| {
            Error::ConfigurationError(format!("Callbacks need a Tokio runtime: {}", e))
        })?;

        Ok(runtime.spawn(async move {
            let result = self.await;
            callback(result);
        }))
    }
}

impl Future for Pending {
    type Output = Result<Response, ApiError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").finish_non_exhaustive()
    }
}
